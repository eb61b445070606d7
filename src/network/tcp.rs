//! Transport adapters over `std::net`.
//!
//! [`TcpAcceptor`] implements [`Bind`], so a hosted build can drive
//! [`Server::serve`](crate::network::application::http::Server::serve) on a real
//! socket:
//!
//! ```rust,no_run
//! use libhttpd::network::application::http::{Router, Server, ServerConfig, HandlerFn};
//! use libhttpd::network::tcp::{TcpAcceptor, TcpConnection};
//!
//! let router: Router<HandlerFn<TcpConnection>> = Router::new();
//! let config = ServerConfig::default();
//! let mut acceptor = TcpAcceptor::listen(&config).unwrap();
//! Server::new(router).serve(&mut acceptor, config.address).unwrap();
//! ```

use std::io::{self, ErrorKind, Read as _, Write as _};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use super::application::http::ServerConfig;
use super::error::Error;
use super::{Bind, Close, Connection, Read, Write};

/// An accepted TCP stream.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl TcpConnection {
    /// Wraps a connected stream.
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Address of the remote end.
    pub fn peer_addr(&self) -> Result<SocketAddr, Error> {
        self.stream.peer_addr().map_err(|_| Error::NotOpen)
    }
}

impl From<TcpStream> for TcpConnection {
    fn from(stream: TcpStream) -> Self {
        Self::new(stream)
    }
}

impl Read for TcpConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.stream
            .read(buf)
            .map_err(|e| map_io_error(e, Error::ReadError))
    }
}

impl Write for TcpConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream
            .write(buf)
            .map_err(|e| map_io_error(e, Error::WriteError))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream
            .flush()
            .map_err(|e| map_io_error(e, Error::WriteError))
    }
}

impl Close for TcpConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != ErrorKind::NotConnected => Err(map_io_error(e, Error::WriteError)),
            _ => Ok(()),
        }
    }
}

impl Connection for TcpConnection {}

/// Accepts TCP connections on one local address.
///
/// The listening socket is opened by [`listen`](TcpAcceptor::listen), or lazily by
/// the first [`bind`](Bind::bind) call.
#[derive(Debug, Default)]
pub struct TcpAcceptor {
    listener: Option<TcpListener>,
    read_timeout: Option<Duration>,
}

impl TcpAcceptor {
    /// An acceptor with no socket yet and no read timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the listening socket described by `config`.
    ///
    /// `config.backlog` is left to the operating system default; `std` has no way
    /// to set it.
    pub fn listen(config: &ServerConfig<'_>) -> Result<Self, Error> {
        let listener = TcpListener::bind(config.address).map_err(|_| Error::InvalidAddress)?;
        Ok(Self {
            listener: Some(listener),
            read_timeout: match config.read_timeout_ms {
                0 => None,
                ms => Some(Duration::from_millis(u64::from(ms))),
            },
        })
    }

    /// Read timeout applied to every accepted connection.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Address the socket is bound to, once it is open.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref()?.local_addr().ok()
    }
}

impl Bind for TcpAcceptor {
    type Connection = TcpConnection;
    type Error = Error;

    fn bind(&mut self, local: &str) -> Result<Self::Connection, Self::Error> {
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => TcpListener::bind(local).map_err(|_| Error::InvalidAddress)?,
        };
        let accepted = listener.accept();
        self.listener = Some(listener);

        let (stream, _) = accepted.map_err(|e| map_io_error(e, Error::ReadError))?;
        stream
            .set_read_timeout(self.read_timeout)
            .map_err(|e| map_io_error(e, Error::ReadError))?;
        Ok(TcpConnection::new(stream))
    }
}

fn map_io_error(e: io::Error, fallback: Error) -> Error {
    match e.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => Error::Timeout,
        ErrorKind::ConnectionReset => Error::ConnectionReset,
        ErrorKind::ConnectionAborted => Error::ConnectionAborted,
        ErrorKind::BrokenPipe => Error::BrokenPipe,
        ErrorKind::UnexpectedEof => Error::ConnectionClosed,
        ErrorKind::NotConnected => Error::NotOpen,
        _ => fallback,
    }
}
