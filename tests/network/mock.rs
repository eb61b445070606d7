use libhttpd::network::error::Error;
use libhttpd::network::*;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// What the server did to a [`MockConnection`], readable after the connection
/// has been consumed.
#[derive(Debug, Default)]
struct Wire {
    flushed: Vec<u8>,
    pending: Vec<u8>,
    flushes: usize,
    closed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript(Rc<RefCell<Wire>>);

impl Transcript {
    /// Bytes that reached the peer, i.e. were written and then flushed.
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow().flushed).into_owned()
    }

    /// Bytes written but never flushed.
    pub fn unflushed(&self) -> usize {
        self.0.borrow().pending.len()
    }

    pub fn flushes(&self) -> usize {
        self.0.borrow().flushes
    }

    pub fn is_closed(&self) -> bool {
        self.0.borrow().closed
    }
}

/// A scripted connection: serves `input` in chunks, then reports end of stream
/// (or `read_error`), and records everything written.
#[derive(Debug)]
pub struct MockConnection {
    input: Vec<u8>,
    read_pos: usize,
    chunk: usize,
    read_error: Option<Error>,
    write_error: Option<Error>,
    wire: Transcript,
}

impl MockConnection {
    pub fn new(input: &[u8]) -> (Self, Transcript) {
        let wire = Transcript::default();
        let conn = Self {
            input: input.to_vec(),
            read_pos: 0,
            chunk: usize::MAX,
            read_error: None,
            write_error: None,
            wire: wire.clone(),
        };
        (conn, wire)
    }

    /// Hands out at most `chunk` bytes per read.
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    /// Fails reads with `err` once the input is used up.
    pub fn with_read_error(mut self, err: Error) -> Self {
        self.read_error = Some(err);
        self
    }

    /// Fails every write with `err`.
    pub fn with_write_error(mut self, err: Error) -> Self {
        self.write_error = Some(err);
        self
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let remaining = &self.input[self.read_pos..];
        if remaining.is_empty() {
            return match self.read_error {
                Some(err) => Err(err),
                None => Ok(0),
            };
        }
        let len = buf.len().min(remaining.len()).min(self.chunk);
        buf[..len].copy_from_slice(&remaining[..len]);
        self.read_pos += len;
        Ok(len)
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, Error> {
        if let Some(err) = self.write_error {
            return Err(err);
        }
        self.wire.0.borrow_mut().pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush_bytes(&mut self) -> Result<(), Error> {
        let mut wire = self.wire.0.borrow_mut();
        let pending = std::mem::take(&mut wire.pending);
        wire.flushed.extend_from_slice(&pending);
        wire.flushes += 1;
        Ok(())
    }

    fn close_wire(self) -> Result<(), Error> {
        let mut wire = self.wire.0.borrow_mut();
        if wire.closed {
            return Err(Error::NotOpen);
        }
        wire.closed = true;
        Ok(())
    }
}

impl Read for MockConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.read_bytes(buf)
    }
}

impl Write for MockConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.write_bytes(buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flush_bytes()
    }
}

impl Close for MockConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        self.close_wire()
    }
}

impl Connection for MockConnection {}

/// Hands out queued connections, then fails.
#[derive(Debug, Default)]
pub struct MockListener {
    pub queue: VecDeque<MockConnection>,
    pub binds: Vec<String>,
}

impl Bind for MockListener {
    type Connection = MockConnection;
    type Error = Error;

    fn bind(&mut self, local: &str) -> Result<Self::Connection, Self::Error> {
        self.binds.push(local.to_string());
        self.queue.pop_front().ok_or(Error::NotOpen)
    }
}

#[cfg(feature = "async")]
mod async_impls {
    use super::*;

    impl AsyncRead for MockConnection {
        type Error = Error;

        async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            self.read_bytes(buf)
        }
    }

    impl AsyncWrite for MockConnection {
        type Error = Error;

        async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.write_bytes(buf)
        }

        async fn flush(&mut self) -> Result<(), Self::Error> {
            self.flush_bytes()
        }
    }

    impl AsyncClose for MockConnection {
        type Error = Error;

        async fn close(self) -> Result<(), Self::Error> {
            self.close_wire()
        }
    }

    impl AsyncConnection for MockConnection {}

    impl AsyncBind for MockListener {
        type Connection = MockConnection;
        type Error = Error;

        async fn bind(&mut self, local: &str) -> Result<Self::Connection, Self::Error> {
            self.binds.push(local.to_string());
            self.queue.pop_front().ok_or(Error::NotOpen)
        }
    }
}

#[test]
fn test_read_in_chunks() {
    let (mut conn, _) = MockConnection::new(b"abcdef");
    conn = conn.with_chunk(4);
    let mut buf = [0; 8];
    assert_eq!(Read::read(&mut conn, &mut buf), Ok(4));
    assert_eq!(&buf[..4], b"abcd");
    assert_eq!(Read::read(&mut conn, &mut buf), Ok(2));
    assert_eq!(Read::read(&mut conn, &mut buf), Ok(0));
}

#[test]
fn test_read_error_after_input() {
    let (conn, _) = MockConnection::new(b"x");
    let mut conn = conn.with_read_error(Error::Timeout);
    let mut buf = [0; 4];
    assert_eq!(Read::read(&mut conn, &mut buf), Ok(1));
    assert_eq!(Read::read(&mut conn, &mut buf), Err(Error::Timeout));
}

#[test]
fn test_only_flushed_bytes_reach_the_peer() {
    let (mut conn, wire) = MockConnection::new(b"");
    assert_eq!(Write::write(&mut conn, b"abc"), Ok(3));
    assert_eq!(wire.output(), "");
    assert_eq!(wire.unflushed(), 3);
    Write::flush(&mut conn).unwrap();
    assert_eq!(wire.output(), "abc");
    assert_eq!(wire.unflushed(), 0);
    assert_eq!(wire.flushes(), 1);

    assert!(!wire.is_closed());
    Close::close(conn).unwrap();
    assert!(wire.is_closed());
}

#[test]
fn test_error_classification() {
    for err in [Error::Timeout, Error::Cancelled] {
        assert!(err.is_cancellation());
        assert!(!err.is_disconnect());
    }
    for err in [
        Error::ConnectionClosed,
        Error::ConnectionReset,
        Error::ConnectionAborted,
        Error::BrokenPipe,
    ] {
        assert!(err.is_disconnect());
        assert!(!err.is_cancellation());
    }
    for err in [Error::ReadError, Error::WriteError, Error::NotOpen] {
        assert!(!err.is_disconnect());
        assert!(!err.is_cancellation());
    }
}
