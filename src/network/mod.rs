//! Byte-stream transport seam
//!
//! This module provides the transport traits the HTTP engine is written against. It
//! includes traits for both synchronous and asynchronous operations so the same
//! protocol code can run on a blocking socket, an embedded TCP stack, or an async
//! executor.
//!

#![allow(missing_docs)]
#![allow(async_fn_in_trait)]
#![deny(unsafe_code)]

/// Transport faults
pub mod error;

/// Protocol engines built on the transport traits
pub mod application;

/// `std::net` adapters for hosted targets
#[cfg(feature = "std")]
pub mod tcp;

use error::Error;

/// Transport traits in one import
pub mod prelude {
    #[cfg(feature = "async")]
    pub use super::{AsyncBind, AsyncClose, AsyncHttp, AsyncRead, AsyncWrite};
    pub use super::{Bind, Close, Http, Read, Write};
}

/// Blocking input half of a stream.
pub trait Read {
    /// Fault type.
    type Error: core::fmt::Debug;
    /// Reads at most `buf.len()` bytes; `Ok(0)` is end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Blocking output half of a stream.
pub trait Write {
    /// Fault type.
    type Error: core::fmt::Debug;
    /// Writes a prefix of `buf` and returns its length.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Pushes buffered bytes to the peer.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Teardown of a stream.
pub trait Close {
    /// Fault type.
    type Error: core::fmt::Debug;
    /// Shuts the stream down, consuming it.
    fn close(self) -> Result<(), Self::Error>;
}

/// A blocking, bidirectional byte stream to one client.
pub trait Connection: Read + Write + Close {}

/// Source of accepted connections.
pub trait Bind {
    /// Stream handed out per client.
    type Connection: Connection;
    /// Fault type.
    type Error: core::fmt::Debug;
    /// Listens on `local` if not yet listening and blocks until a client connects.
    fn bind(&mut self, local: &str) -> Result<Self::Connection, Self::Error>;
}

/// Async counterpart of [`Read`].
#[cfg(feature = "async")]
pub trait AsyncRead {
    /// Fault type.
    type Error: core::fmt::Debug;
    /// Reads at most `buf.len()` bytes; `Ok(0)` is end of stream.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

#[cfg(feature = "async")]
pub trait AsyncWrite {
    /// Fault type.
    type Error: core::fmt::Debug;
    /// Writes a prefix of `buf` and returns its length.
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Pushes buffered bytes to the peer.
    async fn flush(&mut self) -> Result<(), Self::Error>;
}

#[cfg(feature = "async")]
pub trait AsyncClose {
    /// Fault type.
    type Error: core::fmt::Debug;
    /// Close the connection asynchronously, resolving once it is fully closed
    async fn close(self) -> Result<(), Self::Error>;
}

#[cfg(feature = "async")]
pub trait AsyncConnection: AsyncRead + AsyncWrite + AsyncClose {}

#[cfg(feature = "async")]
pub trait AsyncBind {
    /// Stream handed out per client.
    type Connection: AsyncConnection;
    /// Fault type.
    type Error: core::fmt::Debug;
    /// Listens on `local` if not yet listening and waits for a client.
    async fn bind(&mut self, local: &str) -> Result<Self::Connection, Self::Error>;
}

/// A connection the HTTP engine can serve.
///
/// Implemented for every [`Connection`] that reports faults as [`Error`], so the
/// engine can tell timeouts and disconnects apart from other failures.
pub trait Http:
    Connection + Read<Error = Error> + Write<Error = Error> + Close<Error = Error>
{
}

impl<T> Http for T where
    T: Connection + Read<Error = Error> + Write<Error = Error> + Close<Error = Error>
{
}

/// Async counterpart of [`Http`].
#[cfg(feature = "async")]
pub trait AsyncHttp:
    AsyncConnection + AsyncRead<Error = Error> + AsyncWrite<Error = Error> + AsyncClose<Error = Error>
{
}

#[cfg(feature = "async")]
impl<T> AsyncHttp for T where
    T: AsyncConnection
        + AsyncRead<Error = Error>
        + AsyncWrite<Error = Error>
        + AsyncClose<Error = Error>
{
}
