//! Transport faults

/// Faults a connection can report while the HTTP engine reads a request or
/// writes a response.
///
/// The engine only cares which class a fault falls in, see
/// [`is_cancellation`](Error::is_cancellation) and
/// [`is_disconnect`](Error::is_disconnect); everything else becomes a `500`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An operation was attempted on a connection that is not open.
    NotOpen,
    /// The stack refused or failed a write.
    WriteError,
    /// The stack failed a read.
    ReadError,
    /// No data arrived within the read timeout.
    Timeout,
    /// The task driving the connection was cancelled.
    Cancelled,
    /// The peer closed the connection.
    ConnectionClosed,
    /// The peer reset the connection.
    ConnectionReset,
    /// The connection was aborted by the local stack.
    ConnectionAborted,
    /// The peer is no longer reading.
    BrokenPipe,
    /// The listen address could not be bound.
    InvalidAddress,
}

impl Error {
    /// Returns `true` for faults that end the connection without any further I/O.
    ///
    /// Nothing is written back to the peer for these, not even an error status.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Timeout | Error::Cancelled)
    }

    /// Returns `true` when the peer went away and a response can no longer be delivered.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            Error::ConnectionClosed
                | Error::ConnectionReset
                | Error::ConnectionAborted
                | Error::BrokenPipe
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::Cancelled => defmt::write!(f, "Cancelled"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::ConnectionReset => defmt::write!(f, "ConnectionReset"),
            Error::ConnectionAborted => defmt::write!(f, "ConnectionAborted"),
            Error::BrokenPipe => defmt::write!(f, "BrokenPipe"),
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
        }
    }
}
