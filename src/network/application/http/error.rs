//! Error types for the HTTP engine.
//!
//! Each layer of the engine reports its own error enum. [`ConnectionError`] is the
//! union the connection handler works with; it is resolved into a status line (or
//! into silence, for transport faults) before a connection is closed.

use crate::network::error::Error;

/// Protocol signals that are answered with an HTTP status code.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HttpError {
    /// Malformed request line or header line (400).
    BadRequest,
    /// No route pattern matches the request path (404).
    NotFound,
    /// A route pattern matches but none for the request method (405).
    MethodNotAllowed,
    /// CONNECT, OPTIONS and TRACE are recognised but not served (501).
    NotImplemented,
    /// The handler failed (500).
    Internal,
}

impl HttpError {
    /// The status code written on the status line.
    pub fn status_code(self) -> u16 {
        match self {
            HttpError::BadRequest => 400,
            HttpError::NotFound => 404,
            HttpError::MethodNotAllowed => 405,
            HttpError::Internal => 500,
            HttpError::NotImplemented => 501,
        }
    }
}

/// Route registration failures.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RouteError {
    /// The pattern is empty or contains a query string.
    InvalidPattern,
    /// The pattern declares more than [`MAX_PATH_PARAMS`](super::MAX_PATH_PARAMS) parameters.
    TooManyParameters,
    /// The route retains more than [`MAX_HEADERS`](super::MAX_HEADERS) headers.
    TooManyHeaders,
    /// A retained header name is empty or longer than
    /// [`MAX_HEADER_NAME_LEN`](super::MAX_HEADER_NAME_LEN).
    InvalidHeaderName,
    /// The route table has no room left.
    TableFull,
    /// The method name is not a supported HTTP verb.
    InvalidMethod,
}

/// Response writer failures.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ResponseError {
    /// The status line has already been written.
    StatusLineSent,
    /// The header block has already been written.
    HeadersSent,
    /// A header or reason phrase does not fit the fixed-size buffers.
    CapacityExceeded,
    /// A header name, header value or reason phrase contains bytes that would
    /// break the response framing (`\r`, `\n`, or `:` in a name).
    InvalidValue,
    /// The connection failed while writing.
    Transport(Error),
}

impl From<Error> for ResponseError {
    fn from(err: Error) -> Self {
        ResponseError::Transport(err)
    }
}

/// Error returned by request handlers.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HandlerError {
    /// Answer with the given status instead of the handler's own response.
    Status(HttpError),
    /// Writing the response failed.
    Response(ResponseError),
    /// Any other application failure; answered with 500.
    Failed(&'static str),
}

impl From<HttpError> for HandlerError {
    fn from(err: HttpError) -> Self {
        HandlerError::Status(err)
    }
}

impl From<ResponseError> for HandlerError {
    fn from(err: ResponseError) -> Self {
        HandlerError::Response(err)
    }
}

impl From<Error> for HandlerError {
    fn from(err: Error) -> Self {
        HandlerError::Response(ResponseError::Transport(err))
    }
}

/// Everything that can go wrong while serving one connection.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConnectionError {
    /// A protocol signal answered with a status code.
    Status(HttpError),
    /// The transport failed.
    Transport(Error),
    /// The handler failed with an application error.
    Handler(HandlerError),
}

impl From<HttpError> for ConnectionError {
    fn from(err: HttpError) -> Self {
        ConnectionError::Status(err)
    }
}

impl From<Error> for ConnectionError {
    fn from(err: Error) -> Self {
        ConnectionError::Transport(err)
    }
}

impl From<ResponseError> for ConnectionError {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::Transport(err) => ConnectionError::Transport(err),
            other => ConnectionError::Handler(HandlerError::Response(other)),
        }
    }
}

impl From<HandlerError> for ConnectionError {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::Status(status) => ConnectionError::Status(status),
            HandlerError::Response(err) => err.into(),
            failed @ HandlerError::Failed(_) => ConnectionError::Handler(failed),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HttpError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            HttpError::BadRequest => defmt::write!(f, "BadRequest"),
            HttpError::NotFound => defmt::write!(f, "NotFound"),
            HttpError::MethodNotAllowed => defmt::write!(f, "MethodNotAllowed"),
            HttpError::NotImplemented => defmt::write!(f, "NotImplemented"),
            HttpError::Internal => defmt::write!(f, "Internal"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RouteError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            RouteError::InvalidPattern => defmt::write!(f, "InvalidPattern"),
            RouteError::TooManyParameters => defmt::write!(f, "TooManyParameters"),
            RouteError::TooManyHeaders => defmt::write!(f, "TooManyHeaders"),
            RouteError::InvalidHeaderName => defmt::write!(f, "InvalidHeaderName"),
            RouteError::TableFull => defmt::write!(f, "TableFull"),
            RouteError::InvalidMethod => defmt::write!(f, "InvalidMethod"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ResponseError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ResponseError::StatusLineSent => defmt::write!(f, "StatusLineSent"),
            ResponseError::HeadersSent => defmt::write!(f, "HeadersSent"),
            ResponseError::CapacityExceeded => defmt::write!(f, "CapacityExceeded"),
            ResponseError::InvalidValue => defmt::write!(f, "InvalidValue"),
            ResponseError::Transport(err) => defmt::write!(f, "Transport({})", err),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HandlerError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            HandlerError::Status(err) => defmt::write!(f, "Status({})", err),
            HandlerError::Response(err) => defmt::write!(f, "Response({})", err),
            HandlerError::Failed(reason) => defmt::write!(f, "Failed({})", reason),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConnectionError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConnectionError::Status(err) => defmt::write!(f, "Status({})", err),
            ConnectionError::Transport(err) => defmt::write!(f, "Transport({})", err),
            ConnectionError::Handler(err) => defmt::write!(f, "Handler({})", err),
        }
    }
}
