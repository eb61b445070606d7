//! HTTP/1.0 server engine for embedded systems.
//!
//! This module provides a lightweight HTTP server designed specifically for
//! embedded systems and `no_std` environments. It focuses on simplicity,
//! predictable memory usage, and strict protocol framing on resource-constrained
//! devices.
//!
//! # Features
//!
//! - Strict request-line parsing (single-space separated, no lenient mode)
//! - Route table with `<name>` path parameters and per-route header retention
//! - Response state machine enforcing status line → headers → body ordering
//! - Fixed-size buffers for predictable memory usage
//! - One request per connection, always answered with `HTTP/1.0` and closed
//! - Synchronous engine by default, async engine with the `async` feature
//!
//! # Usage
//!
//! Register routes on a [`Router`], wrap it in a [`Server`] and hand every
//! accepted connection to [`Server::handle_connection`].
//!
//! ```rust,no_run
//! use libhttpd::network::application::http::*;
//! # use libhttpd::network::error::Error;
//! # struct MockConnection;
//! # impl libhttpd::network::Connection for MockConnection {}
//! # impl libhttpd::network::Read for MockConnection {
//! #     type Error = Error;
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl libhttpd::network::Write for MockConnection {
//! #     type Error = Error;
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl libhttpd::network::Close for MockConnection {
//! #     type Error = Error;
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! fn greet(
//!     _req: &Request,
//!     resp: &mut Response<MockConnection>,
//!     params: &[&str],
//! ) -> HandlerResult {
//!     resp.add_header("content-type", "text/plain")?;
//!     resp.send(b"Hello, ")?;
//!     resp.send(params[0].as_bytes())?;
//!     Ok(())
//! }
//!
//! let mut router: Router<HandlerFn<MockConnection>> = Router::new();
//! router.route("/hello/<name>", greet).unwrap();
//!
//! let server = Server::new(router);
//! server.handle_connection(MockConnection);
//! ```

/// Protocol, routing and handler error types.
pub mod error;

/// Server configuration.
pub mod config;

/// Request-line parsing.
pub mod request_line;

/// Buffered line reading over a connection.
pub mod line;

/// Request header retention.
pub mod headers;

/// Route pattern matching.
pub mod path;

/// Route table.
pub mod router;

/// The request view handed to handlers.
pub mod request;

/// Response state machine.
pub mod response;

/// Handler traits.
pub mod handler;

/// Per-connection orchestration.
pub mod server;


pub use config::{ConfigError, ServerConfig};
pub use error::{ConnectionError, HandlerError, HttpError, ResponseError, RouteError};
pub use handler::{Handler, HandlerFn, HandlerResult};
pub use headers::{Header, Headers, parse_header_line};
pub use line::LineReader;
pub use path::{PathParams, match_path};
pub use request::{Request, RequestHead};
pub use request_line::{Method, RequestLine, Version, parse_request_line};
pub use response::{Response, ResponseState};
pub use router::{Resolved, Route, RouteOptions, Router};
pub use server::Server;

#[cfg(feature = "async")]
pub use handler::AsyncHandler;
#[cfg(feature = "async")]
pub use response::AsyncResponse;

/// Maximum length of a request line or retained header line, terminator included.
pub const MAX_LINE_LEN: usize = 512;
/// Maximum length of a request target (path plus query string).
pub const MAX_TARGET_LEN: usize = 256;
/// Maximum number of request headers a route may retain.
pub const MAX_HEADERS: usize = 16;
/// Maximum length of a header name.
pub const MAX_HEADER_NAME_LEN: usize = 64;
/// Maximum length of a header value.
pub const MAX_HEADER_VALUE_LEN: usize = 256;
/// Maximum number of entries in a route table.
pub const MAX_ROUTES: usize = 32;
/// Maximum number of `<name>` parameters in one route pattern.
pub const MAX_PATH_PARAMS: usize = 8;
/// Maximum number of headers on a response.
pub const MAX_RESPONSE_HEADERS: usize = 16;
/// Maximum length of a response reason phrase.
pub const MAX_REASON_LEN: usize = 64;

/// Protocol version written on every status line.
pub const HTTP_VERSION: &str = "HTTP/1.0";
