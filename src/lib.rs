//! # libhttpd - HTTP/1.0 server engine for embedded systems
//!
//! A small HTTP server core for devices that need a web interface: a device
//! dashboard, a JSON status endpoint, a handful of control routes. It parses
//! requests strictly, dispatches them through a fixed route table and writes
//! responses through a state machine that always produces valid framing. This
//! library is designed for embedded systems and supports `no_std` environments.
//!
//! ## Features
//!
//! ### HTTP Engine
//! - **Request-line parser**: RFC 9112 request lines, single-space separated
//! - **Route table**: `<name>` path parameters, per-route method lists and header
//!   retention, optional catch-all handler
//! - **Response writer**: status line, headers and body written strictly in order
//! - **Connection handler**: one request per connection, errors mapped to
//!   `400`/`404`/`405`/`500`/`501`, connection always closed
//!
//! ### Transport Abstraction
//! - Read/write/close traits implemented by the platform's TCP stack
//! - Sync and async variants sharing the same protocol code
//! - `std::net` adapter for hosted builds and tests
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libhttpd = "0.1.0"
//! ```
//!
//! ### Basic Server Example
//!
//! ```rust,no_run
//! use libhttpd::network::application::http::{
//!     HandlerFn, HandlerResult, Request, Response, Router, Server,
//! };
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
//! fn index(_req: &Request, resp: &mut Response<MockConnection>, _params: &[&str]) -> HandlerResult {
//!     resp.send(b"Hello, world!")?;
//!     Ok(())
//! }
//!
//! let mut router: Router<HandlerFn<MockConnection>> = Router::new();
//! router.route("/", index).unwrap();
//!
//! let server = Server::new(router);
//! // for each accepted connection:
//! server.handle_connection(MockConnection);
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based devices (Raspberry Pi, etc.)
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support and the TCP adapter (default: disabled)
//! - `async`: Enable the async engine for non-blocking operations
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod fmt;

/// Network abstraction layer: transport traits and the HTTP server engine.
pub mod network;
