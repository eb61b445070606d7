//! # Application Layer Protocols
//!
//! Application layer (OSI Layer 7) protocol implementations built on the core
//! network traits.
//!
//! ## Available Protocols
//!
//! - **[`http`]**: HTTP/1.0 server engine
//!
//! ## Design Principles
//!
//! - **Connection Agnostic**: Work with any type implementing [`Connection`](crate::network::Connection)
//! - **No-std Compatible**: Designed for embedded systems without heap allocation
//! - **Resource Conscious**: Use fixed-size buffers and minimal memory
//!
//! ## Usage Pattern
//!
//! 1. Describe the application as a route table
//! 2. Accept a connection using your transport layer
//! 3. Hand it to the server, which answers one request and closes it

/// HTTP server implementation.
///
/// Request parsing, routing and response writing for HTTP/1.0 over any
/// connection type.
pub mod http;
