use heapless::Vec;

use super::MAX_TARGET_LEN;
use super::error::HttpError;
use super::headers::Headers;
use super::request_line::{Method, RequestLine, Version};

/// Owned copy of a parsed request line.
///
/// Kept separate from the line buffer so the buffer can be reused for header lines
/// while path parameters still borrow the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    /// Request method.
    pub method: Method,
    /// Declared protocol version.
    pub version: Version,
    target: Vec<u8, MAX_TARGET_LEN>,
}

impl RequestHead {
    /// Copies a parsed request line; a target over [`MAX_TARGET_LEN`] is a bad request.
    pub fn from_line(line: &RequestLine<'_>) -> Result<Self, HttpError> {
        Ok(Self {
            method: line.method,
            version: line.version,
            target: Vec::from_slice(line.target).map_err(|_| HttpError::BadRequest)?,
        })
    }

    /// Full request target.
    pub fn target(&self) -> &[u8] {
        &self.target
    }

    /// Target up to the first `?`.
    pub fn path(&self) -> &[u8] {
        self.split_target().0
    }

    /// Target after the first `?`, if there is one.
    pub fn query_string(&self) -> Option<&[u8]> {
        self.split_target().1
    }

    fn split_target(&self) -> (&[u8], Option<&[u8]>) {
        match self.target.iter().position(|&b| b == b'?') {
            Some(pos) => (&self.target[..pos], Some(&self.target[pos + 1..])),
            None => (&self.target, None),
        }
    }
}

/// What a handler sees of the request.
#[derive(Debug, Clone, Copy)]
pub struct Request<'r> {
    head: &'r RequestHead,
    headers: &'r Headers,
}

impl<'r> Request<'r> {
    /// Combines a request head with the headers retained for its route.
    pub fn new(head: &'r RequestHead, headers: &'r Headers) -> Self {
        Self { head, headers }
    }

    /// Request method.
    pub fn method(&self) -> Method {
        self.head.method
    }

    /// Path, without the query string.
    pub fn path(&self) -> &'r [u8] {
        self.head.path()
    }

    /// Raw query string, without the leading `?`.
    pub fn query_string(&self) -> Option<&'r [u8]> {
        self.head.query_string()
    }

    /// Full request target.
    pub fn target(&self) -> &'r [u8] {
        self.head.target()
    }

    /// Declared protocol version.
    pub fn version(&self) -> Version {
        self.head.version
    }

    /// Retained headers.
    pub fn headers(&self) -> &'r Headers {
        self.headers
    }

    /// Value of a retained header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&'r [u8]> {
        self.headers.get(name)
    }
}
