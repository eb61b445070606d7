//! Request-line parsing per RFC 9112 §3.
//!
//! ```text
//! request-line = method SP request-target SP HTTP-version
//! HTTP-version = "HTTP" "/" DIGIT "." DIGIT
//! ```
//!
//! `SP` is exactly one space. There is no lenient mode: `GET /  HTTP/1.1` (two
//! spaces) is rejected rather than normalised.
//!
//! Version numbers are plain ASCII digits fitting a `u16`; signed forms such as
//! `HTTP/+1.1` or `HTTP/1.-0` are rejected.

use core::str::FromStr;

use super::error::RouteError;

/// HTTP request methods (RFC 9110 §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `CONNECT`
    Connect,
    /// `OPTIONS`
    Options,
    /// `TRACE`
    Trace,
}

impl Method {
    /// Every method the parser accepts.
    pub const ALL: [Method; 8] = [
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Connect,
        Method::Options,
        Method::Trace,
    ];

    /// Matches the exact, upper-case method token.
    pub fn from_bytes(token: &[u8]) -> Option<Self> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str().as_bytes() == token)
    }

    /// The method token as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }

    /// Whether requests with this method are dispatched to routes at all.
    ///
    /// `CONNECT`, `OPTIONS` and `TRACE` parse fine but are answered with 501.
    pub fn is_implemented(&self) -> bool {
        !matches!(self, Method::Connect | Method::Options | Method::Trace)
    }
}

/// Case-insensitive, for building method lists from configuration strings.
impl FromStr for Method {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
            .ok_or(RouteError::InvalidMethod)
    }
}

/// Protocol version of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Version {
    /// Major version.
    pub major: u16,
    /// Minor version.
    pub minor: u16,
}

impl Version {
    /// `HTTP/1.0`
    pub const HTTP_10: Version = Version { major: 1, minor: 0 };
    /// `HTTP/1.1`
    pub const HTTP_11: Version = Version { major: 1, minor: 1 };
}

/// A parsed request line borrowing from the raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLine<'a> {
    /// Request method.
    pub method: Method,
    /// Request target, query string included.
    pub target: &'a [u8],
    /// Declared protocol version.
    pub version: Version,
}

/// Parses a request line without its terminator.
///
/// Returns `None` for anything that is not exactly
/// `METHOD SP TARGET SP HTTP/MAJOR.MINOR` with a supported method.
pub fn parse_request_line(line: &[u8]) -> Option<RequestLine<'_>> {
    let mut fragments = line.split(|&b| b == b' ');
    let method = fragments.next()?;
    let target = fragments.next()?;
    let version = fragments.next()?;
    if fragments.next().is_some() {
        return None;
    }

    let method = Method::from_bytes(method)?;
    if target.is_empty() {
        return None;
    }

    let mut version_fragments = version.split(|&b| b == b'/');
    if version_fragments.next()? != b"HTTP" {
        return None;
    }
    let number = version_fragments.next()?;
    if version_fragments.next().is_some() {
        return None;
    }

    let mut numbers = number.split(|&b| b == b'.');
    let major = parse_version_number(numbers.next()?)?;
    let minor = parse_version_number(numbers.next()?)?;
    if numbers.next().is_some() {
        return None;
    }

    Some(RequestLine {
        method,
        target,
        version: Version { major, minor },
    })
}

fn parse_version_number(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    core::str::from_utf8(digits).ok()?.parse().ok()
}
