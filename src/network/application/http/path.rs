use core::str::Utf8Error;

use heapless::Vec;

use super::MAX_PATH_PARAMS;

/// Parameters extracted by a successful [`match_path`], in pattern order.
///
/// Names borrow from the route pattern, values from the request path. Values are
/// raw bytes: no percent-decoding is performed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams<'r, 'p> {
    params: Vec<(&'r [u8], &'p [u8]), MAX_PATH_PARAMS>,
}

impl<'r, 'p> PathParams<'r, 'p> {
    /// No parameters, as for catch-all matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the parameter called `name`.
    pub fn get(&self, name: &str) -> Option<&'p [u8]> {
        self.params
            .iter()
            .find(|(key, _)| *key == name.as_bytes())
            .map(|(_, value)| *value)
    }

    /// `(name, value)` pairs in pattern order.
    pub fn as_slice(&self) -> &[(&'r [u8], &'p [u8])] {
        &self.params
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// `true` when the pattern had no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Values as strings, in pattern order, for positional handler arguments.
    pub fn decode(&self) -> Result<Vec<&'p str, MAX_PATH_PARAMS>, Utf8Error> {
        let mut values = Vec::new();
        for &(_, value) in &self.params {
            // capacity is shared with `params`
            let _ = values.push(core::str::from_utf8(value)?);
        }
        Ok(values)
    }
}

/// Matches a request path against a route pattern.
///
/// Both are split on `/` and must have the same number of segments. A pattern
/// segment written `<name>` matches any request segment, including an empty one,
/// and records it; every other segment must be byte-for-byte equal. Matching is
/// case-sensitive and trailing-slash-sensitive.
///
/// Patterns with more than [`MAX_PATH_PARAMS`] parameters never match.
///
/// ```rust
/// use libhttpd::network::application::http::match_path;
///
/// let params = match_path(b"/users/<uid>/posts/<pid>", b"/users/1337/posts/42").unwrap();
/// assert_eq!(params.get("uid"), Some(&b"1337"[..]));
/// assert_eq!(params.get("pid"), Some(&b"42"[..]));
///
/// assert!(match_path(b"/foo", b"/oo").is_none());
/// assert!(match_path(b"/foo", b"/foo/").is_none());
/// ```
pub fn match_path<'r, 'p>(pattern: &'r [u8], path: &'p [u8]) -> Option<PathParams<'r, 'p>> {
    if segment_count(pattern) != segment_count(path) {
        return None;
    }

    let mut params = PathParams::new();
    for (route_part, req_part) in pattern.split(|&b| b == b'/').zip(path.split(|&b| b == b'/')) {
        if let Some(name) = parameter_name(route_part) {
            params.params.push((name, req_part)).ok()?;
            continue;
        }
        if route_part != req_part {
            return None;
        }
    }
    Some(params)
}

/// The name inside a `<name>` segment.
pub(crate) fn parameter_name(segment: &[u8]) -> Option<&[u8]> {
    segment.strip_prefix(b"<")?.strip_suffix(b">")
}

fn segment_count(path: &[u8]) -> usize {
    path.iter().filter(|&&b| b == b'/').count() + 1
}
