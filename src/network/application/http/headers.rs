use heapless::{String, Vec};

use super::error::{ConnectionError, HttpError};
use super::line::{LineReader, is_blank, trim_line_end};
use super::{MAX_HEADER_NAME_LEN, MAX_HEADER_VALUE_LEN, MAX_HEADERS};
use crate::network::Read;
use crate::network::error::Error;

#[cfg(feature = "async")]
use crate::network::AsyncRead;

/// A retained request header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Lower-cased header name.
    pub name: String<MAX_HEADER_NAME_LEN>,
    /// Value with surrounding whitespace stripped.
    pub value: Vec<u8, MAX_HEADER_VALUE_LEN>,
}

/// The request headers a route asked to keep.
///
/// Header lines whose name is not in the route's retention set are read from the
/// connection and dropped, so only what a handler needs is ever held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<Header, MAX_HEADERS>,
}

impl Headers {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks a header up by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_slice())
    }

    /// Iterates over the retained headers in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.entries.iter()
    }

    /// Number of retained headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing was retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Feeds one raw header line (terminator stripped) through the retention set.
    ///
    /// A repeated header replaces the earlier value.
    pub fn retain_line(&mut self, line: &[u8], save: &[&str]) -> Result<(), HttpError> {
        let (name, value) = parse_header_line(line).ok_or(HttpError::BadRequest)?;
        let Some(saved) = retained_name(name, save) else {
            return Ok(());
        };

        let value = Vec::from_slice(value).map_err(|_| HttpError::BadRequest)?;
        if let Some(header) = self
            .entries
            .iter_mut()
            .find(|header| header.name.eq_ignore_ascii_case(saved))
        {
            header.value = value;
            return Ok(());
        }

        let mut lowered = String::new();
        for c in saved.chars() {
            lowered
                .push(c.to_ascii_lowercase())
                .map_err(|_| HttpError::BadRequest)?;
        }
        self.entries
            .push(Header {
                name: lowered,
                value,
            })
            .map_err(|_| HttpError::BadRequest)
    }
}

/// Splits a header line (terminator stripped) on its first `:`.
///
/// Returns the raw name and the value stripped of surrounding ASCII whitespace, or
/// `None` when the line has no colon.
pub fn parse_header_line(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let colon = line.iter().position(|&b| b == b':')?;
    Some((&line[..colon], line[colon + 1..].trim_ascii()))
}

fn retained_name<'s>(name: &[u8], save: &[&'s str]) -> Option<&'s str> {
    save.iter()
        .copied()
        .find(|saved| saved.as_bytes().eq_ignore_ascii_case(name))
}

/// A header line that does not fit the line buffer is skipped unless the route
/// retains it. `prefix` is the buffered start of the line.
fn check_overlong(prefix: &[u8], save: &[&str]) -> Result<(), HttpError> {
    let (name, _) = parse_header_line(prefix).ok_or(HttpError::BadRequest)?;
    match retained_name(name, save) {
        Some(_) => Err(HttpError::BadRequest),
        None => Ok(()),
    }
}

/// Reads header lines up to and including the blank separator line.
///
/// Lines of headers the route does not retain may be of any length.
pub fn read_headers<R, const N: usize>(
    reader: &mut LineReader<N>,
    src: &mut R,
    save: &[&str],
) -> Result<Headers, ConnectionError>
where
    R: Read<Error = Error>,
{
    let mut headers = Headers::new();
    loop {
        let Some(end) = reader.fill_line(src)? else {
            check_overlong(reader.pending(), save)?;
            reader.skip_line(src)?;
            continue;
        };
        let line = reader.take(end);
        if is_blank(line) {
            return Ok(headers);
        }
        headers.retain_line(trim_line_end(line), save)?;
    }
}

/// Async counterpart of [`read_headers`].
#[cfg(feature = "async")]
pub async fn read_headers_async<R, const N: usize>(
    reader: &mut LineReader<N>,
    src: &mut R,
    save: &[&str],
) -> Result<Headers, ConnectionError>
where
    R: AsyncRead<Error = Error>,
{
    let mut headers = Headers::new();
    loop {
        let Some(end) = reader.fill_line_async(src).await? else {
            check_overlong(reader.pending(), save)?;
            reader.skip_line_async(src).await?;
            continue;
        };
        let line = reader.take(end);
        if is_blank(line) {
            return Ok(headers);
        }
        headers.retain_line(trim_line_end(line), save)?;
    }
}
