use core::fmt::Write as _;

use heapless::{String, Vec};

use super::error::ResponseError;
use super::{
    HTTP_VERSION, MAX_HEADER_NAME_LEN, MAX_HEADER_VALUE_LEN, MAX_REASON_LEN,
    MAX_RESPONSE_HEADERS,
};
use crate::network::Write;
use crate::network::error::Error;

#[cfg(feature = "async")]
use crate::network::AsyncWrite;

const STATUS_LINE_LEN: usize = HTTP_VERSION.len() + 1 + 5 + 1 + MAX_REASON_LEN + 2;
const HEADER_LINE_LEN: usize = MAX_HEADER_NAME_LEN + 2 + MAX_HEADER_VALUE_LEN + 2;

type StatusLine = Vec<u8, STATUS_LINE_LEN>;
type HeaderLine = Vec<u8, HEADER_LINE_LEN>;

/// Progress of a response on the wire.
///
/// Transitions only move forward: `Fresh` → `StatusSent` → `HeadersSent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseState {
    /// Nothing written yet; status, reason and headers may all change.
    Fresh,
    /// The status line is out; headers may still change.
    StatusSent,
    /// Status line and header block are out; only body bytes may follow.
    HeadersSent,
}

/// Status, reason and headers waiting to be written.
#[derive(Debug)]
struct ResponseHead {
    status_code: u16,
    reason: Option<String<MAX_REASON_LEN>>,
    headers: Vec<(String<MAX_HEADER_NAME_LEN>, String<MAX_HEADER_VALUE_LEN>), MAX_RESPONSE_HEADERS>,
    state: ResponseState,
}

fn breaks_framing(text: &str) -> bool {
    text.bytes().any(|b| b == b'\r' || b == b'\n')
}

impl ResponseHead {
    fn new() -> Self {
        Self {
            status_code: 200,
            reason: None,
            headers: Vec::new(),
            state: ResponseState::Fresh,
        }
    }

    fn set_status_code(&mut self, code: u16) -> Result<(), ResponseError> {
        if self.state != ResponseState::Fresh {
            return Err(ResponseError::StatusLineSent);
        }
        self.status_code = code;
        Ok(())
    }

    fn set_reason_phrase(&mut self, reason: &str) -> Result<(), ResponseError> {
        if self.state != ResponseState::Fresh {
            return Err(ResponseError::StatusLineSent);
        }
        if breaks_framing(reason) {
            return Err(ResponseError::InvalidValue);
        }
        self.reason = Some(String::try_from(reason).map_err(|_| ResponseError::CapacityExceeded)?);
        Ok(())
    }

    fn add_header(&mut self, name: &str, value: &str) -> Result<(), ResponseError> {
        if self.state == ResponseState::HeadersSent {
            return Err(ResponseError::HeadersSent);
        }
        if name.is_empty() || name.contains(':') || breaks_framing(name) || breaks_framing(value) {
            return Err(ResponseError::InvalidValue);
        }

        let mut lowered: String<MAX_HEADER_NAME_LEN> = String::new();
        for c in name.chars() {
            lowered
                .push(c.to_ascii_lowercase())
                .map_err(|_| ResponseError::CapacityExceeded)?;
        }
        let value = String::try_from(value).map_err(|_| ResponseError::CapacityExceeded)?;

        if let Some(existing) = self.headers.iter_mut().find(|(name, _)| *name == lowered) {
            existing.1 = value;
            return Ok(());
        }
        self.headers
            .push((lowered, value))
            .map_err(|_| ResponseError::CapacityExceeded)
    }

    /// `HTTP/1.0 <code> <reason>\r\n`; the space before the reason is always there.
    fn status_line(&self) -> Result<StatusLine, ResponseError> {
        let mut line = StatusLine::new();
        let mut code: String<5> = String::new();
        write!(code, "{}", self.status_code).map_err(|_| ResponseError::CapacityExceeded)?;

        for part in [
            HTTP_VERSION,
            " ",
            code.as_str(),
            " ",
            self.reason.as_deref().unwrap_or(""),
            "\r\n",
        ] {
            line.extend_from_slice(part.as_bytes())
                .map_err(|_| ResponseError::CapacityExceeded)?;
        }
        Ok(line)
    }

    /// One `<name>: <value>\r\n` line per header, then the blank separator line.
    fn header_lines(&self) -> impl Iterator<Item = Result<HeaderLine, ResponseError>> + '_ {
        self.headers
            .iter()
            .map(|(name, value)| -> Result<HeaderLine, ResponseError> {
                let mut line = HeaderLine::new();
                for part in [name.as_str(), ": ", value.as_str(), "\r\n"] {
                    line.extend_from_slice(part.as_bytes())
                        .map_err(|_| ResponseError::CapacityExceeded)?;
                }
                Ok(line)
            })
            .chain(core::iter::once(
                HeaderLine::from_slice(b"\r\n").map_err(|_| ResponseError::CapacityExceeded),
            ))
    }
}

/// Writes one response over a connection.
///
/// The response moves through [`ResponseState`] as it is written. Status code and
/// reason phrase can change until the status line is sent, headers until the header
/// block is sent. Body bytes go out with [`send`](Response::send), which first
/// sends whatever framing is still pending.
///
/// No `content-length` is computed and no chunked encoding is applied: the body is
/// delimited by closing the connection unless the handler sets a length itself.
#[derive(Debug)]
pub struct Response<'c, C> {
    conn: &'c mut C,
    head: ResponseHead,
}

impl<'c, C> Response<'c, C> {
    /// Starts a `200` response with no reason phrase and no headers.
    pub fn new(conn: &'c mut C) -> Self {
        Self {
            conn,
            head: ResponseHead::new(),
        }
    }

    /// Sets the status code. Fails once the status line is sent.
    pub fn set_status_code(&mut self, code: u16) -> Result<(), ResponseError> {
        self.head.set_status_code(code)
    }

    /// Sets the reason phrase. Fails once the status line is sent.
    pub fn set_reason_phrase(&mut self, reason: &str) -> Result<(), ResponseError> {
        self.head.set_reason_phrase(reason)
    }

    /// Adds a header, stored under its lower-cased name.
    ///
    /// Setting the same name twice keeps the last value. Fails once the header
    /// block is sent.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<(), ResponseError> {
        self.head.add_header(name, value)
    }

    /// Current status code.
    pub fn status_code(&self) -> u16 {
        self.head.status_code
    }

    /// How far the response has been written.
    pub fn state(&self) -> ResponseState {
        self.head.state
    }
}

impl<C> Response<'_, C>
where
    C: Write<Error = Error>,
{
    /// Sends any framing still pending: the status line, then the header block.
    ///
    /// Calling it again once headers are out does nothing.
    pub fn ensure_ready_for_body(&mut self) -> Result<(), ResponseError> {
        if self.head.state == ResponseState::Fresh {
            let line = self.head.status_line()?;
            write_all(self.conn, &line)?;
            self.head.state = ResponseState::StatusSent;
            self.conn.flush()?;
        }
        if self.head.state == ResponseState::StatusSent {
            for line in self.head.header_lines() {
                write_all(self.conn, &line?)?;
            }
            self.head.state = ResponseState::HeadersSent;
            self.conn.flush()?;
        }
        Ok(())
    }

    /// Writes body bytes, sending pending framing first. May be called repeatedly.
    pub fn send(&mut self, body: &[u8]) -> Result<(), ResponseError> {
        self.ensure_ready_for_body()?;
        write_all(self.conn, body)?;
        self.conn.flush()?;
        Ok(())
    }

    /// Answers with `status` and no body, as the server does for failed requests.
    pub(crate) fn report(&mut self, status: u16) -> Result<(), ResponseError> {
        self.set_status_code(status)?;
        self.ensure_ready_for_body()
    }
}

fn write_all<C>(conn: &mut C, mut buf: &[u8]) -> Result<(), Error>
where
    C: Write<Error = Error>,
{
    while !buf.is_empty() {
        match conn.write(buf)? {
            0 => return Err(Error::WriteError),
            n => buf = &buf[n..],
        }
    }
    Ok(())
}

/// Async counterpart of [`Response`].
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct AsyncResponse<'c, C> {
    conn: &'c mut C,
    head: ResponseHead,
}

#[cfg(feature = "async")]
impl<'c, C> AsyncResponse<'c, C> {
    /// Starts a `200` response with no reason phrase and no headers.
    pub fn new(conn: &'c mut C) -> Self {
        Self {
            conn,
            head: ResponseHead::new(),
        }
    }

    /// Sets the status code. Fails once the status line is sent.
    pub fn set_status_code(&mut self, code: u16) -> Result<(), ResponseError> {
        self.head.set_status_code(code)
    }

    /// Sets the reason phrase. Fails once the status line is sent.
    pub fn set_reason_phrase(&mut self, reason: &str) -> Result<(), ResponseError> {
        self.head.set_reason_phrase(reason)
    }

    /// Adds a header, stored under its lower-cased name.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<(), ResponseError> {
        self.head.add_header(name, value)
    }

    /// Current status code.
    pub fn status_code(&self) -> u16 {
        self.head.status_code
    }

    /// How far the response has been written.
    pub fn state(&self) -> ResponseState {
        self.head.state
    }
}

#[cfg(feature = "async")]
impl<C> AsyncResponse<'_, C>
where
    C: AsyncWrite<Error = Error>,
{
    /// Sends any framing still pending. Idempotent.
    pub async fn ensure_ready_for_body(&mut self) -> Result<(), ResponseError> {
        if self.head.state == ResponseState::Fresh {
            let line = self.head.status_line()?;
            write_all_async(self.conn, &line).await?;
            self.head.state = ResponseState::StatusSent;
            self.conn.flush().await?;
        }
        if self.head.state == ResponseState::StatusSent {
            for line in self.head.header_lines() {
                write_all_async(self.conn, &line?).await?;
            }
            self.head.state = ResponseState::HeadersSent;
            self.conn.flush().await?;
        }
        Ok(())
    }

    /// Writes body bytes, sending pending framing first.
    pub async fn send(&mut self, body: &[u8]) -> Result<(), ResponseError> {
        self.ensure_ready_for_body().await?;
        write_all_async(self.conn, body).await?;
        self.conn.flush().await?;
        Ok(())
    }

    pub(crate) async fn report(&mut self, status: u16) -> Result<(), ResponseError> {
        self.set_status_code(status)?;
        self.ensure_ready_for_body().await
    }
}

#[cfg(feature = "async")]
async fn write_all_async<C>(conn: &mut C, mut buf: &[u8]) -> Result<(), Error>
where
    C: AsyncWrite<Error = Error>,
{
    while !buf.is_empty() {
        match conn.write(buf).await? {
            0 => return Err(Error::WriteError),
            n => buf = &buf[n..],
        }
    }
    Ok(())
}
