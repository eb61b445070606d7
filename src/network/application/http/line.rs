use super::MAX_LINE_LEN;
use super::error::{ConnectionError, HttpError};
use crate::network::Read;
use crate::network::error::Error;

#[cfg(feature = "async")]
use crate::network::AsyncRead;

/// Buffered line reader over a connection.
///
/// Bytes are read in chunks into a fixed-size buffer; each call to
/// [`read_line`](LineReader::read_line) hands out one line, terminator included.
/// Whatever follows the line stays buffered for the next call.
///
/// - A line longer than the buffer is a bad request for
///   [`read_line`](LineReader::read_line); the header reader skips such lines instead
///   when it does not retain them.
/// - A partial line at end of stream is returned as is.
/// - End of stream with nothing buffered is [`Error::ConnectionClosed`].
#[derive(Debug)]
pub struct LineReader<const N: usize = MAX_LINE_LEN> {
    buf: [u8; N],
    len: usize,
    consumed: usize,
}

impl<const N: usize> LineReader<N> {
    /// Creates an empty reader.
    pub fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            consumed: 0,
        }
    }

    /// Reads the next line, blocking on the connection as needed.
    pub fn read_line<R>(&mut self, src: &mut R) -> Result<&[u8], ConnectionError>
    where
        R: Read<Error = Error>,
    {
        match self.fill_line(src)? {
            Some(end) => Ok(self.take(end)),
            None => Err(HttpError::BadRequest.into()),
        }
    }

    /// Async counterpart of [`read_line`](LineReader::read_line).
    #[cfg(feature = "async")]
    pub async fn read_line_async<R>(&mut self, src: &mut R) -> Result<&[u8], ConnectionError>
    where
        R: AsyncRead<Error = Error>,
    {
        match self.fill_line_async(src).await? {
            Some(end) => Ok(self.take(end)),
            None => Err(HttpError::BadRequest.into()),
        }
    }

    /// Buffers input until a whole line is available and returns its end.
    ///
    /// `None` means the line does not fit; the buffer then holds its first `N`
    /// bytes, see [`pending`](LineReader::pending).
    pub(crate) fn fill_line<R>(&mut self, src: &mut R) -> Result<Option<usize>, ConnectionError>
    where
        R: Read<Error = Error>,
    {
        self.discard_consumed();
        let mut scanned = 0;
        loop {
            if let Some(end) = self.find_line_end(scanned) {
                return Ok(Some(end));
            }
            scanned = self.len;
            if self.len == N {
                return Ok(None);
            }
            let n = src.read(&mut self.buf[self.len..])?;
            if n == 0 {
                return self.end_of_stream();
            }
            self.len += n;
        }
    }

    #[cfg(feature = "async")]
    pub(crate) async fn fill_line_async<R>(
        &mut self,
        src: &mut R,
    ) -> Result<Option<usize>, ConnectionError>
    where
        R: AsyncRead<Error = Error>,
    {
        self.discard_consumed();
        let mut scanned = 0;
        loop {
            if let Some(end) = self.find_line_end(scanned) {
                return Ok(Some(end));
            }
            scanned = self.len;
            if self.len == N {
                return Ok(None);
            }
            let n = src.read(&mut self.buf[self.len..]).await?;
            if n == 0 {
                return self.end_of_stream();
            }
            self.len += n;
        }
    }

    /// Buffered bytes not yet handed out.
    pub(crate) fn pending(&self) -> &[u8] {
        &self.buf[self.consumed..self.len]
    }

    /// Drops the rest of the current line, terminator included, without
    /// holding more than `N` bytes of it at a time.
    pub(crate) fn skip_line<R>(&mut self, src: &mut R) -> Result<(), ConnectionError>
    where
        R: Read<Error = Error>,
    {
        self.discard_consumed();
        loop {
            if let Some(end) = self.find_line_end(0) {
                self.consumed = end;
                return Ok(());
            }
            self.len = src.read(&mut self.buf)?;
            if self.len == 0 {
                return Err(Error::ConnectionClosed.into());
            }
        }
    }

    #[cfg(feature = "async")]
    pub(crate) async fn skip_line_async<R>(&mut self, src: &mut R) -> Result<(), ConnectionError>
    where
        R: AsyncRead<Error = Error>,
    {
        self.discard_consumed();
        loop {
            if let Some(end) = self.find_line_end(0) {
                self.consumed = end;
                return Ok(());
            }
            self.len = src.read(&mut self.buf).await?;
            if self.len == 0 {
                return Err(Error::ConnectionClosed.into());
            }
        }
    }

    fn discard_consumed(&mut self) {
        if self.consumed > 0 {
            self.buf.copy_within(self.consumed..self.len, 0);
            self.len -= self.consumed;
            self.consumed = 0;
        }
    }

    fn find_line_end(&self, from: usize) -> Option<usize> {
        self.buf[from..self.len]
            .iter()
            .position(|&b| b == b'\n')
            .map(|pos| from + pos + 1)
    }

    pub(crate) fn take(&mut self, end: usize) -> &[u8] {
        self.consumed = end;
        &self.buf[..end]
    }

    fn end_of_stream(&self) -> Result<Option<usize>, ConnectionError> {
        if self.len == 0 {
            return Err(Error::ConnectionClosed.into());
        }
        Ok(Some(self.len))
    }
}

impl<const N: usize> Default for LineReader<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips a trailing `\r\n` or `\n`.
pub(crate) fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// A line consisting of nothing but its terminator.
pub(crate) fn is_blank(line: &[u8]) -> bool {
    line == b"\r\n" || line == b"\n"
}
