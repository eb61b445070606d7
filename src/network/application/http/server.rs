use super::error::{ConnectionError, HttpError};
use super::handler::Handler;
use super::headers::read_headers;
use super::line::{LineReader, is_blank, trim_line_end};
use super::request::{Request, RequestHead};
use super::request_line::parse_request_line;
use super::response::Response;
use super::router::Router;
use crate::network::error::Error;
use crate::network::{Bind, Http, Read};

#[cfg(feature = "async")]
use super::handler::AsyncHandler;
#[cfg(feature = "async")]
use super::headers::read_headers_async;
#[cfg(feature = "async")]
use super::response::AsyncResponse;
#[cfg(feature = "async")]
use crate::network::{AsyncBind, AsyncHttp, AsyncRead};

/// Serves connections with a fixed route table.
///
/// Each connection carries exactly one request. The server reads the request line,
/// resolves the route, reads only the headers that route retains, runs the handler
/// and makes sure a complete status line and header block went out before closing
/// the connection. Failures are answered with a bare status line:
///
/// | Failure                                       | Answer        |
/// |-----------------------------------------------|---------------|
/// | Malformed or oversized request/header line    | `400`         |
/// | No matching route                             | `404`         |
/// | Route exists for other methods only           | `405`         |
/// | Handler error                                 | `500`         |
/// | `CONNECT`, `OPTIONS`, `TRACE`                 | `501`         |
/// | Timeout, cancellation, peer disconnect        | nothing       |
#[derive(Debug)]
pub struct Server<'a, H> {
    router: Router<'a, H>,
}

impl<'a, H> Server<'a, H> {
    /// Wraps a fully populated route table.
    pub fn new(router: Router<'a, H>) -> Self {
        Self { router }
    }

    /// The route table in use.
    pub fn router(&self) -> &Router<'a, H> {
        &self.router
    }

    /// Serves one request on `conn`, then closes it.
    ///
    /// Never fails: every error is answered on the wire or logged.
    pub fn handle_connection<C>(&self, mut conn: C)
    where
        C: Http,
        H: Handler<C>,
    {
        let mut reader: LineReader = LineReader::new();
        self.serve_request(&mut reader, &mut conn);
        if let Err(err) = conn.close() {
            warn!("http: closing connection failed: {}", err);
        }
    }

    /// Accepts connections from `binder` and serves them one after another.
    ///
    /// Returns only when accepting fails.
    pub fn serve<B>(&self, binder: &mut B, local: &str) -> Result<(), B::Error>
    where
        B: Bind,
        B::Connection: Http,
        H: Handler<B::Connection>,
    {
        loop {
            let conn = binder.bind(local)?;
            self.handle_connection(conn);
        }
    }

    fn serve_request<C>(&self, reader: &mut LineReader, conn: &mut C)
    where
        C: Http,
        H: Handler<C>,
    {
        let head = match read_request_head(reader, conn) {
            Ok(head) => head,
            Err(err) => return reject(reader, conn, err),
        };
        let resolved = match self.router.resolve(head.method, head.path()) {
            Ok(resolved) => resolved,
            Err(status) => return reject(reader, conn, status.into()),
        };
        let headers = match read_headers(reader, conn, resolved.options.save_headers) {
            Ok(headers) => headers,
            Err(err) => return fail(&mut Response::new(conn), err, head.path()),
        };
        let Ok(params) = resolved.params.decode() else {
            return fail(&mut Response::new(conn), HttpError::BadRequest.into(), head.path());
        };

        let request = Request::new(&head, &headers);
        let mut response = Response::new(conn);
        let outcome = Handler::call(resolved.handler, &request, &mut response, &params)
            .map_err(ConnectionError::from)
            .and_then(|()| response.ensure_ready_for_body().map_err(ConnectionError::from));
        if let Err(err) = outcome {
            fail(&mut response, err, head.path());
        }
    }
}

/// Reads the request line, skipping blank lines in front of it.
fn read_request_head<R>(reader: &mut LineReader, src: &mut R) -> Result<RequestHead, ConnectionError>
where
    R: Read<Error = Error>,
{
    loop {
        let line = reader.read_line(src)?;
        if is_blank(line) {
            continue;
        }
        let line = parse_request_line(trim_line_end(line)).ok_or(HttpError::BadRequest)?;
        return Ok(RequestHead::from_line(&line)?);
    }
}

/// Answers a request that failed before its headers were read.
///
/// The header block is drained first so the client is not reset while still
/// sending. A transport fault while draining replaces the original failure.
fn reject<C>(reader: &mut LineReader, conn: &mut C, err: ConnectionError)
where
    C: Http,
{
    let err = match err {
        ConnectionError::Status(_) => match read_headers(reader, conn, &[]) {
            Err(drain @ ConnectionError::Transport(_)) => drain,
            Err(drain) => {
                warn!("http: draining headers failed: {}", drain);
                err
            }
            Ok(_) => err,
        },
        err => err,
    };
    fail(&mut Response::new(conn), err, b"");
}

/// Turns a failure into a status line, or into silence for transport faults.
fn fail<C>(response: &mut Response<'_, C>, err: ConnectionError, path: &[u8])
where
    C: Http,
{
    let status = match err {
        ConnectionError::Status(status) => status,
        ConnectionError::Transport(err) if err.is_cancellation() => return,
        ConnectionError::Transport(err) if err.is_disconnect() => {
            debug!("http: peer went away: {}", err);
            return;
        }
        ConnectionError::Transport(err) => {
            error!("http: connection error: {}", err);
            HttpError::Internal
        }
        ConnectionError::Handler(err) => {
            error!("http: handler for {=[u8]:a} failed: {}", path, err);
            HttpError::Internal
        }
    };
    if let Err(err) = response.report(status.status_code()) {
        warn!("http: failed to report {}: {}", status, err);
    }
}

#[cfg(feature = "async")]
impl<'a, H> Server<'a, H> {
    /// Async counterpart of [`handle_connection`](Server::handle_connection).
    ///
    /// The connection is closed, and the close awaited, on every outcome.
    pub async fn handle_connection_async<C>(&self, mut conn: C)
    where
        C: AsyncHttp,
        H: AsyncHandler<C>,
    {
        let mut reader: LineReader = LineReader::new();
        self.serve_request_async(&mut reader, &mut conn).await;
        if let Err(err) = conn.close().await {
            warn!("http: closing connection failed: {}", err);
        }
    }

    /// Async counterpart of [`serve`](Server::serve).
    pub async fn serve_async<B>(&self, binder: &mut B, local: &str) -> Result<(), B::Error>
    where
        B: AsyncBind,
        B::Connection: AsyncHttp,
        H: AsyncHandler<B::Connection>,
    {
        loop {
            let conn = binder.bind(local).await?;
            self.handle_connection_async(conn).await;
        }
    }

    async fn serve_request_async<C>(&self, reader: &mut LineReader, conn: &mut C)
    where
        C: AsyncHttp,
        H: AsyncHandler<C>,
    {
        let head = match read_request_head_async(reader, conn).await {
            Ok(head) => head,
            Err(err) => return reject_async(reader, conn, err).await,
        };
        let resolved = match self.router.resolve(head.method, head.path()) {
            Ok(resolved) => resolved,
            Err(status) => return reject_async(reader, conn, status.into()).await,
        };
        let headers = match read_headers_async(reader, conn, resolved.options.save_headers).await
        {
            Ok(headers) => headers,
            Err(err) => return fail_async(&mut AsyncResponse::new(conn), err, head.path()).await,
        };
        let Ok(params) = resolved.params.decode() else {
            let err = HttpError::BadRequest.into();
            return fail_async(&mut AsyncResponse::new(conn), err, head.path()).await;
        };

        let request = Request::new(&head, &headers);
        let mut response = AsyncResponse::new(conn);
        let mut outcome = AsyncHandler::call(resolved.handler, &request, &mut response, &params)
            .await
            .map_err(ConnectionError::from);
        if outcome.is_ok() {
            outcome = response
                .ensure_ready_for_body()
                .await
                .map_err(ConnectionError::from);
        }
        if let Err(err) = outcome {
            fail_async(&mut response, err, head.path()).await;
        }
    }
}

#[cfg(feature = "async")]
async fn read_request_head_async<R>(
    reader: &mut LineReader,
    src: &mut R,
) -> Result<RequestHead, ConnectionError>
where
    R: AsyncRead<Error = Error>,
{
    loop {
        let line = reader.read_line_async(src).await?;
        if is_blank(line) {
            continue;
        }
        let line = parse_request_line(trim_line_end(line)).ok_or(HttpError::BadRequest)?;
        return Ok(RequestHead::from_line(&line)?);
    }
}

#[cfg(feature = "async")]
async fn reject_async<C>(reader: &mut LineReader, conn: &mut C, err: ConnectionError)
where
    C: AsyncHttp,
{
    let err = match err {
        ConnectionError::Status(_) => match read_headers_async(reader, conn, &[]).await {
            Err(drain @ ConnectionError::Transport(_)) => drain,
            Err(drain) => {
                warn!("http: draining headers failed: {}", drain);
                err
            }
            Ok(_) => err,
        },
        err => err,
    };
    fail_async(&mut AsyncResponse::new(conn), err, b"").await;
}

#[cfg(feature = "async")]
async fn fail_async<C>(response: &mut AsyncResponse<'_, C>, err: ConnectionError, path: &[u8])
where
    C: AsyncHttp,
{
    let status = match err {
        ConnectionError::Status(status) => status,
        ConnectionError::Transport(err) if err.is_cancellation() => return,
        ConnectionError::Transport(err) if err.is_disconnect() => {
            debug!("http: peer went away: {}", err);
            return;
        }
        ConnectionError::Transport(err) => {
            error!("http: connection error: {}", err);
            HttpError::Internal
        }
        ConnectionError::Handler(err) => {
            error!("http: handler for {=[u8]:a} failed: {}", path, err);
            HttpError::Internal
        }
    };
    if let Err(err) = response.report(status.status_code()).await {
        warn!("http: failed to report {}: {}", status, err);
    }
}
