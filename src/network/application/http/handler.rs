use super::error::HandlerError;
use super::request::Request;
use super::response::Response;

#[cfg(feature = "async")]
use super::response::AsyncResponse;

/// What a handler returns. Any error is turned into a status line by the server.
pub type HandlerResult = Result<(), HandlerError>;

/// Application code behind a route.
///
/// `params` holds the path parameter values in the order their names appear in
/// the route pattern. A handler that returns without writing anything still
/// produces a complete `200` response.
pub trait Handler<C> {
    /// Serves one request.
    fn call(&self, request: &Request<'_>, response: &mut Response<'_, C>, params: &[&str])
    -> HandlerResult;
}

/// Plain function handlers.
pub type HandlerFn<C> = fn(&Request<'_>, &mut Response<'_, C>, &[&str]) -> HandlerResult;

impl<C> Handler<C> for HandlerFn<C> {
    fn call(
        &self,
        request: &Request<'_>,
        response: &mut Response<'_, C>,
        params: &[&str],
    ) -> HandlerResult {
        self(request, response, params)
    }
}

impl<C, T> Handler<C> for &T
where
    T: Handler<C> + ?Sized,
{
    fn call(
        &self,
        request: &Request<'_>,
        response: &mut Response<'_, C>,
        params: &[&str],
    ) -> HandlerResult {
        (**self).call(request, response, params)
    }
}

/// Async counterpart of [`Handler`].
///
/// Usually implemented on an enum naming every handler of an application, so a
/// single router can hold them all without boxing.
#[cfg(feature = "async")]
pub trait AsyncHandler<C> {
    /// Serves one request.
    async fn call(
        &self,
        request: &Request<'_>,
        response: &mut AsyncResponse<'_, C>,
        params: &[&str],
    ) -> HandlerResult;
}

#[cfg(feature = "async")]
impl<C, T> AsyncHandler<C> for &T
where
    T: AsyncHandler<C> + ?Sized,
{
    async fn call(
        &self,
        request: &Request<'_>,
        response: &mut AsyncResponse<'_, C>,
        params: &[&str],
    ) -> HandlerResult {
        (**self).call(request, response, params).await
    }
}
