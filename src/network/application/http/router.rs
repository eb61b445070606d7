use heapless::Vec;

use super::error::{HttpError, RouteError};
use super::path::{PathParams, match_path, parameter_name};
use super::request_line::Method;
use super::{MAX_HEADER_NAME_LEN, MAX_HEADERS, MAX_PATH_PARAMS, MAX_ROUTES};

/// Per-route options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteOptions<'a> {
    /// Request headers to keep for the handler, matched case-insensitively.
    pub save_headers: &'a [&'a str],
}

/// A registered route.
#[derive(Debug, Clone)]
pub struct Route<'a, H> {
    /// Method this entry answers.
    pub method: Method,
    /// `/`-separated pattern with optional `<name>` segments.
    pub pattern: &'a str,
    /// The handler.
    pub handler: H,
    /// Route options.
    pub options: RouteOptions<'a>,
}

/// Outcome of a successful [`Router::resolve`].
#[derive(Debug)]
pub struct Resolved<'r, 'p, H> {
    /// Handler to invoke.
    pub handler: &'r H,
    /// Options of the matched route; empty for the catch-all.
    pub options: RouteOptions<'r>,
    /// Extracted path parameters; empty for the catch-all.
    pub params: PathParams<'r, 'p>,
}

/// Ordered route table with an optional catch-all handler.
///
/// Routes are looked up in registration order, so an earlier registration takes
/// precedence over a later one with an overlapping pattern. The table is meant to
/// be filled before the server starts accepting connections and only read
/// afterwards.
#[derive(Debug, Clone)]
pub struct Router<'a, H> {
    routes: Vec<Route<'a, H>, MAX_ROUTES>,
    catchall: Option<H>,
}

impl<'a, H> Router<'a, H> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            catchall: None,
        }
    }

    /// Registers `handler` for `pattern`, once per method in `methods`.
    ///
    /// Identical registrations are kept; the first one wins at lookup. Nothing is
    /// registered if any check fails.
    pub fn add_route(
        &mut self,
        pattern: &'a str,
        handler: H,
        methods: &[Method],
        options: RouteOptions<'a>,
    ) -> Result<(), RouteError>
    where
        H: Clone,
    {
        validate_pattern(pattern)?;
        if options.save_headers.len() > MAX_HEADERS {
            return Err(RouteError::TooManyHeaders);
        }
        if options
            .save_headers
            .iter()
            .any(|name| name.is_empty() || name.len() > MAX_HEADER_NAME_LEN)
        {
            return Err(RouteError::InvalidHeaderName);
        }
        if self.routes.len() + methods.len() > MAX_ROUTES {
            return Err(RouteError::TableFull);
        }

        for &method in methods {
            self.routes
                .push(Route {
                    method,
                    pattern,
                    handler: handler.clone(),
                    options,
                })
                .map_err(|_| RouteError::TableFull)?;
        }
        Ok(())
    }

    /// Registers a `GET` route with default options.
    ///
    /// Returns the table so registrations can be chained with `?`.
    pub fn route(&mut self, pattern: &'a str, handler: H) -> Result<&mut Self, RouteError>
    where
        H: Clone,
    {
        self.add_route(pattern, handler, &[Method::Get], RouteOptions::default())?;
        Ok(self)
    }

    /// Sets the handler used when no route pattern matches; replaces any previous one.
    pub fn set_catchall(&mut self, handler: H) -> &mut Self {
        self.catchall = Some(handler);
        self
    }

    /// Registered routes in lookup order.
    pub fn routes(&self) -> &[Route<'a, H>] {
        &self.routes
    }

    /// Finds the handler for a request.
    ///
    /// - `CONNECT`, `OPTIONS` and `TRACE` are [`HttpError::NotImplemented`].
    /// - The first route matching both path and method wins.
    /// - Without any path match, the catch-all is used if there is one.
    /// - A path match on other methods only is [`HttpError::MethodNotAllowed`].
    /// - Anything else is [`HttpError::NotFound`].
    pub fn resolve<'r, 'p>(
        &'r self,
        method: Method,
        path: &'p [u8],
    ) -> Result<Resolved<'r, 'p, H>, HttpError> {
        if !method.is_implemented() {
            return Err(HttpError::NotImplemented);
        }

        let mut path_matched = false;
        for route in &self.routes {
            let Some(params) = match_path(route.pattern.as_bytes(), path) else {
                continue;
            };
            if route.method == method {
                return Ok(Resolved {
                    handler: &route.handler,
                    options: route.options,
                    params,
                });
            }
            path_matched = true;
        }

        match (&self.catchall, path_matched) {
            (Some(handler), false) => Ok(Resolved {
                handler,
                options: RouteOptions::default(),
                params: PathParams::new(),
            }),
            (_, true) => Err(HttpError::MethodNotAllowed),
            (None, false) => Err(HttpError::NotFound),
        }
    }
}

impl<H> Default for Router<'_, H> {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_pattern(pattern: &str) -> Result<(), RouteError> {
    if pattern.is_empty() || pattern.contains('?') {
        return Err(RouteError::InvalidPattern);
    }
    let params = pattern
        .as_bytes()
        .split(|&b| b == b'/')
        .filter(|segment| parameter_name(segment).is_some())
        .count();
    if params > MAX_PATH_PARAMS {
        return Err(RouteError::TooManyParameters);
    }
    Ok(())
}
