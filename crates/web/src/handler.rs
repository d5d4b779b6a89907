//! Handlers, routes, and controllers.
//!
//! A [`Route`] ties a method and path pattern to a [`Handler`]; a
//! [`Controller`] is a component that declares its own route table, which
//! replaces annotation scanning.

use std::fmt;
use std::sync::Arc;

use crate::error::WebError;
use crate::http::{HttpMethod, Request, Response};
use crate::pattern::PathPattern;

/// A request handler.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &Request) -> Result<Response, WebError>;
}

impl<F> Handler for F
where
    F: Fn(&Request) -> Result<Response, WebError> + Send + Sync,
{
    fn handle(&self, request: &Request) -> Result<Response, WebError> {
        self(request)
    }
}

/// A single routable endpoint.
///
/// The name is purely diagnostic and shows up in logs and route listings
/// (`UserController.users` style).
#[derive(Clone)]
pub struct Route {
    method: HttpMethod,
    pattern: PathPattern,
    name: String,
    handler: Arc<dyn Handler>,
}

impl Route {
    /// Create a route from a pattern string.
    pub fn new(
        method: HttpMethod,
        pattern: &str,
        name: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<Self, WebError> {
        Ok(Route {
            method,
            pattern: PathPattern::parse(pattern)?,
            name: name.into(),
            handler: Arc::new(handler),
        })
    }

    /// GET route shorthand (the default method for mappings).
    pub fn get(
        pattern: &str,
        name: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<Self, WebError> {
        Self::new(HttpMethod::Get, pattern, name, handler)
    }

    /// POST route shorthand.
    pub fn post(
        pattern: &str,
        name: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<Self, WebError> {
        Self::new(HttpMethod::Post, pattern, name, handler)
    }

    /// Method this route serves.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Parsed path pattern.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Diagnostic handler name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handler backing this route.
    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.raw())
            .field("name", &self.name)
            .finish()
    }
}

/// A component that exposes HTTP endpoints.
///
/// Handlers typically capture a clone of the controller `Arc`, so route
/// construction takes the controller by `Arc` receiver.
pub trait Controller: Send + Sync {
    fn routes(self: Arc<Self>) -> Result<Vec<Route>, WebError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_handler() {
        let route = Route::get("/ping", "ping", |_req: &Request| {
            Ok(Response::text("pong"))
        })
        .unwrap();

        let response = route.handler().handle(&Request::get("/ping")).unwrap();
        assert_eq!(response.body_text(), Some("pong"));
        assert_eq!(route.method(), HttpMethod::Get);
        assert_eq!(route.name(), "ping");
    }

    #[test]
    fn test_invalid_pattern_fails_route_construction() {
        let result = Route::get("ping", "ping", |_req: &Request| Ok(Response::text("pong")));
        assert!(matches!(result, Err(WebError::InvalidPattern { .. })));
    }

    #[test]
    fn test_controller_declares_routes() {
        struct PingController;

        impl Controller for PingController {
            fn routes(self: Arc<Self>) -> Result<Vec<Route>, WebError> {
                Ok(vec![Route::get("/ping", "PingController.ping", {
                    let _this = Arc::clone(&self);
                    move |_req: &Request| Ok(Response::text("pong"))
                })?])
            }
        }

        let controller = Arc::new(PingController);
        let routes = controller.routes().unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].pattern().raw(), "/ping");
    }
}
