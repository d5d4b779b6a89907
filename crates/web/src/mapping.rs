//! Handler mapping.
//!
//! Routes are keyed by method plus pattern. Static patterns resolve through
//! an exact-match map; patterned routes are scanned in registration order,
//! first match winning.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::WebError;
use crate::handler::{Controller, Route};
use crate::http::HttpMethod;

/// Result of resolving a request against the mapping.
pub struct RouteMatch<'a> {
    /// The matched route
    pub route: &'a Route,
    /// Variables captured from the path
    pub path_vars: HashMap<String, String>,
}

/// Registry of routes for the dispatcher.
#[derive(Default)]
pub struct HandlerMapping {
    /// All routes in registration order
    routes: Vec<Route>,
    /// `METHOD:/pattern` exact-match index for static routes
    static_routes: HashMap<String, usize>,
    /// Indices of routes with path variables, in registration order
    dynamic_routes: Vec<usize>,
}

impl HandlerMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route; the same method and pattern may only appear once.
    pub fn register(&mut self, route: Route) -> Result<(), WebError> {
        let duplicate = self.routes.iter().any(|existing| {
            existing.method() == route.method() && existing.pattern().raw() == route.pattern().raw()
        });
        if duplicate {
            return Err(WebError::DuplicateRoute {
                method: route.method(),
                pattern: route.pattern().raw().to_string(),
            });
        }

        let index = self.routes.len();
        if route.pattern().is_static() {
            self.static_routes
                .insert(mapping_key(route.method(), route.pattern().raw()), index);
        } else {
            self.dynamic_routes.push(index);
        }

        debug!(
            method = %route.method(),
            pattern = %route.pattern(),
            handler = route.name(),
            "registered route"
        );
        self.routes.push(route);
        Ok(())
    }

    /// Register every route a controller declares; returns how many.
    pub fn register_controller(
        &mut self,
        controller: Arc<dyn Controller>,
    ) -> Result<usize, WebError> {
        let routes = controller.routes()?;
        let count = routes.len();
        for route in routes {
            self.register(route)?;
        }
        Ok(count)
    }

    /// Find the route serving `method path`, capturing path variables.
    ///
    /// Static routes win over patterned ones, so `/users/count` is not
    /// swallowed by `/users/{id}`.
    pub fn resolve(&self, method: HttpMethod, path: &str) -> Option<RouteMatch<'_>> {
        if let Some(&index) = self.static_routes.get(&mapping_key(method, path)) {
            return Some(RouteMatch {
                route: &self.routes[index],
                path_vars: HashMap::new(),
            });
        }

        for &index in &self.dynamic_routes {
            let route = &self.routes[index];
            if route.method() != method {
                continue;
            }
            if let Some(path_vars) = route.pattern().capture(path) {
                return Some(RouteMatch { route, path_vars });
            }
        }

        None
    }

    /// All routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Log every registered mapping.
    pub fn log_routes(&self) {
        for route in &self.routes {
            info!(
                method = %route.method(),
                pattern = %route.pattern(),
                handler = route.name(),
                "route"
            );
        }
    }
}

fn mapping_key(method: HttpMethod, path: &str) -> String {
    format!("{method}:{path}")
}
