//! Web application context.
//!
//! The builder wires components and controllers into one container, then
//! `build` refreshes it: the container constructs everything in dependency
//! order, each controller is resolved back out, and its routes land in the
//! handler mapping. `dispatch` drives a request through that mapping.

use std::sync::Arc;

use melt_container::{
    ApplicationContext, ComponentDefinition, ComponentRegistry, ContainerError, ContextBuilder,
};
use tracing::{debug, info, warn};

use crate::error::WebError;
use crate::handler::Controller;
use crate::http::{Request, Response};
use crate::mapping::HandlerMapping;

type ControllerResolver =
    Box<dyn Fn(&ComponentRegistry) -> Result<Arc<dyn Controller>, ContainerError> + Send + Sync>;

struct ControllerBinding {
    name: String,
    resolve: ControllerResolver,
}

/// Builder wiring components and controllers into a web context.
#[derive(Default)]
pub struct WebContextBuilder {
    components: ContextBuilder,
    controllers: Vec<ControllerBinding>,
}

impl WebContextBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a non-web component.
    pub fn component(mut self, definition: ComponentDefinition) -> Self {
        self.components = self.components.register(definition);
        self
    }

    /// Register a controller component; its routes are collected at build
    /// time, after the container has constructed it.
    pub fn controller<T>(mut self, definition: ComponentDefinition) -> Self
    where
        T: Controller + Send + Sync + 'static,
    {
        let name = definition.name().to_string();
        self.components = self.components.register(definition);
        self.controllers.push(ControllerBinding {
            name,
            resolve: Box::new(|registry| {
                registry
                    .get::<T>()
                    .map(|controller| controller as Arc<dyn Controller>)
            }),
        });
        self
    }

    /// Build the container and assemble the handler mapping.
    pub fn build(self) -> Result<WebContext, WebError> {
        let app = self.components.build()?;

        let mut mapping = HandlerMapping::new();
        for binding in &self.controllers {
            let controller = (binding.resolve)(app.registry())?;
            let count = mapping.register_controller(controller)?;
            debug!(
                controller = binding.name.as_str(),
                routes = count,
                "registered controller"
            );
        }

        info!(
            controllers = self.controllers.len(),
            routes = mapping.len(),
            "web context ready"
        );
        Ok(WebContext { app, mapping })
    }
}

/// A built web application: component container plus handler mapping.
pub struct WebContext {
    app: ApplicationContext,
    mapping: HandlerMapping,
}

impl WebContext {
    /// Start wiring a new web context.
    pub fn builder() -> WebContextBuilder {
        WebContextBuilder::new()
    }

    /// The underlying component container.
    pub fn app(&self) -> &ApplicationContext {
        &self.app
    }

    /// The assembled handler mapping.
    pub fn mapping(&self) -> &HandlerMapping {
        &self.mapping
    }

    /// Route a request to its handler, rendering errors as responses.
    ///
    /// Never panics and always produces a response: an unresolvable path
    /// becomes a 404, parameter errors become 400s, anything else a 500.
    pub fn dispatch(&self, mut request: Request) -> Response {
        let method = request.method();
        let path = request.path().to_string();

        let found = match self.mapping.resolve(method, &path) {
            Some(found) => found,
            None => {
                debug!(%method, path = path.as_str(), "no handler");
                return Response::text(format!("404 Not Found: {path}")).with_status(404);
            }
        };

        debug!(%method, path = path.as_str(), handler = found.route.name(), "dispatching");
        request.set_path_vars(found.path_vars);

        match found.route.handler().handle(&request) {
            Ok(response) => response,
            Err(error) => {
                warn!(handler = found.route.name(), %error, "handler failed");
                error_response(&error)
            }
        }
    }
}

/// Map a handler error onto the response the client sees.
fn error_response(error: &WebError) -> Response {
    match error {
        WebError::HandlerNotFound { path, .. } => {
            Response::text(format!("404 Not Found: {path}")).with_status(404)
        }
        error if error.status() == 400 => {
            Response::text(format!("Bad Request: {error}")).with_status(400)
        }
        error => Response::text(format!("Internal Server Error: {error}")).with_status(500),
    }
}
