//! HTTP request and response model.
//!
//! These types are what handlers see: the transport adapter builds a
//! [`Request`] from the wire and turns the returned [`Response`] back into
//! a protocol-level reply.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::WebError;
use crate::params;

/// HTTP methods understood by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Parse a method name (case-insensitive).
    pub fn parse(name: &str) -> Option<HttpMethod> {
        match name.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request as seen by handlers.
#[derive(Debug)]
pub struct Request {
    method: HttpMethod,
    path: String,
    query: HashMap<String, String>,
    path_vars: HashMap<String, String>,
    body: Vec<u8>,
}

impl Request {
    /// Build a request with no query parameters or body.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            query: HashMap::new(),
            path_vars: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Shorthand for a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Shorthand for a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Attach query parameters parsed from a raw query string.
    pub fn with_query(mut self, raw_query: &str) -> Self {
        self.query = params::parse_query(raw_query);
        self
    }

    /// Attach a request body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Request method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Request path, without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw request body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Request body as UTF-8, if it is valid.
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// An optional query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// A required query parameter; absence maps to a 400 response.
    pub fn require_query_param(&self, name: &str) -> Result<&str, WebError> {
        self.query_param(name).ok_or_else(|| WebError::MissingParam {
            name: name.to_string(),
        })
    }

    /// An optional query parameter parsed to a typed value.
    pub fn query_param_as<T>(&self, name: &str) -> Result<Option<T>, WebError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.query_param(name) {
            None => Ok(None),
            Some(value) => value.parse().map(Some).map_err(|e: T::Err| {
                WebError::InvalidParam {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            }),
        }
    }

    /// A required query parameter parsed to a typed value.
    pub fn require_query_param_as<T>(&self, name: &str) -> Result<T, WebError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.require_query_param(name)?
            .parse()
            .map_err(|e: T::Err| WebError::InvalidParam {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    /// A path variable captured by the matched route pattern.
    pub fn path_var(&self, name: &str) -> Option<&str> {
        self.path_vars.get(name).map(String::as_str)
    }

    /// A required path variable; absence maps to a 400 response.
    pub fn require_path_var(&self, name: &str) -> Result<&str, WebError> {
        self.path_var(name)
            .ok_or_else(|| WebError::MissingPathVariable {
                name: name.to_string(),
            })
    }

    /// A required path variable parsed to a typed value.
    pub fn require_path_var_as<T>(&self, name: &str) -> Result<T, WebError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.require_path_var(name)?
            .parse()
            .map_err(|e: T::Err| WebError::InvalidParam {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    pub(crate) fn set_path_vars(&mut self, path_vars: HashMap<String, String>) {
        self.path_vars = path_vars;
    }
}

/// An HTTP response produced by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    content_type: String,
    body: Vec<u8>,
}

impl Response {
    /// A 200 plain-text response.
    pub fn text(body: impl Into<String>) -> Self {
        Response {
            status: 200,
            content_type: "text/plain; charset=utf-8".to_string(),
            body: body.into().into_bytes(),
        }
    }

    /// A 200 JSON response serialized from a value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, WebError> {
        Ok(Response {
            status: 200,
            content_type: "application/json".to_string(),
            body: serde_json::to_vec(value)?,
        })
    }

    /// Override the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Response status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Response body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Response body as UTF-8, if it is valid.
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Decompose into `(status, content type, body)` for transport bridging.
    pub fn into_parts(self) -> (u16, String, Vec<u8>) {
        (self.status, self.content_type, self.body)
    }
}
