use crate::config::AppConfig;
use crate::session::Session;
use crate::views::ViewEngine;
use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Boxed handler callable shared by routes and the controller registry.
pub type HandlerFn = Arc<dyn Fn(&mut HandlerRequest) -> anyhow::Result<HandlerResponse> + Send + Sync>;

/// A route's handler reference: a plain callable or a `"Controller@method"`
/// name pair resolved through the [`ControllerRegistry`].
#[derive(Clone)]
pub enum Handler {
    /// Directly invocable handler
    Func(HandlerFn),
    /// Name pair resolved through the registry at dispatch time
    Named(String),
}

impl Handler {
    /// Wrap a closure as a handler.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&mut HandlerRequest) -> anyhow::Result<HandlerResponse> + Send + Sync + 'static,
    {
        Handler::Func(Arc::new(f))
    }

    /// Reference a controller method by `"Name@method"` string.
    pub fn named(spec: impl Into<String>) -> Self {
        Handler::Named(spec.into())
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Func(_) => f.write_str("Handler::Func(..)"),
            Handler::Named(name) => write!(f, "Handler::Named({name:?})"),
        }
    }
}

/// Errors produced while resolving or running a handler.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The `"Controller@method"` reference does not resolve
    #[error("route handler not found: {0}")]
    HandlerNotFound(String),
    /// The handler ran and returned an error
    #[error("handler failed: {0}")]
    Handler(#[source] anyhow::Error),
}

/// Everything a handler gets to see about the current request.
///
/// Path parameters keep their pattern order so handlers that care about
/// position can read them positionally; [`HandlerRequest::param`] looks them
/// up by name.
pub struct HandlerRequest {
    /// HTTP method
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Path parameters in pattern order
    pub params: Vec<(String, String)>,
    /// Parsed query-string parameters
    pub query: HashMap<String, String>,
    /// HTTP headers, lowercase names
    pub headers: HashMap<String, String>,
    /// Cookies from the Cookie header
    pub cookies: HashMap<String, String>,
    /// Parsed request body, JSON or form
    pub body: Option<Value>,
    /// Client address as reported by the server
    pub remote_addr: Option<String>,
    /// This request's session
    pub session: Session,
    /// Process-wide configuration snapshot
    pub config: Arc<AppConfig>,
    /// Template environment for rendering views
    pub views: Arc<ViewEngine>,
}

impl HandlerRequest {
    /// Path parameter by name. With duplicate names the last occurrence
    /// wins, matching the capture that was written last.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Path parameter values in pattern order.
    #[must_use]
    pub fn param_values(&self) -> Vec<&str> {
        self.params.iter().map(|(_, v)| v.as_str()).collect()
    }

    /// Query-string parameter by name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Header by name, case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Request input by key: body fields shadow query parameters.
    #[must_use]
    pub fn input(&self, key: &str) -> Option<String> {
        if let Some(Value::Object(map)) = &self.body {
            if let Some(v) = map.get(key) {
                return Some(match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                });
            }
        }
        self.query.get(key).cloned()
    }

    /// Input with a default when absent.
    #[must_use]
    pub fn input_or(&self, key: &str, default: &str) -> String {
        self.input(key).unwrap_or_else(|| default.to_string())
    }

    /// All inputs merged: query parameters overlaid by body fields.
    #[must_use]
    pub fn all(&self) -> HashMap<String, String> {
        let mut inputs: HashMap<String, String> = self.query.clone();
        if let Some(Value::Object(map)) = &self.body {
            for (k, v) in map {
                let s = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                inputs.insert(k.clone(), s);
            }
        }
        inputs
    }

    /// True when the input key is present in body or query.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.input(key).is_some()
    }
}

/// Response body variants a handler can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Html(String),
    Json(Value),
    Text(String),
    Empty,
}

/// Response data sent back from a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    /// HTTP status code
    pub status: u16,
    /// Extra response headers
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Body,
}

impl HandlerResponse {
    /// HTML response.
    #[must_use]
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        HandlerResponse {
            status,
            headers: Vec::new(),
            body: Body::Html(body.into()),
        }
    }

    /// JSON response.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        HandlerResponse {
            status,
            headers: Vec::new(),
            body: Body::Json(body),
        }
    }

    /// Plain-text response.
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        HandlerResponse {
            status,
            headers: Vec::new(),
            body: Body::Text(body.into()),
        }
    }

    /// 302 redirect to the given location.
    #[must_use]
    pub fn redirect(location: impl Into<String>) -> Self {
        HandlerResponse {
            status: 302,
            headers: vec![("Location".to_string(), location.into())],
            body: Body::Empty,
        }
    }

    /// Header by name, case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }
}

/// Explicit mapping from `"Controller@method"` names to callables.
///
/// Controllers register their callable members at startup; route
/// registration resolves against this map so a misconfigured route fails
/// fast instead of at dispatch time.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    methods: HashMap<String, HandlerFn>,
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callable member under `controller@method`.
    pub fn register<F>(&mut self, controller: &str, method: &str, f: F)
    where
        F: Fn(&mut HandlerRequest) -> anyhow::Result<HandlerResponse> + Send + Sync + 'static,
    {
        let key = format!("{controller}@{method}");
        debug!(handler = %key, "Controller method registered");
        self.methods.insert(key, Arc::new(f));
    }

    /// Resolve a `"Controller@method"` reference.
    ///
    /// The name is split on the first `@`; anything without one, or naming
    /// an unknown controller or method, is a [`DispatchError::HandlerNotFound`].
    pub fn resolve(&self, spec: &str) -> Result<HandlerFn, DispatchError> {
        if !spec.contains('@') {
            return Err(DispatchError::HandlerNotFound(spec.to_string()));
        }
        self.methods
            .get(spec)
            .cloned()
            .ok_or_else(|| DispatchError::HandlerNotFound(spec.to_string()))
    }

    /// True if the reference resolves.
    #[must_use]
    pub fn contains(&self, spec: &str) -> bool {
        self.methods.contains_key(spec)
    }
}

/// Dispatcher that resolves handler references and invokes them.
#[derive(Clone, Default)]
pub struct Dispatcher {
    registry: ControllerRegistry,
}

impl Dispatcher {
    #[must_use]
    pub fn new(registry: ControllerRegistry) -> Self {
        Dispatcher { registry }
    }

    /// The controller registry backing named handlers.
    #[must_use]
    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    /// Mutable access for registering controllers after construction.
    pub fn registry_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.registry
    }

    /// Resolve and invoke the handler with the extracted parameters.
    ///
    /// # Errors
    ///
    /// [`DispatchError::HandlerNotFound`] when a name pair does not resolve;
    /// [`DispatchError::Handler`] when the handler itself fails.
    pub fn dispatch(
        &self,
        handler: &Handler,
        req: &mut HandlerRequest,
    ) -> Result<HandlerResponse, DispatchError> {
        let f = match handler {
            Handler::Func(f) => f.clone(),
            Handler::Named(spec) => {
                debug!(handler = %spec, "Handler lookup");
                self.registry.resolve(spec).inspect_err(|_| {
                    error!(handler = %spec, "Handler not found");
                })?
            }
        };

        info!(
            method = %req.method,
            path = %req.path,
            params = ?req.params,
            "Dispatching request to handler"
        );

        f(req).map_err(DispatchError::Handler)
    }
}
