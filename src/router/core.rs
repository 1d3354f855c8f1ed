use crate::dispatcher::Handler;
use http::Method;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A registered route: method, original pattern, compiled pattern and the
/// handler reference. Immutable once registered; lives for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct Route {
    /// HTTP method this route answers
    pub method: Method,
    /// Pattern as registered, with `{name}` placeholders
    pub pattern: String,
    /// Handler reference invoked on a match
    pub handler: Handler,
    regex: Regex,
    param_names: Vec<String>,
}

/// Result of matching a request against the route table.
///
/// Transient: created per request and discarded after the handler returns.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The winning route
    pub route: Arc<Route>,
    /// Extracted placeholder values in pattern order
    pub params: Vec<(String, String)>,
}

impl RouteMatch {
    /// Extracted parameter by name; with duplicate placeholder names the
    /// last capture wins.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Ordered route table plus matcher.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Arc<Route>>,
}

impl Router {
    /// Create an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. No uniqueness or conflict validation: duplicate or
    /// shadowing patterns are permitted, and the first registered match
    /// always wins.
    pub fn register(&mut self, method: Method, pattern: &str, handler: Handler) {
        let (regex, param_names) = compile_pattern(pattern);
        debug!(
            method = %method,
            pattern = %pattern,
            params = ?param_names,
            "Route registered"
        );
        self.routes.push(Arc::new(Route {
            method,
            pattern: pattern.to_string(),
            handler,
            regex,
            param_names,
        }));
    }

    /// Register a GET route.
    pub fn get(&mut self, pattern: &str, handler: Handler) {
        self.register(Method::GET, pattern, handler);
    }

    /// Register a POST route.
    pub fn post(&mut self, pattern: &str, handler: Handler) {
        self.register(Method::POST, pattern, handler);
    }

    /// Register a PUT route.
    pub fn put(&mut self, pattern: &str, handler: Handler) {
        self.register(Method::PUT, pattern, handler);
    }

    /// Register a DELETE route.
    pub fn delete(&mut self, pattern: &str, handler: Handler) {
        self.register(Method::DELETE, pattern, handler);
    }

    /// All registered routes, in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    /// Print the routing table to stdout.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for route in &self.routes {
            println!("[route] {} {} -> {:?}", route.method, route.pattern, route.handler);
        }
    }

    /// Match an incoming method and path against the table.
    ///
    /// Scans entries for the method in registration order and returns the
    /// first whose compiled pattern matches the whole path, with the named
    /// captures in pattern order. Returns `None` when nothing matches,
    /// including when no entries exist for the method at all.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        for route in &self.routes {
            if route.method != *method {
                continue;
            }
            if let Some(captures) = route.regex.captures(path) {
                let params = route
                    .param_names
                    .iter()
                    .enumerate()
                    .filter_map(|(i, name)| {
                        captures
                            .get(i + 1)
                            .map(|m| (name.clone(), m.as_str().to_string()))
                    })
                    .collect();

                info!(
                    method = %method,
                    path = %path,
                    pattern = %route.pattern,
                    "Route matched"
                );

                return Some(RouteMatch {
                    route: route.clone(),
                    params,
                });
            }
        }

        warn!(method = %method, path = %path, "No route matched");
        None
    }
}

/// Compile a route pattern into an anchored, case-insensitive regex and the
/// ordered placeholder names.
///
/// Each `{name}` placeholder becomes a capturing group matching any run of
/// non-slash characters. Literal text is escaped, so a pattern with no
/// placeholders behaves as an exact (case-insensitive) literal match. A `{`
/// that does not form a valid placeholder is treated as literal text.
fn compile_pattern(pattern: &str) -> (Regex, Vec<String>) {
    let mut regex_src = String::with_capacity(pattern.len() + 8);
    regex_src.push('^');
    let mut param_names = Vec::new();

    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        let (literal, tail) = rest.split_at(open);
        regex_src.push_str(&regex::escape(literal));

        match tail[1..].find('}') {
            Some(close) if is_placeholder_name(&tail[1..close + 1]) => {
                param_names.push(tail[1..close + 1].to_string());
                regex_src.push_str("([^/]+)");
                rest = &tail[close + 2..];
            }
            _ => {
                // Not a placeholder, keep the brace literal
                regex_src.push_str(&regex::escape("{"));
                rest = &tail[1..];
            }
        }
    }
    regex_src.push_str(&regex::escape(rest));
    regex_src.push('$');

    let regex = RegexBuilder::new(&regex_src)
        .case_insensitive(true)
        .build()
        .expect("escaped route pattern always compiles");

    (regex, param_names)
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
