//! # Front Controller Module
//!
//! [`App`] is the single entry point every request passes through. It is an
//! explicitly constructed context object (configuration snapshot, view
//! engine, session store, route table and dispatcher) built once at
//! process start and read-only afterwards.
//!
//! Per request the flow is: match the method and path against the route
//! table; on a match, dispatch to the handler; with no match, render the
//! default diagnostic welcome page with a database connectivity probe. That
//! fallback (rather than a 404) is inherited behavior, kept deliberately.
//!
//! Handler and dispatch errors never escape [`App::handle`]: they are
//! logged and mapped to a generic error page in production, or to the full
//! error detail in debug mode.

use crate::config::AppConfig;
use crate::controllers::{connection_probe, Home};
use crate::dispatcher::{
    ControllerRegistry, DispatchError, Dispatcher, Handler, HandlerRequest, HandlerResponse,
};
use crate::router::Router;
use crate::server::ParsedRequest;
use crate::session::SessionStore;
use crate::views::ViewEngine;
use http::Method;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Name of the session cookie issued by the application.
pub const SESSION_COOKIE: &str = "kickstart_session";

/// Application context: one instance per process lifetime.
pub struct App {
    config: Arc<AppConfig>,
    views: Arc<ViewEngine>,
    sessions: SessionStore,
    router: Router,
    dispatcher: Dispatcher,
}

impl App {
    /// Bootstrap the application: build the view engine and session store
    /// and register the built-in controllers. No store connection is opened
    /// here; connections are per request.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let sessions = SessionStore::new(&config.session_dir, config.session_lifetime_mins)?;

        let mut registry = ControllerRegistry::new();
        Home::register(&mut registry);

        info!(
            app_name = %config.app_name,
            environment = %config.environment,
            debug = config.debug,
            "Application bootstrapped"
        );

        Ok(App {
            config: Arc::new(config),
            views: Arc::new(ViewEngine::new()),
            sessions,
            router: Router::new(),
            dispatcher: Dispatcher::new(registry),
        })
    }

    /// The configuration snapshot.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The route table.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Registry access for adding controllers before route registration.
    pub fn registry_mut(&mut self) -> &mut ControllerRegistry {
        self.dispatcher.registry_mut()
    }

    /// Register a route. `"Controller@method"` references are resolved
    /// against the registry here so a typo fails at startup rather than on
    /// the first request.
    pub fn route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: Handler,
    ) -> Result<(), DispatchError> {
        if let Handler::Named(spec) = &handler {
            self.dispatcher.registry().resolve(spec)?;
        }
        self.router.register(method, pattern, handler);
        Ok(())
    }

    /// Register a GET route to a `"Controller@method"` reference.
    pub fn get(&mut self, pattern: &str, handler: &str) -> Result<(), DispatchError> {
        self.route(Method::GET, pattern, Handler::named(handler))
    }

    /// Register a POST route to a `"Controller@method"` reference.
    pub fn post(&mut self, pattern: &str, handler: &str) -> Result<(), DispatchError> {
        self.route(Method::POST, pattern, Handler::named(handler))
    }

    /// Register a PUT route to a `"Controller@method"` reference.
    pub fn put(&mut self, pattern: &str, handler: &str) -> Result<(), DispatchError> {
        self.route(Method::PUT, pattern, Handler::named(handler))
    }

    /// Register a DELETE route to a `"Controller@method"` reference.
    pub fn delete(&mut self, pattern: &str, handler: &str) -> Result<(), DispatchError> {
        self.route(Method::DELETE, pattern, Handler::named(handler))
    }

    /// Handle one request end to end.
    ///
    /// Never panics and never returns an error: every failure mode maps to
    /// a rendered response.
    #[must_use]
    pub fn handle(&self, parsed: ParsedRequest) -> HandlerResponse {
        // An unknown method simply has no routes and falls through to the
        // diagnostic page, same as any unmatched request
        let method = Method::from_bytes(parsed.method.as_bytes()).unwrap_or(Method::GET);

        let session = self
            .sessions
            .open(parsed.cookies.get(SESSION_COOKIE).map(String::as_str));

        let mut req = HandlerRequest {
            method: method.clone(),
            path: parsed.path.clone(),
            params: Vec::new(),
            query: parsed.query_params,
            headers: parsed.headers,
            cookies: parsed.cookies,
            body: parsed.body,
            remote_addr: parsed.remote_addr,
            session,
            config: self.config.clone(),
            views: self.views.clone(),
        };

        let mut response = match self.router.match_route(&method, &parsed.path) {
            Some(matched) => {
                req.params = matched.params.clone();
                match self.dispatcher.dispatch(&matched.route.handler, &mut req) {
                    Ok(response) => response,
                    Err(e) => self.error_response(&e),
                }
            }
            // Unmatched requests get the diagnostic welcome page, not a 404
            None => self.welcome(),
        };

        // A fresh session that was never written to leaves no file and no
        // cookie behind; existing sessions are re-saved to slide their expiry
        if req.session.is_dirty() || !req.session.is_fresh() {
            if let Err(e) = self.sessions.save(&req.session) {
                warn!(error = %e, "Failed to persist session");
            }
        }
        if req.session.is_fresh() && req.session.is_dirty() {
            response.set_header(
                "Set-Cookie",
                format!(
                    "{SESSION_COOKIE}={}; Path=/; HttpOnly; Max-Age={}",
                    req.session.id,
                    self.config.session_lifetime_mins * 60
                ),
            );
        }

        response
    }

    /// Default diagnostic page for unmatched requests: connectivity probe
    /// only, no visit bookkeeping.
    fn welcome(&self) -> HandlerResponse {
        let probe = connection_probe(&self.config.db);

        let context = json!({
            "app_name": self.config.app_name,
            "environment": self.config.environment,
            "visitor_count": null,
            "probe": probe,
            "db": {
                "host": self.config.db.host,
                "database": self.config.db.database,
                "user": self.config.db.user,
            },
        });

        match self.views.render("welcome", context) {
            Ok(html) => HandlerResponse::html(200, html),
            Err(e) => self.error_response(&e),
        }
    }

    /// Map an uncaught error to the generic failure page, or to the full
    /// detail in debug mode.
    fn error_response(&self, err: &dyn fmt::Display) -> HandlerResponse {
        let message = err.to_string();
        error!(error = %message, "Unhandled application error");

        let context = json!({
            "message": if self.config.debug { message.clone() } else { String::new() },
            "detail": if self.config.debug { Some(&message) } else { None },
        });

        match self.views.render("error", context) {
            Ok(html) => HandlerResponse::html(500, html),
            // Rendering the error page itself failed, fall back to text
            Err(_) => HandlerResponse::text(500, "Application Error"),
        }
    }
}
