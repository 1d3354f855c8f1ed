use http::Method;
use kickstart::config::AppConfig;
use kickstart::dispatcher::{ControllerRegistry, DispatchError, Dispatcher};
use kickstart::session::SessionStore;
use kickstart::views::ViewEngine;
use kickstart::{Handler, HandlerRequest, HandlerResponse};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

fn request(dir: &TempDir, path: &str) -> HandlerRequest {
    let store = SessionStore::new(dir.path(), 120).unwrap();
    HandlerRequest {
        method: Method::GET,
        path: path.to_string(),
        params: Vec::new(),
        query: HashMap::new(),
        headers: HashMap::new(),
        cookies: HashMap::new(),
        body: None,
        remote_addr: None,
        session: store.open(None),
        config: Arc::new(AppConfig::from_env()),
        views: Arc::new(ViewEngine::new()),
    }
}

#[test]
fn test_named_handler_dispatches_through_registry() {
    let dir = TempDir::new().unwrap();
    let mut registry = ControllerRegistry::new();
    registry.register("Greet", "hello", |req| {
        Ok(HandlerResponse::text(200, format!("hello from {}", req.path)))
    });
    let dispatcher = Dispatcher::new(registry);

    let mut req = request(&dir, "/greet");
    let resp = dispatcher
        .dispatch(&Handler::named("Greet@hello"), &mut req)
        .unwrap();
    assert_eq!(resp.status, 200);
}

#[test]
fn test_unknown_controller_is_handler_not_found() {
    let dir = TempDir::new().unwrap();
    let dispatcher = Dispatcher::new(ControllerRegistry::new());

    let mut req = request(&dir, "/missing");
    let err = dispatcher
        .dispatch(&Handler::named("Ghost@index"), &mut req)
        .unwrap_err();
    assert!(matches!(err, DispatchError::HandlerNotFound(ref s) if s == "Ghost@index"));
}

#[test]
fn test_unknown_method_on_known_controller_is_handler_not_found() {
    let dir = TempDir::new().unwrap();
    let mut registry = ControllerRegistry::new();
    registry.register("Home", "index", |_| Ok(HandlerResponse::text(200, "ok")));
    let dispatcher = Dispatcher::new(registry);

    let mut req = request(&dir, "/");
    let err = dispatcher
        .dispatch(&Handler::named("Home@missing"), &mut req)
        .unwrap_err();
    assert!(matches!(err, DispatchError::HandlerNotFound(_)));
}

#[test]
fn test_closure_handler_bypasses_registry() {
    let dir = TempDir::new().unwrap();
    let dispatcher = Dispatcher::new(ControllerRegistry::new());

    let handler = Handler::func(|req| {
        Ok(HandlerResponse::json(
            200,
            json!({ "id": req.param("id") }),
        ))
    });

    let mut req = request(&dir, "/users/7");
    req.params.push(("id".to_string(), "7".to_string()));

    let resp = dispatcher.dispatch(&handler, &mut req).unwrap();
    assert_eq!(resp.status, 200);
}

#[test]
fn test_handler_failure_is_wrapped() {
    let dir = TempDir::new().unwrap();
    let dispatcher = Dispatcher::new(ControllerRegistry::new());

    let handler = Handler::func(|_| Err(anyhow::anyhow!("boom")));
    let mut req = request(&dir, "/");
    let err = dispatcher.dispatch(&handler, &mut req).unwrap_err();
    assert!(matches!(err, DispatchError::Handler(_)));
    assert!(err.to_string().contains("boom"));
}
