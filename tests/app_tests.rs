use http::Method;
use kickstart::app::SESSION_COOKIE;
use kickstart::config::AppConfig;
use kickstart::dispatcher::{Body, DispatchError};
use kickstart::server::ParsedRequest;
use kickstart::{App, Handler, HandlerResponse};
use serde_json::json;
use tempfile::TempDir;

fn test_app() -> (App, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::from_env();
    config.session_dir = dir.path().join("sessions").to_string_lossy().into_owned();
    config.log_dir = dir.path().join("logs").to_string_lossy().into_owned();
    // Nothing listens here, so probes and model handlers fail fast
    config.db.host = "127.0.0.1".to_string();
    (App::new(config).unwrap(), dir)
}

fn get(path: &str) -> ParsedRequest {
    ParsedRequest {
        method: "GET".to_string(),
        path: path.to_string(),
        ..Default::default()
    }
}

fn body_html(response: &HandlerResponse) -> &str {
    match &response.body {
        Body::Html(html) => html,
        other => panic!("expected HTML body, got {other:?}"),
    }
}

#[test]
fn test_about_route_renders_page() {
    let (mut app, _dir) = test_app();
    app.get("/about", "Home@about").unwrap();

    let response = app.handle(get("/about"));
    assert_eq!(response.status, 200);
    let html = body_html(&response);
    assert!(html.contains("About Us"));
    assert!(html.contains("simple kickstarter template"));
}

#[test]
fn test_unmatched_path_falls_back_to_welcome_page() {
    let (app, _dir) = test_app();

    let response = app.handle(get("/definitely/not/registered"));
    assert_eq!(response.status, 200);
    let html = body_html(&response);
    assert!(html.contains("Welcome to your new application"));
    assert!(html.contains("Database Connection Test"));
}

#[test]
fn test_unresolvable_handler_fails_at_registration() {
    let (mut app, _dir) = test_app();

    let err = app.get("/broken", "Home@no_such_method").unwrap_err();
    assert!(matches!(err, DispatchError::HandlerNotFound(ref s) if s == "Home@no_such_method"));

    let err = app.get("/worse", "Ghost@index").unwrap_err();
    assert!(matches!(err, DispatchError::HandlerNotFound(_)));
}

#[test]
fn test_untouched_session_sets_no_cookie_and_no_file() {
    let (app, dir) = test_app();

    // Cookieless requests that never use their session leave nothing behind
    let response = app.handle(get("/"));
    assert_eq!(response.header("set-cookie"), None);
    let response = app.handle(get("/nowhere"));
    assert_eq!(response.header("set-cookie"), None);

    let files = std::fs::read_dir(dir.path().join("sessions")).unwrap().count();
    assert_eq!(files, 0);
}

#[test]
fn test_session_write_issues_a_cookie() {
    let (mut app, _dir) = test_app();
    app.route(
        Method::GET,
        "/login",
        Handler::func(|req| {
            req.session.set("user", json!("alice"));
            Ok(HandlerResponse::text(200, "ok"))
        }),
    )
    .unwrap();

    let response = app.handle(get("/login"));
    let cookie = response.header("set-cookie").unwrap();
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    assert!(cookie.contains("HttpOnly"));
}

#[test]
fn test_closure_route_receives_path_params() {
    let (mut app, _dir) = test_app();
    app.route(
        Method::GET,
        "/users/{id}",
        Handler::func(|req| {
            Ok(HandlerResponse::json(
                200,
                json!({ "id": req.param("id") }),
            ))
        }),
    )
    .unwrap();

    let response = app.handle(get("/users/42"));
    assert_eq!(response.status, 200);
    match response.body {
        Body::Json(value) => assert_eq!(value, json!({ "id": "42" })),
        other => panic!("expected JSON body, got {other:?}"),
    }
}

#[test]
fn test_handler_error_maps_to_error_page() {
    let (mut app, _dir) = test_app();
    app.route(
        Method::GET,
        "/explode",
        Handler::func(|_| Err(anyhow::anyhow!("kaboom"))),
    )
    .unwrap();

    let response = app.handle(get("/explode"));
    assert_eq!(response.status, 500);
    // The error page renders regardless of debug mode
    body_html(&response);
}

#[test]
fn test_stats_without_database_is_an_error_response() {
    let (mut app, _dir) = test_app();
    app.get("/api/stats", "Home@stats").unwrap();

    let response = app.handle(get("/api/stats"));
    assert_eq!(response.status, 500);
}

#[test]
fn test_method_without_routes_falls_back_to_welcome() {
    let (mut app, _dir) = test_app();
    app.get("/about", "Home@about").unwrap();

    let mut parsed = get("/about");
    parsed.method = "PATCH".to_string();
    let response = app.handle(parsed);
    assert_eq!(response.status, 200);
    assert!(body_html(&response).contains("Welcome to your new application"));
}
