use http::Method;
use kickstart::{Handler, Router};

fn noop() -> Handler {
    Handler::named("Noop@none")
}

#[test]
fn test_placeholder_values_are_extracted() {
    let mut router = Router::new();
    router.get("/users/{id}", noop());

    let m = router.match_route(&Method::GET, "/users/42").unwrap();
    assert_eq!(m.route.pattern, "/users/{id}");
    assert_eq!(m.param("id"), Some("42"));
}

#[test]
fn test_multiple_placeholders_keep_pattern_order() {
    let mut router = Router::new();
    router.get("/orgs/{org}/repos/{repo}", noop());

    let m = router
        .match_route(&Method::GET, "/orgs/acme/repos/widget")
        .unwrap();
    assert_eq!(
        m.params,
        vec![
            ("org".to_string(), "acme".to_string()),
            ("repo".to_string(), "widget".to_string()),
        ]
    );
}

#[test]
fn test_first_registered_route_wins_over_later_literal() {
    let mut router = Router::new();
    router.get("/items/{id}", Handler::named("Items@show"));
    router.get("/items/special", Handler::named("Items@special"));

    let m = router.match_route(&Method::GET, "/items/special").unwrap();
    assert_eq!(m.route.pattern, "/items/{id}");
    assert_eq!(m.param("id"), Some("special"));
}

#[test]
fn test_duplicate_patterns_resolve_to_first() {
    let mut router = Router::new();
    router.get("/dup", Handler::named("A@first"));
    router.get("/dup", Handler::named("B@second"));

    let m = router.match_route(&Method::GET, "/dup").unwrap();
    assert!(matches!(&m.route.handler, Handler::Named(n) if n == "A@first"));
}

#[test]
fn test_method_gates_the_match() {
    let mut router = Router::new();
    router.get("/things", noop());
    router.post("/things", Handler::named("Things@create"));

    let get = router.match_route(&Method::GET, "/things").unwrap();
    assert!(matches!(&get.route.handler, Handler::Named(n) if n == "Noop@none"));

    let post = router.match_route(&Method::POST, "/things").unwrap();
    assert!(matches!(&post.route.handler, Handler::Named(n) if n == "Things@create"));

    assert!(router.match_route(&Method::DELETE, "/things").is_none());
}

#[test]
fn test_empty_table_never_matches() {
    let router = Router::new();
    assert!(router.match_route(&Method::GET, "/").is_none());
    assert!(router.match_route(&Method::POST, "/anything").is_none());
}

#[test]
fn test_matching_is_case_insensitive() {
    let mut router = Router::new();
    router.get("/About", noop());
    assert!(router.match_route(&Method::GET, "/about").is_some());
    assert!(router.match_route(&Method::GET, "/ABOUT").is_some());
}

#[test]
fn test_literal_dots_are_not_wildcards() {
    let mut router = Router::new();
    router.get("/feed.xml", noop());
    assert!(router.match_route(&Method::GET, "/feed.xml").is_some());
    assert!(router.match_route(&Method::GET, "/feedXxml").is_none());
}

#[test]
fn test_placeholder_stops_at_slash() {
    let mut router = Router::new();
    router.get("/users/{id}", noop());
    assert!(router.match_route(&Method::GET, "/users/1/posts").is_none());
}

#[test]
fn test_routes_keep_registration_order() {
    let mut router = Router::new();
    router.get("/a", noop());
    router.post("/b", noop());
    router.get("/c", noop());

    let patterns: Vec<&str> = router.routes().iter().map(|r| r.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["/a", "/b", "/c"]);
}
