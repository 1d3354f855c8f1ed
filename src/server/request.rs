use may_minihttp::Request;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

/// Parsed HTTP request data handed to the front controller.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method as received
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase names)
    pub headers: HashMap<String, String>,
    /// Cookies parsed from the Cookie header
    pub cookies: HashMap<String, String>,
    /// Parsed query-string parameters
    pub query_params: HashMap<String, String>,
    /// Request body: JSON as-is, form bodies as a string object
    pub body: Option<Value>,
    /// Client address from proxy headers, when present
    pub remote_addr: Option<String>,
}

/// Parse cookies out of lowercase-keyed headers.
pub fn parse_cookies(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim().to_string();
                    let value = parts.next().unwrap_or("").trim().to_string();
                    Some((name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse and URL-decode query parameters from a raw path.
pub fn parse_query_params(path: &str) -> HashMap<String, String> {
    if let Some(pos) = path.find('?') {
        let query_str = &path[pos + 1..];
        url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        HashMap::new()
    }
}

/// Client address from proxy headers: the first `X-Forwarded-For` entry,
/// falling back to `X-Real-IP`. Expects lowercase header names.
pub fn client_addr(headers: &HashMap<String, String>) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }
    headers
        .get("x-real-ip")
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

/// Parse a request body according to its content type: JSON passes through,
/// `application/x-www-form-urlencoded` becomes an object of strings.
pub fn parse_body(content_type: &str, body: &str) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    if content_type.starts_with("application/x-www-form-urlencoded") {
        let fields: Map<String, Value> = url::form_urlencoded::parse(body.as_bytes())
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        return Some(Value::Object(fields));
    }
    serde_json::from_str(body).ok()
}

/// Extract everything the application needs from a raw `may_minihttp` request.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let cookies = parse_cookies(&headers);
    let query_params = parse_query_params(&raw_path);
    let remote_addr = client_addr(&headers);

    let body = {
        let content_type = headers
            .get("content-type")
            .cloned()
            .unwrap_or_default();
        let mut body_str = String::new();
        match req.body().read_to_string(&mut body_str) {
            Ok(size) if size > 0 => parse_body(&content_type, &body_str),
            _ => None,
        }
    };

    debug!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        query_count = query_params.len(),
        has_body = body.is_some(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        cookies,
        query_params,
        body,
        remote_addr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_cookies() {
        let mut headers = HashMap::new();
        headers.insert("cookie".to_string(), "a=b; c=d".to_string());
        let cookies = parse_cookies(&headers);
        assert_eq!(cookies.get("a"), Some(&"b".to_string()));
        assert_eq!(cookies.get("c"), Some(&"d".to_string()));
    }

    #[test]
    fn test_parse_query_params() {
        let q = parse_query_params("/p?x=1&y=two%20words");
        assert_eq!(q.get("x"), Some(&"1".to_string()));
        assert_eq!(q.get("y"), Some(&"two words".to_string()));
    }

    #[test]
    fn test_client_addr_prefers_forwarded_for() {
        let mut headers = HashMap::new();
        headers.insert(
            "x-forwarded-for".to_string(),
            "203.0.113.9, 10.0.0.2".to_string(),
        );
        headers.insert("x-real-ip".to_string(), "10.0.0.2".to_string());
        assert_eq!(client_addr(&headers).as_deref(), Some("203.0.113.9"));

        headers.remove("x-forwarded-for");
        assert_eq!(client_addr(&headers).as_deref(), Some("10.0.0.2"));

        headers.remove("x-real-ip");
        assert_eq!(client_addr(&headers), None);
    }

    #[test]
    fn test_parse_body_json_and_form() {
        assert_eq!(
            parse_body("application/json", r#"{"a":1}"#),
            Some(json!({ "a": 1 }))
        );
        assert_eq!(
            parse_body("application/x-www-form-urlencoded", "a=1&b=x%20y"),
            Some(json!({ "a": "1", "b": "x y" }))
        );
        assert_eq!(parse_body("application/json", ""), None);
        assert_eq!(parse_body("text/plain", "not json"), None);
    }
}
