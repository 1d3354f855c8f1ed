use crate::dispatcher::{Body, HandlerResponse};
use may_minihttp::Response;
use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};
use tracing::error;

/// Upper bound on distinct dynamic header lines kept for the process
/// lifetime.
const MAX_HEADER_LINES: usize = 4096;

static HEADER_LINES: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();

/// Intern a dynamic header line as a `'static` string.
///
/// `may_minihttp` responses only accept `'static` header lines, so dynamic
/// lines must outlive the response. Interning keeps one copy per distinct
/// line and caps the pool; past the cap the line is refused rather than
/// kept forever.
fn intern_header_line(line: String) -> Option<&'static str> {
    let mut pool = HEADER_LINES
        .get_or_init(|| Mutex::new(HashSet::new()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    if let Some(existing) = pool.get(line.as_str()) {
        return Some(*existing);
    }
    if pool.len() >= MAX_HEADER_LINES {
        return None;
    }
    let line: &'static str = Box::leak(line.into_boxed_str());
    pool.insert(line);
    Some(line)
}

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Write a handler response to the wire.
pub fn write_response(res: &mut Response, response: HandlerResponse) {
    res.status_code(response.status as usize, status_reason(response.status));

    for (name, value) in &response.headers {
        match intern_header_line(format!("{name}: {value}")) {
            Some(line) => {
                res.header(line);
            }
            None => error!(header = %name, "Header line pool exhausted, header dropped"),
        }
    }

    match response.body {
        Body::Html(html) => {
            res.header("Content-Type: text/html; charset=utf-8");
            res.body_vec(html.into_bytes());
        }
        Body::Json(value) => {
            res.header("Content-Type: application/json");
            res.body_vec(value.to_string().into_bytes());
        }
        Body::Text(text) => {
            res.header("Content-Type: text/plain; charset=utf-8");
            res.body_vec(text.into_bytes());
        }
        Body::Empty => {}
    }
}
