//! Small procedural helpers: URL building, HTML escaping and date
//! formatting. These mirror the loose utility layer of a classic MVC
//! skeleton and are deliberately free of application state: everything is
//! derived from the passed-in config or arguments.

use crate::config::AppConfig;
use chrono::{NaiveDateTime, Utc};

/// SQL timestamp format used across the models and helpers.
pub const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Base URL of the application, without a trailing slash.
#[must_use]
pub fn base_url(config: &AppConfig) -> String {
    config.url.trim_end_matches('/').to_string()
}

/// Build a full URL from a path.
#[must_use]
pub fn url(config: &AppConfig, path: &str) -> String {
    format!("{}/{}", base_url(config), path.trim_start_matches('/'))
}

/// Escape a string for embedding in HTML.
#[must_use]
pub fn e(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Current UTC time in SQL timestamp format.
#[must_use]
pub fn now_sql() -> String {
    Utc::now().format(SQL_DATETIME_FORMAT).to_string()
}

/// Reformat a SQL timestamp with the given `chrono` format string.
///
/// Returns `None` when the input does not parse.
#[must_use]
pub fn format_date(date: &str, format: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(date, SQL_DATETIME_FORMAT)
        .ok()
        .map(|dt| dt.format(format).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn config_with_url(url: &str) -> AppConfig {
        let mut config = AppConfig::from_env();
        config.url = url.to_string();
        config
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = config_with_url("http://localhost:8080/");
        assert_eq!(url(&config, "/about"), "http://localhost:8080/about");
        assert_eq!(url(&config, "about"), "http://localhost:8080/about");
    }

    #[test]
    fn test_escape() {
        assert_eq!(e("<a href=\"x\">&'</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_format_date_roundtrip() {
        assert_eq!(
            format_date("2024-03-09 08:05:02", "%Y-%m-%d").as_deref(),
            Some("2024-03-09")
        );
        assert_eq!(format_date("not a date", "%Y"), None);
    }
}
