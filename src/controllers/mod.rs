//! # Controllers Module
//!
//! Controllers turn a dispatched request into a response. The [`Controller`]
//! trait supplies the shared plumbing every controller wants (rendering a
//! view, emitting JSON, redirecting) and [`validate`] gives the same
//! declarative input validation the base controller of a classic MVC
//! skeleton offers.
//!
//! Controllers expose their callable members to the
//! [`crate::dispatcher::ControllerRegistry`] so routes can reference them as
//! `"Name@method"` strings.

mod home;

pub use home::{connection_probe, Home, ProbeReport};

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use serde_json::Value;
use std::collections::HashMap;

/// Shared response helpers for controllers.
pub trait Controller {
    /// Render a view with the given named values.
    fn view(
        &self,
        req: &HandlerRequest,
        name: &str,
        context: Value,
    ) -> anyhow::Result<HandlerResponse> {
        let html = req.views.render(name, context)?;
        Ok(HandlerResponse::html(200, html))
    }

    /// JSON response with the given status.
    fn json(&self, status: u16, data: Value) -> HandlerResponse {
        HandlerResponse::json(status, data)
    }

    /// Redirect to a URL.
    fn redirect(&self, url: &str) -> HandlerResponse {
        HandlerResponse::redirect(url)
    }
}

/// Validate request input against `field -> "rule|rule:arg"` pairs.
///
/// Supported rules: `required`, `min:n`, `max:n`, `email`. Returns a map of
/// field name to the messages for every rule that failed; an empty map
/// means the input passed.
#[must_use]
pub fn validate(req: &HandlerRequest, rules: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
    let mut errors: HashMap<String, Vec<String>> = HashMap::new();

    for (field, rule_list) in rules {
        let value = req.input(field).unwrap_or_default();

        for rule in rule_list.split('|') {
            let (name, arg) = match rule.split_once(':') {
                Some((n, a)) => (n, Some(a)),
                None => (rule, None),
            };

            let message = match name {
                "required" if value.is_empty() => Some(format!("{field} is required")),
                "min" => {
                    let min: usize = arg.and_then(|a| a.parse().ok()).unwrap_or(0);
                    (value.chars().count() < min)
                        .then(|| format!("{field} must be at least {min} characters"))
                }
                "max" => {
                    let max: usize = arg.and_then(|a| a.parse().ok()).unwrap_or(255);
                    (value.chars().count() > max)
                        .then(|| format!("{field} must be at most {max} characters"))
                }
                "email" if !is_email(&value) => Some(format!("{field} must be a valid email")),
                _ => None,
            };

            if let Some(message) = message {
                errors.entry(field.to_string()).or_default().push(message);
            }
        }
    }

    errors
}

fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
