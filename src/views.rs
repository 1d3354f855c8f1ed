//! # View Renderer Module
//!
//! Thin wrapper around a [`minijinja`] environment. Templates are embedded
//! at compile time, registered once at startup, and rendered with a map of
//! named values. A template identifier that does not resolve is a distinct
//! error kind so the caller can tell misconfiguration apart from a render
//! failure inside an existing template.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use thiserror::Error;

/// Errors produced while rendering a view.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The template identifier does not resolve to a registered template
    #[error("view '{0}' not found")]
    NotFound(String),
    /// The template exists but failed to render
    #[error("failed to render view '{name}': {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Template environment shared for the process lifetime.
pub struct ViewEngine {
    env: Environment<'static>,
}

impl ViewEngine {
    /// Build the engine with the built-in application templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        // Template names carry no extension, escape HTML everywhere
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        env.add_template("welcome", include_str!("../templates/welcome.html"))
            .expect("built-in template 'welcome' is valid");
        env.add_template("about", include_str!("../templates/about.html"))
            .expect("built-in template 'about' is valid");
        env.add_template("error", include_str!("../templates/error.html"))
            .expect("built-in template 'error' is valid");

        Self { env }
    }

    /// Register an additional template source under the given name.
    pub fn add_template(
        &mut self,
        name: &'static str,
        source: &'static str,
    ) -> Result<(), ViewError> {
        self.env
            .add_template(name, source)
            .map_err(|e| ViewError::Render {
                name: name.to_string(),
                source: e,
            })
    }

    /// Render a template with the given context.
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, ViewError> {
        let template = self.env.get_template(name).map_err(|e| {
            if e.kind() == minijinja::ErrorKind::TemplateNotFound {
                ViewError::NotFound(name.to_string())
            } else {
                ViewError::Render {
                    name: name.to_string(),
                    source: e,
                }
            }
        })?;

        template.render(context).map_err(|e| ViewError::Render {
            name: name.to_string(),
            source: e,
        })
    }
}

impl Default for ViewEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_about_renders_title_and_content() {
        let views = ViewEngine::new();
        let html = views
            .render("about", context! { title => "About Us", content => "hello" })
            .unwrap();
        assert!(html.contains("About Us"));
        assert!(html.contains("hello"));
    }

    #[test]
    fn test_missing_template_is_distinct_error() {
        let views = ViewEngine::new();
        let err = views.render("nope", context! {}).unwrap_err();
        assert!(matches!(err, ViewError::NotFound(name) if name == "nope"));
    }

    #[test]
    fn test_values_are_html_escaped() {
        let views = ViewEngine::new();
        let html = views
            .render("about", context! { title => "t", content => "<script>" })
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
