//! Home controller: the welcome page with its connectivity probe, the about
//! page and the visitor-statistics API endpoint.

use super::Controller;
use crate::config::DbConfig;
use crate::db::{self, DbError};
use crate::dispatcher::{ControllerRegistry, HandlerRequest, HandlerResponse};
use crate::models::Visitor;
use serde::Serialize;
use serde_json::json;
use tracing::warn;

/// Outcome of the database connectivity probe shown on the welcome page.
///
/// `status` is one of `Success`, `Failed` (connection refused or
/// credentials rejected) or `Error` (connected, but a probe query failed).
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub status: String,
    pub error: String,
    pub version: String,
    pub tables: Vec<String>,
}

/// Probe the configured store: connect, read the server version and list
/// tables. All failures are caught and reported as status data; the probe
/// never propagates an error.
#[must_use]
pub fn connection_probe(config: &DbConfig) -> ProbeReport {
    let mut conn = match db::connect(config) {
        Ok(conn) => conn,
        Err(e) => {
            let status = match e {
                DbError::Connect(_) => "Failed",
                DbError::Query(_) => "Error",
            };
            warn!(host = %config.host, error = %e, "Connectivity probe could not connect");
            return ProbeReport {
                status: status.to_string(),
                error: e.to_string(),
                version: String::new(),
                tables: Vec::new(),
            };
        }
    };

    let version = match conn.server_version() {
        Ok(version) => version,
        Err(e) => {
            warn!(error = %e, "Connectivity probe version query failed");
            return ProbeReport {
                status: "Error".to_string(),
                error: e.to_string(),
                version: String::new(),
                tables: Vec::new(),
            };
        }
    };

    // A failed table listing is not fatal to the probe
    let tables = conn.tables().unwrap_or_default();

    ProbeReport {
        status: "Success".to_string(),
        error: String::new(),
        version,
        tables,
    }
}

/// The demo controller shipped with the skeleton.
#[derive(Debug, Clone, Copy, Default)]
pub struct Home;

impl Controller for Home {}

impl Home {
    /// Expose the callable members under the `Home` name.
    pub fn register(registry: &mut ControllerRegistry) {
        registry.register("Home", "index", |req| Home.index(req));
        registry.register("Home", "about", |req| Home.about(req));
        registry.register("Home", "stats", |req| Home.stats(req));
    }

    /// Welcome page: records the visit, counts visitors and renders the
    /// connectivity report.
    pub fn index(&self, req: &mut HandlerRequest) -> anyhow::Result<HandlerResponse> {
        // Visit bookkeeping is best effort; the page renders without it
        let visitor_count = match db::connect(&req.config.db) {
            Ok(conn) => {
                let mut visitor = Visitor::new(conn);
                let user_agent = req.header("user-agent").map(str::to_string);
                if let Err(e) = visitor.log_visit(req.remote_addr.as_deref(), user_agent.as_deref())
                {
                    warn!(error = %e, "Failed to record visit");
                }
                visitor.total().ok()
            }
            Err(e) => {
                warn!(error = %e, "Visitor store unavailable");
                None
            }
        };

        let probe = connection_probe(&req.config.db);

        self.view(
            req,
            "welcome",
            json!({
                "app_name": req.config.app_name,
                "environment": req.config.environment,
                "visitor_count": visitor_count,
                "probe": probe,
                "db": {
                    "host": req.config.db.host,
                    "database": req.config.db.database,
                    "user": req.config.db.user,
                },
            }),
        )
    }

    /// Static about page.
    pub fn about(&self, req: &mut HandlerRequest) -> anyhow::Result<HandlerResponse> {
        self.view(
            req,
            "about",
            json!({
                "title": "About Us",
                "content": "This is a simple kickstarter template application.",
            }),
        )
    }

    /// Visitor statistics as JSON, grouped by the `interval` input
    /// (`day`, `week` or `month`).
    pub fn stats(&self, req: &mut HandlerRequest) -> anyhow::Result<HandlerResponse> {
        let interval = req.input_or("interval", "day");

        let mut visitor = Visitor::new(db::connect(&req.config.db)?);
        let total = visitor.total()?;
        let stats = visitor.stats_by_date(&interval)?;

        Ok(self.json(
            200,
            json!({
                "success": true,
                "total": total,
                "interval": interval,
                "stats": stats,
            }),
        ))
    }
}
