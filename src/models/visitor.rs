//! Visitor model: the demo table behind the welcome page's visit counter
//! and the `/api/stats` endpoint.

use super::Model;
use crate::db::{Connection, DbError, Row};
use crate::helpers::now_sql;
use serde_json::{json, Value};

/// Visits recorded against the `visitors` table.
pub struct Visitor {
    model: Model,
}

impl Visitor {
    /// Wrap a connection. Only the client address and user agent are mass
    /// assignable; the visit timestamp falls to the table default.
    #[must_use]
    pub fn new(conn: Box<dyn Connection>) -> Self {
        Visitor {
            model: Model::new(conn, "visitors").fillable(&["ip_address", "user_agent"]),
        }
    }

    /// Total number of recorded visits.
    pub fn total(&mut self) -> Result<u64, DbError> {
        let rows = self
            .model
            .raw("SELECT COUNT(*) AS total FROM visitors", &[])?;
        Ok(rows
            .first()
            .and_then(|row| row.get("total"))
            .and_then(Value::as_u64)
            .unwrap_or(0))
    }

    /// Record a visit; returns the new row's identifier.
    pub fn log_visit(&mut self, ip: Option<&str>, user_agent: Option<&str>) -> Result<u64, DbError> {
        self.model.create(&[
            ("ip_address", json!(ip.unwrap_or("Unknown"))),
            ("user_agent", json!(user_agent.unwrap_or("Unknown"))),
            ("visit_time", json!(now_sql())),
        ])
    }

    /// Visits grouped per day, ISO week or month.
    ///
    /// Unknown intervals fall back to daily grouping.
    pub fn stats_by_date(&mut self, interval: &str) -> Result<Vec<Row>, DbError> {
        let group_format = match interval {
            "week" => "%Y-%u",
            "month" => "%Y-%m",
            _ => "%Y-%m-%d",
        };

        self.model.raw(
            "SELECT DATE_FORMAT(visit_time, ?) AS period, COUNT(*) AS visits \
             FROM visitors GROUP BY period ORDER BY period",
            &[json!(group_format)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::RecordingConnection;
    use std::collections::HashMap;

    #[test]
    fn test_total_reads_count_column() {
        let mut row = HashMap::new();
        row.insert("total".to_string(), json!(12));
        let conn = RecordingConnection::with_rows(vec![row]);
        let mut visitor = Visitor::new(Box::new(conn));
        assert_eq!(visitor.total().unwrap(), 12);
    }

    #[test]
    fn test_total_defaults_to_zero_on_empty_result() {
        let conn = RecordingConnection::default();
        let mut visitor = Visitor::new(Box::new(conn));
        assert_eq!(visitor.total().unwrap(), 0);
    }

    #[test]
    fn test_log_visit_drops_unfillable_timestamp() {
        let mut conn = RecordingConnection::default();
        conn.insert_id = 3;
        let log = conn.log_handle();
        let mut visitor = Visitor::new(Box::new(conn));

        let id = visitor.log_visit(Some("10.0.0.1"), None).unwrap();
        assert_eq!(id, 3);

        let statements = log.lock().unwrap();
        // visit_time is not fillable, the column default applies
        assert_eq!(
            statements[0].0,
            "INSERT INTO visitors (ip_address, user_agent) VALUES (?, ?)"
        );
        assert_eq!(statements[0].1, vec![json!("10.0.0.1"), json!("Unknown")]);
    }

    #[test]
    fn test_stats_interval_selects_group_format() {
        let conn = RecordingConnection::default();
        let log = conn.log_handle();
        let mut visitor = Visitor::new(Box::new(conn));

        visitor.stats_by_date("week").unwrap();
        visitor.stats_by_date("month").unwrap();
        visitor.stats_by_date("bogus").unwrap();

        let statements = log.lock().unwrap();
        assert_eq!(statements[0].1, vec![json!("%Y-%u")]);
        assert_eq!(statements[1].1, vec![json!("%Y-%m")]);
        assert_eq!(statements[2].1, vec![json!("%Y-%m-%d")]);
    }
}
