//! MySQL implementation of the persistence boundary.
//!
//! Wraps a single synchronous [`mysql::Conn`]. Parameterized statements go
//! through the prepared-statement path (`exec_*`); the diagnostic probes use
//! the text protocol since they carry no parameters.

use super::{Connection, DbError, Row};
use crate::config::DbConfig;
use mysql::prelude::Queryable;
use mysql::{Conn, Opts, OptsBuilder, Params, Value as SqlValue};
use serde_json::Value;
use tracing::debug;

/// One live connection to a MySQL server.
pub struct MySqlConnection {
    conn: Conn,
}

impl MySqlConnection {
    /// Connect with the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connect`] if the server is unreachable or the
    /// credentials are rejected.
    pub fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let opts: Opts = OptsBuilder::new()
            .ip_or_hostname(Some(config.host.clone()))
            .user(Some(config.user.clone()))
            .pass(Some(config.password.clone()))
            .db_name(Some(config.database.clone()))
            .into();

        debug!(host = %config.host, database = %config.database, "Opening MySQL connection");

        let conn = Conn::new(opts).map_err(|e| DbError::Connect(e.to_string()))?;
        Ok(Self { conn })
    }
}

impl Connection for MySqlConnection {
    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DbError> {
        let rows: Vec<mysql::Row> = if params.is_empty() {
            self.conn.query(sql)
        } else {
            self.conn
                .exec(sql, Params::Positional(params.iter().map(json_to_sql).collect()))
        }
        .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(row_to_map).collect())
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, DbError> {
        if params.is_empty() {
            self.conn.query_drop(sql)
        } else {
            self.conn
                .exec_drop(sql, Params::Positional(params.iter().map(json_to_sql).collect()))
        }
        .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.conn.affected_rows())
    }

    fn last_insert_id(&self) -> u64 {
        self.conn.last_insert_id()
    }

    fn server_version(&mut self) -> Result<String, DbError> {
        let version: Option<String> = self
            .conn
            .query_first("SELECT VERSION()")
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(version.unwrap_or_default())
    }

    fn tables(&mut self) -> Result<Vec<String>, DbError> {
        self.conn
            .query("SHOW TABLES")
            .map_err(|e| DbError::Query(e.to_string()))
    }
}

fn row_to_map(mut row: mysql::Row) -> Row {
    let columns = row.columns();
    let mut out = Row::with_capacity(columns.len());
    for (i, col) in columns.iter().enumerate() {
        let value = row.take::<SqlValue, _>(i).unwrap_or(SqlValue::NULL);
        out.insert(col.name_str().into_owned(), sql_to_json(value));
    }
    out
}

fn sql_to_json(value: SqlValue) -> Value {
    match value {
        SqlValue::NULL => Value::Null,
        SqlValue::Bytes(b) => Value::String(String::from_utf8_lossy(&b).into_owned()),
        SqlValue::Int(i) => Value::from(i),
        SqlValue::UInt(u) => Value::from(u),
        SqlValue::Float(f) => Value::from(f64::from(f)),
        SqlValue::Double(d) => Value::from(d),
        SqlValue::Date(y, mo, d, h, mi, s, _) => {
            Value::String(format!("{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02}"))
        }
        SqlValue::Time(neg, days, h, m, s, _) => {
            let sign = if neg { "-" } else { "" };
            let hours = u32::from(h) + days * 24;
            Value::String(format!("{sign}{hours:02}:{m:02}:{s:02}"))
        }
    }
}

fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::NULL,
        Value::Bool(b) => SqlValue::Int(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Int(i)
            } else if let Some(u) = n.as_u64() {
                SqlValue::UInt(u)
            } else {
                SqlValue::Double(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => SqlValue::Bytes(s.clone().into_bytes()),
        other => SqlValue::Bytes(other.to_string().into_bytes()),
    }
}
