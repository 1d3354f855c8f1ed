//! # Models Module
//!
//! A thin generic CRUD layer over one relational table. [`Model`] knows its
//! table name, primary-key field and mass-assignable fields, and builds
//! parameterized SQL against the [`crate::db::Connection`] it owns. There
//! are no transactions, no relations and no query builder beyond a simple
//! equality filter; concrete models wrap a `Model` and add their own
//! queries via [`Model::raw`].

mod visitor;

pub use visitor::Visitor;

use crate::db::{Connection, DbError, Row};
use serde_json::Value;

/// Generic CRUD over a single table.
pub struct Model {
    table: String,
    primary_key: String,
    fillable: Vec<String>,
    conn: Box<dyn Connection>,
}

impl Model {
    /// Create a model over the given table with primary key `id` and no
    /// mass-assignment restrictions.
    #[must_use]
    pub fn new(conn: Box<dyn Connection>, table: &str) -> Self {
        Model {
            table: table.to_string(),
            primary_key: "id".to_string(),
            fillable: Vec::new(),
            conn,
        }
    }

    /// Override the primary-key field name.
    #[must_use]
    pub fn primary_key(mut self, field: &str) -> Self {
        self.primary_key = field.to_string();
        self
    }

    /// Restrict mass assignment to the given fields. With an empty list
    /// every field passes through.
    #[must_use]
    pub fn fillable(mut self, fields: &[&str]) -> Self {
        self.fillable = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Find a record by primary key.
    pub fn find(&mut self, id: &Value) -> Result<Option<Row>, DbError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ? LIMIT 1",
            self.table, self.primary_key
        );
        let rows = self.conn.query(&sql, std::slice::from_ref(id))?;
        Ok(rows.into_iter().next())
    }

    /// All records in the table.
    pub fn all(&mut self) -> Result<Vec<Row>, DbError> {
        let sql = format!("SELECT * FROM {}", self.table);
        self.conn.query(&sql, &[])
    }

    /// Insert a record; returns the generated identifier.
    ///
    /// Fields outside the fillable list are silently dropped.
    pub fn create(&mut self, data: &[(&str, Value)]) -> Result<u64, DbError> {
        let data = self.filter_data(data);
        let fields: Vec<&str> = data.iter().map(|(f, _)| *f).collect();
        let placeholders = vec!["?"; fields.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            fields.join(", "),
            placeholders
        );
        let params: Vec<Value> = data.into_iter().map(|(_, v)| v).collect();
        self.conn.execute(&sql, &params)?;
        Ok(self.conn.last_insert_id())
    }

    /// Update a record by primary key; returns the affected-row count.
    pub fn update(&mut self, id: &Value, data: &[(&str, Value)]) -> Result<u64, DbError> {
        let data = self.filter_data(data);
        let set_clause: Vec<String> = data.iter().map(|(f, _)| format!("{f} = ?")).collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            self.table,
            set_clause.join(", "),
            self.primary_key
        );
        let mut params: Vec<Value> = data.into_iter().map(|(_, v)| v).collect();
        params.push(id.clone());
        self.conn.execute(&sql, &params)
    }

    /// Delete a record by primary key; returns the affected-row count.
    pub fn delete(&mut self, id: &Value) -> Result<u64, DbError> {
        let sql = format!("DELETE FROM {} WHERE {} = ?", self.table, self.primary_key);
        self.conn.execute(&sql, std::slice::from_ref(id))
    }

    /// Records where the field equals the value.
    pub fn where_eq(&mut self, field: &str, value: &Value) -> Result<Vec<Row>, DbError> {
        let sql = format!("SELECT * FROM {} WHERE {} = ?", self.table, field);
        self.conn.query(&sql, std::slice::from_ref(value))
    }

    /// Run a custom parameterized query.
    pub fn raw(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DbError> {
        self.conn.query(sql, params)
    }

    /// Run a custom parameterized statement.
    pub fn raw_execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, DbError> {
        self.conn.execute(sql, params)
    }

    fn filter_data<'a>(&self, data: &[(&'a str, Value)]) -> Vec<(&'a str, Value)> {
        if self.fillable.is_empty() {
            return data.to_vec();
        }
        data.iter()
            .filter(|(f, _)| self.fillable.iter().any(|allowed| allowed == f))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::db::{Connection, DbError, Row};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    /// Records every statement and hands back canned rows, so model tests
    /// can assert on the generated SQL without a live server.
    #[derive(Default)]
    pub struct RecordingConnection {
        pub statements: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
        pub rows: Vec<Row>,
        pub affected: u64,
        pub insert_id: u64,
    }

    impl RecordingConnection {
        pub fn with_rows(rows: Vec<Row>) -> Self {
            RecordingConnection {
                rows,
                ..Default::default()
            }
        }

        pub fn log_handle(&self) -> Arc<Mutex<Vec<(String, Vec<Value>)>>> {
            self.statements.clone()
        }
    }

    impl Connection for RecordingConnection {
        fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DbError> {
            self.statements
                .lock()
                .unwrap()
                .push((sql.to_string(), params.to_vec()));
            Ok(self.rows.clone())
        }

        fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, DbError> {
            self.statements
                .lock()
                .unwrap()
                .push((sql.to_string(), params.to_vec()));
            Ok(self.affected)
        }

        fn last_insert_id(&self) -> u64 {
            self.insert_id
        }

        fn server_version(&mut self) -> Result<String, DbError> {
            Ok("8.0-fake".to_string())
        }

        fn tables(&mut self) -> Result<Vec<String>, DbError> {
            Ok(vec!["visitors".to_string()])
        }
    }
}
