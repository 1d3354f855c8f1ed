//! # Persistence Boundary Module
//!
//! Defines the narrow contract the rest of the application has with the
//! relational store: parameterized queries returning rows as name/value
//! maps, statements returning affected-row counts, and a couple of
//! diagnostic probes (server version, table listing) used by the default
//! welcome page.
//!
//! Each request opens its own connection through [`connect`] and drops it
//! before the response completes. There is no pooling, no transactions
//! spanning statements, and no retry on transient failure; a failure
//! surfaces as a [`DbError`] and the caller decides what to render.
//!
//! Errors come in two distinct kinds: [`DbError::Connect`] for an
//! unreachable store or rejected credentials, and [`DbError::Query`] for a
//! statement the store refused to execute.

mod mysql;

pub use mysql::MySqlConnection;

use crate::config::DbConfig;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// A result row: column name to JSON-typed value.
pub type Row = HashMap<String, Value>;

/// Store errors, split by where they occur.
#[derive(Debug, Error)]
pub enum DbError {
    /// Store unreachable or credentials rejected
    #[error("connection failed: {0}")]
    Connect(String),
    /// Statement rejected or failed during execution
    #[error("query failed: {0}")]
    Query(String),
}

/// A live connection to the relational store.
///
/// The trait is object-safe so models hold a `Box<dyn Connection>` and
/// tests can substitute a recording fake.
pub trait Connection: Send {
    /// Run a parameterized SELECT and collect all rows.
    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DbError>;

    /// Run a parameterized statement; returns the affected-row count.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, DbError>;

    /// Identifier generated by the most recent INSERT on this connection.
    fn last_insert_id(&self) -> u64;

    /// Server version string, used by the connectivity probe.
    fn server_version(&mut self) -> Result<String, DbError>;

    /// Names of the tables in the configured database.
    fn tables(&mut self) -> Result<Vec<String>, DbError>;
}

/// Open a fresh connection to the configured store.
pub fn connect(config: &DbConfig) -> Result<Box<dyn Connection>, DbError> {
    Ok(Box::new(MySqlConnection::connect(config)?))
}
