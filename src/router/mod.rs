//! # Router Module
//!
//! Ordered route table plus the regex-based matcher.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Holding (method, pattern, handler) registrations in order
//! - Matching incoming requests against compiled patterns
//! - Extracting named `{placeholder}` parameters from the path
//!
//! ## Architecture
//!
//! Two phases:
//!
//! 1. **Compilation**: at registration, a pattern like `/users/{id}` is
//!    compiled into an anchored, case-insensitive regex whose placeholders
//!    become capturing groups matching any run of non-slash characters.
//!
//! 2. **Matching**: per request, the table is scanned linearly in
//!    registration order; the first entry whose method and pattern both
//!    match wins. There is no specificity ranking or conflict detection;
//!    duplicate and shadowing registrations are permitted silently.
//!
//! Registration happens once at startup and the table is read-only
//! afterwards, so matching requires no locking.

mod core;

pub use core::{Route, RouteMatch, Router};
