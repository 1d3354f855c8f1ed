//! # HTTP Server Module
//!
//! Coroutine HTTP front end built on `may_minihttp`. Parses the raw request
//! into a [`ParsedRequest`], hands it to the front controller, and writes
//! the resulting [`crate::dispatcher::HandlerResponse`] back to the wire.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::ParsedRequest;
pub use service::AppService;
