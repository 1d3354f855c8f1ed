//! # Kickstart
//!
//! **Kickstart** is a minimal MVC web-application starter kit: a front
//! controller, a regex-based router, a dispatcher resolving
//! `"Controller@method"` references through an explicit registry, a thin
//! generic CRUD model layer, and embedded view templates, served over the
//! `may` coroutine runtime.
//!
//! ## Architecture
//!
//! - **[`config`]** - Environment-variable configuration snapshot
//! - **[`router`]** - Ordered route table and regex path matching
//! - **[`dispatcher`]** - Handler resolution and invocation
//! - **[`app`]** - The front controller tying it all together
//! - **[`controllers`]** - Base controller helpers and the demo `Home` controller
//! - **[`models`]** - Generic single-table CRUD and the `Visitor` model
//! - **[`db`]** - Persistence boundary with a MySQL implementation
//! - **[`views`]** - Embedded minijinja templates
//! - **[`session`]** - File-backed sessions, flash values and CSRF tokens
//! - **[`server`]** - HTTP front end on `may_minihttp`
//! - **[`helpers`]** - URL, escaping and date helpers
//! - **[`logging`]** - Daily-rolling `tracing` sink
//!
//! ## Request flow
//!
//! One request passes through: bootstrap (done once at startup) → route
//! matching → dispatch → response; unmatched requests fall back to a
//! diagnostic welcome page with a database connectivity probe instead of a
//! 404, a deliberate starter-kit behavior.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kickstart::{app::App, config::AppConfig};
//! use kickstart::server::{AppService, HttpServer};
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut app = App::new(AppConfig::from_env())?;
//! app.get("/", "Home@index")?;
//! app.get("/about", "Home@about")?;
//!
//! let handle = HttpServer(AppService::new(Arc::new(app))).start("0.0.0.0:8080")?;
//! handle.join().ok();
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod controllers;
pub mod db;
pub mod dispatcher;
pub mod helpers;
pub mod logging;
pub mod models;
pub mod router;
pub mod server;
pub mod session;
pub mod views;

pub use app::App;
pub use config::AppConfig;
pub use dispatcher::{DispatchError, Dispatcher, Handler, HandlerRequest, HandlerResponse};
pub use router::{Route, RouteMatch, Router};
