//! # Dispatcher Module
//!
//! Resolves a matched route's handler reference and invokes it. A handler is
//! either a plain callable or a `"Controller@method"` name pair looked up in
//! the [`ControllerRegistry`]. Name pairs that do not resolve fail with
//! [`DispatchError::HandlerNotFound`]: that is a programming error
//! (misconfigured routes), never a silent empty response.
//!
//! Following the registry design, name pairs are normally resolved when the
//! route is registered through the front controller so a typo fails at
//! startup, not on the first request that hits the route.

mod core;

pub use core::{
    Body, ControllerRegistry, DispatchError, Dispatcher, Handler, HandlerFn, HandlerRequest,
    HandlerResponse,
};
