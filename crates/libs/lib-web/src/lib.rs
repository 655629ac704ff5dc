//! # Web Library
//!
//! HTTP handlers, middleware, services, and server startup.

pub mod handlers;
pub mod middleware;
pub mod services;
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;

pub use server::{create_router, start_server, AppState, ServerConfig};
