//! # Keel App
//!
//! The application collaborator on top of the container and event kernel:
//! the service register/boot lifecycle, ordered initializers, and the
//! well-known lifecycle events.

mod app;

pub use app::{App, ServiceRef};

/// Canonical names of the well-known lifecycle events, reachable through the
/// short aliases seeded by [`App::new`].
pub mod events {
  pub const APP_INIT: &str = "app.init";
  pub const HTTP_RUN: &str = "http.run";
  pub const HTTP_END: &str = "http.end";
  pub const ROUTE_LOADED: &str = "route.loaded";
  pub const LOG_WRITE: &str = "log.write";
}
