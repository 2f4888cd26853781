//! Error taxonomy for resolution and invocation failures.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while resolving names or invoking callables.
///
/// All of these are fatal to the current operation: the container never
/// retries or substitutes, and a failed construction leaves no partial
/// instance in the cache.
#[derive(Debug, Error)]
pub enum Error {
  /// The logical name does not resolve to a registered, constructible class.
  #[error("class not exists: {0}")]
  ClassNotFound(String),

  /// No function is registered under this name.
  #[error("function not exists: {0}")]
  FuncNotFound(String),

  /// The class exists but has no method of this name.
  #[error("method not exists: {class}::{method}")]
  MethodNotFound { class: String, method: String },

  /// A parameter could not be satisfied by a caller value, container
  /// resolution of its declared class, or a default.
  #[error("unable to bind parameter `{param}` when invoking `{target}`")]
  BindParam { target: String, param: String },

  /// Failure raised inside a user-supplied factory, constructor, method or
  /// listener body.
  #[error("{0}")]
  Other(String),
}
