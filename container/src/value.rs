//! The dynamic value model moved through the container and the event kernel.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A reference-counted object payload tagged with its logical class name.
///
/// Cloning an `Obj` clones the handle, not the payload: clones compare equal
/// under [`Obj::ptr_eq`] and share the underlying value. This is what makes
/// the singleton property observable — repeated cache hits hand out handles
/// to one payload.
#[derive(Clone)]
pub struct Obj {
  class: Arc<str>,
  inner: Arc<dyn Any + Send + Sync>,
}

impl Obj {
  pub fn new<T: Any + Send + Sync>(class: &str, value: T) -> Self {
    Self {
      class: Arc::from(class),
      inner: Arc::new(value),
    }
  }

  /// Wraps an already-shared payload without another allocation.
  pub fn from_arc<T: Any + Send + Sync>(class: &str, value: Arc<T>) -> Self {
    Self {
      class: Arc::from(class),
      inner: value,
    }
  }

  /// The logical class name this payload was registered under.
  pub fn class(&self) -> &str {
    &self.class
  }

  /// Downcasts the payload to its concrete type.
  pub fn get<T: Any>(&self) -> Option<&T> {
    self.inner.downcast_ref::<T>()
  }

  /// Identity comparison: true iff both handles share one payload.
  pub fn ptr_eq(&self, other: &Obj) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl fmt::Debug for Obj {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Obj({})", self.class)
  }
}

impl PartialEq for Obj {
  fn eq(&self, other: &Self) -> bool {
    self.ptr_eq(other)
  }
}

/// A value the kernel can store, pass to callables and return from listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
  Obj(Obj),
}

impl Value {
  /// Shorthand for wrapping a payload into `Value::Obj`.
  pub fn obj<T: Any + Send + Sync>(class: &str, value: T) -> Self {
    Value::Obj(Obj::new(class, value))
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      Value::Int(i) => Some(*i),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Str(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_obj(&self) -> Option<&Obj> {
    match self {
      Value::Obj(o) => Some(o),
      _ => None,
    }
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Bool(value)
  }
}

impl From<i64> for Value {
  fn from(value: i64) -> Self {
    Value::Int(value)
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Float(value)
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::Str(value.to_owned())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::Str(value)
  }
}

impl From<Obj> for Value {
  fn from(value: Obj) -> Self {
    Value::Obj(value)
  }
}
