//! Listener descriptors and their equality rules.

use keel_container::{Callable, Obj};

/// What to call when an event fires.
///
/// A closed set of shapes; dispatch resolves each variant explicitly.
#[derive(Clone, Debug)]
pub enum ListenerTarget {
  /// A function value, invoked directly.
  Callable(Callable),
  /// A method on an already-built instance.
  Method(Obj, String),
  /// A `"Class::method"` reference.
  StaticRef(String),
  /// A handler class: materialized through the container, its `handle`
  /// method invoked.
  Class(String),
}

impl ListenerTarget {
  pub fn method(obj: Obj, name: &str) -> Self {
    ListenerTarget::Method(obj, name.to_owned())
  }
}

/// Trigger-time deduplication compares by identity for values and instances,
/// by name for the string shapes.
impl PartialEq for ListenerTarget {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Callable(a), Self::Callable(b)) => a.ptr_eq(b),
      (Self::Method(a, am), Self::Method(b, bm)) => a.ptr_eq(b) && am == bm,
      (Self::StaticRef(a), Self::StaticRef(b)) => a == b,
      (Self::Class(a), Self::Class(b)) => a == b,
      _ => false,
    }
  }
}

impl From<Callable> for ListenerTarget {
  fn from(callable: Callable) -> Self {
    ListenerTarget::Callable(callable)
  }
}

// A string listener is a static reference when it carries `::`, otherwise a
// handler class name.
impl From<&str> for ListenerTarget {
  fn from(s: &str) -> Self {
    if s.contains("::") {
      ListenerTarget::StaticRef(s.to_owned())
    } else {
      ListenerTarget::Class(s.to_owned())
    }
  }
}

impl From<String> for ListenerTarget {
  fn from(s: String) -> Self {
    ListenerTarget::from(s.as_str())
  }
}

/// A subscriber or observer reference: an instance, or a class name the
/// container materializes on demand.
#[derive(Clone, Debug)]
pub enum SubscriberRef {
  Class(String),
  Instance(Obj),
}

impl From<&str> for SubscriberRef {
  fn from(class: &str) -> Self {
    SubscriberRef::Class(class.to_owned())
  }
}

impl From<String> for SubscriberRef {
  fn from(class: String) -> Self {
    SubscriberRef::Class(class)
  }
}

impl From<Obj> for SubscriberRef {
  fn from(obj: Obj) -> Self {
    SubscriberRef::Instance(obj)
  }
}
