//! Internal resolution bookkeeping.

use std::cell::RefCell;
use std::collections::HashSet;

thread_local! {
  // The set of names currently being resolved on this thread. This is the
  // key to catching cyclic bindings before they recurse without bound.
  static RESOLVING_STACK: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// An RAII guard to detect and prevent circular dependencies.
///
/// When created, it adds a name to the thread-local resolution stack. If the
/// name is already present, the resolution chain has looped back on itself,
/// and it panics. When the guard is dropped, the name is removed again.
pub(crate) struct ResolutionGuard {
  name: String,
}

impl ResolutionGuard {
  pub(crate) fn new(name: &str) -> Self {
    RESOLVING_STACK.with(|stack| {
      // `insert` returns `false` if the value was already present.
      if !stack.borrow_mut().insert(name.to_owned()) {
        panic!("Circular dependency detected while resolving service: {name}");
      }
    });
    Self {
      name: name.to_owned(),
    }
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&self.name);
    });
  }
}
