//! The `Container` composition root: bindings, aliases and the instance cache.

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

use crate::core::ResolutionGuard;
use crate::error::{Error, Result};
use crate::reflect::{Args, Callable, ClassSpec};
use crate::value::{Obj, Value};

/// How a logical name produces its value.
#[derive(Clone)]
pub enum Target {
  /// A factory invoked through the binder; its result is cached like any
  /// other resolution.
  Factory(Callable),
  /// An already-constructed value, stored straight into the instance cache.
  Instance(Value),
  /// A class name, or another logical name (an alias hop).
  Class(String),
}

impl Target {
  /// A factory with no declared parameters.
  pub fn factory(
    f: impl Fn(&Container, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
  ) -> Self {
    Target::Factory(Callable::simple(f))
  }
}

impl From<Callable> for Target {
  fn from(callable: Callable) -> Self {
    Target::Factory(callable)
  }
}

impl From<&str> for Target {
  fn from(class: &str) -> Self {
    Target::Class(class.to_owned())
  }
}

impl From<String> for Target {
  fn from(class: String) -> Self {
    Target::Class(class)
  }
}

impl From<Value> for Target {
  fn from(value: Value) -> Self {
    Target::Instance(value)
  }
}

impl From<Obj> for Target {
  fn from(obj: Obj) -> Self {
    Target::Instance(Value::Obj(obj))
  }
}

#[derive(Clone)]
pub(crate) enum Binding {
  Factory(Callable),
  Concrete(String),
}

pub(crate) type ResolvingFn = Arc<dyn Fn(&Container, &Value) + Send + Sync>;

/// The dynamic, name-keyed service container.
///
/// Thread-safe; registration and resolution may happen at any point during
/// the process lifetime. Names resolve through the alias chain to either a
/// factory binding or a registered class, and resolved values are cached as
/// singletons unless a fresh instance is requested.
#[derive(Default)]
pub struct Container {
  pub(crate) bind: DashMap<String, Binding>,
  pub(crate) instances: DashMap<String, Value>,
  pub(crate) classes: DashMap<String, Arc<ClassSpec>>,
  pub(crate) functions: DashMap<String, Callable>,
  pub(crate) callbacks: DashMap<String, Vec<ResolvingFn>>,
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- REGISTRY ---

  /// Registers the startup-built description of a constructible class.
  pub fn register_class(&self, spec: ClassSpec) {
    self.classes.insert(spec.name().to_owned(), Arc::new(spec));
  }

  /// Registers a named free function for name-based invocation.
  pub fn register_function(&self, name: &str, callable: Callable) {
    self.functions.insert(name.to_owned(), callable);
  }

  /// Looks up a registered class description.
  pub fn class_spec(&self, name: &str) -> Option<Arc<ClassSpec>> {
    self.classes.get(name).map(|entry| entry.value().clone())
  }

  // --- BINDING ---

  /// Binds a logical name to a factory, an instance, a class name or an
  /// alias. Last write wins; bindings are never implicitly deleted.
  pub fn bind(&self, name: &str, target: impl Into<Target>) {
    match target.into() {
      Target::Factory(callable) => {
        self.bind.insert(name.to_owned(), Binding::Factory(callable));
      }
      Target::Instance(value) => {
        self.instance(name, value);
      }
      Target::Class(class) => {
        let resolved = self.get_alias(name);
        self.bind.insert(resolved, Binding::Concrete(class));
      }
    }
  }

  /// Binds every pair of the mapping, in order.
  pub fn bind_many(&self, pairs: impl IntoIterator<Item = (String, Target)>) {
    for (name, target) in pairs {
      self.bind(&name, target);
    }
  }

  /// Follows alias hops until a non-alias terminal. Unbound names resolve to
  /// themselves.
  ///
  /// # Panics
  ///
  /// Panics on a cyclic alias chain.
  pub fn get_alias(&self, name: &str) -> String {
    let mut seen: HashSet<String> = HashSet::new();
    let mut current = name.to_owned();
    loop {
      let next = match self.bind.get(&current) {
        Some(entry) => match entry.value() {
          Binding::Concrete(next) => next.clone(),
          Binding::Factory(_) => return current,
        },
        None => return current,
      };
      if !seen.insert(current) {
        panic!("Circular alias detected while resolving name: {name}");
      }
      current = next;
    }
  }

  // --- INSTANCE CACHE ---

  /// Force-registers a concrete value under the alias-resolved name,
  /// overwriting any prior cache entry.
  pub fn instance(&self, name: &str, value: impl Into<Value>) {
    let resolved = self.get_alias(name);
    self.instances.insert(resolved, value.into());
  }

  /// True iff the raw name is present in the bindings or the instance cache.
  pub fn bound(&self, name: &str) -> bool {
    self.bind.contains_key(name) || self.instances.contains_key(name)
  }

  pub fn has(&self, name: &str) -> bool {
    self.bound(name)
  }

  /// True iff an instance is already cached under the alias-resolved name.
  pub fn exists(&self, name: &str) -> bool {
    let resolved = self.get_alias(name);
    self.instances.contains_key(&resolved)
  }

  /// Drops the cached instance for the alias-resolved name, if any. The
  /// binding itself stays.
  pub fn delete(&self, name: &str) {
    let resolved = self.get_alias(name);
    self.instances.remove(&resolved);
  }

  // --- RESOLUTION ---

  /// Resolves a name to its instance, constructing and caching on first use.
  ///
  /// `new_instance` bypasses the cache in both directions: a fresh value is
  /// built every time and the cached singleton, if any, is left untouched.
  pub fn make(&self, name: &str, args: Args, new_instance: bool) -> Result<Value> {
    let resolved = self.get_alias(name);

    if !new_instance {
      if let Some(hit) = self.instances.get(&resolved) {
        return Ok(hit.value().clone());
      }
    }

    let _guard = ResolutionGuard::new(&resolved);
    trace!(name = %resolved, new_instance, "constructing service");

    // Clone the binding out so no map guard is held across user code.
    let binding = self.bind.get(&resolved).map(|entry| entry.value().clone());
    let value = match binding {
      Some(Binding::Factory(callable)) => self.invoke_function(&callable, args)?,
      _ => self.invoke_class(&resolved, args)?,
    };

    if !new_instance {
      self.instances.insert(resolved, value.clone());
    }

    Ok(value)
  }

  /// `make` restricted to names the container already knows about; never
  /// falls back to interpreting the name as a raw class.
  pub fn get(&self, name: &str) -> Result<Value> {
    if self.has(name) {
      return self.make(name, Args::None, false);
    }
    Err(Error::ClassNotFound(name.to_owned()))
  }

  // --- POST-CONSTRUCT CALLBACKS ---

  /// Registers a callback run after constructor-path resolution of `name`;
  /// `"*"` applies to every class.
  pub fn resolving(
    &self,
    name: &str,
    callback: impl Fn(&Container, &Value) + Send + Sync + 'static,
  ) {
    let key = if name == "*" {
      name.to_owned()
    } else {
      self.get_alias(name)
    };
    self.callbacks.entry(key).or_default().push(Arc::new(callback));
  }

  pub(crate) fn invoke_after(&self, class: &str, value: &Value) {
    for key in ["*", class] {
      // Clone the list out; a callback may itself register callbacks.
      let callbacks: Vec<ResolvingFn> = match self.callbacks.get(key) {
        Some(entry) => entry.value().clone(),
        None => continue,
      };
      for callback in callbacks {
        callback(self, value);
      }
    }
  }
}
