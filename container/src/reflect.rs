//! The startup-built registration model that stands in for runtime reflection.
//!
//! Nothing here introspects anything at call time. Classes, methods and free
//! functions describe their parameter lists when they are registered, and the
//! container binds call arguments against those declared signatures.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::container::{Container, Target};
use crate::error::{Error, Result};
use crate::value::{Obj, Value};

/// One declared parameter of a callable.
#[derive(Clone, Debug)]
pub struct ParamSpec {
  pub(crate) name: String,
  pub(crate) class: Option<String>,
  pub(crate) default: Option<Value>,
  pub(crate) variadic: bool,
}

impl ParamSpec {
  pub fn name(&self) -> &str {
    &self.name
  }
}

/// An ordered parameter list.
#[derive(Clone, Debug, Default)]
pub struct Signature {
  pub(crate) params: Vec<ParamSpec>,
}

impl Signature {
  pub fn new() -> Self {
    Self::default()
  }

  /// A parameter that must be satisfied by a caller value.
  pub fn required(mut self, name: &str) -> Self {
    self.params.push(ParamSpec {
      name: name.to_owned(),
      class: None,
      default: None,
      variadic: false,
    });
    self
  }

  /// A parameter resolved through the container by its declared class when
  /// the caller supplies no value.
  pub fn typed(mut self, name: &str, class: &str) -> Self {
    self.params.push(ParamSpec {
      name: name.to_owned(),
      class: Some(class.to_owned()),
      default: None,
      variadic: false,
    });
    self
  }

  /// A parameter falling back to a default value.
  pub fn defaulted(mut self, name: &str, default: impl Into<Value>) -> Self {
    self.params.push(ParamSpec {
      name: name.to_owned(),
      class: None,
      default: Some(default.into()),
      variadic: false,
    });
    self
  }

  /// A trailing parameter consuming all remaining positional values.
  pub fn variadic(mut self, name: &str) -> Self {
    self.params.push(ParamSpec {
      name: name.to_owned(),
      class: None,
      default: None,
      variadic: true,
    });
    self
  }

  pub fn params(&self) -> &[ParamSpec] {
    &self.params
  }
}

/// Caller-supplied values for an invocation: nothing, positional by index,
/// or named by parameter name.
#[derive(Clone, Debug, Default)]
pub enum Args {
  #[default]
  None,
  Positional(Vec<Value>),
  Named(HashMap<String, Value>),
}

impl Args {
  pub fn positional<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
    Args::Positional(values.into_iter().map(Into::into).collect())
  }

  pub fn named<V: Into<Value>>(pairs: impl IntoIterator<Item = (&'static str, V)>) -> Self {
    Args::Named(
      pairs
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value.into()))
        .collect(),
    )
  }
}

type CallFn = Arc<dyn Fn(&Container, Vec<Value>) -> Result<Value> + Send + Sync>;

/// A function value with an explicit signature.
///
/// The signature is what the binder works against; the body receives the
/// final ordered argument list.
#[derive(Clone)]
pub struct Callable {
  pub(crate) sig: Signature,
  pub(crate) call: CallFn,
}

impl Callable {
  pub fn new(
    sig: Signature,
    f: impl Fn(&Container, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
  ) -> Self {
    Self {
      sig,
      call: Arc::new(f),
    }
  }

  /// A callable declaring no parameters.
  pub fn simple(f: impl Fn(&Container, Vec<Value>) -> Result<Value> + Send + Sync + 'static) -> Self {
    Self::new(Signature::new(), f)
  }

  /// Identity comparison, used for listener deduplication.
  pub fn ptr_eq(&self, other: &Callable) -> bool {
    Arc::ptr_eq(&self.call, &other.call)
  }
}

impl fmt::Debug for Callable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Callable({} params)", self.sig.params.len())
  }
}

type MethodFn = Arc<dyn Fn(&Container, Option<&Obj>, Vec<Value>) -> Result<Value> + Send + Sync>;

/// One registered method of a class.
#[derive(Clone)]
pub struct MethodSpec {
  pub(crate) name: String,
  pub(crate) sig: Signature,
  pub(crate) is_static: bool,
  pub(crate) call: MethodFn,
}

impl MethodSpec {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_static(&self) -> bool {
    self.is_static
  }
}

impl fmt::Debug for MethodSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "MethodSpec({})", self.name)
  }
}

type CtorFn = Arc<dyn Fn(&Container, Vec<Value>) -> Result<Obj> + Send + Sync>;
type PrefixFn = Arc<dyn Fn(&Obj) -> String + Send + Sync>;

/// The registered description of a constructible class: how to build it and
/// what can be called on it.
///
/// Method order is declaration order; observer auto-registration walks it
/// front to back.
pub struct ClassSpec {
  pub(crate) name: String,
  pub(crate) factory: Option<Callable>,
  pub(crate) ctor: Option<(Signature, CtorFn)>,
  pub(crate) methods: Vec<MethodSpec>,
  pub(crate) event_prefix: Option<PrefixFn>,
  pub(crate) bind: Vec<(String, Target)>,
}

impl ClassSpec {
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_owned(),
      factory: None,
      ctor: None,
      methods: Vec::new(),
      event_prefix: None,
      bind: Vec::new(),
    }
  }

  /// A static factory entry point, preferred over the constructor during
  /// `invoke_class`. Instances built this way skip the post-construct
  /// callbacks.
  pub fn factory(mut self, callable: Callable) -> Self {
    self.factory = Some(callable);
    self
  }

  pub fn constructor(
    mut self,
    sig: Signature,
    ctor: impl Fn(&Container, Vec<Value>) -> Result<Obj> + Send + Sync + 'static,
  ) -> Self {
    self.ctor = Some((sig, Arc::new(ctor)));
    self
  }

  /// An instance method. The body receives the receiver object and the bound
  /// argument list.
  pub fn method(
    mut self,
    name: &str,
    sig: Signature,
    f: impl Fn(&Container, &Obj, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
  ) -> Self {
    let method_name = name.to_owned();
    self.methods.push(MethodSpec {
      name: name.to_owned(),
      sig,
      is_static: false,
      call: Arc::new(move |cx, obj, args| match obj {
        Some(obj) => f(cx, obj, args),
        None => Err(Error::Other(format!(
          "method `{method_name}` needs an instance"
        ))),
      }),
    });
    self
  }

  /// A static method; invocable without a receiver.
  pub fn static_method(
    mut self,
    name: &str,
    sig: Signature,
    f: impl Fn(&Container, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
  ) -> Self {
    self.methods.push(MethodSpec {
      name: name.to_owned(),
      sig,
      is_static: true,
      call: Arc::new(move |cx, _obj, args| f(cx, args)),
    });
    self
  }

  /// Declares the event-prefix capability: observers of this class get their
  /// `on…` methods registered under `prefix + event`.
  pub fn event_prefix(mut self, f: impl Fn(&Obj) -> String + Send + Sync + 'static) -> Self {
    self.event_prefix = Some(Arc::new(f));
    self
  }

  /// A binding merged into the container when a service of this class goes
  /// through the register lifecycle.
  pub fn binding(mut self, name: &str, target: impl Into<Target>) -> Self {
    self.bind.push((name.to_owned(), target.into()));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn methods(&self) -> &[MethodSpec] {
    &self.methods
  }

  pub fn method_spec(&self, name: &str) -> Option<&MethodSpec> {
    self.methods.iter().find(|m| m.name == name)
  }

  pub fn bind_table(&self) -> &[(String, Target)] {
    &self.bind
  }

  /// The declared event prefix for an instance, if the class has the
  /// capability.
  pub fn prefix_for(&self, obj: &Obj) -> Option<String> {
    self.event_prefix.as_ref().map(|f| f(obj))
  }
}

impl fmt::Debug for ClassSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ClassSpec({})", self.name)
  }
}
