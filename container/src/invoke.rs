//! Invocation: parameter binding plus the three call shapes.

use std::collections::HashMap;
use tracing::trace;

use crate::container::Container;
use crate::error::{Error, Result};
use crate::reflect::{Args, Callable, Signature};
use crate::value::{Obj, Value};

/// What `invoke` can execute.
///
/// A closed set of call shapes; each is resolved explicitly rather than by
/// inspecting the target at runtime.
#[derive(Clone, Debug)]
pub enum CallTarget {
  /// A function value.
  Callable(Callable),
  /// The name of a registered free function.
  Function(String),
  /// A method on an instance, or on a class the container will construct.
  Method { target: MethodTarget, name: String },
  /// A `"Class::method"` reference.
  StaticRef(String),
}

#[derive(Clone, Debug)]
pub enum MethodTarget {
  Instance(Obj),
  Class(String),
}

impl CallTarget {
  /// Convenience for the instance-plus-method shape.
  pub fn method(obj: Obj, name: &str) -> Self {
    CallTarget::Method {
      target: MethodTarget::Instance(obj),
      name: name.to_owned(),
    }
  }

  /// Convenience for the class-name-plus-method shape.
  pub fn class_method(class: &str, name: &str) -> Self {
    CallTarget::Method {
      target: MethodTarget::Class(class.to_owned()),
      name: name.to_owned(),
    }
  }
}

fn split_static_ref(reference: &str) -> Result<(&str, &str)> {
  reference
    .split_once("::")
    .filter(|(class, method)| !class.is_empty() && !method.is_empty())
    .ok_or_else(|| Error::FuncNotFound(reference.to_owned()))
}

impl Container {
  // --- INVOKER ---

  /// Executes any call shape with container-bound arguments.
  pub fn invoke(&self, target: &CallTarget, args: Args) -> Result<Value> {
    match target {
      CallTarget::Callable(callable) => self.invoke_function(callable, args),
      CallTarget::Function(name) => {
        let callable = self
          .functions
          .get(name.as_str())
          .map(|entry| entry.value().clone())
          .ok_or_else(|| Error::FuncNotFound(name.clone()))?;
        self.invoke_function(&callable, args)
      }
      CallTarget::Method { target, name } => self.invoke_method(target, name, args),
      CallTarget::StaticRef(reference) => {
        let (class, method) = split_static_ref(reference)?;
        self.invoke_method(&MethodTarget::Class(class.to_owned()), method, args)
      }
    }
  }

  /// Binds the callable's declared parameters and calls it.
  pub fn invoke_function(&self, callable: &Callable, args: Args) -> Result<Value> {
    let bound = self.bind_params(&callable.sig, args, "{closure}")?;
    (callable.call)(self, bound)
  }

  /// Invokes a method, constructing the receiver when a class name is given
  /// and the method is not static.
  pub fn invoke_method(&self, target: &MethodTarget, method: &str, args: Args) -> Result<Value> {
    let class = match target {
      MethodTarget::Instance(obj) => obj.class().to_owned(),
      MethodTarget::Class(name) => name.clone(),
    };
    let spec = self
      .class_spec(&class)
      .ok_or_else(|| Error::ClassNotFound(class.clone()))?;
    let method_spec = spec
      .method_spec(method)
      .ok_or_else(|| Error::MethodNotFound {
        class: class.clone(),
        method: method.to_owned(),
      })?
      .clone();

    let receiver: Option<Obj> = if method_spec.is_static {
      match target {
        MethodTarget::Instance(obj) => Some(obj.clone()),
        MethodTarget::Class(_) => None,
      }
    } else {
      Some(match target {
        MethodTarget::Instance(obj) => obj.clone(),
        MethodTarget::Class(_) => match self.invoke_class(&class, Args::None)? {
          Value::Obj(obj) => obj,
          other => {
            return Err(Error::Other(format!(
              "constructing `{class}` for a method call produced a non-object value: {other:?}"
            )))
          }
        },
      })
    };

    trace!(class = %class, method = %method, "invoking method");
    let target_name = format!("{class}::{method}");
    let bound = self.bind_params(&method_spec.sig, args, &target_name)?;
    (method_spec.call)(self, receiver.as_ref(), bound)
  }

  /// Builds an instance of a registered class, preferring its static factory
  /// entry point over the constructor.
  ///
  /// The constructor path runs the `resolving` callbacks afterwards; the
  /// factory path does not.
  pub fn invoke_class(&self, class: &str, args: Args) -> Result<Value> {
    let spec = self
      .class_spec(class)
      .ok_or_else(|| Error::ClassNotFound(class.to_owned()))?;

    if let Some(factory) = &spec.factory {
      let bound = self.bind_params(&factory.sig, args, class)?;
      return (factory.call)(self, bound);
    }

    let object = match &spec.ctor {
      Some((sig, ctor)) => {
        let bound = self.bind_params(sig, args, class)?;
        ctor(self, bound)?
      }
      None => return Err(Error::ClassNotFound(class.to_owned())),
    };

    let value = Value::Obj(object);
    self.invoke_after(class, &value);
    Ok(value)
  }

  // --- PARAMETER BINDER ---

  /// Produces the final ordered argument list for a signature.
  ///
  /// Per parameter, in order: a caller-supplied value wins; a declared class
  /// falls back to container resolution; then the default. A parameter with
  /// none of the three fails the whole invocation. A trailing variadic
  /// parameter consumes every remaining positional value.
  pub(crate) fn bind_params(&self, sig: &Signature, args: Args, target: &str) -> Result<Vec<Value>> {
    let (mut positional, mut named): (Vec<Value>, HashMap<String, Value>) = match args {
      Args::None => (Vec::new(), HashMap::new()),
      Args::Positional(values) => (values, HashMap::new()),
      Args::Named(map) => (Vec::new(), map),
    };

    let mut out = Vec::with_capacity(sig.params.len());
    let mut cursor = 0usize;

    for param in &sig.params {
      if param.variadic {
        out.extend(positional.drain(cursor..));
        break;
      }

      let supplied = if cursor < positional.len() {
        let value = positional[cursor].clone();
        cursor += 1;
        Some(value)
      } else {
        named.remove(&param.name)
      };

      let value = match supplied {
        Some(value) => value,
        None => match (&param.class, &param.default) {
          (Some(class), _) => self.make(class, Args::None, false)?,
          (None, Some(default)) => default.clone(),
          (None, None) => {
            return Err(Error::BindParam {
              target: target.to_owned(),
              param: param.name.clone(),
            })
          }
        },
      };
      out.push(value);
    }

    Ok(out)
  }
}
