//! # Keel Container
//!
//! A dynamic, name-keyed service container: bindings, alias indirection,
//! singleton caching and signature-driven auto-wiring of constructors,
//! methods and free functions.
//!
//! Unlike type-keyed containers, every service here lives under a logical
//! string name. A binding maps a name to a factory, an already-built value,
//! a registered class, or another name (an alias). Classes describe their
//! constructors and methods up front through [`ClassSpec`] — there is no
//! runtime introspection — and the container binds call arguments against
//! those declared signatures: caller values first, then container resolution
//! by declared class, then defaults.
//!
//! ## Core Concepts
//!
//! - **Container**: the central registry; binding, resolution and invocation.
//! - **Binding**: how a name produces its value ([`Target`]).
//! - **Alias**: a binding whose value is another name; chains are followed to
//!   their terminal.
//! - **Resolution**: [`Container::make`] turns a name into a cached singleton
//!   unless a fresh instance is requested.
//! - **Invocation**: [`Container::invoke`] runs any [`CallTarget`] with
//!   arguments assembled by the parameter binder.
//!
//! ## Quick Start
//!
//! ```
//! use keel_container::{args, ClassSpec, Container, Obj, Signature};
//!
//! struct Logger {
//!   level: i64,
//! }
//!
//! let container = Container::new();
//! container.register_class(ClassSpec::new("Logger").constructor(
//!   Signature::new().defaulted("level", 1_i64),
//!   |_cx, args| {
//!     let level = args[0].as_int().unwrap_or(1);
//!     Ok(Obj::new("Logger", Logger { level }))
//!   },
//! ));
//!
//! // Alias and resolve; the second make returns the cached instance.
//! container.bind("log", "Logger");
//! let first = container.make("log", args![], false).unwrap();
//! let second = container.make("log", args![], false).unwrap();
//! assert_eq!(first, second);
//! assert_eq!(first.as_obj().unwrap().get::<Logger>().unwrap().level, 1);
//! ```

mod container;
mod core;
mod error;
mod invoke;
mod macros;
mod reflect;
mod value;

pub use container::{Container, Target};
pub use error::{Error, Result};
pub use invoke::{CallTarget, MethodTarget};
pub use reflect::{Args, Callable, ClassSpec, MethodSpec, ParamSpec, Signature};
pub use value::{Obj, Value};
