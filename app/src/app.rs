//! Service lifecycle and application initialization.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use keel_container::{Args, CallTarget, Container, Error, Obj, Result, Value};
use keel_events::Event;

use crate::events;

/// A service reference: an already-built instance, or a class name
/// materialized through the container on registration.
#[derive(Clone, Debug)]
pub enum ServiceRef {
  Class(String),
  Instance(Obj),
}

impl From<&str> for ServiceRef {
  fn from(class: &str) -> Self {
    ServiceRef::Class(class.to_owned())
  }
}

impl From<String> for ServiceRef {
  fn from(class: String) -> Self {
    ServiceRef::Class(class)
  }
}

impl From<Obj> for ServiceRef {
  fn from(obj: Obj) -> Self {
    ServiceRef::Instance(obj)
  }
}

/// The application object: owns the container and the event dispatcher and
/// drives the service register/boot lifecycle.
///
/// Path, config and environment loading live outside this crate; the app
/// only provides the lifecycle points those layers call into.
pub struct App {
  container: Arc<Container>,
  event: Arc<Event>,
  services: RwLock<Vec<Obj>>,
  initializers: RwLock<Vec<String>>,
  initialized: AtomicBool,
  debug: AtomicBool,
}

impl App {
  /// Builds the app, self-registers it under `"app"`, registers the
  /// dispatcher under `"event"` and seeds the well-known event aliases.
  pub fn new() -> Arc<Self> {
    let container = Arc::new(Container::new());
    let event = Event::new(Arc::clone(&container));
    event.bind([
      ("AppInit", events::APP_INIT),
      ("HttpRun", events::HTTP_RUN),
      ("HttpEnd", events::HTTP_END),
      ("RouteLoaded", events::ROUTE_LOADED),
      ("LogWrite", events::LOG_WRITE),
    ]);

    let app = Arc::new(Self {
      container: Arc::clone(&container),
      event: Arc::clone(&event),
      services: RwLock::new(Vec::new()),
      initializers: RwLock::new(Vec::new()),
      initialized: AtomicBool::new(false),
      debug: AtomicBool::new(false),
    });

    container.instance("app", Value::Obj(Obj::from_arc("App", Arc::clone(&app))));
    container.instance("event", Value::Obj(Obj::from_arc("Event", event)));
    app
  }

  pub fn container(&self) -> &Arc<Container> {
    &self.container
  }

  pub fn event(&self) -> &Arc<Event> {
    &self.event
  }

  pub fn version(&self) -> &'static str {
    env!("CARGO_PKG_VERSION")
  }

  pub fn debug(&self, debug: bool) {
    self.debug.store(debug, Ordering::Relaxed);
  }

  pub fn is_debug(&self) -> bool {
    self.debug.load(Ordering::Relaxed)
  }

  // --- SERVICES ---

  /// Registers a service: constructs it if given as a class name, runs its
  /// optional `register` method, merges its declared bind table into the
  /// container and appends it to the boot order.
  ///
  /// A class that is already registered is returned as-is unless `force`.
  pub fn register(&self, service: impl Into<ServiceRef>, force: bool) -> Result<Obj> {
    let service = service.into();
    let class = match &service {
      ServiceRef::Class(class) => class.clone(),
      ServiceRef::Instance(obj) => obj.class().to_owned(),
    };

    if let Some(existing) = self.get_service(&class) {
      if !force {
        return Ok(existing);
      }
    }

    let service = match service {
      ServiceRef::Instance(obj) => obj,
      ServiceRef::Class(class) => match self.container.invoke_class(&class, Args::None)? {
        Value::Obj(obj) => obj,
        other => {
          return Err(Error::Other(format!(
            "service `{class}` resolved to a non-object value: {other:?}"
          )))
        }
      },
    };

    if let Some(spec) = self.container.class_spec(service.class()) {
      if spec.method_spec("register").is_some() {
        self
          .container
          .invoke(&CallTarget::method(service.clone(), "register"), Args::None)?;
      }
      self.container.bind_many(spec.bind_table().to_vec());
    }

    debug!(service = service.class(), "service registered");
    self.services.write().push(service.clone());
    Ok(service)
  }

  /// The first registered service of the given class.
  pub fn get_service(&self, class: &str) -> Option<Obj> {
    self
      .services
      .read()
      .iter()
      .find(|service| service.class() == class)
      .cloned()
  }

  /// Runs every registered service's optional `boot` method in registration
  /// order, with dependency-injected arguments.
  pub fn boot(&self) -> Result<()> {
    let services: Vec<Obj> = self.services.read().clone();
    for service in &services {
      self.boot_service(service)?;
    }
    Ok(())
  }

  /// Boots one service; a service without a `boot` method is a no-op.
  pub fn boot_service(&self, service: &Obj) -> Result<()> {
    let Some(spec) = self.container.class_spec(service.class()) else {
      return Ok(());
    };
    if spec.method_spec("boot").is_some() {
      self
        .container
        .invoke(&CallTarget::method(service.clone(), "boot"), Args::None)?;
    }
    Ok(())
  }

  // --- INITIALIZATION ---

  /// Appends an initializer class to the ordered list run by `initialize`.
  pub fn initializer(&self, class: &str) {
    self.initializers.write().push(class.to_owned());
  }

  /// Marks the app initialized, fires `AppInit`, then resolves each
  /// initializer in order and invokes its `init` method with the app object.
  pub fn initialize(&self) -> Result<()> {
    self.initialized.store(true, Ordering::Relaxed);

    self.event.trigger("AppInit", None)?;

    let app_value = self.container.make("app", Args::None, false)?;
    let initializers: Vec<String> = self.initializers.read().clone();
    for class in &initializers {
      let initializer = self.container.make(class, Args::None, false)?;
      let Value::Obj(obj) = initializer else {
        return Err(Error::Other(format!(
          "initializer `{class}` resolved to a non-object value"
        )));
      };
      self.container.invoke(
        &CallTarget::method(obj, "init"),
        Args::Positional(vec![app_value.clone()]),
      )?;
    }
    Ok(())
  }

  pub fn initialized(&self) -> bool {
    self.initialized.load(Ordering::Relaxed)
  }
}
