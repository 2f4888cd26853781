//! The event registry and dispatcher.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

use keel_container::{Args, CallTarget, Container, Error, Obj, Result, Value};

use crate::listener::{ListenerTarget, SubscriberRef};

/// The event registry and synchronous dispatcher.
///
/// Listeners are kept per event name in insertion order. Triggering walks
/// the deduplicated sequence, invoking each listener through the container
/// with the payload as its single argument. A listener returning exactly
/// `false` stops the rest of the sequence.
pub struct Event {
  container: Arc<Container>,
  listeners: RwLock<HashMap<String, Vec<ListenerTarget>>>,
  aliases: RwLock<HashMap<String, String>>,
  // Self-handle, so subscriber hooks can be handed the dispatcher itself.
  this: Weak<Event>,
}

impl Event {
  pub fn new(container: Arc<Container>) -> Arc<Self> {
    Arc::new_cyclic(|this| Self {
      container,
      listeners: RwLock::new(HashMap::new()),
      aliases: RwLock::new(HashMap::new()),
      this: this.clone(),
    })
  }

  pub fn container(&self) -> &Arc<Container> {
    &self.container
  }

  // Single-hop alias translation; unknown names pass through unchanged.
  fn resolve_name(&self, event: &str) -> String {
    self
      .aliases
      .read()
      .get(event)
      .cloned()
      .unwrap_or_else(|| event.to_owned())
  }

  // --- REGISTRY ---

  /// Merges short-name aliases into the alias table.
  pub fn bind<'a>(&self, aliases: impl IntoIterator<Item = (&'a str, &'a str)>) {
    let mut table = self.aliases.write();
    for (name, canonical) in aliases {
      table.insert(name.to_owned(), canonical.to_owned());
    }
  }

  /// Registers a listener. `first` puts it ahead of an already-existing
  /// sequence; on a fresh event it simply starts the sequence.
  pub fn listen(&self, event: &str, listener: impl Into<ListenerTarget>, first: bool) {
    let event = self.resolve_name(event);
    let mut listeners = self.listeners.write();
    match listeners.get_mut(&event) {
      Some(sequence) if first => sequence.insert(0, listener.into()),
      Some(sequence) => sequence.push(listener.into()),
      None => {
        listeners.insert(event, vec![listener.into()]);
      }
    }
  }

  /// Bulk registration; each event's new listeners append after its existing
  /// sequence.
  pub fn listen_events(&self, events: impl IntoIterator<Item = (String, Vec<ListenerTarget>)>) {
    let mut listeners = self.listeners.write();
    for (event, batch) in events {
      let event = self
        .aliases
        .read()
        .get(&event)
        .cloned()
        .unwrap_or(event);
      listeners.entry(event).or_default().extend(batch);
    }
  }

  pub fn has_listener(&self, event: &str) -> bool {
    let event = self.resolve_name(event);
    self.listeners.read().contains_key(&event)
  }

  /// Clears an event's whole listener sequence.
  pub fn remove(&self, event: &str) {
    let event = self.resolve_name(event);
    self.listeners.write().remove(&event);
  }

  // --- AUTO-REGISTRATION ---

  /// Registers every `on…` method of the observer as a listener for the
  /// event named after the method, with `prefix` prepended. An empty prefix
  /// falls back to the class's declared event-prefix capability.
  pub fn observe(&self, observer: impl Into<SubscriberRef>, prefix: &str) -> Result<()> {
    let observer = self.materialize(observer.into())?;
    let spec = self
      .container
      .class_spec(observer.class())
      .ok_or_else(|| Error::ClassNotFound(observer.class().to_owned()))?;

    let mut prefix = prefix.to_owned();
    if prefix.is_empty() {
      if let Some(declared) = spec.prefix_for(&observer) {
        prefix = declared;
      }
    }

    for method in spec.methods() {
      if let Some(event) = method.name().strip_prefix("on") {
        self.listen(
          &format!("{prefix}{event}"),
          ListenerTarget::Method(observer.clone(), method.name().to_owned()),
          false,
        );
      }
    }
    Ok(())
  }

  /// Registers each subscriber: a manual `subscriber` method wins and is
  /// invoked with this dispatcher so it can self-register; otherwise the
  /// observer convention applies.
  ///
  /// Note: only the first entry takes effect; later entries are skipped.
  pub fn subscribe(&self, subscribers: impl IntoIterator<Item = SubscriberRef>) -> Result<()> {
    let mut entries = subscribers.into_iter();
    let Some(head) = entries.next() else {
      return Ok(());
    };
    let skipped = entries.count();
    if skipped > 0 {
      warn!(skipped, "subscribe applies only the first subscriber; later entries ignored");
    }

    let subscriber = self.materialize(head)?;
    let spec = self
      .container
      .class_spec(subscriber.class())
      .ok_or_else(|| Error::ClassNotFound(subscriber.class().to_owned()))?;

    if spec.method_spec("subscriber").is_some() {
      let this = self
        .this
        .upgrade()
        .ok_or_else(|| Error::Other("event dispatcher is gone".to_owned()))?;
      let dispatcher = Value::Obj(Obj::from_arc("Event", this));
      self.container.invoke(
        &CallTarget::method(subscriber, "subscriber"),
        Args::Positional(vec![dispatcher]),
      )?;
    } else {
      self.observe(subscriber, "")?;
    }
    Ok(())
  }

  fn materialize(&self, subscriber: SubscriberRef) -> Result<Obj> {
    match subscriber {
      SubscriberRef::Instance(obj) => Ok(obj),
      SubscriberRef::Class(name) => match self.container.make(&name, Args::None, false)? {
        Value::Obj(obj) => Ok(obj),
        other => Err(Error::Other(format!(
          "`{name}` resolved to a non-object value: {other:?}"
        ))),
      },
    }
  }

  // --- DISPATCH ---

  /// Fires an event; every listener receives the payload as its single
  /// argument. Returns the ordered per-listener results.
  pub fn trigger(&self, event: &str, payload: Option<Value>) -> Result<Vec<Value>> {
    self.fire(event, payload, false)
  }

  /// Derives the event name from the payload's class and fires it with the
  /// object as payload.
  pub fn trigger_object(&self, payload: Obj) -> Result<Vec<Value>> {
    let event = payload.class().to_owned();
    self.fire(&event, Some(Value::Obj(payload)), false)
  }

  /// Fires an event, stopping at the first non-null listener result and
  /// returning it. Returns `Value::Null` when no listener produced one.
  pub fn until(&self, event: &str, payload: Option<Value>) -> Result<Value> {
    let mut results = self.fire(event, payload, true)?;
    Ok(results.pop().unwrap_or(Value::Null))
  }

  fn fire(&self, event: &str, payload: Option<Value>, once: bool) -> Result<Vec<Value>> {
    let event = self.resolve_name(event);
    let listeners: Vec<ListenerTarget> = self
      .listeners
      .read()
      .get(&event)
      .cloned()
      .unwrap_or_default();

    // Value-equality dedup, first occurrence wins.
    let mut unique: Vec<ListenerTarget> = Vec::with_capacity(listeners.len());
    for listener in listeners {
      if !unique.contains(&listener) {
        unique.push(listener);
      }
    }

    debug!(event = %event, listeners = unique.len(), "triggering event");

    let argument = payload.unwrap_or(Value::Null);
    let mut results = Vec::with_capacity(unique.len());
    for listener in &unique {
      let result = self.dispatch(listener, argument.clone())?;
      let halt = result == Value::Bool(false) || (once && !result.is_null());
      results.push(result);
      if halt {
        debug!(event = %event, "listener short-circuited trigger");
        break;
      }
    }
    Ok(results)
  }

  fn dispatch(&self, listener: &ListenerTarget, payload: Value) -> Result<Value> {
    let args = Args::Positional(vec![payload]);
    match listener {
      ListenerTarget::Callable(callable) => self.container.invoke_function(callable, args),
      ListenerTarget::Method(obj, name) => self
        .container
        .invoke(&CallTarget::method(obj.clone(), name), args),
      ListenerTarget::StaticRef(reference) => self
        .container
        .invoke(&CallTarget::StaticRef(reference.clone()), args),
      ListenerTarget::Class(name) => {
        let handler = self.container.make(name, Args::None, false)?;
        let Value::Obj(obj) = handler else {
          return Err(Error::Other(format!(
            "`{name}` resolved to a non-object handler"
          )));
        };
        self.container.invoke(&CallTarget::method(obj, "handle"), args)
      }
    }
  }
}
