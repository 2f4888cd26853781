use keel_container::{ClassSpec, Container, Obj, Signature, Value};
use keel_events::{Event, SubscriberRef};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

// --- Test Fixtures ---

type Log = Arc<Mutex<Vec<String>>>;

// An observer whose on… methods record which event reached them.
fn register_user_observer(container: &Container, log: &Log) {
  let created = log.clone();
  let shipped = log.clone();
  container.register_class(
    ClassSpec::new("UserObserver")
      .constructor(Signature::new(), |_cx, _args| {
        Ok(Obj::new("UserObserver", ()))
      })
      .method(
        "onUserCreated",
        Signature::new().required("payload"),
        move |_cx, _obj, args| {
          created
            .lock()
            .unwrap()
            .push(format!("created:{}", args[0].as_str().unwrap_or("?")));
          Ok(Value::Null)
        },
      )
      .method(
        "onOrderShipped",
        Signature::new().required("payload"),
        move |_cx, _obj, _args| {
          shipped.lock().unwrap().push("shipped".to_owned());
          Ok(Value::Null)
        },
      )
      .method("helper", Signature::new(), |_cx, _obj, _args| {
        Ok(Value::Null)
      }),
  );
}

// --- Observe ---

#[test]
fn test_observe_registers_on_methods_as_listeners() {
  // Arrange
  let container = Arc::new(Container::new());
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  register_user_observer(&container, &log);
  let event = Event::new(Arc::clone(&container));

  // Act
  event.observe("UserObserver", "").unwrap();
  event
    .trigger("UserCreated", Some(Value::Str("ada".to_owned())))
    .unwrap();
  event.trigger("OrderShipped", None).unwrap();

  // Assert: both on… methods fired, the helper method registered nothing.
  assert_eq!(*log.lock().unwrap(), vec!["created:ada", "shipped"]);
  assert!(!event.has_listener("helper"));
}

#[test]
fn test_observe_accepts_prebuilt_instance() {
  // Arrange
  let container = Arc::new(Container::new());
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  register_user_observer(&container, &log);
  let event = Event::new(Arc::clone(&container));
  let observer = container
    .make("UserObserver", keel_container::Args::None, false)
    .unwrap()
    .as_obj()
    .unwrap()
    .clone();

  // Act
  event.observe(observer, "").unwrap();
  event.trigger("OrderShipped", None).unwrap();

  // Assert
  assert_eq!(*log.lock().unwrap(), vec!["shipped"]);
}

#[test]
fn test_explicit_prefix_scopes_event_names() {
  // Arrange
  let container = Arc::new(Container::new());
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  register_user_observer(&container, &log);
  let event = Event::new(Arc::clone(&container));

  // Act
  event.observe("UserObserver", "shop.").unwrap();
  event.trigger("UserCreated", None).unwrap();
  event
    .trigger("shop.UserCreated", Some(Value::Str("bo".to_owned())))
    .unwrap();

  // Assert: only the prefixed name is wired.
  assert_eq!(*log.lock().unwrap(), vec!["created:bo"]);
}

#[test]
fn test_declared_event_prefix_fills_empty_prefix() {
  // Arrange: the class declares its own event prefix.
  let container = Arc::new(Container::new());
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  let seen = log.clone();
  container.register_class(
    ClassSpec::new("BillingObserver")
      .constructor(Signature::new(), |_cx, _args| {
        Ok(Obj::new("BillingObserver", ()))
      })
      .event_prefix(|_obj| "billing.".to_owned())
      .method(
        "onInvoicePaid",
        Signature::new().required("payload"),
        move |_cx, _obj, _args| {
          seen.lock().unwrap().push("paid".to_owned());
          Ok(Value::Null)
        },
      ),
  );
  let event = Event::new(Arc::clone(&container));

  // Act
  event.observe("BillingObserver", "").unwrap();
  event.trigger("billing.InvoicePaid", None).unwrap();
  // An explicit prefix would have overridden the declared one.
  event.trigger("InvoicePaid", None).unwrap();

  // Assert
  assert_eq!(*log.lock().unwrap(), vec!["paid"]);
}

// --- Subscribe ---

// A subscriber with a manual `subscriber` hook that self-registers.
fn register_manual_subscriber(container: &Container, log: &Log) {
  let seen = log.clone();
  container.register_class(
    ClassSpec::new("ReportSubscriber")
      .constructor(Signature::new(), |_cx, _args| {
        Ok(Obj::new("ReportSubscriber", ()))
      })
      .method(
        "subscriber",
        Signature::new().required("dispatcher"),
        move |_cx, _obj, args| {
          let dispatcher = args[0]
            .as_obj()
            .and_then(|obj| obj.get::<Event>())
            .expect("subscriber hook expects the dispatcher");
          let seen = seen.clone();
          dispatcher.listen(
            "ReportRequested",
            keel_container::Callable::new(
              Signature::new().required("payload"),
              move |_cx, _args| {
                seen.lock().unwrap().push("manual".to_owned());
                Ok(Value::Null)
              },
            ),
            false,
          );
          Ok(Value::Null)
        },
      ),
  );
}

#[test]
fn test_subscribe_prefers_manual_hook() {
  // Arrange
  let container = Arc::new(Container::new());
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  register_manual_subscriber(&container, &log);
  let event = Event::new(Arc::clone(&container));

  // Act
  event
    .subscribe(vec![SubscriberRef::from("ReportSubscriber")])
    .unwrap();
  event.trigger("ReportRequested", None).unwrap();

  // Assert
  assert_eq!(*log.lock().unwrap(), vec!["manual"]);
}

#[test]
fn test_subscribe_falls_back_to_observe() {
  // Arrange: no `subscriber` method on this class.
  let container = Arc::new(Container::new());
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  register_user_observer(&container, &log);
  let event = Event::new(Arc::clone(&container));

  // Act
  event
    .subscribe(vec![SubscriberRef::from("UserObserver")])
    .unwrap();
  event.trigger("OrderShipped", None).unwrap();

  // Assert
  assert_eq!(*log.lock().unwrap(), vec!["shipped"]);
}

#[test]
fn test_subscribe_applies_only_the_first_entry() {
  // Arrange
  let container = Arc::new(Container::new());
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  register_user_observer(&container, &log);
  register_manual_subscriber(&container, &log);
  let event = Event::new(Arc::clone(&container));

  // Act: the second subscriber never takes effect.
  event
    .subscribe(vec![
      SubscriberRef::from("UserObserver"),
      SubscriberRef::from("ReportSubscriber"),
    ])
    .unwrap();
  event.trigger("OrderShipped", None).unwrap();
  event.trigger("ReportRequested", None).unwrap();

  // Assert
  assert_eq!(*log.lock().unwrap(), vec!["shipped"]);
}
