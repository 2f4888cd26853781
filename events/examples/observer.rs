use keel_container::{Callable, ClassSpec, Container, Obj, Signature, Value};
use keel_events::Event;
use std::sync::Arc;

fn main() {
  let container = Arc::new(Container::new());

  container.register_class(
    ClassSpec::new("UserObserver")
      .constructor(Signature::new(), |_cx, _args| {
        Ok(Obj::new("UserObserver", ()))
      })
      .method(
        "onUserCreated",
        Signature::new().required("payload"),
        |_cx, _obj, args| {
          println!("observer saw user: {}", args[0].as_str().unwrap_or("?"));
          Ok(Value::Null)
        },
      ),
  );

  let event = Event::new(Arc::clone(&container));

  // Every on… method becomes a listener for the event of the same name.
  event.observe("UserObserver", "").unwrap();

  // A closure listener registered with priority.
  event.listen(
    "UserCreated",
    Callable::new(Signature::new().required("payload"), |_cx, _args| {
      println!("first in line");
      Ok(Value::Null)
    }),
    true,
  );

  let results = event
    .trigger("UserCreated", Some(Value::Str("ada".to_owned())))
    .unwrap();
  println!("{} listener(s) ran", results.len());
}
