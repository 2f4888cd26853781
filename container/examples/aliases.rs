use keel_container::{args, Container, Target, Value};

fn main() {
  let container = Container::new();

  container.bind(
    "greeting",
    Target::factory(|_cx, _args| Ok(Value::Str("hello".to_owned()))),
  );

  // Two alias hops ending at the factory binding.
  container.bind_many(vec![
    ("hi".to_owned(), Target::from("hello-service")),
    ("hello-service".to_owned(), Target::from("greeting")),
  ]);

  println!("alias terminal: {}", container.get_alias("hi"));

  let via_alias = container.make("hi", args![], false).unwrap();
  let direct = container.make("greeting", args![], false).unwrap();
  println!("same cached value: {}", via_alias == direct);

  // A fresh instance bypasses the cache without touching it.
  let fresh = container.make("greeting", args![], true).unwrap();
  println!("fresh value: {:?}", fresh);
  println!("cache untouched: {}", container.exists("greeting"));
}
