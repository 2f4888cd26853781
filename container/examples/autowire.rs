use keel_container::{args, ClassSpec, Container, Obj, Signature};

struct Logger {
  level: i64,
}

struct Mailer {
  logger_level: i64,
}

fn main() {
  let container = Container::new();

  container.register_class(ClassSpec::new("Logger").constructor(
    Signature::new().defaulted("level", 3_i64),
    |_cx, args| {
      let level = args[0].as_int().unwrap_or(0);
      println!("constructing Logger at level {level}");
      Ok(Obj::new("Logger", Logger { level }))
    },
  ));

  container.register_class(ClassSpec::new("Mailer").constructor(
    Signature::new().typed("logger", "Logger"),
    |_cx, args| {
      let logger = args[0].as_obj().unwrap();
      let level = logger.get::<Logger>().unwrap().level;
      Ok(Obj::new("Mailer", Mailer { logger_level: level }))
    },
  ));

  // The Mailer constructor never sees an explicit Logger; the container
  // resolves one by the parameter's declared class.
  let mailer = container.make("Mailer", args![], false).unwrap();
  let wired = mailer.as_obj().unwrap().get::<Mailer>().unwrap();
  println!("mailer wired with logger level {}", wired.logger_level);

  // The Logger constructed along the way is now the cached singleton.
  let logger = container.make("Logger", args![], false).unwrap();
  println!(
    "cached logger level {}",
    logger.as_obj().unwrap().get::<Logger>().unwrap().level
  );
}
