use keel_app::App;
use keel_container::{Args, Callable, ClassSpec, Obj, Signature, Value};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

// --- Test Fixtures ---

type Log = Arc<Mutex<Vec<String>>>;

// A service with register/boot hooks and a declared bind table. Its boot
// method takes a dependency-injected Logger.
fn register_cache_service(app: &App, log: &Log) {
  let registered = log.clone();
  let booted = log.clone();

  app.container().register_class(ClassSpec::new("Logger").constructor(
    Signature::new().defaulted("level", 2_i64),
    |_cx, args| {
      let level = args[0].as_int().unwrap_or(0);
      Ok(Obj::new("Logger", level))
    },
  ));

  app.container().register_class(
    ClassSpec::new("CacheService")
      .constructor(Signature::new(), |_cx, _args| {
        Ok(Obj::new("CacheService", ()))
      })
      .method("register", Signature::new(), move |_cx, _obj, _args| {
        registered.lock().unwrap().push("cache:register".to_owned());
        Ok(Value::Null)
      })
      .method(
        "boot",
        Signature::new().typed("logger", "Logger"),
        move |_cx, _obj, args| {
          let level = args[0]
            .as_obj()
            .and_then(|obj| obj.get::<i64>().copied())
            .unwrap_or(0);
          booted.lock().unwrap().push(format!("cache:boot:{level}"));
          Ok(Value::Null)
        },
      )
      .binding("cache.driver", Value::Str("files".to_owned())),
  );
}

// --- Service Lifecycle ---

#[test]
fn test_register_runs_hook_and_merges_bind_table() {
  // Arrange
  let app = App::new();
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  register_cache_service(&app, &log);

  // Act
  app.register("CacheService", false).unwrap();

  // Assert
  assert_eq!(*log.lock().unwrap(), vec!["cache:register"]);
  assert_eq!(
    app.container().get("cache.driver").unwrap(),
    Value::Str("files".to_owned())
  );
}

#[test]
fn test_register_is_once_per_class_unless_forced() {
  // Arrange
  let app = App::new();
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  register_cache_service(&app, &log);

  // Act
  let first = app.register("CacheService", false).unwrap();
  let again = app.register("CacheService", false).unwrap();
  let forced = app.register("CacheService", true).unwrap();

  // Assert: the repeat was a no-op, force built a fresh service.
  assert!(first.ptr_eq(&again));
  assert!(!first.ptr_eq(&forced));
  assert_eq!(
    *log.lock().unwrap(),
    vec!["cache:register", "cache:register"]
  );
  // get_service still answers with the first registration.
  assert!(app.get_service("CacheService").unwrap().ptr_eq(&first));
}

#[test]
fn test_register_accepts_prebuilt_instance() {
  // Arrange
  let app = App::new();
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  register_cache_service(&app, &log);
  let service = Obj::new("CacheService", ());

  // Act
  let registered = app.register(service.clone(), false).unwrap();

  // Assert
  assert!(registered.ptr_eq(&service));
  assert_eq!(*log.lock().unwrap(), vec!["cache:register"]);
}

#[test]
fn test_boot_runs_in_registration_order_with_injected_args() {
  // Arrange
  let app = App::new();
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  register_cache_service(&app, &log);

  let other = log.clone();
  app.container().register_class(
    ClassSpec::new("QueueService")
      .constructor(Signature::new(), |_cx, _args| {
        Ok(Obj::new("QueueService", ()))
      })
      .method("boot", Signature::new(), move |_cx, _obj, _args| {
        other.lock().unwrap().push("queue:boot".to_owned());
        Ok(Value::Null)
      }),
  );

  app.register("CacheService", false).unwrap();
  app.register("QueueService", false).unwrap();
  log.lock().unwrap().clear();

  // Act
  app.boot().unwrap();

  // Assert: boot order follows registration order, and the cache service's
  // boot got a container-resolved Logger (default level 2).
  assert_eq!(*log.lock().unwrap(), vec!["cache:boot:2", "queue:boot"]);
}

#[test]
fn test_service_without_hooks_is_fine() {
  // Arrange
  let app = App::new();
  app.container().register_class(ClassSpec::new("Plain").constructor(
    Signature::new(),
    |_cx, _args| Ok(Obj::new("Plain", ())),
  ));

  // Act & Assert
  app.register("Plain", false).unwrap();
  app.boot().unwrap();
}

// --- Initialization ---

#[test]
fn test_initialize_fires_app_init_and_runs_initializers() {
  // Arrange
  let app = App::new();
  let log: Log = Arc::new(Mutex::new(Vec::new()));

  let seen = log.clone();
  app.event().listen(
    "AppInit",
    Callable::new(Signature::new().required("payload"), move |_cx, _args| {
      seen.lock().unwrap().push("app-init".to_owned());
      Ok(Value::Null)
    }),
    false,
  );

  let init_log = log.clone();
  app.container().register_class(
    ClassSpec::new("ErrorInit")
      .constructor(Signature::new(), |_cx, _args| Ok(Obj::new("ErrorInit", ())))
      .method(
        "init",
        Signature::new().required("app"),
        move |_cx, _obj, args| {
          let class = args[0].as_obj().map(|o| o.class().to_owned());
          init_log
            .lock()
            .unwrap()
            .push(format!("init:{}", class.as_deref().unwrap_or("?")));
          Ok(Value::Null)
        },
      ),
  );
  app.initializer("ErrorInit");

  // Act
  assert!(!app.initialized());
  app.initialize().unwrap();

  // Assert: the event fired before the initializers ran, and each
  // initializer received the app object.
  assert!(app.initialized());
  assert_eq!(*log.lock().unwrap(), vec!["app-init", "init:App"]);
}

#[test]
fn test_app_self_registration_and_dependency_injection() {
  // Arrange
  let app = App::new();
  let captured: Arc<Mutex<Option<Obj>>> = Arc::new(Mutex::new(None));
  let slot = captured.clone();
  app.container().register_class(ClassSpec::new("NeedsApp").constructor(
    Signature::new().typed("app", "app"),
    move |_cx, args| {
      *slot.lock().unwrap() = args[0].as_obj().cloned();
      Ok(Obj::new("NeedsApp", ()))
    },
  ));

  // Act
  app.container().make("NeedsApp", Args::None, false).unwrap();
  let app_value = app.container().make("app", Args::None, false).unwrap();

  // Assert: the constructor was handed the self-registered app instance.
  let injected = captured.lock().unwrap().clone().unwrap();
  assert!(injected.ptr_eq(app_value.as_obj().unwrap()));
  // The dispatcher is reachable under "event" as well.
  assert!(app.container().exists("event"));
}

#[test]
fn test_version_and_debug_flag() {
  let app = App::new();
  assert_eq!(app.version(), env!("CARGO_PKG_VERSION"));
  assert!(!app.is_debug());
  app.debug(true);
  assert!(app.is_debug());
}
