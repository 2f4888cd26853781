//! Public macros for assembling caller-supplied arguments.

/// Builds an [`Args`](crate::Args) value.
///
/// Brace-arrow entries produce named arguments, a plain list produces
/// positional ones, and no entries at all means "nothing supplied":
///
/// ```
/// use keel_container::{args, Args};
///
/// let nothing = args![];
/// let positional = args![1_i64, "two"];
/// let named = args!["level" => 3_i64];
///
/// assert!(matches!(nothing, Args::None));
/// assert!(matches!(positional, Args::Positional(_)));
/// assert!(matches!(named, Args::Named(_)));
/// ```
#[macro_export]
macro_rules! args {
  () => {
    $crate::Args::None
  };

  ($($name:literal => $value:expr),+ $(,)?) => {
    $crate::Args::Named(
      [$(($name.to_string(), $crate::Value::from($value))),+]
        .into_iter()
        .collect(),
    )
  };

  ($($value:expr),+ $(,)?) => {
    $crate::Args::Positional(vec![$($crate::Value::from($value)),+])
  };
}
