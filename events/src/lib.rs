//! # Keel Events
//!
//! Synchronous event dispatch on top of the keel container: named events,
//! single-hop alias translation, ordered listener sequences with
//! prepend-priority insertion, observer/subscriber auto-registration and
//! short-circuiting triggers.
//!
//! Listeners come in a closed set of shapes ([`ListenerTarget`]) and every
//! shape is invoked through the container's invoker, so listener arguments
//! go through the same parameter binding as any other call.

mod event;
mod listener;

pub use event::Event;
pub use listener::{ListenerTarget, SubscriberRef};
