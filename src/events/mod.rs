//! Notifications.
//!
//! Every committed operation produces zero or more [`Notification`]s: a
//! [`GameEvent`] addressed to an [`Audience`] and numbered within that
//! audience's stream. Rejected operations produce none.
//!
//! ## Key Components
//!
//! - [`GameEvent`]: what happened
//! - [`Audience`]: who may see it
//! - [`EventSink`]: where notifications go ([`EventLog`], [`TracingSink`])
//! - [`narrate`]: story text for a single event

mod event;
mod sink;
mod story;

pub use event::{Audience, EliminationCause, GameEvent, Notification, SequenceCounters};
pub use sink::{EventLog, EventSink, NullSink, TracingSink};
pub use story::narrate;
