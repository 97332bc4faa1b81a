//! Notification delivery.
//!
//! The engine hands every notification to an `EventSink` as soon as the
//! operation that produced it has committed. What happens next (storing,
//! logging, pushing to clients) is up to the embedder.

use crate::core::PlayerId;

use super::event::{Audience, Notification};

/// Receives notifications in delivery order.
pub trait EventSink {
    fn publish(&mut self, notification: &Notification);
}

impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn publish(&mut self, notification: &Notification) {
        self.0.publish(notification);
        self.1.publish(notification);
    }
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _notification: &Notification) {}
}

/// In-memory notification log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    notifications: Vec<Notification>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Everything published so far, in delivery order.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    #[must_use]
    pub fn last(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Notifications `viewer` is entitled to see.
    pub fn for_viewer(
        &self,
        viewer: PlayerId,
        moderator: PlayerId,
    ) -> impl Iterator<Item = &Notification> {
        self.notifications
            .iter()
            .filter(move |n| n.is_visible_to(viewer, moderator))
    }

    /// Notifications addressed to everyone.
    pub fn public(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(|n| n.is_public())
    }
}

impl EventSink for EventLog {
    fn publish(&mut self, notification: &Notification) {
        debug_assert!(
            self.notifications
                .iter()
                .rev()
                .find(|n| n.audience == notification.audience)
                .map_or(true, |last| last.sequence < notification.sequence),
            "notifications out of order"
        );
        self.notifications.push(notification.clone());
    }
}

/// Sink that writes notifications to `tracing`.
///
/// Public notifications go out at `debug`; private ones only at `trace`,
/// since they carry roles and investigation results.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&mut self, notification: &Notification) {
        match notification.audience {
            Audience::Everyone => tracing::debug!(
                sequence = notification.sequence,
                event = notification.event.name(),
                "notification"
            ),
            audience => tracing::trace!(
                sequence = notification.sequence,
                ?audience,
                event = ?notification.event,
                "private notification"
            ),
        }
    }
}
