//! What a successful operation produced.

use crate::core::PlayerId;
use crate::events::{GameEvent, Notification};

/// Notifications produced by one committed operation, in delivery order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    moderator: PlayerId,
    notifications: Vec<Notification>,
}

impl Receipt {
    pub(crate) fn new(moderator: PlayerId, notifications: Vec<Notification>) -> Self {
        Self {
            moderator,
            notifications,
        }
    }

    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Events in order, regardless of audience.
    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.notifications.iter().map(|n| &n.event)
    }

    /// Notifications `viewer` is entitled to see.
    pub fn visible_to(&self, viewer: PlayerId) -> impl Iterator<Item = &Notification> {
        let moderator = self.moderator;
        self.notifications
            .iter()
            .filter(move |n| n.is_visible_to(viewer, moderator))
    }

    #[must_use]
    pub fn into_notifications(self) -> Vec<Notification> {
        self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Audience;

    #[test]
    fn test_visible_to_filters_private() {
        let receipt = Receipt::new(
            PlayerId(50),
            vec![
                Notification::new(0, Audience::Everyone, GameEvent::GameReset),
                Notification::new(0, Audience::Player(PlayerId(1)), GameEvent::GameReset),
            ],
        );

        assert_eq!(receipt.len(), 2);
        assert_eq!(receipt.visible_to(PlayerId(1)).count(), 2);
        assert_eq!(receipt.visible_to(PlayerId(2)).count(), 1);
        assert_eq!(receipt.visible_to(PlayerId(50)).count(), 2);
        assert_eq!(receipt.events().count(), 2);
    }
}
