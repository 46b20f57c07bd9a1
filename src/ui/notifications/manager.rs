// SPDX-License-Identifier: MPL-2.0
//! Toast bookkeeping.
//!
//! Notifications are kept in arrival order; the first `MAX_VISIBLE` are on
//! screen and the rest wait their turn. A failing server tends to report the
//! same problem for every request in flight, so a notification equal to one
//! already pending replaces it instead of stacking up.

use super::notification::{Notification, NotificationId, Severity};
use std::collections::VecDeque;

/// Prefix of the keys produced by failed server requests.
const SERVER_ERROR_PREFIX: &str = "error-server-";

const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone)]
pub enum Message {
    Dismiss(NotificationId),
    /// Auto-dismiss check.
    Tick,
}

#[derive(Debug, Default)]
pub struct Manager {
    entries: VecDeque<Notification>,
}

impl Manager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a notification. Warnings and errors are logged as well.
    pub fn push(&mut self, notification: Notification) {
        match notification.severity() {
            Severity::Warning => {
                tracing::warn!(key = notification.message_key(), "warning notification");
            }
            Severity::Error => {
                tracing::error!(
                    key = notification.message_key(),
                    args = ?notification.message_args(),
                    "error notification"
                );
            }
            Severity::Success | Severity::Info => {}
        }

        let repeated = self.entries.iter_mut().find(|pending| {
            pending.severity() == notification.severity()
                && pending.message_key() == notification.message_key()
                && pending.message_args() == notification.message_args()
        });
        match repeated {
            // Same slot, fresh timer
            Some(pending) => *pending = notification,
            None => self.entries.push_back(notification),
        }
    }

    /// Returns `true` if the notification was still pending.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id() != id);
        self.entries.len() < before
    }

    /// Drops on-screen notifications whose display time is over.
    pub fn tick(&mut self) {
        let expired: Vec<NotificationId> = self
            .visible()
            .filter(|n| n.should_auto_dismiss())
            .map(Notification::id)
            .collect();
        if !expired.is_empty() {
            self.entries.retain(|n| !expired.contains(&n.id()));
        }
    }

    pub fn handle_message(&mut self, message: &Message) {
        match message {
            Message::Dismiss(id) => {
                self.dismiss(*id);
            }
            Message::Tick => self.tick(),
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().take(MAX_VISIBLE)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.entries.len().min(MAX_VISIBLE)
    }

    /// Whether anything is on screen or waiting.
    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Drops toasts about failed server requests.
    ///
    /// Called once a request succeeds again, so an old "server unreachable"
    /// toast does not linger next to fresh results.
    pub fn clear_server_errors(&mut self) {
        self.entries
            .retain(|n| !n.message_key().starts_with(SERVER_ERROR_PREFIX));
    }
}
