// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Native window events are reduced to the few the application reacts to:
//! dropped files and an uncaptured Escape key.

use super::Message;
use iced::{event, keyboard, time, window, Subscription};
use std::time::Duration;

/// Routes dropped files and Escape presses to the application.
///
/// Whether a drop is accepted depends on the current mode and is decided
/// in the update handler, not here.
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, _window_id| {
        if let event::Event::Window(window::Event::FileDropped(path)) = &event {
            return Some(Message::FileDropped(path.clone()));
        }

        match (event, status) {
            (
                event::Event::Keyboard(keyboard::Event::KeyPressed {
                    key: keyboard::Key::Named(keyboard::key::Named::Escape),
                    ..
                }),
                event::Status::Ignored,
            ) => Some(Message::EscapePressed),
            _ => None,
        }
    })
}

/// Creates a periodic tick subscription for notification auto-dismiss.
pub fn create_tick_subscription(has_notifications: bool) -> Subscription<Message> {
    if has_notifications {
        time::every(Duration::from_millis(100)).map(Message::Tick)
    } else {
        Subscription::none()
    }
}
