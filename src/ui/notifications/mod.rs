// SPDX-License-Identifier: MPL-2.0
//! Toast notifications for failures that do not belong to a result container.
//!
//! Network errors, unreadable files and a broken settings file are reported
//! here; validation problems the user must act on use modal dialogs instead.
//!
//! - [`notification`] - `Notification` with severity levels
//! - [`manager`] - `Manager` for queuing and auto-dismiss
//! - [`toast`] - rendering of the visible notifications
//!
//! At most three toasts are visible, the rest wait in a queue. Errors stay
//! until dismissed.

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, Severity};
pub use toast::Toast;
