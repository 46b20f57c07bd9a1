// SPDX-License-Identifier: MPL-2.0
//! User interface components.
//!
//! Components follow the Elm-style "state down, messages up" pattern: each
//! exposes a `view` taking a `ViewContext`, a `Message` enum and, where it
//! owns state, an `update` that returns an `Event` for the application.
//!
//! - [`navbar`] - Title, breadcrumb and help navigation bars
//! - [`input_form`] - Image selector, query text and filter checkboxes
//! - [`results`] - The three result containers
//! - [`help`] - Help page accordion
//! - [`modal`] - Blocking dialogs for invalid input
//! - [`fragment_view`] - Rendering of parsed server fragments
//! - [`notifications`] - Toast notifications
//! - [`styles`], [`design_tokens`], [`theming`] - Look and feel

pub mod design_tokens;
pub mod fragment_view;
pub mod help;
pub mod input_form;
pub mod modal;
pub mod navbar;
pub mod notifications;
pub mod results;
pub mod styles;
pub mod theming;
