// SPDX-License-Identifier: MPL-2.0
//! Shared widget styles for all screens.

pub mod button;
pub mod container;

pub use button::{link as button_link, primary as button_primary};
