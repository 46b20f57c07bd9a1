// SPDX-License-Identifier: MPL-2.0
//! `search_lens` is a desktop client for a reverse image and text search
//! server, built with the Iced GUI framework.
//!
//! The server renders its results as HTML fragments. The client validates
//! the picked image, submits the search, and walks the results list, result
//! groups and single items through a small mode state machine, rendering
//! every fragment natively.

#![doc(html_root_url = "https://docs.rs/search_lens/0.1.0")]

pub mod app;
pub mod config;
pub mod error;
pub mod fragment;
pub mod i18n;
pub mod navigation;
pub mod search;
pub mod ui;
