// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! Translations are Fluent `.ftl` files embedded at build time. The active
//! locale is chosen from the CLI, the config file or the OS, in that order,
//! and also decides the language the search server renders its fragments in.

pub mod fluent;
