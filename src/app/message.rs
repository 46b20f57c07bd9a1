// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::error::Error;
use crate::navigation::ResultContainer;
use crate::search::page_globals::PageGlobals;
use crate::search::response::SearchResponse;
use crate::search::sequence::Ticket;
use crate::search::validation::{PickedFile, SelectedImage};
use crate::ui::fragment_view;
use crate::ui::help;
use crate::ui::input_form;
use crate::ui::navbar;
use crate::ui::notifications;
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Navbar(navbar::Message),
    InputForm(input_form::Message),
    Results(ResultContainer, fragment_view::Message),
    Help(help::Message),
    Notification(notifications::NotificationMessage),
    CloseModal,
    Tick(Instant), // Periodic tick for notification auto-dismiss
    /// Escape was pressed and nothing captured it.
    EscapePressed,
    /// Result from the image file dialog.
    ImagePicked(Option<PathBuf>),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    /// Size and name of a candidate image are known.
    ImageInspected(Result<PickedFile, Error>),
    /// A validated image was read from disk.
    ImageLoaded(Result<SelectedImage, Error>),
    /// Answer to the search POST.
    SearchPosted {
        ticket: Ticket,
        result: Result<SearchResponse, Error>,
    },
    /// Fragment for one of the result containers.
    FragmentLoaded {
        container: ResultContainer,
        ticket: Ticket,
        result: Result<String, Error>,
    },
    HelpLoaded {
        ticket: Ticket,
        result: Result<String, Error>,
    },
    /// Image referenced by a fragment.
    ImageFetched {
        src: String,
        result: Result<Vec<u8>, Error>,
    },
    LoggedIn(Result<bool, Error>),
    LocaleSelected(Result<(), Error>),
    PageGlobalsLoaded(Result<PageGlobals, Error>),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `nl`, `en-US`).
    pub lang: Option<String>,
    /// Optional server base URL, replaces the configured one.
    pub server: Option<String>,
    /// Optional image path to preselect on startup.
    pub image_path: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `SEARCH_LENS_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
}
