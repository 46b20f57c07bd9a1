// SPDX-License-Identifier: MPL-2.0
//! Mode state machine of the search client.
//!
//! The client is always in exactly one [`Mode`]. Moving between modes never
//! fails: [`NavigationState::switch_mode`] only records the new mode and the
//! optional [`Source`], and [`layout::layout`] derives everything that is
//! visible from that record.
//!
//! ```text
//!   Input ──submit──▶ ViewResults ──group──▶ ViewGroup
//!     ▲                  │   ▲                  │
//!     │                  │   └──────back────────┤
//!     └──────home────────┘                      ▼
//!                        └──────item──────▶ ViewItem
//! ```

pub mod layout;

pub use layout::{layout, FormSummary, Layout, MenuEntry, NavigationBar, ResultContainer};

/// Active top-level view of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Mode {
    /// Search form is editable, no results are shown.
    #[default]
    Input,
    /// Paginated list of all results for the current search.
    ViewResults,
    /// One result group (category) with its items.
    ViewGroup,
    /// A single result item (article).
    ViewItem,
}

impl Mode {
    /// Result container shown in this mode, `None` while editing the search.
    #[must_use]
    pub fn result_container(self) -> Option<ResultContainer> {
        match self {
            Mode::Input => None,
            Mode::ViewResults => Some(ResultContainer::Results),
            Mode::ViewGroup => Some(ResultContainer::Group),
            Mode::ViewItem => Some(ResultContainer::Item),
        }
    }

    #[must_use]
    pub fn is_input(self) -> bool {
        self == Mode::Input
    }
}

/// Top-level content container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Index,
    Help,
}

/// The view a result item was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    Group,
    #[default]
    Results,
}

impl Source {
    /// Parses the marker used by server fragments (`'group'`, `'category'`
    /// or `'results'`). Anything unknown means the results list.
    #[must_use]
    pub fn from_marker(marker: &str) -> Self {
        if marker.eq_ignore_ascii_case("group") || marker.eq_ignore_ascii_case("category") {
            Source::Group
        } else {
            Source::Results
        }
    }
}

/// Navigation record owned by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    mode: Mode,
    page: Page,
    /// Source passed with the latest mode switch, drives the item breadcrumbs.
    source: Option<Source>,
    /// Where "back" from an item view goes.
    return_to: Source,
}

impl NavigationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    #[must_use]
    pub fn source(&self) -> Option<Source> {
        self.source
    }

    #[must_use]
    pub fn return_to(&self) -> Source {
        self.return_to
    }

    /// Enters `new_mode`. Result views always belong to the index page.
    pub fn switch_mode(&mut self, new_mode: Mode, source: Option<Source>) {
        tracing::debug!(from = ?self.mode, to = ?new_mode, ?source, "switching mode");
        self.mode = new_mode;
        self.source = source;
        if !new_mode.is_input() {
            self.page = Page::Index;
        }
    }

    /// Records where "back" from the item view should go.
    pub fn set_return_to(&mut self, source: Source) {
        self.return_to = source;
    }

    /// Mode entered by "back" from an item view.
    #[must_use]
    pub fn back_target(&self) -> Mode {
        match self.return_to {
            Source::Group => Mode::ViewGroup,
            Source::Results => Mode::ViewResults,
        }
    }

    /// Leaves the item view without refetching anything.
    pub fn go_back_from_item(&mut self) -> Mode {
        let target = self.back_target();
        self.switch_mode(target, None);
        target
    }

    pub fn show_page(&mut self, page: Page) {
        self.page = page;
    }

    /// Back to the pristine startup state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
