// SPDX-License-Identifier: MPL-2.0
//! Declarative description of what is visible for a `(page, mode, source)` triple.
//!
//! [`layout`] is pure: the renderer in `ui` reads the returned [`Layout`] and
//! never decides visibility on its own.

use super::{Mode, Page, Source};

/// Navigation bar variants. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationBar {
    /// App title with the help entry, used while editing the search.
    Title,
    /// Breadcrumb menu of the result views.
    Results,
    /// Help page bar with a way back to the index.
    Help,
}

/// Regions into which fetched fragments are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultContainer {
    Results,
    Group,
    Item,
}

impl ResultContainer {
    pub const ALL: [ResultContainer; 3] = [
        ResultContainer::Results,
        ResultContainer::Group,
        ResultContainer::Item,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            ResultContainer::Results => 0,
            ResultContainer::Group => 1,
            ResultContainer::Item => 2,
        }
    }
}

/// Breadcrumb entries of the results navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    NavigateHome,
    NavigateResults,
    NavigateGroup,
    /// Current position: the results list.
    Results,
    /// Current position: a group.
    Group,
    /// Current position: an item.
    Item,
}

impl MenuEntry {
    /// Whether the entry marks the current position rather than a link.
    #[must_use]
    pub fn is_current(self) -> bool {
        matches!(self, MenuEntry::Results | MenuEntry::Group | MenuEntry::Item)
    }
}

/// Search form headers: "enter your search" vs "you searched for".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    EnterSearch,
    ShowingSearch,
}

/// How the entered text is presented in read-only modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPreview {
    Entered,
    Placeholder,
}

/// Search form controls, depending on whether the search can be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPanel {
    /// Clickable image selector, text input, character counter and the
    /// "new results" button.
    Editable,
    /// Image preview (or its placeholder), text preview and "clear query".
    ReadOnly { text: TextPreview },
}

/// What the layout needs to know about the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormSummary {
    pub has_text: bool,
    pub has_image: bool,
}

/// Visible elements of the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub page: Page,
    pub navigation_bar: NavigationBar,
    pub result_container: Option<ResultContainer>,
    pub menu: Vec<MenuEntry>,
    pub header: Header,
    pub input: InputPanel,
    /// Placeholder text in the image slot when nothing was selected.
    pub show_photo_placeholder: bool,
}

impl Layout {
    #[must_use]
    pub fn shows_menu(&self, entry: MenuEntry) -> bool {
        self.menu.contains(&entry)
    }
}

/// Navigation bar for a page and mode.
#[must_use]
pub fn navigation_bar(page: Page, mode: Mode) -> NavigationBar {
    match (page, mode) {
        (Page::Help, _) => NavigationBar::Help,
        (Page::Index, Mode::Input) => NavigationBar::Title,
        (Page::Index, _) => NavigationBar::Results,
    }
}

fn menu_entries(mode: Mode, source: Option<Source>) -> Vec<MenuEntry> {
    match mode {
        Mode::Input => Vec::new(),
        Mode::ViewResults => vec![MenuEntry::NavigateHome, MenuEntry::Results],
        Mode::ViewGroup => vec![
            MenuEntry::NavigateHome,
            MenuEntry::NavigateResults,
            MenuEntry::Group,
        ],
        Mode::ViewItem => {
            let mut entries = vec![MenuEntry::NavigateHome, MenuEntry::NavigateResults];
            if source == Some(Source::Group) {
                entries.push(MenuEntry::NavigateGroup);
            }
            entries.push(MenuEntry::Item);
            entries
        }
    }
}

/// Computes the visible layout.
#[must_use]
pub fn layout(page: Page, mode: Mode, source: Option<Source>, form: FormSummary) -> Layout {
    let (header, input) = if mode.is_input() {
        (Header::EnterSearch, InputPanel::Editable)
    } else {
        let text = if form.has_text {
            TextPreview::Entered
        } else {
            TextPreview::Placeholder
        };
        (Header::ShowingSearch, InputPanel::ReadOnly { text })
    };

    Layout {
        page,
        navigation_bar: navigation_bar(page, mode),
        result_container: mode.result_container(),
        menu: menu_entries(mode, source),
        header,
        input,
        show_photo_placeholder: !form.has_image,
    }
}
