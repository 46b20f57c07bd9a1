// SPDX-License-Identifier: MPL-2.0
//! Help page with the server's usage documentation.
//!
//! The page is fetched from the server and split into accordion sections.
//! At most one section is open; opening a section closes the others. The
//! state is rebuilt from scratch every time the page is loaded.

use crate::fragment::{FragmentAction, HelpDocument, ImageCache};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{radius, spacing, typography};
use crate::ui::fragment_view;
use crate::ui::styles;
use iced::{
    alignment::{Horizontal, Vertical},
    widget::{button, container, scrollable, Column, Container, Row, Text},
    Border, Element, Length, Theme,
};
use std::collections::HashSet;

/// Indicator of an expanded section.
pub const OPEN_GLYPH: &str = "\u{FE3F}";
/// Indicator of a collapsed section.
pub const CLOSED_GLYPH: &str = "\u{FE40}";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Content {
    #[default]
    Loading,
    Ready(HelpDocument),
    /// i18n key of the failure.
    Failed(&'static str),
}

/// Help page state: the fetched document and the open section.
#[derive(Debug, Clone, Default)]
pub struct State {
    content: Content,
    open: Option<usize>,
    open_meta: HashSet<usize>,
}

impl State {
    /// Shows the loading placeholder and collapses everything.
    pub fn begin_loading(&mut self) {
        *self = Self::default();
    }

    /// Installs a freshly fetched document with every section collapsed.
    pub fn load(&mut self, document: HelpDocument) {
        self.content = Content::Ready(document);
        self.open = None;
        self.open_meta.clear();
    }

    pub fn fail(&mut self, key: &'static str) {
        self.content = Content::Failed(key);
        self.open = None;
        self.open_meta.clear();
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[must_use]
    pub fn open_section(&self) -> Option<usize> {
        self.open
    }

    #[must_use]
    pub fn is_open(&self, section: usize) -> bool {
        self.open == Some(section)
    }

    fn section_count(&self) -> usize {
        match &self.content {
            Content::Ready(document) => document.sections.len(),
            Content::Loading | Content::Failed(_) => 0,
        }
    }

    /// Closes an open section, otherwise opens it and closes all others.
    pub fn toggle(&mut self, section: usize) {
        if section >= self.section_count() {
            return;
        }
        self.open = if self.is_open(section) {
            None
        } else {
            Some(section)
        };
    }
}

/// Contextual data needed to render the help screen.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub images: &'a ImageCache,
}

/// Messages emitted by the help screen.
#[derive(Debug, Clone)]
pub enum Message {
    ToggleSection(usize),
    Fragment(fragment_view::Message),
}

/// Events propagated to the parent application.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    None,
    /// A link inside the help text called a page function.
    Action(FragmentAction),
}

/// Process a help screen message and return the corresponding event.
pub fn update(state: &mut State, message: Message) -> Event {
    match message {
        Message::ToggleSection(section) => {
            state.toggle(section);
            Event::None
        }
        Message::Fragment(fragment_view::Message::Action(action)) => Event::Action(action),
        Message::Fragment(fragment_view::Message::ToggleMeta(id)) => {
            if !state.open_meta.remove(&id) {
                state.open_meta.insert(id);
            }
            Event::None
        }
    }
}

/// Render the help screen.
pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let title = Text::new(ctx.i18n.tr("help-title")).size(typography::TITLE_LG);
    let mut content = Column::new()
        .width(Length::Fill)
        .spacing(spacing::SM)
        .align_x(Horizontal::Left)
        .padding(spacing::MD)
        .push(title);

    match ctx.state.content() {
        Content::Loading => {
            content = content.push(Text::new(ctx.i18n.tr("help-loading")).size(typography::BODY));
        }
        Content::Failed(key) => {
            content = content.push(
                Container::new(Text::new(ctx.i18n.tr(key)).size(typography::BODY))
                    .padding(spacing::SM)
                    .width(Length::Fill)
                    .style(styles::container::error_block),
            );
        }
        Content::Ready(document) => {
            let fragment_ctx = fragment_view::ViewContext {
                i18n: ctx.i18n,
                images: ctx.images,
                open_meta: &ctx.state.open_meta,
            };

            if !document.intro.is_empty() {
                content = content
                    .push(fragment_view::blocks(&fragment_ctx, &document.intro).map(Message::Fragment));
            }
            for (index, section) in document.sections.iter().enumerate() {
                content = content.push(build_collapsible_section(
                    &fragment_ctx,
                    index,
                    &section.title,
                    &section.body,
                    ctx.state.is_open(index),
                ));
            }
        }
    }

    scrollable(
        Container::new(content)
            .width(Length::Fill)
            .align_x(Horizontal::Center),
    )
    .into()
}

/// Build a collapsible section with header and content.
fn build_collapsible_section<'a>(
    ctx: &fragment_view::ViewContext<'a>,
    index: usize,
    title: &'a str,
    body: &'a [crate::fragment::Block],
    is_open: bool,
) -> Element<'a, Message> {
    let indicator = Text::new(if is_open { OPEN_GLYPH } else { CLOSED_GLYPH }).size(typography::BODY);

    let header_content = Row::new()
        .spacing(spacing::SM)
        .align_y(Vertical::Center)
        .push(Text::new(title).size(typography::TITLE_SM).width(Length::Fill))
        .push(indicator);

    let header = button(header_content)
        .width(Length::Fill)
        .padding(spacing::SM)
        .style(styles::button::flat)
        .on_press(Message::ToggleSection(index));

    let mut section_column = Column::new().spacing(spacing::XS).push(header);

    if is_open {
        let content_container = Container::new(fragment_view::blocks(ctx, body).map(Message::Fragment))
            .padding(spacing::MD)
            .width(Length::Fill)
            .style(|theme: &Theme| container::Style {
                background: Some(theme.extended_palette().background.weak.color.into()),
                border: Border {
                    radius: radius::MD.into(),
                    ..Default::default()
                },
                ..Default::default()
            });
        section_column = section_column.push(content_container);
    }

    section_column.into()
}
