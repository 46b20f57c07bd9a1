// SPDX-License-Identifier: MPL-2.0
//! Renders parsed server fragments.
//!
//! Shared by the result containers and the help page. Links carrying a
//! [`FragmentAction`] become buttons; plain URLs are shown next to their
//! text but never opened.

use crate::fragment::images::ImageState;
use crate::fragment::{Block, FragmentAction, ImageCache, ImageRef, Inline, LinkTarget, MetaBlock, PageLink};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::{
    alignment::Vertical,
    font::{Style as FontStyle, Weight},
    widget::{button, text, Column, Container, Image, Row, Text},
    ContentFit, Element, Font, Length, Theme,
};
use std::collections::HashSet;

const BOLD: Font = Font {
    weight: Weight::Bold,
    ..Font::DEFAULT
};

const ITALIC: Font = Font {
    style: FontStyle::Italic,
    ..Font::DEFAULT
};

/// Contextual data needed to render fragment blocks.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub images: &'a ImageCache,
    /// Ids of the expanded meta blocks.
    pub open_meta: &'a HashSet<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Action(FragmentAction),
    ToggleMeta(usize),
}

/// Renders a block list as a column.
pub fn blocks<'a>(ctx: &ViewContext<'a>, blocks: &'a [Block]) -> Element<'a, Message> {
    Column::with_children(blocks.iter().map(|item| block(ctx, item)))
        .spacing(spacing::SM)
        .width(Length::Fill)
        .into()
}

fn block<'a>(ctx: &ViewContext<'a>, item: &'a Block) -> Element<'a, Message> {
    match item {
        Block::Heading { level, content } => {
            let size = match level {
                1 => typography::TITLE_LG,
                2 => typography::TITLE_MD,
                _ => typography::TITLE_SM,
            };
            inlines(content, size, true)
        }
        Block::Paragraph(content) => inlines(content, typography::BODY, false),
        Block::Image(image) => image_block(ctx, image),
        Block::List(items) => Column::with_children(items.iter().map(|entry| {
            Row::new()
                .spacing(spacing::XS)
                .push(Text::new("\u{2022}").size(typography::BODY))
                .push(inlines(entry, typography::BODY, false))
                .into()
        }))
        .spacing(spacing::XXS)
        .into(),
        Block::Table(rows) => Column::with_children(rows.iter().map(|cells| {
            Row::with_children(cells.iter().map(|cell| {
                Container::new(inlines(cell, typography::BODY, false))
                    .width(Length::Fill)
                    .into()
            }))
            .spacing(spacing::SM)
            .into()
        }))
        .spacing(spacing::XS)
        .into(),
        Block::Errors(messages) => errors(messages),
        Block::Meta(meta) => meta_block(ctx, meta),
        Block::Pagination(links) => pagination(links),
        Block::Card { action, blocks: inner } => button(blocks(ctx, inner))
            .on_press(Message::Action(action.clone()))
            .padding(spacing::SM)
            .width(Length::Fill)
            .style(styles::button::flat)
            .into(),
    }
}

/// Inline run. Without links a single text widget keeps native wrapping;
/// with links the words flow through a wrapping row.
fn inlines<'a>(content: &'a [Inline], size: f32, bold: bool) -> Element<'a, Message> {
    let has_links = content
        .iter()
        .any(|inline| matches!(inline, Inline::Link { .. }));

    if !has_links {
        let mut joined = String::new();
        let mut all_strong = true;
        for inline in content {
            match inline {
                Inline::Text { text, strong } => {
                    joined.push_str(text);
                    all_strong &= *strong;
                }
                Inline::LineBreak => joined.push('\n'),
                Inline::Link { .. } => {}
            }
        }
        let font = if bold || all_strong { BOLD } else { Font::DEFAULT };
        return Text::new(joined).size(size).font(font).into();
    }

    let mut row = Row::new().spacing(spacing::XXS).align_y(Vertical::Center);
    for inline in content {
        match inline {
            Inline::Text { text, strong } => {
                let font = if bold || *strong { BOLD } else { Font::DEFAULT };
                for word in text.split_whitespace() {
                    row = row.push(Text::new(word).size(size).font(font));
                }
            }
            Inline::Link { text, target } => row = row.push(link(text, target, size)),
            Inline::LineBreak => {}
        }
    }
    row.wrap().into()
}

fn link<'a>(label: &'a str, target: &'a LinkTarget, size: f32) -> Element<'a, Message> {
    match target {
        LinkTarget::Action(action) => button(Text::new(label).size(size))
            .on_press(Message::Action(action.clone()))
            .padding(0)
            .style(styles::button::link)
            .into(),
        LinkTarget::Url(url) => Row::new()
            .spacing(spacing::XXS)
            .align_y(Vertical::Center)
            .push(Text::new(label).size(size))
            .push(
                Text::new(format!("({url})"))
                    .size(typography::CAPTION)
                    .style(|theme: &Theme| text::Style {
                        color: Some(theme.extended_palette().background.strong.text),
                    }),
            )
            .into(),
    }
}

fn image_block<'a>(ctx: &ViewContext<'a>, image: &'a ImageRef) -> Element<'a, Message> {
    let content: Element<'a, Message> = match ctx.images.state(&image.src) {
        ImageState::Ready(handle) => Image::new(handle.clone())
            .content_fit(ContentFit::ScaleDown)
            .into(),
        ImageState::Loading => Text::new(ctx.i18n.tr("results-image-loading"))
            .size(typography::CAPTION)
            .font(ITALIC)
            .into(),
        ImageState::Failed | ImageState::Unknown => {
            let label = if image.alt.is_empty() {
                ctx.i18n.tr("results-image-unavailable")
            } else {
                image.alt.clone()
            };
            Text::new(label)
                .size(typography::CAPTION)
                .font(ITALIC)
                .into()
        }
    };

    Container::new(content)
        .max_width(sizing::FRAGMENT_IMAGE_MAX)
        .max_height(sizing::FRAGMENT_IMAGE_MAX)
        .into()
}

fn errors<'a>(messages: &'a [String]) -> Element<'a, Message> {
    let list = Column::with_children(
        messages
            .iter()
            .map(|message| Text::new(message.as_str()).size(typography::BODY).into()),
    )
    .spacing(spacing::XXS);

    Container::new(list)
        .padding(spacing::SM)
        .width(Length::Fill)
        .style(styles::container::error_block)
        .into()
}

/// Independently collapsible key/value section.
fn meta_block<'a>(ctx: &ViewContext<'a>, meta: &'a MetaBlock) -> Element<'a, Message> {
    let open = ctx.open_meta.contains(&meta.id);
    let glyph = if open { "\u{25BE}" } else { "\u{25B8}" };

    let header = button(
        Row::new()
            .spacing(spacing::XS)
            .align_y(Vertical::Center)
            .push(Text::new(glyph).size(typography::BODY))
            .push(inlines(&meta.title, typography::BODY, true)),
    )
    .on_press(Message::ToggleMeta(meta.id))
    .width(Length::Fill)
    .padding(spacing::XS)
    .style(styles::button::flat);

    let mut column = Column::new().spacing(spacing::XS).push(header);
    if open {
        column = column.push(Container::new(blocks(ctx, &meta.body)).padding([0.0, spacing::MD]));
    }

    Container::new(column)
        .width(Length::Fill)
        .padding(spacing::XXS)
        .style(styles::container::card)
        .into()
}

fn pagination<'a>(links: &'a [PageLink]) -> Element<'a, Message> {
    let mut row = Row::new().spacing(spacing::XXS).align_y(Vertical::Center);
    for page in links {
        let label = Text::new(page.label.as_str()).size(typography::BODY);
        let entry: Element<'a, Message> = match (&page.action, page.current) {
            (_, true) => button(label)
                .padding([spacing::XXS, spacing::XS])
                .style(styles::button::selected)
                .into(),
            (Some(action), false) => button(label)
                .on_press(Message::Action(action.clone()))
                .padding([spacing::XXS, spacing::XS])
                .style(styles::button::link)
                .into(),
            (None, false) => Container::new(label)
                .padding([spacing::XXS, spacing::XS])
                .into(),
        };
        row = row.push(entry);
    }
    row.wrap().into()
}
