// SPDX-License-Identifier: MPL-2.0
//! Search form: image selector, query text and the filter checkboxes.
//!
//! While the mode is `Input` the form is editable. In the result modes it
//! turns into a read-only summary of the running search with a "clear
//! query" control; the filter checkboxes stay live there and re-run the
//! search when toggled.

use crate::i18n::fluent::I18n;
use crate::navigation::layout::{Header, InputPanel, TextPreview};
use crate::navigation::Layout;
use crate::search::query::SearchForm;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::{
    alignment::{Horizontal, Vertical},
    font::Style as FontStyle,
    widget::{button, checkbox, image, text, text_input, Column, Container, Row, Space, Text},
    ContentFit, Element, Font, Length, Theme,
};

/// The accepted image as shown by the form.
#[derive(Debug, Clone)]
pub struct ImagePreview<'a> {
    pub name: &'a str,
    pub handle: &'a image::Handle,
}

/// Contextual data needed to render the form.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub layout: &'a Layout,
    pub form: &'a SearchForm,
    pub image: Option<ImagePreview<'a>>,
    pub max_chars: usize,
    /// A search request is running; submitting again is disabled.
    pub busy: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    TextChanged(String),
    TextFilterToggled(bool),
    IncludeDigitsToggled(bool),
    PickImage,
    RemoveImage,
    Submit,
    ClearQuery,
}

/// Events propagated to the parent application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    None,
    /// A checkbox changed; outside `Input` this re-runs the search.
    FiltersChanged,
    PickImage,
    RemoveImage,
    Submit,
    ClearQuery,
}

/// Applies a form message. `has_image` drives the checkbox rules.
pub fn update(form: &mut SearchForm, message: Message, max_chars: usize, has_image: bool) -> Event {
    match message {
        Message::TextChanged(text) => {
            form.set_text(&text, max_chars, has_image);
            Event::None
        }
        Message::TextFilterToggled(enabled) => {
            if form.set_text_filter(enabled) {
                Event::FiltersChanged
            } else {
                Event::None
            }
        }
        Message::IncludeDigitsToggled(enabled) => {
            form.set_include_digits(enabled);
            Event::FiltersChanged
        }
        Message::PickImage => Event::PickImage,
        Message::RemoveImage => Event::RemoveImage,
        Message::Submit => Event::Submit,
        Message::ClearQuery => Event::ClearQuery,
    }
}

/// Character counter label, e.g. `12 / 500`.
#[must_use]
pub fn counter_label(i18n: &I18n, count: usize, max: usize) -> String {
    let count = count.to_string();
    let max = max.to_string();
    i18n.tr_with_args(
        "input-char-counter",
        &[("count", count.as_str()), ("max", max.as_str())],
    )
}

/// Render the search form.
pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let header_key = match ctx.layout.header {
        Header::EnterSearch => "input-header-enter",
        Header::ShowingSearch => "input-header-showing",
    };
    let header = Text::new(ctx.i18n.tr(header_key)).size(typography::TITLE_MD);

    let body = match ctx.layout.input {
        InputPanel::Editable => editable(&ctx),
        InputPanel::ReadOnly { text } => read_only(&ctx, text),
    };

    Container::new(
        Column::new()
            .spacing(spacing::MD)
            .push(header)
            .push(body)
            .push(filters(&ctx)),
    )
    .padding(spacing::LG)
    .width(Length::Fill)
    .style(styles::container::panel)
    .into()
}

fn editable<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let mut selector = Row::new()
        .spacing(spacing::SM)
        .align_y(Vertical::Center)
        .push(
            button(Text::new(ctx.i18n.tr("input-choose-image")).size(typography::BODY))
                .on_press(Message::PickImage)
                .style(styles::button::flat),
        );

    let label = match &ctx.image {
        Some(preview) => Text::new(preview.name.to_string()),
        None => Text::new(ctx.i18n.tr("input-no-image-selected")).font(Font {
            style: FontStyle::Italic,
            ..Font::DEFAULT
        }),
    };
    selector = selector.push(label.size(typography::BODY));
    if ctx.image.is_some() {
        selector = selector.push(
            button(Text::new("\u{2715}").size(typography::BODY))
                .on_press(Message::RemoveImage)
                .style(styles::button::ghost),
        );
    }

    let mut column = Column::new().spacing(spacing::SM).push(selector);
    if let Some(preview) = &ctx.image {
        column = column.push(preview_image(preview.handle));
    }

    let input = text_input(&ctx.i18n.tr("input-text-placeholder"), ctx.form.text())
        .on_input(Message::TextChanged)
        .on_submit(Message::Submit)
        .size(typography::BODY_LG)
        .padding(spacing::XS);

    let counter = Text::new(counter_label(
        ctx.i18n,
        ctx.form.char_count(),
        ctx.max_chars,
    ))
    .size(typography::CAPTION);

    let submit = button(Text::new(ctx.i18n.tr("input-new-results")).size(typography::BODY))
        .padding([spacing::XS, spacing::MD])
        .style(styles::button::primary);
    let submit = if ctx.busy {
        submit
    } else {
        submit.on_press(Message::Submit)
    };

    column
        .push(input)
        .push(
            Row::new()
                .align_y(Vertical::Center)
                .push(counter)
                .push(Space::new().width(Length::Fill))
                .push(submit),
        )
        .into()
}

fn read_only<'a>(ctx: &ViewContext<'a>, preview: TextPreview) -> Element<'a, Message> {
    let image: Element<'a, Message> = match (&ctx.image, ctx.layout.show_photo_placeholder) {
        (Some(image), false) => preview_image(image.handle),
        _ => Text::new(ctx.i18n.tr("input-no-photo"))
            .size(typography::BODY)
            .font(Font {
                style: FontStyle::Italic,
                ..Font::DEFAULT
            })
            .into(),
    };

    let query: Element<'a, Message> = match preview {
        TextPreview::Entered => Text::new(ctx.form.text()).size(typography::BODY_LG).into(),
        TextPreview::Placeholder => Text::new(ctx.i18n.tr("input-no-text"))
            .size(typography::BODY)
            .style(|theme: &Theme| text::Style {
                color: Some(theme.extended_palette().background.strong.text),
            })
            .into(),
    };

    let clear = button(Text::new(ctx.i18n.tr("input-clear-query")).size(typography::BODY))
        .on_press(Message::ClearQuery)
        .padding([spacing::XS, spacing::MD])
        .style(styles::button::flat);

    Column::new()
        .spacing(spacing::SM)
        .push(image)
        .push(query)
        .push(
            Row::new()
                .push(Space::new().width(Length::Fill))
                .push(clear),
        )
        .into()
}

fn filters<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let text_filter = checkbox(ctx.form.text_filter())
        .label(ctx.i18n.tr("input-text-filter"))
        .size(typography::BODY_LG)
        .text_size(typography::BODY);
    // Locked: rendered disabled, without a toggle handler
    let text_filter = if ctx.form.text_filter_locked() {
        text_filter
    } else {
        text_filter.on_toggle(Message::TextFilterToggled)
    };

    let include_digits = checkbox(ctx.form.include_digits())
        .label(ctx.i18n.tr("input-include-digits"))
        .size(typography::BODY_LG)
        .text_size(typography::BODY)
        .on_toggle(Message::IncludeDigitsToggled);

    Row::new()
        .spacing(spacing::LG)
        .push(text_filter)
        .push(include_digits)
        .into()
}

fn preview_image<'a>(handle: &image::Handle) -> Element<'a, Message> {
    Container::new(
        image::Image::new(handle.clone())
            .content_fit(ContentFit::Contain)
            .height(Length::Fixed(sizing::PREVIEW_HEIGHT)),
    )
    .width(Length::Fill)
    .align_x(Horizontal::Center)
    .into()
}
