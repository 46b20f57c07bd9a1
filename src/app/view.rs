// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! The navbar sits on top of the active page. The index page stacks the
//! search form above the result container of the current mode. Toasts and
//! the modal are layered over everything.

use super::session::SearchSession;
use super::Message;
use crate::fragment::ImageCache;
use crate::i18n::fluent::I18n;
use crate::navigation::{Layout, Page, ResultContainer};
use crate::search::validation::UploadLimits;
use crate::ui::design_tokens::{sizing, spacing};
use crate::ui::help;
use crate::ui::input_form::{self, ImagePreview};
use crate::ui::modal::{self, Modal};
use crate::ui::navbar;
use crate::ui::notifications::{self, Toast};
use crate::ui::results;
use iced::{
    alignment::Horizontal,
    widget::{scrollable, Column, Container, Stack},
    Element, Length,
};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub layout: &'a Layout,
    pub session: &'a SearchSession,
    pub help: &'a help::State,
    pub images: &'a ImageCache,
    pub limits: &'a UploadLimits,
    pub modal: Option<&'a Modal>,
    pub notifications: &'a notifications::Manager,
    pub menu_open: bool,
}

/// Renders the window content.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let navbar = navbar::view(navbar::ViewContext {
        i18n: ctx.i18n,
        layout: ctx.layout,
        menu_open: ctx.menu_open,
    })
    .map(Message::Navbar);

    let page: Element<'_, Message> = match ctx.layout.page {
        Page::Help => help::view(help::ViewContext {
            i18n: ctx.i18n,
            state: ctx.help,
            images: ctx.images,
        })
        .map(Message::Help),
        Page::Index => view_index(&ctx),
    };

    let column = Column::new().push(navbar).push(
        Container::new(page)
            .width(Length::Fill)
            .height(Length::Fill),
    );

    let toasts = Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification);
    let base: Element<'_, Message> = Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(column.width(Length::Fill).height(Length::Fill))
        .push(toasts)
        .into();

    match ctx.modal {
        Some(dialog) => modal::view(base, dialog, ctx.i18n, Message::CloseModal),
        None => base,
    }
}

fn view_index<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let session = ctx.session;
    let busy = matches!(
        session.panels.get(ResultContainer::Results).content(),
        results::Content::Loading
    );

    let form = input_form::view(input_form::ViewContext {
        i18n: ctx.i18n,
        layout: ctx.layout,
        form: &session.form,
        image: session.image.as_ref().map(|attached| ImagePreview {
            name: &attached.file.name,
            handle: &attached.handle,
        }),
        max_chars: ctx.limits.max_chars_text_filter,
        busy,
    })
    .map(Message::InputForm);

    let mut column = Column::new()
        .spacing(spacing::LG)
        .padding(spacing::LG)
        .max_width(sizing::CONTENT_MAX_WIDTH)
        .push(form);

    if let Some(container) = ctx.layout.result_container {
        let panel = results::view(results::ViewContext {
            i18n: ctx.i18n,
            panel: session.panels.get(container),
            images: ctx.images,
        })
        .map(move |message| Message::Results(container, message));
        column = column.push(panel);
    }

    scrollable(
        Container::new(column)
            .width(Length::Fill)
            .align_x(Horizontal::Center),
    )
    .height(Length::Fill)
    .into()
}
