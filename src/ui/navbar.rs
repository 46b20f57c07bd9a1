// SPDX-License-Identifier: MPL-2.0
//! Navigation bar rendered from [`Layout`].
//!
//! Three variants exist: the title bar while editing the search, the
//! breadcrumb bar of the result views and the help page bar. Which one is
//! shown, and which breadcrumbs it carries, is decided by
//! [`crate::navigation::layout`]; this module only draws it.

use crate::i18n::fluent::I18n;
use crate::navigation::{Layout, MenuEntry, NavigationBar};
use crate::ui::design_tokens::{border, radius, spacing, typography};
use crate::ui::styles;
use iced::{
    alignment::{Horizontal, Vertical},
    widget::{button, container, Column, Container, Row, Space, Text},
    Border, Element, Length, Theme,
};
use unic_langid::LanguageIdentifier;

/// Contextual data needed to render the navbar.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub layout: &'a Layout,
    /// Whether the language dropdown is open.
    pub menu_open: bool,
}

/// Messages emitted by the navbar.
#[derive(Debug, Clone)]
pub enum Message {
    Breadcrumb(MenuEntry),
    OpenHelp,
    CloseHelp,
    ToggleLanguageMenu,
    SelectLanguage(LanguageIdentifier),
}

/// Events propagated to the parent application.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    None,
    NavigateHome,
    NavigateResults,
    NavigateGroup,
    OpenHelp,
    CloseHelp,
    SelectLanguage(LanguageIdentifier),
}

/// Process a navbar message and return the corresponding event.
pub fn update(message: Message, menu_open: &mut bool) -> Event {
    match message {
        Message::ToggleLanguageMenu => {
            *menu_open = !*menu_open;
            Event::None
        }
        Message::SelectLanguage(locale) => {
            *menu_open = false;
            Event::SelectLanguage(locale)
        }
        Message::OpenHelp => {
            *menu_open = false;
            Event::OpenHelp
        }
        Message::CloseHelp => {
            *menu_open = false;
            Event::CloseHelp
        }
        Message::Breadcrumb(entry) => {
            *menu_open = false;
            match entry {
                MenuEntry::NavigateHome => Event::NavigateHome,
                MenuEntry::NavigateResults => Event::NavigateResults,
                MenuEntry::NavigateGroup => Event::NavigateGroup,
                // Current position, nothing to do
                MenuEntry::Results | MenuEntry::Group | MenuEntry::Item => Event::None,
            }
        }
    }
}

/// Render the navigation bar.
pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let bar = match ctx.layout.navigation_bar {
        NavigationBar::Title => title_bar(&ctx),
        NavigationBar::Results => results_bar(&ctx),
        NavigationBar::Help => help_bar(&ctx),
    };

    let mut content = Column::new().width(Length::Fill).push(
        Container::new(bar)
            .width(Length::Fill)
            .align_x(Horizontal::Left)
            .style(styles::container::toolbar),
    );

    if ctx.menu_open {
        content = content.push(
            Container::new(language_dropdown(&ctx))
                .width(Length::Fill)
                .align_x(Horizontal::Right)
                .padding([0.0, spacing::SM]),
        );
    }

    content.into()
}

fn title_bar<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    Row::new()
        .spacing(spacing::SM)
        .padding(spacing::SM)
        .align_y(Vertical::Center)
        .push(Text::new(ctx.i18n.tr("window-title")).size(typography::TITLE_MD))
        .push(Space::new().width(Length::Fill))
        .push(help_button(ctx))
        .push(language_button(ctx))
        .into()
}

fn results_bar<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let mut row = Row::new()
        .spacing(spacing::XS)
        .padding(spacing::SM)
        .align_y(Vertical::Center);

    for (position, entry) in ctx.layout.menu.iter().copied().enumerate() {
        if position > 0 {
            row = row.push(Text::new("\u{203A}").size(typography::BODY));
        }
        row = row.push(breadcrumb(ctx.i18n, entry));
    }

    row.push(Space::new().width(Length::Fill))
        .push(help_button(ctx))
        .push(language_button(ctx))
        .into()
}

fn help_bar<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let back = button(
        Text::new(format!("\u{2190} {}", ctx.i18n.tr("navbar-back"))).size(typography::BODY),
    )
    .on_press(Message::CloseHelp)
    .style(styles::button::link);

    Row::new()
        .spacing(spacing::SM)
        .padding(spacing::SM)
        .align_y(Vertical::Center)
        .push(back)
        .push(Text::new(ctx.i18n.tr("help-title")).size(typography::TITLE_MD))
        .push(Space::new().width(Length::Fill))
        .push(language_button(ctx))
        .into()
}

fn breadcrumb<'a>(i18n: &I18n, entry: MenuEntry) -> Element<'a, Message> {
    let key = match entry {
        MenuEntry::NavigateHome => "navbar-home",
        MenuEntry::NavigateResults | MenuEntry::Results => "navbar-results",
        MenuEntry::NavigateGroup | MenuEntry::Group => "navbar-group",
        MenuEntry::Item => "navbar-item",
    };
    let label = Text::new(i18n.tr(key)).size(typography::BODY);

    if entry.is_current() {
        // No on_press: rendered with the disabled variant of `selected`
        button(label)
            .padding([spacing::XXS, spacing::XS])
            .style(styles::button::selected)
            .into()
    } else {
        button(label)
            .on_press(Message::Breadcrumb(entry))
            .padding([spacing::XXS, spacing::XS])
            .style(styles::button::link)
            .into()
    }
}

fn help_button<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    button(Text::new(ctx.i18n.tr("navbar-help")).size(typography::BODY))
        .on_press(Message::OpenHelp)
        .style(styles::button::link)
        .into()
}

fn language_button<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let label = format!(
        "{} \u{25BE}",
        ctx.i18n.current_locale().language.as_str().to_uppercase()
    );
    button(Text::new(label).size(typography::BODY))
        .on_press(Message::ToggleLanguageMenu)
        .style(styles::button::ghost)
        .into()
}

/// Dropdown listing the bundled translations.
fn language_dropdown<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let i18n = ctx.i18n;
    let items = i18n.available_locales.iter().map(|locale| {
        let key = format!("language-name-{locale}");
        let style: fn(&Theme, button::Status) -> button::Style = if locale == i18n.current_locale() {
            styles::button::selected
        } else {
            styles::button::flat
        };
        button(Text::new(i18n.tr(&key)).size(typography::BODY))
            .on_press(Message::SelectLanguage(locale.clone()))
            .padding([spacing::XS, spacing::SM])
            .width(Length::Fill)
            .style(style)
            .into()
    });

    Container::new(Column::with_children(items).spacing(spacing::XXS))
        .padding(spacing::XS)
        .max_width(200.0)
        .style(|theme: &Theme| container::Style {
            background: Some(theme.extended_palette().background.weak.color.into()),
            border: Border {
                radius: radius::SM.into(),
                width: border::WIDTH_SM,
                color: theme.extended_palette().background.strong.color,
            },
            ..Default::default()
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{layout, FormSummary, Mode, Page, Source};

    fn render(page: Page, mode: Mode, source: Option<Source>, menu_open: bool) {
        let i18n = I18n::default();
        let layout = layout(page, mode, source, FormSummary::default());
        let _element = view(ViewContext {
            i18n: &i18n,
            layout: &layout,
            menu_open,
        });
    }

    #[test]
    fn every_bar_variant_renders() {
        render(Page::Index, Mode::Input, None, false);
        render(Page::Index, Mode::ViewResults, None, false);
        render(Page::Index, Mode::ViewItem, Some(Source::Group), false);
        render(Page::Help, Mode::Input, None, false);
        render(Page::Index, Mode::Input, None, true);
    }

    #[test]
    fn breadcrumb_links_emit_navigation_events() {
        let mut menu_open = false;
        assert_eq!(
            update(Message::Breadcrumb(MenuEntry::NavigateHome), &mut menu_open),
            Event::NavigateHome
        );
        assert_eq!(
            update(Message::Breadcrumb(MenuEntry::NavigateResults), &mut menu_open),
            Event::NavigateResults
        );
        assert_eq!(
            update(Message::Breadcrumb(MenuEntry::NavigateGroup), &mut menu_open),
            Event::NavigateGroup
        );
    }

    #[test]
    fn current_breadcrumb_is_inert() {
        let mut menu_open = false;
        for entry in [MenuEntry::Results, MenuEntry::Group, MenuEntry::Item] {
            assert_eq!(update(Message::Breadcrumb(entry), &mut menu_open), Event::None);
        }
    }

    #[test]
    fn language_menu_toggles_and_closes_on_selection() {
        let mut menu_open = false;
        assert_eq!(update(Message::ToggleLanguageMenu, &mut menu_open), Event::None);
        assert!(menu_open);

        let nl: LanguageIdentifier = "nl".parse().expect("valid locale");
        let event = update(Message::SelectLanguage(nl.clone()), &mut menu_open);
        assert!(!menu_open);
        assert_eq!(event, Event::SelectLanguage(nl));
    }

    #[test]
    fn help_entries_close_the_menu() {
        let mut menu_open = true;
        assert_eq!(update(Message::OpenHelp, &mut menu_open), Event::OpenHelp);
        assert!(!menu_open);

        menu_open = true;
        assert_eq!(update(Message::CloseHelp, &mut menu_open), Event::CloseHelp);
        assert!(!menu_open);
    }
}
