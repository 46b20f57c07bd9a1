// SPDX-License-Identifier: MPL-2.0
//! Result containers: the results list, one group and one item.
//!
//! Each container keeps the last fragment it received and a request fence.
//! A response is only installed when its ticket is still the newest one for
//! that container; anything older is dropped.

use crate::fragment::{Fragment, FragmentAction, ImageCache};
use crate::i18n::fluent::I18n;
use crate::navigation::ResultContainer;
use crate::search::sequence::{RequestFence, Ticket};
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::fragment_view;
use crate::ui::styles;
use iced::{
    alignment::Horizontal,
    widget::{Column, Container, Text},
    Element, Length,
};
use std::collections::HashSet;

/// What a container currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Content {
    #[default]
    Empty,
    Loading,
    Ready {
        fragment: Fragment,
        /// Expanded meta blocks of this fragment.
        open_meta: HashSet<usize>,
    },
    /// i18n key of the failure.
    Failed(&'static str),
}

/// One result container.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    content: Content,
    fence: RequestFence,
}

impl Panel {
    /// Issues a ticket for a new request and shows the loading placeholder.
    pub fn begin_request(&mut self) -> Ticket {
        self.content = Content::Loading;
        self.fence.issue()
    }

    /// Whether a response carrying `ticket` may still be shown.
    #[must_use]
    pub fn accepts(&self, ticket: Ticket) -> bool {
        self.fence.accept(ticket)
    }

    pub fn show(&mut self, fragment: Fragment) {
        self.content = Content::Ready {
            fragment,
            open_meta: HashSet::new(),
        };
    }

    pub fn fail(&mut self, key: &'static str) {
        self.content = Content::Failed(key);
    }

    /// Empties the container and orphans every request in flight.
    pub fn reset(&mut self) {
        self.content = Content::Empty;
        self.fence.invalidate();
    }

    pub fn toggle_meta(&mut self, id: usize) {
        if let Content::Ready { open_meta, .. } = &mut self.content {
            if !open_meta.remove(&id) {
                open_meta.insert(id);
            }
        }
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[must_use]
    pub fn fragment(&self) -> Option<&Fragment> {
        match &self.content {
            Content::Ready { fragment, .. } => Some(fragment),
            _ => None,
        }
    }
}

/// The three result containers, addressed by [`ResultContainer`].
#[derive(Debug, Clone, Default)]
pub struct Panels {
    panels: [Panel; 3],
}

impl Panels {
    #[must_use]
    pub fn get(&self, container: ResultContainer) -> &Panel {
        &self.panels[container.index()]
    }

    pub fn get_mut(&mut self, container: ResultContainer) -> &mut Panel {
        &mut self.panels[container.index()]
    }

    pub fn reset_all(&mut self) {
        for panel in &mut self.panels {
            panel.reset();
        }
    }

    /// Image sources of every installed fragment.
    #[must_use]
    pub fn image_sources(&self) -> Vec<String> {
        let mut sources = Vec::new();
        for panel in &self.panels {
            if let Some(fragment) = panel.fragment() {
                for src in fragment.image_sources() {
                    if !sources.contains(&src) {
                        sources.push(src);
                    }
                }
            }
        }
        sources
    }
}

/// Events propagated to the parent application.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    None,
    Action(FragmentAction),
}

/// Handles a message from the container's fragment.
pub fn update(panel: &mut Panel, message: fragment_view::Message) -> Event {
    match message {
        fragment_view::Message::Action(action) => Event::Action(action),
        fragment_view::Message::ToggleMeta(id) => {
            panel.toggle_meta(id);
            Event::None
        }
    }
}

/// Contextual data needed to render a container.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub panel: &'a Panel,
    pub images: &'a ImageCache,
}

/// Render the container content.
pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, fragment_view::Message> {
    let body: Element<'a, fragment_view::Message> = match ctx.panel.content() {
        Content::Empty => Column::new().into(),
        Content::Loading => Container::new(
            Text::new(ctx.i18n.tr("results-loading")).size(typography::BODY_LG),
        )
        .width(Length::Fill)
        .align_x(Horizontal::Center)
        .padding(spacing::XL)
        .into(),
        Content::Failed(key) => Container::new(Text::new(ctx.i18n.tr(key)).size(typography::BODY))
            .padding(spacing::SM)
            .width(Length::Fill)
            .style(styles::container::error_block)
            .into(),
        Content::Ready {
            fragment,
            open_meta,
        } => {
            let fragment_ctx = fragment_view::ViewContext {
                i18n: ctx.i18n,
                images: ctx.images,
                open_meta,
            };
            if fragment.is_empty() {
                Text::new(ctx.i18n.tr("results-empty"))
                    .size(typography::BODY)
                    .into()
            } else {
                fragment_view::blocks(&fragment_ctx, &fragment.blocks)
            }
        }
    };

    Container::new(body)
        .max_width(sizing::CONTENT_MAX_WIDTH)
        .width(Length::Fill)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_response_is_rejected_after_a_newer_request() {
        let mut panel = Panel::default();
        let first = panel.begin_request();
        let second = panel.begin_request();

        assert!(!panel.accepts(first));
        assert!(panel.accepts(second));
    }

    #[test]
    fn reset_orphans_requests_in_flight() {
        let mut panel = Panel::default();
        let ticket = panel.begin_request();
        panel.reset();

        assert!(!panel.accepts(ticket));
        assert_eq!(panel.content(), &Content::Empty);
    }

    #[test]
    fn loading_then_fragment() {
        let mut panel = Panel::default();
        panel.begin_request();
        assert_eq!(panel.content(), &Content::Loading);

        panel.show(Fragment::parse("<p>done</p>"));
        assert!(panel.fragment().is_some());
    }

    #[test]
    fn meta_blocks_toggle_independently() {
        let mut panel = Panel::default();
        panel.show(Fragment::parse(
            r#"<div class="accordion-meta-data">A<div class="toggle-content">a</div></div>
               <div class="accordion-meta-data">B<div class="toggle-content">b</div></div>"#,
        ));

        assert_eq!(update(&mut panel, fragment_view::Message::ToggleMeta(0)), Event::None);
        update(&mut panel, fragment_view::Message::ToggleMeta(1));
        match panel.content() {
            Content::Ready { open_meta, .. } => {
                assert!(open_meta.contains(&0));
                assert!(open_meta.contains(&1));
            }
            other => panic!("unexpected {:?}", other),
        }

        update(&mut panel, fragment_view::Message::ToggleMeta(0));
        match panel.content() {
            Content::Ready { open_meta, .. } => {
                assert!(!open_meta.contains(&0));
                assert!(open_meta.contains(&1));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn actions_are_forwarded() {
        let mut panel = Panel::default();
        let action = FragmentAction::RetrieveResults { page: 2 };
        assert_eq!(
            update(&mut panel, fragment_view::Message::Action(action.clone())),
            Event::Action(action)
        );
    }

    #[test]
    fn panels_are_independent() {
        let mut panels = Panels::default();
        let results = panels.get_mut(ResultContainer::Results).begin_request();
        let group = panels.get_mut(ResultContainer::Group).begin_request();
        panels.get_mut(ResultContainer::Group).begin_request();

        assert!(panels.get(ResultContainer::Results).accepts(results));
        assert!(!panels.get(ResultContainer::Group).accepts(group));

        panels.reset_all();
        assert!(!panels.get(ResultContainer::Results).accepts(results));
    }

    #[test]
    fn container_renders_every_state() {
        let i18n = I18n::default();
        let images = ImageCache::new(1);
        let mut panel = Panel::default();
        assert!(matches!(panel.content(), Content::Empty));
        drop(view(ViewContext {
            i18n: &i18n,
            panel: &panel,
            images: &images,
        }));

        panel.fail("error-server-timeout");
        assert!(matches!(panel.content(), Content::Failed("error-server-timeout")));
        drop(view(ViewContext {
            i18n: &i18n,
            panel: &panel,
            images: &images,
        }));

        panel.show(Fragment::from_errors(vec!["No results".into()]));
        assert!(panel.fragment().is_some());
        drop(view(ViewContext {
            i18n: &i18n,
            panel: &panel,
            images: &images,
        }));
    }
}
