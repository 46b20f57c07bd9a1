// SPDX-License-Identifier: MPL-2.0
//! State of the running search, owned by the application root.

use crate::navigation::{layout, FormSummary, Layout, NavigationState};
use crate::search::query::SearchForm;
use crate::search::validation::SelectedImage;
use crate::ui::results::Panels;
use iced::widget::image;

/// The accepted image together with its preview handle.
#[derive(Debug, Clone)]
pub struct AttachedImage {
    pub file: SelectedImage,
    pub handle: image::Handle,
}

impl AttachedImage {
    #[must_use]
    pub fn new(file: SelectedImage) -> Self {
        let handle = image::Handle::from_bytes(file.bytes.clone());
        Self { file, handle }
    }
}

/// Everything that "navigate home" throws away.
#[derive(Debug, Default)]
pub struct SearchSession {
    pub navigation: NavigationState,
    pub form: SearchForm,
    pub image: Option<AttachedImage>,
    /// Token of the last successful search.
    pub results_id: Option<String>,
    pub panels: Panels,
}

impl SearchSession {
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    #[must_use]
    pub fn form_summary(&self) -> FormSummary {
        FormSummary {
            has_text: self.form.has_text(),
            has_image: self.has_image(),
        }
    }

    /// View description for the current page and mode.
    #[must_use]
    pub fn layout(&self) -> Layout {
        layout(
            self.navigation.page(),
            self.navigation.mode(),
            self.navigation.source(),
            self.form_summary(),
        )
    }

    pub fn attach_image(&mut self, file: SelectedImage) {
        self.image = Some(AttachedImage::new(file));
        self.form.on_input_change(true);
    }

    /// Drops the selected image. The results token belongs to the image
    /// input and goes with it.
    pub fn clear_image(&mut self) {
        self.image = None;
        self.results_id = None;
        self.form.on_input_change(false);
    }

    /// Back to the startup state; requests in flight are orphaned.
    pub fn reset(&mut self) {
        self.navigation.reset();
        self.form.clear();
        self.image = None;
        self.results_id = None;
        self.panels.reset_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{Mode, Page, ResultContainer};

    fn png() -> SelectedImage {
        SelectedImage {
            name: "cobra.png".to_string(),
            size: 4,
            bytes: vec![0u8; 4],
        }
    }

    #[test]
    fn attaching_an_image_unlocks_the_text_filter() {
        let mut session = SearchSession::default();
        session.form.set_text("cobra", 500, false);
        assert!(session.form.text_filter_locked());

        session.attach_image(png());
        assert!(session.has_image());
        assert!(!session.form.text_filter_locked());
        assert!(!session.form.include_digits());
    }

    #[test]
    fn clearing_the_image_forgets_the_results_token() {
        let mut session = SearchSession::default();
        session.attach_image(png());
        session.results_id = Some("abc".to_string());

        session.clear_image();
        assert!(!session.has_image());
        assert_eq!(session.results_id, None);
    }

    #[test]
    fn reset_restores_startup_state() {
        let mut session = SearchSession::default();
        session.attach_image(png());
        session.form.set_text("cobra", 500, true);
        session.results_id = Some("abc".to_string());
        session.navigation.switch_mode(Mode::ViewGroup, None);
        let ticket = session
            .panels
            .get_mut(ResultContainer::Group)
            .begin_request();

        session.reset();

        assert_eq!(session.navigation.mode(), Mode::Input);
        assert_eq!(session.navigation.page(), Page::Index);
        assert!(!session.has_image());
        assert!(!session.form.has_text());
        assert_eq!(session.results_id, None);
        assert!(!session.panels.get(ResultContainer::Group).accepts(ticket));
    }

    #[test]
    fn layout_follows_the_session() {
        let mut session = SearchSession::default();
        assert_eq!(session.layout().result_container, None);

        session.navigation.switch_mode(Mode::ViewResults, None);
        assert_eq!(
            session.layout().result_container,
            Some(ResultContainer::Results)
        );
    }
}
