// SPDX-License-Identifier: MPL-2.0
//! Blocking dialogs for input the user has to correct.

use crate::i18n::fluent::I18n;
use crate::search::validation::{AllowedExtensions, Rejection};
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::styles;
use iced::{
    alignment::{Horizontal, Vertical},
    widget::{button, mouse_area, opaque, Column, Container, Row, Space, Stack, Text},
    Element, Length,
};

/// Dialog currently shown above the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Picked file has an extension outside the allow list.
    WrongFileFormat { allowed: String },
    /// Picked file is at or above the upload limit (bytes).
    WrongFileSize { limit: u64 },
    /// Search submitted without text and without an image.
    NoPhotoText,
}

impl Modal {
    /// Dialog explaining a rejected image.
    #[must_use]
    pub fn for_rejection(rejection: &Rejection, allowed: &AllowedExtensions) -> Self {
        match rejection {
            Rejection::WrongFormat => Modal::WrongFileFormat {
                allowed: allowed.as_str().to_string(),
            },
            Rejection::TooLarge { limit, .. } => Modal::WrongFileSize { limit: *limit },
        }
    }

    fn key_prefix(&self) -> &'static str {
        match self {
            Modal::WrongFileFormat { .. } => "modal-wrong-file-format",
            Modal::WrongFileSize { .. } => "modal-wrong-file-size",
            Modal::NoPhotoText => "modal-no-photo-text",
        }
    }

    #[must_use]
    pub fn title(&self, i18n: &I18n) -> String {
        i18n.tr(&format!("{}-title", self.key_prefix()))
    }

    #[must_use]
    pub fn body(&self, i18n: &I18n) -> String {
        let key = format!("{}-body", self.key_prefix());
        match self {
            Modal::WrongFileFormat { allowed } => {
                i18n.tr_with_args(&key, &[("allowed", allowed.as_str())])
            }
            Modal::WrongFileSize { limit } => {
                i18n.tr_with_args(&key, &[("limit", format_megabytes(*limit).as_str())])
            }
            Modal::NoPhotoText => i18n.tr(&key),
        }
    }
}

/// Byte count as megabytes with at most one decimal, e.g. `10` or `2.5`.
#[must_use]
pub fn format_megabytes(bytes: u64) -> String {
    // Precision loss is irrelevant for display
    #[allow(clippy::cast_precision_loss)]
    let megabytes = bytes as f64 / (1024.0 * 1024.0);
    let rounded = (megabytes * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// Draws `modal` centered above `base`, dimming and blocking the rest.
/// Clicking the backdrop or the close button emits `on_close`.
pub fn view<'a, Message: Clone + 'a>(
    base: Element<'a, Message>,
    modal: &Modal,
    i18n: &'a I18n,
    on_close: Message,
) -> Element<'a, Message> {
    let title = Text::new(modal.title(i18n))
        .size(typography::TITLE_SM)
        .style(|_theme: &iced::Theme| iced::widget::text::Style {
            color: Some(palette::ERROR_500),
        });
    let body = Text::new(modal.body(i18n)).size(typography::BODY);

    let close = button(Text::new(i18n.tr("modal-close")).size(typography::BODY))
        .on_press(on_close.clone())
        .padding([spacing::XS, spacing::MD])
        .style(styles::button::primary);

    let dialog = Container::new(
        Column::new()
            .spacing(spacing::MD)
            .push(title)
            .push(body)
            .push(
                Row::new()
                    .push(Space::new().width(Length::Fill))
                    .push(close),
            ),
    )
    .width(Length::Fixed(sizing::MODAL_WIDTH))
    .padding(spacing::LG)
    .style(styles::container::floating(palette::ERROR_500));

    let backdrop = mouse_area(
        Container::new(opaque(dialog))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center)
            .style(styles::container::backdrop),
    )
    .on_press(on_close);

    Stack::new().push(base).push(opaque(backdrop)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_map_to_their_dialog() {
        let allowed = AllowedExtensions::new(".png,.jpg");
        assert_eq!(
            Modal::for_rejection(&Rejection::WrongFormat, &allowed),
            Modal::WrongFileFormat {
                allowed: ".png,.jpg".to_string()
            }
        );
        assert_eq!(
            Modal::for_rejection(
                &Rejection::TooLarge {
                    size: 20,
                    limit: 10
                },
                &allowed
            ),
            Modal::WrongFileSize { limit: 10 }
        );
    }

    #[test]
    fn megabytes_are_rounded_for_display() {
        assert_eq!(format_megabytes(10 * 1024 * 1024), "10");
        assert_eq!(format_megabytes(5 * 1024 * 1024 / 2), "2.5");
        assert_eq!(format_megabytes(0), "0");
    }

    #[test]
    fn dialog_texts_are_translated() {
        let i18n = I18n::default();
        let modal = Modal::WrongFileSize {
            limit: 10 * 1024 * 1024,
        };
        assert!(!modal.title(&i18n).starts_with("MISSING"));
        assert!(modal.body(&i18n).contains("10"));
        assert!(!Modal::NoPhotoText.body(&i18n).starts_with("MISSING"));
    }

    #[test]
    fn modal_renders_over_base() {
        let i18n = I18n::default();
        let base: Element<'_, ()> = Text::new("base").into();
        let _element = view(base, &Modal::NoPhotoText, &i18n, ());
    }
}
