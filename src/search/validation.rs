// SPDX-License-Identifier: MPL-2.0
//! Client-side checks on the image the user picks.
//!
//! The server publishes its accepted extensions as one string such as
//! `".png,.jpg,.jpeg,.gif"`. A file is accepted when its extension appears
//! anywhere inside that string, ignoring case. This is looser than a list
//! lookup (`"pn"` passes) but matches what the server's own pages accept.

use std::path::{Path, PathBuf};

/// The server's extension allowlist, kept as the raw published string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedExtensions(String);

impl AllowedExtensions {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a file with this name passes the extension check.
    #[must_use]
    pub fn permits(&self, file_name: &str) -> bool {
        let extension = file_extension(file_name);
        !extension.is_empty() && self.0.contains(&extension)
    }

    /// Individual extensions without dots, for file dialog filters.
    #[must_use]
    pub fn dialog_filter(&self) -> Vec<String> {
        self.0
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// Text after the last `.` of `file_name`, lower-cased.
/// A name without a dot is returned whole.
#[must_use]
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or(file_name)
        .to_lowercase()
}

/// Limits that apply to uploads and the text filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    /// Files of this size or larger are refused.
    pub max_upload_size: u64,
    pub allowed_extensions: AllowedExtensions,
    pub max_chars_text_filter: usize,
}

impl UploadLimits {
    #[must_use]
    pub fn from_config(upload: &crate::config::UploadConfig) -> Self {
        Self {
            max_upload_size: upload.max_upload_size,
            allowed_extensions: AllowedExtensions::new(upload.allowed_extensions.clone()),
            max_chars_text_filter: upload.max_chars_text_filter,
        }
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self::from_config(&crate::config::UploadConfig::default())
    }
}

/// Why a picked file was refused. Each maps to one modal dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    WrongFormat,
    TooLarge { size: u64, limit: u64 },
}

/// A file chosen through the picker or dropped on the window, before its
/// contents are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl PickedFile {
    /// Reads the file size without loading the contents.
    pub async fn inspect(path: PathBuf) -> crate::error::Result<Self> {
        let metadata = tokio::fs::metadata(&path).await?;
        Ok(Self {
            name: display_name(&path),
            size: metadata.len(),
            path,
        })
    }

    /// Loads the contents of a file that passed validation.
    pub async fn load(self) -> crate::error::Result<SelectedImage> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(SelectedImage {
            name: self.name,
            size: bytes.len() as u64,
            bytes,
        })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// The accepted image, ready to be uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub name: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedImage")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Extension check first, then the size limit.
pub fn validate_image(name: &str, size: u64, limits: &UploadLimits) -> Result<(), Rejection> {
    if !limits.allowed_extensions.permits(name) {
        return Err(Rejection::WrongFormat);
    }
    if size >= limits.max_upload_size {
        return Err(Rejection::TooLarge {
            size,
            limit: limits.max_upload_size,
        });
    }
    Ok(())
}

/// A search needs either non-blank text or an image.
#[must_use]
pub fn is_empty_submission(text: &str, has_image: bool) -> bool {
    text.trim().is_empty() && !has_image
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> UploadLimits {
        UploadLimits {
            max_upload_size: 1000,
            allowed_extensions: AllowedExtensions::new(".png,.jpg,.jpeg,.gif"),
            max_chars_text_filter: 500,
        }
    }

    #[test]
    fn extension_is_text_after_last_dot() {
        assert_eq!(file_extension("photo.final.JPG"), "jpg");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("README"), "readme");
        assert_eq!(file_extension("trailing."), "");
    }

    #[test]
    fn allowed_extension_under_limit_is_accepted() {
        assert_eq!(validate_image("wrapper.PNG", 999, &limits()), Ok(()));
        assert_eq!(validate_image("wrapper.jpeg", 10, &limits()), Ok(()));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert_eq!(
            validate_image("notes.txt", 10, &limits()),
            Err(Rejection::WrongFormat)
        );
        assert_eq!(
            validate_image("image.", 10, &limits()),
            Err(Rejection::WrongFormat)
        );
    }

    #[test]
    fn substring_match_is_lenient() {
        // "pn" is inside ".png"
        assert!(limits().allowed_extensions.permits("odd.pn"));
        // A dotless name is matched as a whole
        assert!(limits().allowed_extensions.permits("gif"));
        assert!(!limits().allowed_extensions.permits("image.webp"));
    }

    #[test]
    fn size_at_or_above_limit_is_rejected() {
        assert_eq!(
            validate_image("a.png", 1000, &limits()),
            Err(Rejection::TooLarge {
                size: 1000,
                limit: 1000
            })
        );
        assert!(matches!(
            validate_image("a.png", 5000, &limits()),
            Err(Rejection::TooLarge { .. })
        ));
    }

    #[test]
    fn format_is_checked_before_size() {
        assert_eq!(
            validate_image("a.bmp", 5000, &limits()),
            Err(Rejection::WrongFormat)
        );
    }

    #[test]
    fn empty_submission_detection() {
        assert!(is_empty_submission("", false));
        assert!(is_empty_submission("   \t", false));
        assert!(!is_empty_submission("", true));
        assert!(!is_empty_submission("rocket", false));
    }

    #[test]
    fn allowed_extensions_are_case_insensitive() {
        let allowed = AllowedExtensions::new(".PNG,.JPG");
        assert_eq!(allowed.as_str(), ".png,.jpg");
        assert!(allowed.permits("x.png"));
        assert!(allowed.permits("x.JpG"));
    }

    #[test]
    fn dialog_filter_splits_any_list_format() {
        assert_eq!(
            AllowedExtensions::new(".png,.jpg").dialog_filter(),
            vec!["png", "jpg"]
        );
        assert_eq!(
            AllowedExtensions::new("['.png', '.GIF']").dialog_filter(),
            vec!["png", "gif"]
        );
    }

    #[tokio::test]
    async fn picked_file_reports_name_and_size() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("wrapper.png");
        std::fs::write(&path, [1u8, 2, 3, 4]).expect("write file");

        let picked = PickedFile::inspect(path.clone()).await.expect("inspect");
        assert_eq!(picked.name, "wrapper.png");
        assert_eq!(picked.size, 4);

        let image = picked.load().await.expect("load");
        assert_eq!(image.bytes, vec![1, 2, 3, 4]);
        assert_eq!(image.size, 4);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let result = PickedFile::inspect(PathBuf::from("/definitely/not/here.png")).await;
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }
}
