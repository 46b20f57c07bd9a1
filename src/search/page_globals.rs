// SPDX-License-Identifier: MPL-2.0
//! Upload limits published by the server's index page.
//!
//! The page assigns them to `window` in an inline script:
//!
//! ```text
//! window.MAX_CHARS_TEXT_FILTER = 500;
//! window.MAX_UPLOAD_SIZE = 10485760;
//! window.ALLOWED_EXTENSIONS = "['.png', '.jpg']";
//! ```

use crate::search::validation::{AllowedExtensions, UploadLimits};

/// Values found on the index page. Missing entries stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageGlobals {
    pub max_chars_text_filter: Option<usize>,
    pub max_upload_size: Option<u64>,
    pub allowed_extensions: Option<String>,
}

impl PageGlobals {
    /// Scans an HTML page for `window.NAME = value` assignments.
    #[must_use]
    pub fn parse(page: &str) -> Self {
        let mut globals = Self::default();
        for (name, value) in assignments(page) {
            match name {
                "MAX_CHARS_TEXT_FILTER" => globals.max_chars_text_filter = value.parse().ok(),
                "MAX_UPLOAD_SIZE" => globals.max_upload_size = value.parse().ok(),
                "ALLOWED_EXTENSIONS" if !value.is_empty() => {
                    globals.allowed_extensions = Some(value)
                }
                _ => {}
            }
        }
        globals
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Server values take precedence over the configured fallback.
    #[must_use]
    pub fn apply_to(&self, fallback: &UploadLimits) -> UploadLimits {
        UploadLimits {
            max_upload_size: self.max_upload_size.unwrap_or(fallback.max_upload_size),
            allowed_extensions: self
                .allowed_extensions
                .as_deref()
                .map(AllowedExtensions::new)
                .unwrap_or_else(|| fallback.allowed_extensions.clone()),
            max_chars_text_filter: self
                .max_chars_text_filter
                .unwrap_or(fallback.max_chars_text_filter),
        }
    }
}

fn assignments(page: &str) -> impl Iterator<Item = (&str, String)> {
    page.split("window.").skip(1).filter_map(|rest| {
        let (name, after) = rest.split_once('=')?;
        let name = name.trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        let end = after.find([';', '\n']).unwrap_or(after.len());
        Some((name, clean_value(&after[..end])))
    })
}

fn clean_value(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(trimmed);
    unquoted
        .replace("&#39;", "'")
        .replace("&#34;", "\"")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_PAGE: &str = r#"
<html><head>
<script>
    window.MAX_CHARS_TEXT_FILTER = 250;
    window.MAX_UPLOAD_SIZE = 2097152;
    window.ALLOWED_EXTENSIONS = "[&#39;.png&#39;, &#39;.jpg&#39;]";
</script>
<script src="static/js/index.js"></script>
</head><body onload="window.scrollTo(0, 0)"></body></html>
"#;

    #[test]
    fn parses_all_globals() {
        let globals = PageGlobals::parse(INDEX_PAGE);
        assert_eq!(globals.max_chars_text_filter, Some(250));
        assert_eq!(globals.max_upload_size, Some(2_097_152));
        assert_eq!(
            globals.allowed_extensions.as_deref(),
            Some("['.png', '.jpg']")
        );
    }

    #[test]
    fn page_without_globals_is_empty() {
        assert!(PageGlobals::parse("<html><body>login</body></html>").is_empty());
    }

    #[test]
    fn non_numeric_values_are_ignored() {
        let globals = PageGlobals::parse("window.MAX_UPLOAD_SIZE = {{ size }};");
        assert_eq!(globals.max_upload_size, None);
    }

    #[test]
    fn server_values_override_fallback() {
        let fallback = UploadLimits::default();
        let globals = PageGlobals::parse(INDEX_PAGE);
        let limits = globals.apply_to(&fallback);

        assert_eq!(limits.max_upload_size, 2_097_152);
        assert_eq!(limits.max_chars_text_filter, 250);
        assert!(limits.allowed_extensions.permits("a.png"));
        assert!(!limits.allowed_extensions.permits("a.gif"));
    }

    #[test]
    fn missing_values_keep_fallback() {
        let fallback = UploadLimits::default();
        let limits = PageGlobals::default().apply_to(&fallback);
        assert_eq!(limits, fallback);
    }
}
