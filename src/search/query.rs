// SPDX-License-Identifier: MPL-2.0
//! Search form state and the parameters derived from it.

/// Text input and filter checkboxes of the search form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    text: String,
    text_filter: bool,
    text_filter_locked: bool,
    include_digits: bool,
}

impl SearchForm {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Number of characters entered, as shown by the counter.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    #[must_use]
    pub fn text_filter(&self) -> bool {
        self.text_filter
    }

    /// The text filter cannot be unchecked while it is the only query input.
    #[must_use]
    pub fn text_filter_locked(&self) -> bool {
        self.text_filter_locked
    }

    #[must_use]
    pub fn include_digits(&self) -> bool {
        self.include_digits
    }

    /// Replaces the text, cut to `max_chars` characters.
    pub fn set_text(&mut self, text: &str, max_chars: usize, has_image: bool) {
        self.text = text.chars().take(max_chars).collect();
        self.on_input_change(has_image);
    }

    /// Re-applies the checkbox rules after the text or the image changed.
    ///
    /// Text without an image can only be searched through the text filter,
    /// so the filter is forced on and locked and digits are included.
    /// Otherwise the filter is unlocked and digits are switched off.
    pub fn on_input_change(&mut self, has_image: bool) {
        if self.has_text() && !has_image {
            self.text_filter = true;
            self.text_filter_locked = true;
            self.include_digits = true;
        } else {
            self.text_filter_locked = false;
            self.include_digits = false;
        }
    }

    /// Returns false when the change was refused because the checkbox is locked.
    pub fn set_text_filter(&mut self, enabled: bool) -> bool {
        if self.text_filter_locked {
            return false;
        }
        self.text_filter = enabled;
        true
    }

    pub fn set_include_digits(&mut self, enabled: bool) {
        self.include_digits = enabled;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Query for one page of results.
    #[must_use]
    pub fn results_query(&self, results_id: Option<&str>, page: u32) -> ResultsQuery {
        ResultsQuery {
            query_text: if self.text_filter {
                self.text.clone()
            } else {
                String::new()
            },
            results_id: results_id.map(str::to_owned),
            include_digits: self.include_digits,
            page,
        }
    }

    /// Text fields of the multipart search request.
    #[must_use]
    pub fn submission(&self) -> SearchSubmission {
        SearchSubmission {
            query_text: self.text.clone(),
            text_filter: self.text_filter,
            include_digits: self.include_digits,
        }
    }
}

/// Parameters of a paginated results request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsQuery {
    /// Entered text when the text filter is on, otherwise empty.
    pub query_text: String,
    /// Omitted from the request when `None`.
    pub results_id: Option<String>,
    pub include_digits: bool,
    pub page: u32,
}

impl ResultsQuery {
    /// Query pairs in the order the server's pages send them.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("queryText", self.query_text.clone())];
        if let Some(id) = &self.results_id {
            pairs.push(("resultsId", id.clone()));
        }
        pairs.push(("includeDigits", self.include_digits.to_string()));
        pairs.push(("page", self.page.to_string()));
        pairs
    }
}

/// Form fields sent with `POST search` next to the optional file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSubmission {
    pub query_text: String,
    pub text_filter: bool,
    pub include_digits: bool,
}
