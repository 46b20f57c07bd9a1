// SPDX-License-Identifier: MPL-2.0
//! URLs of the search server, resolved against the configured base URL.

use crate::error::{HttpError, Result};
use crate::search::query::ResultsQuery;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Route family of the group and item fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVariant {
    /// `categories/{group}?…` and `categories/{group}/articles/{item}`.
    #[default]
    Categories,
    /// `result/group?id=&page=` and `result/item?group_id=&item_id=`.
    Groups,
}

/// Builds every URL the client requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    base: Url,
    variant: ApiVariant,
}

impl Routes {
    pub fn new(base_url: &str, variant: ApiVariant) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|err| HttpError::InvalidUrl(format!("{}: {}", base_url, err)))?;
        if base.cannot_be_a_base() {
            return Err(HttpError::InvalidUrl(base_url.to_string()).into());
        }
        Ok(Self { base, variant })
    }

    #[must_use]
    pub fn variant(&self) -> ApiVariant {
        self.variant
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Base URL with `segments` appended as percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    #[must_use]
    pub fn index(&self) -> Url {
        self.endpoint(&[""])
    }

    #[must_use]
    pub fn help(&self) -> Url {
        self.endpoint(&["help"])
    }

    #[must_use]
    pub fn search(&self) -> Url {
        self.endpoint(&["search"])
    }

    #[must_use]
    pub fn login(&self) -> Url {
        self.endpoint(&["login"])
    }

    /// `locale=<code>`: sets the locale cookie used for server-rendered text.
    #[must_use]
    pub fn locale(&self, code: &str) -> Url {
        self.endpoint(&[&format!("locale={}", code)])
    }

    #[must_use]
    pub fn results(&self, query: &ResultsQuery) -> Url {
        let mut url = self.endpoint(&["search", "results"]);
        url.query_pairs_mut().extend_pairs(query.pairs());
        url
    }

    /// One page of a group. The categories variant repeats the results query.
    #[must_use]
    pub fn group(&self, group: &str, query: &ResultsQuery) -> Url {
        match self.variant {
            ApiVariant::Categories => {
                let mut url = self.endpoint(&["categories", group]);
                url.query_pairs_mut().extend_pairs(query.pairs());
                url
            }
            ApiVariant::Groups => {
                let mut url = self.endpoint(&["result", "group"]);
                url.query_pairs_mut()
                    .append_pair("id", group)
                    .append_pair("page", &query.page.to_string());
                url
            }
        }
    }

    #[must_use]
    pub fn item(&self, group: &str, item: &str) -> Url {
        match self.variant {
            ApiVariant::Categories => self.endpoint(&["categories", group, "articles", item]),
            ApiVariant::Groups => {
                let mut url = self.endpoint(&["result", "item"]);
                url.query_pairs_mut()
                    .append_pair("group_id", group)
                    .append_pair("item_id", item);
                url
            }
        }
    }

    /// Resolves a `src`/`href` found in a fragment.
    pub fn resolve(&self, reference: &str) -> Result<Url> {
        self.base
            .join(reference)
            .map_err(|err| HttpError::InvalidUrl(format!("{}: {}", reference, err)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(results_id: Option<&str>, page: u32) -> ResultsQuery {
        ResultsQuery {
            query_text: String::new(),
            results_id: results_id.map(str::to_owned),
            include_digits: false,
            page,
        }
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(Routes::new("not a url", ApiVariant::Categories).is_err());
        assert!(Routes::new("mailto:someone@example.com", ApiVariant::Categories).is_err());
    }

    #[test]
    fn fixed_routes_are_relative_to_base() {
        let routes = Routes::new("http://127.0.0.1:5000/", ApiVariant::Categories).unwrap();
        assert_eq!(routes.help().as_str(), "http://127.0.0.1:5000/help");
        assert_eq!(routes.search().as_str(), "http://127.0.0.1:5000/search");
        assert_eq!(routes.login().as_str(), "http://127.0.0.1:5000/login");
        assert_eq!(routes.index().as_str(), "http://127.0.0.1:5000/");
        assert_eq!(routes.locale("nl").as_str(), "http://127.0.0.1:5000/locale=nl");
    }

    #[test]
    fn base_path_prefix_is_kept_with_or_without_slash() {
        for base in ["http://host/app/", "http://host/app"] {
            let routes = Routes::new(base, ApiVariant::Categories).unwrap();
            assert_eq!(routes.help().as_str(), "http://host/app/help");
        }
    }

    #[test]
    fn results_url_carries_results_id() {
        let routes = Routes::new("http://host/", ApiVariant::Categories).unwrap();
        let url = routes.results(&query(Some("abc"), 1));
        assert_eq!(
            url.as_str(),
            "http://host/search/results?queryText=&resultsId=abc&includeDigits=false&page=1"
        );
    }

    #[test]
    fn categories_variant_routes() {
        let routes = Routes::new("http://host/", ApiVariant::Categories).unwrap();
        assert_eq!(
            routes.group("cobra", &query(None, 3)).as_str(),
            "http://host/categories/cobra?queryText=&includeDigits=false&page=3"
        );
        assert_eq!(
            routes.item("cobra", "c 6").as_str(),
            "http://host/categories/cobra/articles/c%206"
        );
    }

    #[test]
    fn groups_variant_routes() {
        let routes = Routes::new("http://host/", ApiVariant::Groups).unwrap();
        assert_eq!(
            routes.group("g1", &query(Some("abc"), 2)).as_str(),
            "http://host/result/group?id=g1&page=2"
        );
        assert_eq!(
            routes.item("g1", "i/2").as_str(),
            "http://host/result/item?group_id=g1&item_id=i%2F2"
        );
    }

    #[test]
    fn fragment_references_resolve_against_base() {
        let routes = Routes::new("http://host/app/", ApiVariant::Categories).unwrap();
        assert_eq!(
            routes.resolve("images/a.png").unwrap().as_str(),
            "http://host/app/images/a.png"
        );
        assert_eq!(
            routes.resolve("/images/a.png").unwrap().as_str(),
            "http://host/images/a.png"
        );
    }

    #[test]
    fn api_variant_serializes_lowercase() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            variant: ApiVariant,
        }
        let text = toml::to_string(&Wrapper {
            variant: ApiVariant::Groups,
        })
        .unwrap();
        assert!(text.contains("\"groups\""));
    }
}
