// SPDX-License-Identifier: MPL-2.0
//! Page-function calls embedded in fragment links.
//!
//! Server fragments navigate through `href="javascript:retrieveResults(2)"`
//! or `onclick="getArticleData('cobra', 'c6', 'group')"`. These are parsed
//! into [`FragmentAction`] values; nothing is ever evaluated.

use crate::navigation::Source;

/// Navigation request carried by a fragment link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentAction {
    /// `retrieveResults(page)`
    RetrieveResults { page: u32 },
    /// `getCategoryData(group, page)` or `getGroupData(group, page)`
    GroupData { group: String, page: u32 },
    /// `getArticleData(group, item, source)` or `getItemData(group, item, source)`
    ItemData {
        group: String,
        item: String,
        source: Source,
    },
    /// `goBackFromArticle()` or `goBackFromItem()`
    GoBack,
    /// `loadHelp()`
    LoadHelp,
    /// `resetInputsAndNavigateHome()`
    NavigateHome,
}

impl FragmentAction {
    /// Parses a `javascript:` href or an `onclick` handler.
    /// Returns `None` for anything that is not a known page function.
    #[must_use]
    pub fn parse(script: &str) -> Option<Self> {
        let script = script.trim();
        let script = script
            .strip_prefix("javascript:")
            .unwrap_or(script)
            .trim()
            .trim_end_matches(';')
            .trim();

        let (name, rest) = script.split_once('(')?;
        let arguments = rest.trim_end().strip_suffix(')')?;
        let args = split_arguments(arguments);

        match (name.trim(), args.as_slice()) {
            ("retrieveResults", [page]) => Some(Self::RetrieveResults {
                page: parse_page(page)?,
            }),
            ("getCategoryData" | "getGroupData", [group, page]) => Some(Self::GroupData {
                group: group.clone(),
                page: parse_page(page)?,
            }),
            ("getArticleData" | "getItemData", [group, item, rest @ ..]) if rest.len() <= 1 => {
                Some(Self::ItemData {
                    group: group.clone(),
                    item: item.clone(),
                    source: rest
                        .first()
                        .map(|marker| Source::from_marker(marker))
                        .unwrap_or_default(),
                })
            }
            ("goBackFromArticle" | "goBackFromItem", []) => Some(Self::GoBack),
            ("loadHelp", []) => Some(Self::LoadHelp),
            ("resetInputsAndNavigateHome", []) => Some(Self::NavigateHome),
            _ => None,
        }
    }
}

fn parse_page(raw: &str) -> Option<u32> {
    raw.parse().ok()
}

/// Splits a call's argument list on commas outside quotes and strips quotes.
fn split_arguments(arguments: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in arguments.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(c),
            (None, ',') => args.push(std::mem::take(&mut current).trim().to_string()),
            (None, c) => current.push(c),
        }
    }

    let last = current.trim();
    if !last.is_empty() || !args.is_empty() {
        args.push(last.to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrieve_results_from_pagination_href() {
        assert_eq!(
            FragmentAction::parse("javascript:retrieveResults(3)"),
            Some(FragmentAction::RetrieveResults { page: 3 })
        );
    }

    #[test]
    fn group_data_with_quoted_name() {
        assert_eq!(
            FragmentAction::parse("javascript:getCategoryData('cobra 6',2)"),
            Some(FragmentAction::GroupData {
                group: "cobra 6".to_string(),
                page: 2
            })
        );
        assert_eq!(
            FragmentAction::parse(r#"getGroupData("g1", 1);"#),
            Some(FragmentAction::GroupData {
                group: "g1".to_string(),
                page: 1
            })
        );
    }

    #[test]
    fn item_data_with_and_without_source() {
        assert_eq!(
            FragmentAction::parse("getArticleData('cobra', 'c,6', 'category')"),
            Some(FragmentAction::ItemData {
                group: "cobra".to_string(),
                item: "c,6".to_string(),
                source: Source::Group
            })
        );
        assert_eq!(
            FragmentAction::parse("getItemData('g', 'i')"),
            Some(FragmentAction::ItemData {
                group: "g".to_string(),
                item: "i".to_string(),
                source: Source::Results
            })
        );
    }

    #[test]
    fn argument_free_actions() {
        assert_eq!(
            FragmentAction::parse("goBackFromArticle()"),
            Some(FragmentAction::GoBack)
        );
        assert_eq!(FragmentAction::parse("loadHelp()"), Some(FragmentAction::LoadHelp));
        assert_eq!(
            FragmentAction::parse("javascript:resetInputsAndNavigateHome();"),
            Some(FragmentAction::NavigateHome)
        );
    }

    #[test]
    fn unknown_or_malformed_calls_are_ignored() {
        assert_eq!(FragmentAction::parse("toggleMeta(this)"), None);
        assert_eq!(FragmentAction::parse("retrieveResults(two)"), None);
        assert_eq!(FragmentAction::parse("retrieveResults(1"), None);
        assert_eq!(FragmentAction::parse("https://example.com"), None);
        assert_eq!(FragmentAction::parse("retrieveResults()"), None);
    }

    #[test]
    fn argument_splitting_respects_quotes() {
        assert_eq!(split_arguments(""), Vec::<String>::new());
        assert_eq!(split_arguments("'a, b', 2"), vec!["a, b", "2"]);
    }
}
