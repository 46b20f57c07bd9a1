// SPDX-License-Identifier: MPL-2.0
//! Document model for the HTML fragments returned by the search server.
//!
//! A fragment is parsed once into a list of [`Block`]s; the views render
//! blocks and never look at markup again. Links and clickable tiles that
//! call page functions become [`FragmentAction`]s.

pub mod actions;
pub mod dom;
pub mod images;

pub use actions::FragmentAction;
pub use images::ImageCache;

use dom::{collapse_whitespace, Element, Node};

/// Class of collapsible metadata blocks in item fragments.
const META_CLASS: &str = "accordion-meta-data";
const META_CONTENT_CLASS: &str = "toggle-content";
const META_BUTTON_CLASS: &str = "toggle-meta";

/// Class of one help section and its hidden text block.
const HELP_SECTION_CLASS: &str = "hover-table-help";
const HELP_TEXT_CLASS: &str = "accordion-text-block";
const HELP_BUTTON_CLASS: &str = "toggle-visibility-btn";

const ERROR_CLASSES: &[&str] = &["error-message", "errors", "error"];

/// Subtrees that carry no content for a native client.
const SKIPPED_ELEMENTS: &[&str] = &[
    "svg", "script", "style", "head", "title", "meta", "link", "input", "button", "form", "select",
    "textarea", "noscript",
];

const INLINE_ELEMENTS: &[&str] = &[
    "a", "b", "strong", "em", "i", "span", "small", "label", "u", "sup", "sub", "code", "br", "abbr",
];

/// Where a link leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Action(FragmentAction),
    /// Plain URL, shown but not followed.
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text { text: String, strong: bool },
    Link { text: String, target: LinkTarget },
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// One entry of a pagination bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub label: String,
    pub action: Option<FragmentAction>,
    pub current: bool,
}

/// Collapsible key/value section of an item fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaBlock {
    /// Position among the fragment's meta blocks, used to track open state.
    pub id: usize,
    pub title: Vec<Inline>,
    pub body: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    Image(ImageRef),
    List(Vec<Vec<Inline>>),
    /// Rows of cells.
    Table(Vec<Vec<Vec<Inline>>>),
    /// Validation or lookup errors reported by the server.
    Errors(Vec<String>),
    Meta(MetaBlock),
    Pagination(Vec<PageLink>),
    /// Clickable tile, e.g. a result card opening a group.
    Card {
        action: FragmentAction,
        blocks: Vec<Block>,
    },
}

/// A parsed fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub blocks: Vec<Block>,
}

impl Fragment {
    /// Parses server markup. Malformed markup yields whatever could be read.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let nodes = dom::parse(html);
        let mut converter = Converter::default();
        Self {
            blocks: converter.blocks(&nodes),
        }
    }

    /// Error-styled fragment for messages from `POST search`.
    ///
    /// Each message is server markup: tags are dropped, entities resolved
    /// and list items become separate messages.
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        let messages = errors
            .iter()
            .flat_map(|markup| error_messages(&dom::parse(markup)))
            .collect();
        Self {
            blocks: vec![Block::Errors(messages)],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every image `src` in document order, without duplicates.
    #[must_use]
    pub fn image_sources(&self) -> Vec<String> {
        let mut sources = Vec::new();
        collect_sources(&self.blocks, &mut sources);
        sources
    }

    /// Number of collapsible meta blocks.
    #[must_use]
    pub fn meta_count(&self) -> usize {
        fn count(blocks: &[Block]) -> usize {
            blocks
                .iter()
                .map(|block| match block {
                    Block::Meta(meta) => 1 + count(&meta.body),
                    Block::Card { blocks, .. } => count(blocks),
                    _ => 0,
                })
                .sum()
        }
        count(&self.blocks)
    }
}

fn collect_sources(blocks: &[Block], out: &mut Vec<String>) {
    for block in blocks {
        match block {
            Block::Image(image) => {
                if !out.contains(&image.src) {
                    out.push(image.src.clone());
                }
            }
            Block::Card { blocks, .. } => collect_sources(blocks, out),
            Block::Meta(meta) => collect_sources(&meta.body, out),
            _ => {}
        }
    }
}

/// One collapsible help entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSection {
    pub title: String,
    pub body: Vec<Block>,
}

/// The help page split into free content and accordion sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpDocument {
    pub intro: Vec<Block>,
    pub sections: Vec<HelpSection>,
}

impl HelpDocument {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let nodes = dom::parse(html);

        let sections = dom::find_all_by_class(&nodes, HELP_SECTION_CLASS)
            .into_iter()
            .map(|section| {
                let mut converter = Converter::default();
                let body = section
                    .find_by_class(HELP_TEXT_CLASS)
                    .map(|text| converter.blocks(&text.children))
                    .unwrap_or_default();
                HelpSection {
                    title: text_outside(section, &[HELP_TEXT_CLASS, HELP_BUTTON_CLASS]),
                    body,
                }
            })
            .collect();

        let mut converter = Converter {
            skip_class: Some(HELP_SECTION_CLASS),
            ..Converter::default()
        };
        Self {
            intro: converter.blocks(&nodes),
            sections,
        }
    }

    /// Unique image sources of the intro and every section.
    #[must_use]
    pub fn image_sources(&self) -> Vec<String> {
        let mut sources = Vec::new();
        collect_sources(&self.intro, &mut sources);
        for section in &self.sections {
            collect_sources(&section.body, &mut sources);
        }
        sources
    }
}

/// Text of `element` ignoring descendants that carry any of `excluded` classes.
fn text_outside(element: &Element, excluded: &[&str]) -> String {
    fn walk(nodes: &[Node], excluded: &[&str], out: &mut String) {
        for node in nodes {
            match node {
                Node::Text(text) => {
                    out.push_str(text);
                    out.push(' ');
                }
                Node::Element(child) => {
                    if excluded.iter().any(|class| child.has_class(class))
                        || SKIPPED_ELEMENTS.contains(&child.name.as_str())
                    {
                        continue;
                    }
                    walk(&child.children, excluded, out);
                }
            }
        }
    }
    let mut raw = String::new();
    walk(&element.children, excluded, &mut raw);
    collapse_whitespace(&raw)
}

fn element_action(element: &Element) -> Option<FragmentAction> {
    element
        .attr("onclick")
        .and_then(FragmentAction::parse)
        .or_else(|| element.attr("href").and_then(FragmentAction::parse))
}

fn link_target(element: &Element) -> Option<LinkTarget> {
    if let Some(action) = element_action(element) {
        return Some(LinkTarget::Action(action));
    }
    element
        .attr("href")
        .filter(|href| !href.is_empty() && !href.starts_with("javascript:") && *href != "#")
        .map(|href| LinkTarget::Url(href.to_string()))
}

fn is_error_container(element: &Element) -> bool {
    ERROR_CLASSES.iter().any(|class| element.has_class(class))
}

fn is_block_element(element: &Element) -> bool {
    !INLINE_ELEMENTS.contains(&element.name.as_str()) || element.name == "img"
}

/// Inline element whose subtree holds only inline content.
fn is_pure_inline(element: &Element) -> bool {
    INLINE_ELEMENTS.contains(&element.name.as_str())
        && !element.contains_element(&|child| is_block_element(child))
        && !is_error_container(element)
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

#[derive(Default)]
struct Converter {
    next_meta_id: usize,
    skip_class: Option<&'static str>,
}

impl Converter {
    fn blocks(&mut self, nodes: &[Node]) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut pending: Vec<Inline> = Vec::new();

        for node in nodes {
            match node {
                Node::Text(text) => push_text(&mut pending, text, false),
                Node::Element(element) if is_pure_inline(element) => {
                    self.inlines(element, false, &mut pending)
                }
                Node::Element(element) => {
                    flush_paragraph(&mut pending, &mut blocks);
                    self.block(element, &mut blocks);
                }
            }
        }
        flush_paragraph(&mut pending, &mut blocks);
        blocks
    }

    fn block(&mut self, element: &Element, out: &mut Vec<Block>) {
        let name = element.name.as_str();
        if SKIPPED_ELEMENTS.contains(&name) {
            return;
        }
        if self.skip_class.is_some_and(|class| element.has_class(class)) {
            return;
        }

        if is_error_container(element) {
            let messages = error_messages(&element.children);
            if !messages.is_empty() {
                out.push(Block::Errors(messages));
            }
            return;
        }

        if element.has_class(META_CLASS) {
            out.push(Block::Meta(self.meta(element)));
            return;
        }

        if let Some(level) = heading_level(name) {
            let mut content = Vec::new();
            self.inlines(element, true, &mut content);
            trim_inlines(&mut content);
            if !content.is_empty() {
                out.push(Block::Heading { level, content });
            }
            return;
        }

        match name {
            "img" => {
                if let Some(src) = element.attr("src").filter(|src| !src.is_empty()) {
                    out.push(Block::Image(ImageRef {
                        src: src.to_string(),
                        alt: element.attr("alt").unwrap_or_default().to_string(),
                    }));
                }
            }
            "ul" | "ol" if element.has_class("pagination") => {
                out.push(Block::Pagination(pagination(element)));
            }
            "ul" | "ol" => {
                let items: Vec<Vec<Inline>> = element
                    .children
                    .iter()
                    .filter_map(|node| match node {
                        Node::Element(li) if li.name == "li" => {
                            let mut item = Vec::new();
                            self.inlines(li, false, &mut item);
                            trim_inlines(&mut item);
                            (!item.is_empty()).then_some(item)
                        }
                        _ => None,
                    })
                    .collect();
                if !items.is_empty() {
                    out.push(Block::List(items));
                }
            }
            "table" => {
                let rows = self.table_rows(element);
                if !rows.is_empty() {
                    out.push(Block::Table(rows));
                }
            }
            "hr" | "br" => {}
            _ => {
                let inner = self.blocks(&element.children);
                match element_action(element) {
                    Some(action) if !inner.is_empty() => out.push(Block::Card {
                        action,
                        blocks: inner,
                    }),
                    _ => out.extend(inner),
                }
            }
        }
    }

    fn meta(&mut self, element: &Element) -> MetaBlock {
        let id = self.next_meta_id;
        self.next_meta_id += 1;

        let body = element
            .find_by_class(META_CONTENT_CLASS)
            .map(|content| self.blocks(&content.children))
            .unwrap_or_default();
        let title = text_outside(element, &[META_CONTENT_CLASS, META_BUTTON_CLASS]);

        MetaBlock {
            id,
            title: vec![Inline::Text {
                text: title,
                strong: true,
            }],
            body,
        }
    }

    fn table_rows(&mut self, table: &Element) -> Vec<Vec<Vec<Inline>>> {
        let mut rows = Vec::new();
        collect_rows(table, &mut |row: &Element| {
            let cells: Vec<Vec<Inline>> = row
                .children
                .iter()
                .filter_map(|node| match node {
                    Node::Element(cell) if cell.name == "td" || cell.name == "th" => {
                        let mut content = Vec::new();
                        self.inlines(cell, cell.name == "th", &mut content);
                        trim_inlines(&mut content);
                        Some(content)
                    }
                    _ => None,
                })
                .collect();
            if cells.iter().any(|cell| !cell.is_empty()) {
                rows.push(cells);
            }
        });
        rows
    }

    fn inlines(&mut self, element: &Element, strong: bool, out: &mut Vec<Inline>) {
        let name = element.name.as_str();
        if SKIPPED_ELEMENTS.contains(&name) {
            return;
        }
        match name {
            "br" => out.push(Inline::LineBreak),
            "a" => {
                let text = element.text_content();
                let text = if text.is_empty() {
                    element.attr("aria-label").unwrap_or_default().to_string()
                } else {
                    text
                };
                match link_target(element) {
                    Some(target) if !text.is_empty() => out.push(Inline::Link { text, target }),
                    _ => push_text(out, &text, strong),
                }
            }
            _ => {
                let strong = strong || matches!(name, "b" | "strong" | "th");
                for child in &element.children {
                    match child {
                        Node::Text(text) => push_text(out, text, strong),
                        Node::Element(child) => self.inlines(child, strong, out),
                    }
                }
            }
        }
    }
}

fn collect_rows(element: &Element, visit: &mut dyn FnMut(&Element)) {
    for node in &element.children {
        if let Node::Element(child) = node {
            if child.name == "tr" {
                visit(child);
            } else if matches!(child.name.as_str(), "thead" | "tbody" | "tfoot") {
                collect_rows(child, visit);
            }
        }
    }
}

fn error_messages(nodes: &[Node]) -> Vec<String> {
    let items: Vec<String> = dom::find_all_by_name(nodes, "li")
        .into_iter()
        .map(Element::text_content)
        .filter(|text| !text.is_empty())
        .collect();
    if !items.is_empty() {
        return items;
    }
    let text = dom::text_of(nodes);
    if text.is_empty() {
        Vec::new()
    } else {
        vec![text]
    }
}

fn pagination(list: &Element) -> Vec<PageLink> {
    dom::find_all_by_name(&list.children, "li")
        .into_iter()
        .filter_map(|item| {
            let link = item.find_by_name("a");
            let mut label = item.text_content();
            if label.is_empty() {
                let aria = link
                    .and_then(|a| a.attr("aria-label"))
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                label = if aria.contains("prev") {
                    "‹".to_string()
                } else if aria.contains("next") || link.is_some() {
                    "›".to_string()
                } else {
                    return None;
                };
            }
            Some(PageLink {
                label,
                action: link.and_then(element_action),
                current: item.has_class("active"),
            })
        })
        .collect()
}

/// Appends text, merging with the previous run of the same weight.
/// Whitespace is collapsed; a single separating space is kept.
fn push_text(out: &mut Vec<Inline>, raw: &str, strong: bool) {
    if raw.is_empty() {
        return;
    }
    let leading = raw.starts_with(|c: char| c.is_ascii_whitespace());
    let trailing = raw.ends_with(|c: char| c.is_ascii_whitespace());
    let core = collapse_whitespace(raw);

    let mut text = String::new();
    if leading {
        text.push(' ');
    }
    text.push_str(&core);
    if trailing && !core.is_empty() {
        text.push(' ');
    }
    if text.is_empty() {
        return;
    }

    if let Some(Inline::Text {
        text: previous,
        strong: previous_strong,
    }) = out.last_mut()
    {
        if *previous_strong == strong {
            if previous.ends_with(' ') && text.starts_with(' ') {
                text.remove(0);
            }
            previous.push_str(&text);
            return;
        }
    }
    out.push(Inline::Text { text, strong });
}

/// Removes leading and trailing whitespace of an inline run.
fn trim_inlines(inlines: &mut Vec<Inline>) {
    while matches!(inlines.first(), Some(Inline::LineBreak)) {
        inlines.remove(0);
    }
    while matches!(inlines.last(), Some(Inline::LineBreak)) {
        inlines.pop();
    }
    if let Some(Inline::Text { text, .. }) = inlines.first_mut() {
        *text = text.trim_start().to_string();
    }
    if let Some(Inline::Text { text, .. }) = inlines.last_mut() {
        *text = text.trim_end().to_string();
    }
    inlines.retain(|inline| !matches!(inline, Inline::Text { text, .. } if text.is_empty()));
}

fn flush_paragraph(pending: &mut Vec<Inline>, blocks: &mut Vec<Block>) {
    trim_inlines(pending);
    if !pending.is_empty() {
        blocks.push(Block::Paragraph(std::mem::take(pending)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
<h2 id="results-header">Results</h2>
<div class="result-card" onclick="getCategoryData('cobra', 1)">
  <img src="images/cobra/1.jpg" alt="Cobra wrapper">
  <p>Cobra <b>6</b> articles</p>
</div>
<div class="result-card" onclick="getCategoryData('vulcan', 1)">
  <img src="images/vulcan/1.jpg" alt="">
</div>
<p><b>1 - 2</b> van <b>7</b> resultaten</p>
<nav aria-label="..."><ul class="pagination">
  <li class="page-item active"><a class="page-link">1</a></li>
  <li class="page-item"><a class="page-link" href="javascript:retrieveResults(2)">2</a></li>
  <li class="page-item"><a class="page-link" href="javascript:retrieveResults(2)" aria-label="Next"><svg width="24"><path d="M8 6Z"/></svg></a></li>
</ul></nav>
"#;

    #[test]
    fn results_page_structure() {
        let fragment = Fragment::parse(RESULTS_PAGE);
        let blocks = &fragment.blocks;

        assert!(matches!(&blocks[0], Block::Heading { level: 2, .. }));
        match &blocks[1] {
            Block::Card { action, blocks } => {
                assert_eq!(
                    action,
                    &FragmentAction::GroupData {
                        group: "cobra".to_string(),
                        page: 1
                    }
                );
                assert!(matches!(&blocks[0], Block::Image(image) if image.alt == "Cobra wrapper"));
                assert!(matches!(&blocks[1], Block::Paragraph(_)));
            }
            other => panic!("expected card, got {:?}", other),
        }
        assert!(matches!(&blocks[2], Block::Card { .. }));
        assert!(matches!(&blocks[3], Block::Paragraph(_)));
        match &blocks[4] {
            Block::Pagination(links) => {
                assert_eq!(links.len(), 3);
                assert!(links[0].current);
                assert_eq!(links[0].action, None);
                assert_eq!(
                    links[1].action,
                    Some(FragmentAction::RetrieveResults { page: 2 })
                );
                assert_eq!(links[2].label, "›");
            }
            other => panic!("expected pagination, got {:?}", other),
        }
    }

    #[test]
    fn image_sources_are_unique_and_ordered() {
        let fragment = Fragment::parse(
            r#"<img src="a.png"><div onclick="loadHelp()"><img src="b.png"><img src="a.png"></div>"#,
        );
        assert_eq!(fragment.image_sources(), vec!["a.png", "b.png"]);
    }

    #[test]
    fn inline_whitespace_is_kept_between_runs() {
        let fragment = Fragment::parse("<p><b>1 - 20</b> van <b>75</b> resultaten</p>");
        assert_eq!(
            fragment.blocks,
            vec![Block::Paragraph(vec![
                Inline::Text {
                    text: "1 - 20".to_string(),
                    strong: true
                },
                Inline::Text {
                    text: " van ".to_string(),
                    strong: false
                },
                Inline::Text {
                    text: "75".to_string(),
                    strong: true
                },
                Inline::Text {
                    text: " resultaten".to_string(),
                    strong: false
                },
            ])]
        );
    }

    #[test]
    fn error_list_becomes_error_block() {
        let fragment = Fragment::parse(
            r#"<div class="error-message"><ul><li>No match found</li><li>Try again</li></ul></div>"#,
        );
        assert_eq!(
            fragment.blocks,
            vec![Block::Errors(vec![
                "No match found".to_string(),
                "Try again".to_string()
            ])]
        );
    }

    #[test]
    fn meta_blocks_are_numbered_and_split() {
        let fragment = Fragment::parse(
            r#"
<div class="accordion-meta-data">
  <div onclick="toggleMeta(this)">Details <span class="toggle-meta">&#xFE40;</span></div>
  <div class="toggle-content"><table><tr><th>Weight</th><td>1 kg</td></tr></table></div>
</div>
<div class="accordion-meta-data">
  <div onclick="toggleMeta(this)">Safety</div>
  <div class="toggle-content"><p>Keep away</p></div>
</div>"#,
        );
        assert_eq!(fragment.meta_count(), 2);
        match &fragment.blocks[0] {
            Block::Meta(meta) => {
                assert_eq!(meta.id, 0);
                assert_eq!(
                    meta.title,
                    vec![Inline::Text {
                        text: "Details".to_string(),
                        strong: true
                    }]
                );
                assert!(matches!(&meta.body[0], Block::Table(rows) if rows.len() == 1));
            }
            other => panic!("expected meta, got {:?}", other),
        }
        assert!(matches!(&fragment.blocks[1], Block::Meta(meta) if meta.id == 1));
    }

    #[test]
    fn links_become_actions_or_urls() {
        let fragment = Fragment::parse(
            r##"<p><a href="javascript:goBackFromArticle()">Back</a> <a href="https://example.org">site</a> <a href="#">none</a></p>"##,
        );
        match &fragment.blocks[0] {
            Block::Paragraph(inlines) => {
                assert_eq!(
                    inlines[0],
                    Inline::Link {
                        text: "Back".to_string(),
                        target: LinkTarget::Action(FragmentAction::GoBack)
                    }
                );
                assert!(inlines.contains(&Inline::Link {
                    text: "site".to_string(),
                    target: LinkTarget::Url("https://example.org".to_string())
                }));
                assert!(inlines
                    .iter()
                    .all(|inline| !matches!(inline, Inline::Link { text, .. } if text == "none")));
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn help_document_sections() {
        let help = HelpDocument::parse(
            r#"
<h1>Help</h1>
<div class="hover-table-help">
  <h3>How do I search?</h3>
  <span class="toggle-visibility-btn">&#xFE40;</span>
  <div class="accordion-text-block"><p>Pick a photo. See <a href="https://example.org/faq">FAQ</a>.</p></div>
</div>
<div class="hover-table-help">
  <h3>Which formats?</h3>
  <div class="accordion-text-block">PNG, JPG</div>
</div>"#,
        );
        assert_eq!(help.intro.len(), 1);
        assert_eq!(help.sections.len(), 2);
        assert_eq!(help.sections[0].title, "How do I search?");
        assert!(matches!(&help.sections[0].body[0], Block::Paragraph(_)));
        assert_eq!(help.sections[1].title, "Which formats?");
    }

    #[test]
    fn empty_and_garbage_markup() {
        assert!(Fragment::parse("").is_empty());
        assert!(Fragment::parse("   \n ").is_empty());
        let fragment = Fragment::parse("plain text <");
        assert!(fragment.blocks.len() <= 1);
    }

    #[test]
    fn server_errors_fragment() {
        let fragment = Fragment::from_errors(vec!["Empty file".to_string()]);
        assert_eq!(
            fragment.blocks,
            vec![Block::Errors(vec!["Empty file".to_string()])]
        );
    }

    #[test]
    fn server_error_markup_is_read_as_html() {
        let fragment = Fragment::from_errors(vec![
            "Too many characters, at most <b>500</b> are allowed".to_string(),
            "<ul><li>No photo</li><li>No text &amp; no filter</li></ul>".to_string(),
        ]);
        assert_eq!(
            fragment.blocks,
            vec![Block::Errors(vec![
                "Too many characters, at most 500 are allowed".to_string(),
                "No photo".to_string(),
                "No text & no filter".to_string(),
            ])]
        );
    }
}
