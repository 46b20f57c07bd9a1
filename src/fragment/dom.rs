// SPDX-License-Identifier: MPL-2.0
//! Lenient HTML tree built on the quick-xml event reader.
//!
//! Server fragments are HTML, not XML: void elements are never closed,
//! attributes may be unquoted and named entities such as `&nbsp;` appear in
//! text. The reader is configured to tolerate all of that, and a stack of
//! open elements closes whatever the markup forgot to close.

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Elements that never have content or an end tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is not document text.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-case tag name.
    pub name: String,
    /// Lower-case attribute names with unescaped values, in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    fn new(name: String, attributes: Vec<(String, String)>) -> Self {
        Self {
            name,
            attributes,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Concatenated text of all descendants, whitespace collapsed.
    #[must_use]
    pub fn text_content(&self) -> String {
        text_of(&self.children)
    }

    /// First descendant element (depth-first) carrying `class`.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        self.children.iter().find_map(|node| match node {
            Node::Element(element) if element.has_class(class) => Some(element),
            Node::Element(element) => element.find_by_class(class),
            Node::Text(_) => None,
        })
    }

    /// First descendant element (depth-first) named `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|node| match node {
            Node::Element(element) if element.name == name => Some(element),
            Node::Element(element) => element.find_by_name(name),
            Node::Text(_) => None,
        })
    }

    #[must_use]
    pub fn contains_element(&self, predicate: &dyn Fn(&Element) -> bool) -> bool {
        self.children.iter().any(|node| match node {
            Node::Element(element) => predicate(element) || element.contains_element(predicate),
            Node::Text(_) => false,
        })
    }
}

/// Concatenated text of `nodes` and their descendants, whitespace collapsed.
#[must_use]
pub fn text_of(nodes: &[Node]) -> String {
    let mut raw = String::new();
    collect_text(nodes, &mut raw);
    collapse_whitespace(&raw)
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) if element.name == "br" => out.push(' '),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// Collapses whitespace runs into single spaces and trims the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

/// Named entities seen in server markup beyond the five XML ones.
fn html_entity(name: &str) -> Option<&'static str> {
    resolve_predefined_entity(name).or(match name {
        "nbsp" => Some("\u{a0}"),
        "laquo" => Some("«"),
        "raquo" => Some("»"),
        "lsaquo" => Some("‹"),
        "rsaquo" => Some("›"),
        "hellip" => Some("…"),
        "ndash" => Some("–"),
        "mdash" => Some("—"),
        "copy" => Some("©"),
        "reg" => Some("®"),
        "euro" => Some("€"),
        "middot" => Some("·"),
        "times" => Some("×"),
        "deg" => Some("°"),
        "eacute" => Some("é"),
        "egrave" => Some("è"),
        "euml" => Some("ë"),
        "iuml" => Some("ï"),
        "ouml" => Some("ö"),
        "uuml" => Some("ü"),
        "auml" => Some("ä"),
        _ => None,
    })
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase()
}

fn element_attributes(start: &BytesStart<'_>) -> Vec<(String, String)> {
    start
        .html_attributes()
        .filter_map(|attr| attr.ok())
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            let value = attr
                .unescape_value_with(html_entity)
                .map(|value| value.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            (key, value)
        })
        .collect()
}

/// Appends `node` to the innermost open element, or to the root list.
/// Adjacent text nodes are merged.
fn push_node(stack: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => roots,
    };
    if let (Node::Text(text), Some(Node::Text(previous))) = (&node, siblings.last_mut()) {
        previous.push_str(text);
        return;
    }
    siblings.push(node);
}

/// Closes the innermost open element named `name` and everything opened after it.
fn close_element(stack: &mut Vec<Element>, roots: &mut Vec<Node>, name: &str) {
    let Some(position) = stack.iter().rposition(|open| open.name == name) else {
        // Stray end tag
        return;
    };
    while stack.len() > position {
        if let Some(element) = stack.pop() {
            push_node(stack, roots, Node::Element(element));
        }
    }
}

/// Parses an HTML fragment into a node list. Never fails: on a syntax
/// error the tree built so far is returned.
#[must_use]
pub fn parse(html: &str) -> Vec<Node> {
    let mut builder = TreeBuilder::default();
    builder.feed(html);
    builder.finish()
}

#[derive(Default)]
struct TreeBuilder {
    roots: Vec<Node>,
    stack: Vec<Element>,
    // Depth inside <script>/<style>, whose text is dropped
    raw_depth: usize,
}

impl TreeBuilder {
    fn feed(&mut self, html: &str) {
        let mut reader = Reader::from_str(html);
        {
            let config = reader.config_mut();
            config.check_end_names = false;
            config.allow_unmatched_ends = true;
            config.check_comments = false;
        }

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    let name = element_name(&start);
                    if name.is_empty() {
                        self.stray_open_bracket(&start, ">");
                        continue;
                    }
                    if VOID_ELEMENTS.contains(&name.as_str()) {
                        let element = Element::new(name, element_attributes(&start));
                        self.push(Node::Element(element));
                        continue;
                    }
                    if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                        self.raw_depth += 1;
                    }
                    self.stack
                        .push(Element::new(name, element_attributes(&start)));
                }
                Ok(Event::Empty(start)) => {
                    let name = element_name(&start);
                    if name.is_empty() {
                        self.stray_open_bracket(&start, "/>");
                        continue;
                    }
                    let element = Element::new(name, element_attributes(&start));
                    self.push(Node::Element(element));
                }
                Ok(Event::End(end)) => {
                    let name = String::from_utf8_lossy(end.name().as_ref()).to_ascii_lowercase();
                    if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                        self.raw_depth = self.raw_depth.saturating_sub(1);
                    }
                    close_element(&mut self.stack, &mut self.roots, &name);
                }
                Ok(Event::Text(text)) => {
                    if self.raw_depth > 0 {
                        continue;
                    }
                    let content = text
                        .unescape_with(html_entity)
                        .map(|value| value.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&text).into_owned());
                    if !content.is_empty() {
                        self.push(Node::Text(content));
                    }
                }
                Ok(Event::CData(data)) => {
                    let content = String::from_utf8_lossy(&data).into_owned();
                    self.push(Node::Text(content));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(
                        position = reader.buffer_position(),
                        error = %err,
                        "fragment markup error, keeping partial tree"
                    );
                    break;
                }
            }
        }
    }

    /// A `<` not followed by a tag name is text. The reader consumed up to
    /// the next `>`, so that span is parsed again as markup.
    fn stray_open_bracket(&mut self, start: &BytesStart<'_>, close: &str) {
        if self.raw_depth == 0 {
            self.push(Node::Text("<".to_string()));
        }
        let swallowed = format!("{}{}", String::from_utf8_lossy(start), close);
        self.feed(&swallowed);
    }

    fn push(&mut self, node: Node) {
        push_node(&mut self.stack, &mut self.roots, node);
    }

    fn finish(mut self) -> Vec<Node> {
        // Close everything the markup left open
        while let Some(element) = self.stack.pop() {
            push_node(&mut self.stack, &mut self.roots, Node::Element(element));
        }
        self.roots
    }
}

/// All elements carrying `class`, outermost first, not descending into matches.
#[must_use]
pub fn find_all_by_class<'a>(nodes: &'a [Node], class: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    for node in nodes {
        if let Node::Element(element) = node {
            if element.has_class(class) {
                found.push(element);
            } else {
                found.extend(find_all_by_class(&element.children, class));
            }
        }
    }
    found
}

/// All elements named `name`, outermost first, not descending into matches.
#[must_use]
pub fn find_all_by_name<'a>(nodes: &'a [Node], name: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    for node in nodes {
        if let Node::Element(element) = node {
            if element.name == name {
                found.push(element);
            } else {
                found.extend(find_all_by_name(&element.children, name));
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_element(html: &str) -> Element {
        match parse(html).into_iter().next() {
            Some(Node::Element(element)) => element,
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn nested_elements_and_text() {
        let div = single_element(r#"<div class="a b"><p>Hello <b>world</b></p></div>"#);
        assert_eq!(div.name, "div");
        assert!(div.has_class("b"));
        assert!(!div.has_class("c"));
        assert_eq!(div.text_content(), "Hello world");
    }

    #[test]
    fn void_elements_do_not_swallow_siblings() {
        let div = single_element(r#"<div><img src="a.png"><br><span>after</span></div>"#);
        assert_eq!(div.children.len(), 3);
        match &div.children[0] {
            Node::Element(img) => {
                assert_eq!(img.name, "img");
                assert_eq!(img.attr("src"), Some("a.png"));
                assert!(img.children.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unclosed_elements_are_closed_by_parent_end_tag() {
        let ul = single_element("<ul><li>one<li>two</ul>");
        assert_eq!(ul.name, "ul");
        assert_eq!(ul.text_content(), "onetwo");
    }

    #[test]
    fn bare_less_than_is_text() {
        let div = single_element("<div><p>Size < 10 MB allowed</p><p>Second paragraph</p></div>");
        assert_eq!(div.children.len(), 2);
        match (&div.children[0], &div.children[1]) {
            (Node::Element(first), Node::Element(second)) => {
                assert_eq!(first.name, "p");
                assert_eq!(first.text_content(), "Size < 10 MB allowed");
                assert_eq!(second.name, "p");
                assert_eq!(second.text_content(), "Second paragraph");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn stray_end_tag_is_ignored() {
        let nodes = parse("<p>text</span></p>");
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn html_entities_are_resolved() {
        let p = single_element("<p>a&nbsp;b &amp; c &#39;d&#39; &raquo;</p>");
        assert_eq!(p.text_content(), "a\u{a0}b & c 'd' »");
    }

    #[test]
    fn unquoted_and_uppercase_attributes() {
        let a = single_element(r#"<A HREF=javascript:retrieveResults(2) class=page-link>2</A>"#);
        assert_eq!(a.name, "a");
        assert_eq!(a.attr("href"), Some("javascript:retrieveResults(2)"));
        assert!(a.has_class("page-link"));
    }

    #[test]
    fn script_content_is_dropped() {
        let div = single_element("<div><script>var x = 1;</script>visible</div>");
        assert_eq!(div.text_content(), "visible");
    }

    #[test]
    fn find_all_by_class_stops_at_matches() {
        let nodes = parse(
            r#"<div><div class="item"><div class="item">inner</div></div><p class="item">x</p></div>"#,
        );
        let found = find_all_by_class(&nodes, "item");
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].name, "p");
    }

    #[test]
    fn find_by_class_searches_descendants() {
        let div = single_element(r#"<div><span><b class="target">x</b></span></div>"#);
        assert_eq!(div.find_by_class("target").map(|e| e.name.as_str()), Some("b"));
    }
}
