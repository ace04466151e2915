use crate::dom::element::{Element, Node, collect_text};
use scraper::{ElementRef, Html};

/// Elements that never have an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Elements whose text is serialized without escaping
const RAW_TEXT_ELEMENTS: &[&str] =
    &["style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript"];

/// An owned markup fragment, detached from the document it was cloned from
///
/// A fragment holds the *inner* content of some element: serializing it with
/// [`Fragment::to_html`] gives the same string as reading `innerHTML`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    /// Top-level nodes in document order
    pub nodes: Vec<Node>,
}

impl Fragment {
    /// Create a fragment from nodes
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Parse an HTML snippet into a fragment
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_fragment(html);
        Self::from_children(document.root_element())
    }

    /// Clone the children of a parsed element into an owned fragment
    ///
    /// Comments and processing instructions are dropped.
    pub fn from_children(element: ElementRef<'_>) -> Self {
        Self {
            nodes: clone_children(element),
        }
    }

    /// Check whether the fragment has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Concatenated text of all text nodes
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        collect_text(&self.nodes, &mut text);
        text
    }

    /// Serialize the fragment back to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_node(node, false, &mut out);
        }
        out
    }

    /// Count elements with the given tag at any depth
    pub fn count_tag(&self, tag: &str) -> usize {
        fn count(nodes: &[Node], tag: &str) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    Node::Element(element) => {
                        usize::from(element.is_tag(tag)) + count(&element.children, tag)
                    }
                    Node::Text(_) => 0,
                })
                .sum()
        }
        count(&self.nodes, tag)
    }
}

/// Clone a parsed element, including its subtree, into an owned Element
pub fn clone_element(element: ElementRef<'_>) -> Element {
    let value = element.value();
    let mut cloned = Element::new(value.name());
    for (name, attr_value) in value.attrs.iter() {
        // Foreign attributes such as xlink:href keep their prefix
        let name = match &name.prefix {
            Some(prefix) => format!("{}:{}", prefix, name.local),
            None => name.local.to_string(),
        };
        cloned.add_attribute(name, attr_value.to_string());
    }
    cloned.children = clone_children(element);
    cloned
}

fn clone_children(element: ElementRef<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in element.children() {
        match child.value() {
            scraper::Node::Text(text) => nodes.push(Node::Text(String::from(&**text))),
            scraper::Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    nodes.push(Node::Element(clone_element(child_element)));
                }
            }
            _ => {}
        }
    }
    nodes
}

/// Serialize a single element, including its subtree
pub fn element_to_html(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

fn write_node(node: &Node, raw_text: bool, out: &mut String) {
    match node {
        Node::Text(text) if raw_text => out.push_str(text),
        Node::Text(text) => {
            out.push_str(&html_escape::encode_text(text).replace('\u{a0}', "&nbsp;"));
        }
        Node::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag_name);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value).replace('\u{a0}', "&nbsp;"));
        out.push('"');
    }
    out.push('>');

    let tag = element.tag_name.to_ascii_lowercase();
    if VOID_ELEMENTS.contains(&tag.as_str()) {
        return;
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&tag.as_str());
    for child in &element.children {
        write_node(child, raw_text, out);
    }

    out.push_str("</");
    out.push_str(&element.tag_name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize_simple() {
        let fragment = Fragment::parse("<p>Hi there</p>");
        assert_eq!(fragment.nodes.len(), 1);
        assert_eq!(fragment.to_html(), "<p>Hi there</p>");
    }

    #[test]
    fn test_void_elements_have_no_end_tag() {
        let fragment = Fragment::parse("<p>line one<br>line two</p><hr>");
        assert_eq!(fragment.to_html(), "<p>line one<br>line two</p><hr>");
    }

    #[test]
    fn test_text_is_escaped() {
        let fragment = Fragment::new(vec![
            Element::new("code").with_text("if a < b && c > d {}").into(),
        ]);
        assert_eq!(
            fragment.to_html(),
            "<code>if a &lt; b &amp;&amp; c &gt; d {}</code>"
        );
    }

    #[test]
    fn test_attribute_quotes_are_escaped() {
        let element = Element::new("span").with_attribute("title", "say \"hi\"");
        let html = element_to_html(&element);
        assert!(html.starts_with("<span title=\"say &quot;hi&quot;\">"));
        assert!(html.ends_with("</span>"));
    }

    #[test]
    fn test_empty_attribute_value() {
        let element = Element::new("details").with_attribute("open", "");
        assert_eq!(element_to_html(&element), "<details open=\"\"></details>");
    }

    #[test]
    fn test_comments_are_dropped() {
        let fragment = Fragment::parse("<div><!-- marker --><span>kept</span></div>");
        assert_eq!(fragment.to_html(), "<div><span>kept</span></div>");
    }

    #[test]
    fn test_attribute_order_preserved() {
        let fragment = Fragment::parse(r#"<a href="/x" class="c" target="_blank">x</a>"#);
        assert_eq!(
            fragment.to_html(),
            r#"<a href="/x" class="c" target="_blank">x</a>"#
        );
    }

    #[test]
    fn test_prefixed_attributes_keep_prefix() {
        let fragment = Fragment::parse(r##"<svg><use xlink:href="#a" href="#b"></use></svg><p xml:lang="fr">x</p>"##);
        assert_eq!(
            fragment.to_html(),
            r##"<svg><use xlink:href="#a" href="#b"></use></svg><p xml:lang="fr">x</p>"##
        );
    }

    #[test]
    fn test_nbsp_in_attribute_is_escaped() {
        let element = Element::new("span").with_attribute("title", "a\u{a0}b");
        assert_eq!(element_to_html(&element), "<span title=\"a&nbsp;b\"></span>");
    }

    #[test]
    fn test_legacy_void_and_raw_text_elements() {
        let fragment = Fragment::new(vec![
            Element::new("object")
                .with_children(vec![Element::new("param").with_attribute("name", "a").into()])
                .into(),
            Element::new("xmp").with_text("a < b & c").into(),
            Element::new("noembed").with_text("<b>").into(),
        ]);
        assert_eq!(
            fragment.to_html(),
            r#"<object><param name="a"></object><xmp>a < b & c</xmp><noembed><b></noembed>"#
        );
    }

    #[test]
    fn test_text_content_and_count_tag() {
        let fragment = Fragment::parse("<pre><code>fn main() {}</code></pre><p>after</p><pre>x</pre>");
        assert_eq!(fragment.text_content(), "fn main() {}afterx");
        assert_eq!(fragment.count_tag("pre"), 2);
        assert_eq!(fragment.count_tag("code"), 1);
    }

    #[test]
    fn test_empty_fragment() {
        let fragment = Fragment::parse("");
        assert!(fragment.is_empty());
        assert_eq!(fragment.to_html(), "");
    }
}
