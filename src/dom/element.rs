use indexmap::IndexMap;

/// A node in an owned markup tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with attributes and children
    Element(Element),

    /// A run of character data (unescaped)
    Text(String),
}

/// Represents an element in an owned markup tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lowercase tag name (e.g., "div", "pre", "code")
    pub tag_name: String,

    /// Attributes in source order, keys unique
    pub attributes: IndexMap<String, String>,

    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create a new Element with no attributes or children
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder method: set a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method: append a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Add a single attribute, replacing any previous value
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Remove an attribute, keeping the order of the remaining ones
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.shift_remove(key)
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Check if element has a specific class
    pub fn has_class(&self, class_name: &str) -> bool {
        if let Some(classes) = self.attributes.get("class") {
            classes.split_whitespace().any(|c| c == class_name)
        } else {
            false
        }
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        collect_text(&self.children, &mut text);
        text
    }

    /// Iterate over direct element children
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

pub(crate) fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_creation() {
        let element = Element::new("a")
            .with_attribute("href", "https://example.com")
            .with_attribute("class", "link external")
            .with_text("Example");

        assert_eq!(element.tag_name, "a");
        assert_eq!(element.get_attribute("href"), Some(&"https://example.com".to_string()));
        assert_eq!(element.text_content(), "Example");
    }

    #[test]
    fn test_has_class() {
        let mut element = Element::new("div");
        element.add_attribute("class", "markdown  markdown-main-panel");

        assert!(element.has_class("markdown"));
        assert!(element.has_class("markdown-main-panel"));
        assert!(!element.has_class("panel"));
        assert!(!Element::new("div").has_class("markdown"));
    }

    #[test]
    fn test_remove_attribute_keeps_order() {
        let mut element = Element::new("span")
            .with_attribute("a", "1")
            .with_attribute("b", "2")
            .with_attribute("c", "3");

        assert_eq!(element.remove_attribute("b"), Some("2".to_string()));
        let keys: Vec<&str> = element.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(element.remove_attribute("missing"), None);
    }

    #[test]
    fn test_text_content_nested() {
        let mut list = Element::new("ul");
        list.add_child(Element::new("li").with_text("one"));
        list.add_child(Element::new("li").with_children(vec![
            Node::Text("t".to_string()),
            Element::new("b").with_text("wo").into(),
        ]));

        assert_eq!(list.text_content(), "onetwo");
        assert_eq!(list.child_elements().count(), 2);
    }

    #[test]
    fn test_is_tag_case_insensitive() {
        let element = Element::new("pre");
        assert!(element.is_tag("PRE"));
        assert!(!element.is_tag("code"));
    }
}
