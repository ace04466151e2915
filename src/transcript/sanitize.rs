use crate::dom::{Element, Fragment, Node};

/// Classes of UI chrome that carry no transcript content
pub const CHROME_CLASSES: &[&str] = &["tool-bar", "buttons", "response-container-footer", "code-editor"];

/// Label shown in the summary bar of a code block widget
pub const CODE_BLOCK_LABEL: &str = "Code Block";

/// Attribute stripping rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePolicy {
    /// Attributes whose names start with any of these are removed
    pub prefixes: &'static [&'static str],

    /// Attributes with exactly these names are removed
    pub exact: &'static [&'static str],
}

impl AttributePolicy {
    /// Angular scoping/host attributes, tracking and source position metadata
    pub const GEMINI: AttributePolicy = AttributePolicy {
        prefixes: &["_ngcontent-", "_nghost-", "ng-tns-", "mat-"],
        exact: &["jslog", "data-sourcepos"],
    };

    /// Check whether an attribute with this name must be removed
    pub fn strips(&self, name: &str) -> bool {
        self.prefixes.iter().any(|prefix| name.starts_with(prefix))
            || self.exact.iter().any(|exact| name == *exact)
    }

    /// Remove every matching attribute from a single element
    pub fn apply(&self, element: &mut Element) {
        element.attributes.retain(|name, _| !self.strips(name));
    }
}

impl Default for AttributePolicy {
    fn default() -> Self {
        Self::GEMINI
    }
}

/// Sanitize assistant markup with the default policy
///
/// Returns a new fragment; the input is left untouched.
pub fn sanitize(fragment: &Fragment) -> Fragment {
    sanitize_with(fragment, &AttributePolicy::default())
}

/// Sanitize assistant markup with a custom attribute policy
pub fn sanitize_with(fragment: &Fragment, policy: &AttributePolicy) -> Fragment {
    let mut nodes = fragment.nodes.clone();
    clean_nodes(&mut nodes, policy);
    Fragment::new(nodes)
}

fn is_chrome(element: &Element) -> bool {
    CHROME_CLASSES.iter().any(|class| element.has_class(class))
}

fn clean_nodes(nodes: &mut Vec<Node>, policy: &AttributePolicy) {
    nodes.retain(|node| !matches!(node, Node::Element(element) if is_chrome(element)));

    for node in nodes.iter_mut() {
        let Node::Element(element) = node else {
            continue;
        };

        policy.apply(element);
        clean_nodes(&mut element.children, policy);

        if element.is_tag("pre") {
            let pre = std::mem::replace(element, Element::new("pre"));
            *element = code_block_widget(pre);
        }
    }
}

/// Wrap a code block in an open disclosure widget with a copy button
pub fn code_block_widget(pre: Element) -> Element {
    let summary = Element::new("summary")
        .with_attribute("class", "code-block-summary")
        .with_children(vec![
            Element::new("span")
                .with_attribute("class", "summary-text")
                .with_text(CODE_BLOCK_LABEL)
                .into(),
            Element::new("button")
                .with_attribute("class", "copy-code-button")
                .with_attribute("onclick", "copyCode(this, event)")
                .with_text("Copy")
                .into(),
        ]);

    Element::new("details")
        .with_attribute("class", "code-block-details")
        .with_attribute("open", "")
        .with_children(vec![summary.into(), pre.into()])
}
