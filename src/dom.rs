/*!
 * Minimal structural DOM consumed by the translation engine.
 *
 * The translator never parses markup itself; it walks a tree of `Node`s that
 * any fragment parser can produce. Only the shape needed for translation is
 * modeled: text leaves, and elements with a tag name, attributes and children.
 */

/// A node in a parsed content fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text leaf
    Text(String),
    /// Element with tag name, attributes and children
    Element(Element),
}

/// An element node
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name, lowercase
    pub tag: String,

    /// Attribute name/value pairs in document order
    pub attrs: Vec<(String, String)>,

    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element with the given tag name
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The element's class attribute, if any
    pub fn class(&self) -> Option<&str> {
        self.attr("class")
    }
}

impl Node {
    /// Build a text leaf
    pub fn text(value: &str) -> Node {
        Node::Text(value.to_string())
    }

    /// Build an element node with attributes and children
    pub fn element(tag: &str, attrs: &[(&str, &str)], children: Vec<Node>) -> Node {
        Node::Element(Element {
            tag: tag.to_ascii_lowercase(),
            attrs: attrs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            children,
        })
    }
}
