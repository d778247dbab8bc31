//! html5ever-backed fragment parser.

use std::cell::RefCell;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName};

use crate::dom::{Element, Node};
use crate::errors::ParseError;
use crate::parser::FragmentParser;

/// Fragment parser driving html5ever's document parser.
///
/// Snippet content is a body fragment, so the input is parsed as a full
/// document (prefixed with a doctype, the way the upstream editor serves it)
/// and unwrapped to the body element.
#[derive(Debug, Clone, Default)]
pub struct Html5Parser;

impl Html5Parser {
    pub fn new() -> Self {
        Html5Parser
    }
}

impl FragmentParser for Html5Parser {
    fn parse(&self, content: &str) -> Result<Node, ParseError> {
        let html = format!("<!DOCTYPE html>{}", content);
        let sink = parse_document(FragmentSink::new(), ParseOpts::default())
            .from_utf8()
            .one(html.as_bytes());
        sink.into_body()
            .ok_or_else(|| ParseError::Malformed("fragment produced no body".to_string()))
    }
}

/// Handle used by the tree builder to reference sink nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Handle(usize);

enum SinkData {
    Document,
    Doctype,
    Comment,
    Element {
        // Boxed so the QualName keeps a stable address while the arena grows
        name: Box<QualName>,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

struct SinkNode {
    parent: Option<usize>,
    children: Vec<usize>,
    data: SinkData,
}

/// TreeSink building a flat arena of nodes.
///
/// Uses interior mutability (RefCell) because html5ever's TreeSink trait
/// requires methods to take `&self` but we need to mutate the arena.
struct FragmentSink {
    nodes: RefCell<Vec<SinkNode>>,
}

impl FragmentSink {
    fn new() -> Self {
        FragmentSink {
            nodes: RefCell::new(vec![SinkNode {
                parent: None,
                children: Vec::new(),
                data: SinkData::Document,
            }]),
        }
    }

    fn create(&self, data: SinkData) -> Handle {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(SinkNode {
            parent: None,
            children: Vec::new(),
            data,
        });
        Handle(nodes.len() - 1)
    }

    /// Consume the sink and return the body element, if one was built.
    fn into_body(self) -> Option<Node> {
        let nodes = self.nodes.into_inner();
        let body = nodes.iter().position(|node| {
            matches!(&node.data, SinkData::Element { name, .. } if name.local.as_ref() == "body")
        })?;
        Some(build_node(&nodes, body))
    }
}

/// Convert one arena node into the minimal DOM, skipping non-content nodes.
fn build_node(nodes: &[SinkNode], id: usize) -> Node {
    match &nodes[id].data {
        SinkData::Text(text) => Node::Text(text.clone()),
        SinkData::Element { name, attrs } => Node::Element(Element {
            tag: name.local.to_string(),
            attrs: attrs.clone(),
            children: nodes[id]
                .children
                .iter()
                .copied()
                .filter(|&child| {
                    matches!(
                        nodes[child].data,
                        SinkData::Text(_) | SinkData::Element { .. }
                    )
                })
                .map(|child| build_node(nodes, child))
                .collect(),
        }),
        // Filtered out by the caller
        _ => Node::Text(String::new()),
    }
}

fn detach(nodes: &mut [SinkNode], id: usize) {
    if let Some(parent) = nodes[id].parent.take() {
        nodes[parent].children.retain(|&child| child != id);
    }
}

fn append_node(nodes: &mut [SinkNode], parent: usize, child: usize) {
    detach(nodes, child);
    nodes[parent].children.push(child);
    nodes[child].parent = Some(parent);
}

fn append_text(nodes: &mut Vec<SinkNode>, parent: usize, text: &str) {
    // The builder emits text in chunks; merge with a trailing text sibling
    if let Some(&last) = nodes[parent].children.last() {
        if let SinkData::Text(existing) = &mut nodes[last].data {
            existing.push_str(text);
            return;
        }
    }
    nodes.push(SinkNode {
        parent: Some(parent),
        children: Vec::new(),
        data: SinkData::Text(text.to_string()),
    });
    let id = nodes.len() - 1;
    nodes[parent].children.push(id);
}

fn insert_before(nodes: &mut [SinkNode], sibling: usize, child: usize) {
    detach(nodes, child);
    if let Some(parent) = nodes[sibling].parent {
        let position = nodes[parent]
            .children
            .iter()
            .position(|&c| c == sibling)
            .unwrap_or(nodes[parent].children.len());
        nodes[parent].children.insert(position, child);
        nodes[child].parent = Some(parent);
    }
}

impl TreeSink for FragmentSink {
    type Handle = Handle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, _msg: std::borrow::Cow<'static, str>) {
        // Ignore parse errors - be lenient like browsers
    }

    fn get_document(&self) -> Self::Handle {
        Handle(0)
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let nodes = self.nodes.borrow();
        match nodes.get(target.0).map(|node| &node.data) {
            Some(SinkData::Element { name, .. }) => {
                // SAFETY: the QualName is boxed and neither moved nor dropped
                // while the sink is alive, so the pointer stays valid after
                // the RefCell borrow ends.
                unsafe { &*(name.as_ref() as *const QualName) }
            }
            _ => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        self.create(SinkData::Element {
            name: Box::new(name),
            attrs,
        })
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.create(SinkData::Comment)
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        self.create(SinkData::Comment)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut nodes = self.nodes.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => append_node(&mut nodes, parent.0, node.0),
            NodeOrText::AppendText(text) => append_text(&mut nodes, parent.0, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let parent = self.nodes.borrow()[element.0].parent;
        match parent {
            Some(parent) => {
                let mut nodes = self.nodes.borrow_mut();
                match child {
                    NodeOrText::AppendNode(node) => append_node(&mut nodes, parent, node.0),
                    NodeOrText::AppendText(text) => append_text(&mut nodes, parent, &text),
                }
            }
            None => self.append(prev_element, child),
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let doctype = self.create(SinkData::Doctype);
        let mut nodes = self.nodes.borrow_mut();
        append_node(&mut nodes, 0, doctype.0);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.0 == y.0
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut nodes = self.nodes.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => insert_before(&mut nodes, sibling.0, node.0),
            NodeOrText::AppendText(text) => {
                nodes.push(SinkNode {
                    parent: None,
                    children: Vec::new(),
                    data: SinkData::Text(text.to_string()),
                });
                let id = nodes.len() - 1;
                insert_before(&mut nodes, sibling.0, id);
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Html5Attribute>) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(SinkData::Element {
            attrs: existing, ..
        }) = nodes.get_mut(target.0).map(|node| &mut node.data)
        {
            for attr in attrs {
                let name = attr.name.local.to_string();
                if !existing.iter().any(|(key, _)| *key == name) {
                    existing.push((name, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        let mut nodes = self.nodes.borrow_mut();
        detach(&mut nodes, target.0);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut nodes = self.nodes.borrow_mut();
        let children = std::mem::take(&mut nodes[node.0].children);
        for child in children {
            nodes[child].parent = Some(new_parent.0);
            nodes[new_parent.0].children.push(child);
        }
    }
}
