//! Mutable markup tree for one icon's vector content.
//!
//! Icons arrive as raw SVG text and are parsed into an in-memory tree that
//! the pipeline transforms mutate in place. The tree round-trips back to
//! canonical text via [`MarkupTree::to_string`], and exports its body
//! (everything inside the `<svg>` wrapper) via [`MarkupTree::inner_markup`].

use std::fmt;

use thiserror::Error;

/// Errors produced while parsing raw markup into a [`MarkupTree`].
#[derive(Debug, Error)]
pub enum MarkupError {
    /// The raw text is not well-formed XML.
    #[error("markup is not well-formed: {0}")]
    Parse(#[from] roxmltree::Error),
}

// ============================================================================
// ViewBox
// ============================================================================

/// An icon's view rectangle in user units.
///
/// Mirrors the SVG `viewBox` attribute: an origin plus a size. Width and
/// height are expected to be positive; the cleanup transform validates this
/// before the rest of the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    /// X coordinate of the left edge.
    pub left: f64,
    /// Y coordinate of the top edge.
    pub top: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

impl ViewBox {
    /// Creates a new view rectangle.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Parses a `viewBox` attribute value (`"left top width height"`,
    /// whitespace- or comma-separated).
    ///
    /// Returns `None` if the value does not contain exactly four numbers.
    pub fn parse(value: &str) -> Option<Self> {
        let mut numbers = value
            .split(|c: char| c.is_ascii_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(str::parse::<f64>);

        let left = numbers.next()?.ok()?;
        let top = numbers.next()?.ok()?;
        let width = numbers.next()?.ok()?;
        let height = numbers.next()?.ok()?;
        if numbers.next().is_some() {
            return None;
        }
        Some(Self::new(left, top, width, height))
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            fmt_number(self.left),
            fmt_number(self.top),
            fmt_number(self.width),
            fmt_number(self.height)
        )
    }
}

/// Formats a coordinate without a trailing `.0` for whole values.
pub(crate) fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

// ============================================================================
// Tree nodes
// ============================================================================

/// One node in the markup tree: an element or a run of character data.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A markup element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Qualified tag name (`path`, `linearGradient`, `sodipodi:namedview`).
    pub name: String,
    /// Attributes in document order as (name, value) pairs.
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, replacing any existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value.into();
        } else {
            self.attrs.push((name.to_string(), value.into()));
        }
    }

    /// Removes an attribute, returning its value if it was present.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(index).1)
    }

    /// Iterates over child elements (skipping text nodes).
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }
}

// ============================================================================
// MarkupTree
// ============================================================================

/// An in-memory, mutable representation of one icon's vector content.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupTree {
    root: Element,
}

impl MarkupTree {
    /// Builds a tree from an already-constructed root element.
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    /// Parses raw markup text into a tree.
    ///
    /// Comments, processing instructions, and the DOCTYPE are dropped during
    /// parsing. Namespace declarations are re-emitted as `xmlns` attributes
    /// on the element that declared them, so the serialized form parses back
    /// to the same tree.
    pub fn parse(source: &str) -> Result<Self, MarkupError> {
        let doc = roxmltree::Document::parse(source)?;
        let root = convert_element(doc.root_element());
        Ok(Self { root })
    }

    /// Returns the root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Returns the root element mutably.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Returns the view rectangle from the root `viewBox` attribute.
    pub fn view_box(&self) -> Option<ViewBox> {
        ViewBox::parse(self.root.attr("viewBox")?)
    }

    /// Writes a view rectangle back to the root `viewBox` attribute.
    pub fn set_view_box(&mut self, view_box: ViewBox) {
        self.root.set_attr("viewBox", view_box.to_string());
    }

    /// Serializes the children of the root element only.
    ///
    /// This is the form stored in the exported document: the icon body
    /// without its `<svg>` wrapper.
    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        for child in &self.root.children {
            write_node(&mut out, child);
        }
        out
    }
}

impl fmt::Display for MarkupTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_element(&mut out, &self.root);
        f.write_str(&out)
    }
}

// ============================================================================
// Parsing helpers
// ============================================================================

fn convert_element(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(qualified_name(
        node,
        node.tag_name().namespace(),
        node.tag_name().name(),
    ));

    // roxmltree does not report xmlns declarations as attributes. Re-emit
    // each namespace on the element that introduced it: in scope here but
    // not on the parent.
    for ns in node.namespaces() {
        if ns.uri() == "http://www.w3.org/XML/1998/namespace" {
            continue;
        }
        let inherited = node.parent_element().is_some_and(|parent| {
            parent
                .namespaces()
                .any(|pn| pn.name() == ns.name() && pn.uri() == ns.uri())
        });
        if inherited {
            continue;
        }
        let name = match ns.name() {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        };
        element.attrs.push((name, ns.uri().to_string()));
    }

    for attr in node.attributes() {
        let name = qualified_name(node, attr.namespace(), attr.name());
        element.attrs.push((name, attr.value().to_string()));
    }

    for child in node.children() {
        if child.is_element() {
            element.children.push(Node::Element(convert_element(child)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                // Inter-element whitespace carries no meaning for icons.
                if !text.trim().is_empty() {
                    element.children.push(Node::Text(text.to_string()));
                }
            }
        }
    }

    element
}

fn qualified_name(scope: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace {
        Some("http://www.w3.org/XML/1998/namespace") => format!("xml:{local}"),
        Some(uri) => match scope.lookup_prefix(uri) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
            _ => local.to_string(),
        },
        None => local.to_string(),
    }
}

// ============================================================================
// Serialization
// ============================================================================

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(el) => write_element(out, el),
        Node::Text(text) => out.push_str(&escape_text(text)),
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        for child in &element.children {
            write_node(out, child);
        }
        out.push_str("</");
        out.push_str(&element.name);
        out.push('>');
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

// ============================================================================
// Tests
// ============================================================================
