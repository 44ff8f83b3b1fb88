//! Default markup cleanup: parse raw SVG text and strip authoring-tool cruft.

use super::{CleanupTransform, TransformError};
use crate::markup::{Element, MarkupTree, Node, ViewBox};

/// Editor namespaces whose elements and attributes carry no rendering
/// meaning. Matched against qualified-name prefixes and `xmlns:` suffixes.
const EDITOR_PREFIXES: &[&str] = &["inkscape", "sodipodi", "sketch", "figma", "serif"];

/// Non-rendering elements removed outright.
const CRUFT_ELEMENTS: &[&str] = &["metadata", "title", "desc"];

/// The built-in cleanup primitive.
///
/// Parses the raw text (dropping comments, the DOCTYPE, and processing
/// instructions), removes editor metadata, and normalizes the root to carry
/// a valid `viewBox`. Fails if the markup is not well-formed, the root is
/// not `<svg>`, or no usable dimensions can be determined.
pub struct DefaultCleanup;

impl CleanupTransform for DefaultCleanup {
    fn cleanup(&self, source: &str) -> Result<MarkupTree, TransformError> {
        let mut tree = MarkupTree::parse(source)?;

        if tree.root().name != "svg" {
            return Err(TransformError::Invalid(format!(
                "root element is <{}>, expected <svg>",
                tree.root().name
            )));
        }

        strip_editor_cruft(tree.root_mut());
        normalize_view_box(&mut tree)?;

        Ok(tree)
    }
}

/// Removes editor elements and attributes from the whole subtree.
fn strip_editor_cruft(element: &mut Element) {
    element
        .attrs
        .retain(|(name, _)| !is_editor_attr(name) && !name.starts_with("data-"));

    element.children.retain(|node| match node {
        Node::Element(child) => !is_cruft_element(&child.name),
        Node::Text(_) => true,
    });

    for node in &mut element.children {
        if let Node::Element(child) = node {
            strip_editor_cruft(child);
        }
    }
}

fn is_editor_attr(name: &str) -> bool {
    let local = name.strip_prefix("xmlns:").unwrap_or(name);
    EDITOR_PREFIXES.iter().any(|prefix| {
        local == *prefix
            || (name.len() > prefix.len() + 1
                && name.starts_with(prefix)
                && name.as_bytes()[prefix.len()] == b':')
    })
}

fn is_cruft_element(name: &str) -> bool {
    CRUFT_ELEMENTS.contains(&name)
        || EDITOR_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix) && name.as_bytes().get(prefix.len()) == Some(&b':'))
}

/// Ensures the root carries a valid `viewBox`, synthesizing one from the
/// `width`/`height` attributes when absent, and drops the now-redundant
/// dimension attributes.
fn normalize_view_box(tree: &mut MarkupTree) -> Result<(), TransformError> {
    let view_box = match tree.root().attr("viewBox") {
        Some(raw) => ViewBox::parse(raw)
            .ok_or_else(|| TransformError::Invalid(format!("malformed viewBox \"{raw}\"")))?,
        None => {
            let width = dimension_attr(tree.root(), "width")?;
            let height = dimension_attr(tree.root(), "height")?;
            ViewBox::new(0.0, 0.0, width, height)
        }
    };

    if view_box.width <= 0.0 || view_box.height <= 0.0 {
        return Err(TransformError::Invalid(format!(
            "non-positive icon dimensions {}x{}",
            view_box.width, view_box.height
        )));
    }

    let root = tree.root_mut();
    root.remove_attr("width");
    root.remove_attr("height");
    root.remove_attr("x");
    root.remove_attr("y");
    tree.set_view_box(view_box);
    Ok(())
}

fn dimension_attr(root: &Element, name: &str) -> Result<f64, TransformError> {
    let raw = root
        .attr(name)
        .ok_or_else(|| TransformError::Invalid(format!("missing {name} and viewBox")))?;
    raw.trim()
        .trim_end_matches("px")
        .parse::<f64>()
        .map_err(|_| TransformError::Invalid(format!("malformed {name} \"{raw}\"")))
}

// ============================================================================
// Tests
// ============================================================================
