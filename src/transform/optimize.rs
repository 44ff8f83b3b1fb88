//! Default structural optimizer and its per-icon plugin configuration.
//!
//! The optimizer is a small rule suite over the markup tree. Rules are
//! individually switchable because the aggressive defaults are wrong for
//! fixed-palette icons: removing "unused" defs or unrecognized attributes
//! can destroy gradient stops and masks those icons rely on.
//! [`OptimizeOptions::for_icon`] builds the protective per-icon
//! configuration the pipeline uses.

use std::collections::HashMap;

use super::{OptimizeTransform, TransformError};
use crate::markup::{Element, MarkupTree, Node};

/// Elements that exist only to contain others.
const CONTAINER_ELEMENTS: &[&str] = &["g", "defs"];

/// Attribute values that match the SVG rendering defaults and can be
/// dropped without changing output.
const DEFAULT_ATTRS: &[(&str, &str)] = &[
    ("fill-opacity", "1"),
    ("stroke-opacity", "1"),
    ("opacity", "1"),
    ("stroke-width", "1"),
    ("fill-rule", "nonzero"),
    ("stroke-linecap", "butt"),
    ("stroke-linejoin", "miter"),
    ("stroke-miterlimit", "4"),
    ("stroke-dasharray", "none"),
];

// ============================================================================
// OptimizeOptions
// ============================================================================

/// Named rule switches for the structural optimizer.
#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    /// Hoist children out of `<g>` elements that carry no attributes.
    pub collapse_groups: bool,
    /// Drop container elements left with no children.
    pub remove_empty: bool,
    /// Drop `<defs>` content whose id is referenced nowhere.
    pub remove_unused_defs: bool,
    /// Drop attributes matching SVG defaults and accessibility-only markup.
    pub remove_unknown_and_defaults: bool,
    /// Prefix every internal id (and its references) with this string.
    pub id_prefix: Option<String>,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            collapse_groups: true,
            remove_empty: true,
            remove_unused_defs: true,
            remove_unknown_and_defaults: true,
            id_prefix: None,
        }
    }
}

impl OptimizeOptions {
    /// The configuration used when optimizing one icon of the set.
    ///
    /// Keeps defs content and unrecognized attributes intact (fixed-palette
    /// icons depend on them), and scopes generated identifiers to the icon
    /// name so ids stay unique once many icons share one document.
    pub fn for_icon(name: &str) -> Self {
        Self {
            remove_unused_defs: false,
            remove_unknown_and_defaults: false,
            id_prefix: Some(format!("{name}-")),
            ..Self::default()
        }
    }
}

// ============================================================================
// DefaultOptimizer
// ============================================================================

/// The built-in structural optimizer.
pub struct DefaultOptimizer;

impl OptimizeTransform for DefaultOptimizer {
    fn optimize(
        &self,
        tree: &mut MarkupTree,
        options: &OptimizeOptions,
    ) -> Result<(), TransformError> {
        if options.remove_unused_defs {
            remove_unused_defs(tree.root_mut());
        }
        if options.collapse_groups {
            collapse_groups(tree.root_mut());
        }
        if options.remove_empty {
            remove_empty_containers(tree.root_mut());
        }
        if options.remove_unknown_and_defaults {
            remove_defaults(tree.root_mut());
        }
        if let Some(prefix) = &options.id_prefix {
            prefix_ids(tree.root_mut(), prefix);
        }
        Ok(())
    }
}

// ============================================================================
// Rules
// ============================================================================

fn remove_unused_defs(root: &mut Element) {
    let mut referenced = Vec::new();
    collect_references(root, &mut referenced);

    fn prune(element: &mut Element, referenced: &[String]) {
        if element.name == "defs" {
            element.children.retain(|node| match node {
                Node::Element(child) => child
                    .attr("id")
                    .is_some_and(|id| referenced.iter().any(|r| r == id)),
                Node::Text(_) => false,
            });
        }
        for node in &mut element.children {
            if let Node::Element(child) = node {
                prune(child, referenced);
            }
        }
    }
    prune(root, &referenced);
}

fn collect_references(element: &Element, out: &mut Vec<String>) {
    for (name, value) in &element.attrs {
        if name == "href" || name == "xlink:href" {
            if let Some(id) = value.strip_prefix('#') {
                out.push(id.to_string());
            }
        }
        let mut rest = value.as_str();
        while let Some(start) = rest.find("url(#") {
            rest = &rest[start + "url(#".len()..];
            if let Some(end) = rest.find(')') {
                out.push(rest[..end].to_string());
                rest = &rest[end..];
            } else {
                break;
            }
        }
    }
    for child in element.child_elements() {
        collect_references(child, out);
    }
}

fn collapse_groups(element: &mut Element) {
    for node in &mut element.children {
        if let Node::Element(child) = node {
            collapse_groups(child);
        }
    }

    let mut flattened = Vec::with_capacity(element.children.len());
    for node in element.children.drain(..) {
        match node {
            Node::Element(child) if child.name == "g" && child.attrs.is_empty() => {
                flattened.extend(child.children);
            }
            other => flattened.push(other),
        }
    }
    element.children = flattened;
}

fn remove_empty_containers(element: &mut Element) {
    for node in &mut element.children {
        if let Node::Element(child) = node {
            remove_empty_containers(child);
        }
    }
    element.children.retain(|node| match node {
        Node::Element(child) => {
            !(CONTAINER_ELEMENTS.contains(&child.name.as_str()) && child.children.is_empty())
        }
        Node::Text(_) => true,
    });
}

fn remove_defaults(element: &mut Element) {
    element.attrs.retain(|(name, value)| {
        !DEFAULT_ATTRS.contains(&(name.as_str(), value.as_str()))
            && !name.starts_with("aria-")
            && name != "role"
    });
    for node in &mut element.children {
        if let Node::Element(child) = node {
            remove_defaults(child);
        }
    }
}

fn prefix_ids(root: &mut Element, prefix: &str) {
    let mut renames = HashMap::new();
    collect_ids(root, prefix, &mut renames);
    if renames.is_empty() {
        return;
    }
    apply_renames(root, &renames);
}

fn collect_ids(element: &mut Element, prefix: &str, renames: &mut HashMap<String, String>) {
    if let Some(id) = element.attr("id").map(str::to_string) {
        if !id.starts_with(prefix) {
            let new_id = format!("{prefix}{id}");
            element.set_attr("id", new_id.clone());
            renames.insert(id, new_id);
        }
    }
    for node in &mut element.children {
        if let Node::Element(child) = node {
            collect_ids(child, prefix, renames);
        }
    }
}

fn apply_renames(element: &mut Element, renames: &HashMap<String, String>) {
    for (name, value) in &mut element.attrs {
        if name == "id" {
            continue;
        }
        if name == "href" || name == "xlink:href" {
            if let Some(id) = value.strip_prefix('#') {
                if let Some(new_id) = renames.get(id) {
                    *value = format!("#{new_id}");
                }
            }
            continue;
        }
        if value.contains("url(#") {
            let mut rewritten = value.clone();
            for (old, new) in renames {
                rewritten = rewritten.replace(&format!("url(#{old})"), &format!("url(#{new})"));
            }
            *value = rewritten;
        }
    }
    for node in &mut element.children {
        if let Node::Element(child) = node {
            apply_renames(child, renames);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
