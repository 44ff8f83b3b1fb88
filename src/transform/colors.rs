//! Color parsing and the in-place color rewrite primitive.
//!
//! The rewriter walks the tree and hands every color attribute (including
//! declarations inside `style` attributes and `<style>` blocks) to a
//! decision callback. The
//! callback used for themeable icons lives here too: [`themeable_policy`]
//! preserves transparency and absent fills, and maps everything else to the
//! themeable placeholder `currentColor`.

use super::{ColorCallback, ColorTransform, TransformError};
use crate::markup::{Element, MarkupTree, Node};

/// The themeable placeholder: a color that inherits from the rendering
/// context.
pub const THEMEABLE_COLOR: &str = "currentColor";

/// Attributes that carry a paint or color value.
const COLOR_ATTRS: &[&str] = &[
    "fill",
    "stroke",
    "color",
    "stop-color",
    "flood-color",
    "lighting-color",
];

// ============================================================================
// ParsedColor
// ============================================================================

/// A color value recognized in markup text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedColor {
    /// `none` or `transparent`: the absence of paint.
    Empty,
    /// The `currentColor` keyword.
    CurrentColor,
    /// A hex color, normalized to lowercase with its leading `#`.
    Hex(String),
    /// A functional color such as `rgb(…)` or `hsl(…)`, lowercased.
    Function(String),
    /// A named color keyword, lowercased.
    Keyword(String),
}

impl ParsedColor {
    /// Returns true for the empty/transparent sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Parses a raw color string.
///
/// Returns `None` for values that are not colors at all: paint-server
/// references (`url(#…)`), CSS-wide keywords like `inherit`, or malformed
/// text. Callers treat `None` as "leave untouched".
pub fn parse_color(raw: &str) -> Option<ParsedColor> {
    let value = raw.trim();
    if value.is_empty() {
        return Some(ParsedColor::Empty);
    }

    let lower = value.to_ascii_lowercase();
    match lower.as_str() {
        "none" | "transparent" => return Some(ParsedColor::Empty),
        "currentcolor" => return Some(ParsedColor::CurrentColor),
        "inherit" | "initial" | "unset" | "context-fill" | "context-stroke" => return None,
        _ => {}
    }

    if let Some(digits) = lower.strip_prefix('#') {
        let valid = matches!(digits.len(), 3 | 4 | 6 | 8)
            && digits.bytes().all(|b| b.is_ascii_hexdigit());
        return valid.then(|| ParsedColor::Hex(lower));
    }

    if lower.starts_with("url(") {
        return None;
    }

    if (lower.starts_with("rgb(")
        || lower.starts_with("rgba(")
        || lower.starts_with("hsl(")
        || lower.starts_with("hsla("))
        && lower.ends_with(')')
    {
        return Some(ParsedColor::Function(lower));
    }

    if !lower.is_empty() && lower.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Some(ParsedColor::Keyword(lower));
    }

    None
}

// ============================================================================
// Themeable policy
// ============================================================================

/// The color decision applied to themeable icons.
///
/// Preserves absent/transparent paint (`none`, `transparent`, unparseable
/// values) and replaces every real color with [`THEMEABLE_COLOR`]. Applying
/// the policy twice yields the same markup as applying it once.
pub fn themeable_policy(_attr: &str, raw: &str, color: Option<&ParsedColor>) -> String {
    match color {
        None => raw.to_string(),
        Some(c) if c.is_empty() => raw.to_string(),
        Some(_) => THEMEABLE_COLOR.to_string(),
    }
}

// ============================================================================
// DefaultColorRewriter
// ============================================================================

/// The built-in color rewrite primitive.
pub struct DefaultColorRewriter;

impl ColorTransform for DefaultColorRewriter {
    fn rewrite(
        &self,
        tree: &mut MarkupTree,
        callback: &mut ColorCallback<'_>,
    ) -> Result<(), TransformError> {
        rewrite_element(tree.root_mut(), callback);
        Ok(())
    }
}

fn rewrite_element(element: &mut Element, callback: &mut ColorCallback<'_>) {
    for (name, value) in &mut element.attrs {
        if COLOR_ATTRS.contains(&name.as_str()) {
            let replacement = callback(name, value, parse_color(value).as_ref());
            if replacement != *value {
                *value = replacement;
            }
        } else if name == "style" {
            let rewritten = rewrite_style(value, callback);
            if rewritten != *value {
                *value = rewritten;
            }
        }
    }

    if element.name == "style" {
        for node in &mut element.children {
            if let Node::Text(css) = node {
                let rewritten = rewrite_css_text(css, callback);
                if rewritten != *css {
                    *css = rewritten;
                }
            }
        }
    }

    for node in &mut element.children {
        if let Node::Element(child) = node {
            rewrite_element(child, callback);
        }
    }
}

/// Rewrites color declarations inside a CSS rule body (`selector { … }`),
/// leaving selectors and text outside braces untouched.
fn rewrite_css_text(css: &str, callback: &mut ColorCallback<'_>) -> String {
    let mut out = String::new();
    let mut rest = css;
    while let Some(open) = rest.find('{') {
        let (head, tail) = rest.split_at(open + 1);
        out.push_str(head);
        match tail.find('}') {
            Some(close) => {
                out.push_str(&rewrite_style(&tail[..close], callback));
                out.push('}');
                rest = &tail[close + 1..];
            }
            None => {
                out.push_str(tail);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Rewrites color declarations inside a `style` attribute, preserving every
/// other declaration and the original ordering.
fn rewrite_style(style: &str, callback: &mut ColorCallback<'_>) -> String {
    let mut out = Vec::new();
    for declaration in style.split(';') {
        if declaration.trim().is_empty() {
            continue;
        }
        match declaration.split_once(':') {
            Some((property, value)) if COLOR_ATTRS.contains(&property.trim()) => {
                let property = property.trim();
                let value = value.trim();
                let replacement = callback(property, value, parse_color(value).as_ref());
                out.push(format!("{property}:{replacement}"));
            }
            _ => out.push(declaration.trim().to_string()),
        }
    }
    out.join(";")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite_themeable(source: &str) -> String {
        let mut tree = MarkupTree::parse(source).unwrap();
        DefaultColorRewriter
            .rewrite(&mut tree, &mut themeable_policy)
            .unwrap();
        tree.to_string()
    }

    #[test]
    fn parse_color_recognizes_hex_forms() {
        assert_eq!(parse_color("#AbC"), Some(ParsedColor::Hex("#abc".into())));
        assert_eq!(
            parse_color("#112233"),
            Some(ParsedColor::Hex("#112233".into()))
        );
        assert_eq!(parse_color("#12345g"), None);
    }

    #[test]
    fn parse_color_empty_sentinels() {
        assert_eq!(parse_color("none"), Some(ParsedColor::Empty));
        assert_eq!(parse_color("Transparent"), Some(ParsedColor::Empty));
        assert_eq!(parse_color(""), Some(ParsedColor::Empty));
        assert!(parse_color("none").unwrap().is_empty());
    }

    #[test]
    fn parse_color_leaves_references_and_css_keywords_alone() {
        assert_eq!(parse_color("url(#gradient)"), None);
        assert_eq!(parse_color("inherit"), None);
    }

    #[test]
    fn policy_preserves_empty_and_unparseable() {
        assert_eq!(themeable_policy("fill", "none", Some(&ParsedColor::Empty)), "none");
        assert_eq!(themeable_policy("fill", "url(#g)", None), "url(#g)");
    }

    #[test]
    fn policy_rewrites_real_colors() {
        assert_eq!(
            themeable_policy("fill", "#112233", Some(&ParsedColor::Hex("#112233".into()))),
            THEMEABLE_COLOR
        );
        assert_eq!(
            themeable_policy("stroke", "red", Some(&ParsedColor::Keyword("red".into()))),
            THEMEABLE_COLOR
        );
    }

    #[test]
    fn rewrites_fill_and_stroke_attributes() {
        let out = rewrite_themeable(
            r##"<svg viewBox="0 0 8 8"><path fill="#112233" stroke="red" d="M0 0z"/></svg>"##,
        );
        assert!(out.contains(r#"fill="currentColor""#));
        assert!(out.contains(r#"stroke="currentColor""#));
        assert!(!out.contains("#112233"));
    }

    #[test]
    fn preserves_none_fills() {
        let out = rewrite_themeable(
            r##"<svg viewBox="0 0 8 8"><path fill="none" stroke="#000" d="M0 0z"/></svg>"##,
        );
        assert!(out.contains(r#"fill="none""#));
        assert!(out.contains(r#"stroke="currentColor""#));
    }

    #[test]
    fn rewrites_style_declarations() {
        let out = rewrite_themeable(
            r##"<svg viewBox="0 0 8 8"><path style="fill:#123;stroke-width:2" d="M0 0z"/></svg>"##,
        );
        assert!(out.contains("fill:currentColor"));
        assert!(out.contains("stroke-width:2"));
    }

    #[test]
    fn rewrites_declarations_inside_style_elements() {
        let out = rewrite_themeable(
            r##"<svg viewBox="0 0 8 8"><style>.a{fill:#123;stroke-width:2}.b{stroke:#456}</style><path class="a" d="M0 0z"/></svg>"##,
        );
        assert!(out.contains(".a{fill:currentColor;stroke-width:2}"));
        assert!(out.contains(".b{stroke:currentColor}"));
        assert!(!out.contains("#123"));
        assert!(!out.contains("#456"));
    }

    #[test]
    fn rewrite_is_idempotent() {
        let source = r##"<svg viewBox="0 0 8 8"><style>.a{fill:#123}</style><path fill="#112233" d="M0 0z"/><rect fill="none" style="stroke:#fff" width="8" height="8"/></svg>"##;
        let once = rewrite_themeable(source);
        let twice = rewrite_themeable(&once);
        assert_eq!(once, twice);
    }
}
