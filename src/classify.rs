//! Palette classification for imported icons.
//!
//! An icon is either "themeable" (its colors are meant to be inherited from
//! the rendering context) or "fixed-palette" (its colors are deliberate
//! branding that must be preserved). The classifier decides which, from the
//! icon's serialized markup: a small number of distinct flat fills signals a
//! themeable icon, while gradients or a richer palette signal fixed branding.

/// How an icon's colors should be treated by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteVerdict {
    /// Colors are rewritten so the icon inherits from its context.
    Themeable,
    /// Colors are preserved exactly as authored.
    FixedPalette,
}

/// A flat fill color extracted from markup text.
///
/// Built fresh per classification pass; not persisted anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorToken {
    /// The color as written, including the leading `#`.
    pub raw: String,
    /// Lowercased form used for distinctness comparison. No shorthand
    /// expansion: `#abc` and `#aabbcc` count as two distinct values.
    pub normalized: String,
}

/// Default distinct-flat-fill count above which an icon is fixed-palette.
pub const DEFAULT_COLOR_THRESHOLD: usize = 2;

/// Classifies an icon from its serialized markup.
///
/// Verdict is [`PaletteVerdict::FixedPalette`] when a gradient definition is
/// present or the number of distinct flat fill colors exceeds `threshold`;
/// otherwise [`PaletteVerdict::Themeable`]. An icon with no colors at all is
/// themeable (nothing to preserve).
pub fn classify(markup: &str, threshold: usize) -> PaletteVerdict {
    if has_gradient(markup) || flat_fills(markup).len() > threshold {
        PaletteVerdict::FixedPalette
    } else {
        PaletteVerdict::Themeable
    }
}

/// Returns true if the markup contains a gradient definition element.
pub fn has_gradient(markup: &str) -> bool {
    markup.contains("<linearGradient") || markup.contains("<radialGradient")
}

/// Extracts the distinct flat fill colors declared in the markup.
///
/// Matches both attribute form (`fill="#abc"`) and style-declaration form
/// (`fill:#abc`), case-insensitively, for 3- and 6-digit hex values.
/// Distinctness is judged on the lowercased text, first occurrence wins.
pub fn flat_fills(markup: &str) -> Vec<ColorToken> {
    let bytes = markup.as_bytes();
    let mut tokens: Vec<ColorToken> = Vec::new();

    for (pos, _) in markup.match_indices("fill") {
        // Reject matches inside longer names like "fill-rule" or "flood-fill".
        if pos > 0 {
            let prev = bytes[pos - 1];
            if prev.is_ascii_alphanumeric() || prev == b'-' {
                continue;
            }
        }

        let mut i = pos + "fill".len();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || (bytes[i] != b'=' && bytes[i] != b':') {
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
            i += 1;
        }
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'#' {
            continue;
        }

        let start = i + 1;
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_hexdigit() {
            end += 1;
        }
        let digits = end - start;
        if digits != 3 && digits != 6 {
            continue;
        }

        let raw = &markup[start - 1..end];
        let normalized = raw.to_ascii_lowercase();
        if !tokens.iter().any(|token| token.normalized == normalized) {
            tokens.push(ColorToken {
                raw: raw.to_string(),
                normalized,
            });
        }
    }

    tokens
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(markup: &str) -> PaletteVerdict {
        classify(markup, DEFAULT_COLOR_THRESHOLD)
    }

    #[test]
    fn no_colors_is_themeable() {
        assert_eq!(
            verdict(r#"<svg viewBox="0 0 16 16"><path d="M0 0z"/></svg>"#),
            PaletteVerdict::Themeable
        );
    }

    #[test]
    fn single_flat_fill_is_themeable() {
        assert_eq!(
            verdict(r##"<svg><path fill="#112233" d="M0 0z"/></svg>"##),
            PaletteVerdict::Themeable
        );
    }

    #[test]
    fn two_flat_fills_is_themeable() {
        assert_eq!(
            verdict(r##"<svg><path fill="#111"/><path fill="#222"/></svg>"##),
            PaletteVerdict::Themeable
        );
    }

    #[test]
    fn three_flat_fills_is_fixed_palette() {
        assert_eq!(
            verdict(r##"<svg><path fill="#111"/><path fill="#222"/><path fill="#333"/></svg>"##),
            PaletteVerdict::FixedPalette
        );
    }

    #[test]
    fn gradient_is_fixed_palette_regardless_of_fills() {
        assert_eq!(
            verdict(r##"<svg><defs><linearGradient id="g"/></defs><path fill="#111"/></svg>"##),
            PaletteVerdict::FixedPalette
        );
        assert_eq!(
            verdict(r#"<svg><defs><radialGradient id="g"/></defs></svg>"#),
            PaletteVerdict::FixedPalette
        );
    }

    #[test]
    fn case_variants_count_once() {
        let fills = flat_fills(r##"<svg><path fill="#AbC"/><path fill="#abc"/></svg>"##);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].normalized, "#abc");
        assert_eq!(fills[0].raw, "#AbC");
    }

    #[test]
    fn shorthand_and_long_form_stay_distinct() {
        // No shorthand expansion: #abc and #aabbcc are comparable but distinct.
        let fills = flat_fills(r##"<svg><path fill="#abc"/><path fill="#aabbcc"/></svg>"##);
        assert_eq!(fills.len(), 2);
    }

    #[test]
    fn style_declaration_form_is_detected() {
        let fills = flat_fills(r##"<path style="stroke:none;fill:#445566"/>"##);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].normalized, "#445566");
    }

    #[test]
    fn fill_rule_and_non_hex_fills_are_ignored() {
        let fills = flat_fills(
            r##"<path fill-rule="evenodd" fill="none"/><path fill="url(#g)"/><path fill="red"/>"##,
        );
        assert!(fills.is_empty());
    }

    #[test]
    fn malformed_hex_lengths_are_ignored() {
        let fills = flat_fills(r##"<path fill="#1234"/><path fill="#12"/>"##);
        assert!(fills.is_empty());
    }

    #[test]
    fn threshold_is_configurable() {
        let markup = r##"<svg><path fill="#111"/><path fill="#222"/></svg>"##;
        assert_eq!(classify(markup, 1), PaletteVerdict::FixedPalette);
        assert_eq!(classify(markup, 2), PaletteVerdict::Themeable);
    }
}
