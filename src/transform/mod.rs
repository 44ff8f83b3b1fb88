//! Markup transform primitives used by the icon pipeline.
//!
//! The pipeline treats its three heavyweight transforms (cleanup, color
//! rewriting, and structural optimization) as injectable capabilities
//! rather than hard-coded calls, so an alternative implementation (a
//! different optimizer, say) can be substituted without touching the
//! controller. Each capability is a small trait; [`Transforms`] bundles one
//! implementation of each, defaulting to the in-crate implementations.

pub mod cleanup;
pub mod colors;
pub mod optimize;

pub use cleanup::DefaultCleanup;
pub use colors::{DefaultColorRewriter, ParsedColor, THEMEABLE_COLOR, parse_color, themeable_policy};
pub use optimize::{DefaultOptimizer, OptimizeOptions};

use thiserror::Error;

use crate::markup::{MarkupError, MarkupTree};

/// Failure of any one transform step over an icon's markup.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The raw markup could not be parsed into a tree.
    #[error(transparent)]
    Markup(#[from] MarkupError),

    /// The markup parsed but violates what the transform requires of it.
    #[error("{0}")]
    Invalid(String),
}

/// Decision callback applied to each color attribute during a rewrite.
///
/// Receives the attribute name, the raw color text, and the parsed color
/// when the raw text is recognizable as one. Returns the replacement value
/// (which may be the raw text unchanged).
pub type ColorCallback<'a> = dyn FnMut(&str, &str, Option<&ParsedColor>) -> String + 'a;

/// Normalizes raw markup into a canonical, well-formed tree.
pub trait CleanupTransform {
    /// Parses and cleans one icon's raw markup.
    ///
    /// After a successful cleanup the tree is well-formed, free of
    /// authoring-tool cruft, and carries a valid view rectangle.
    fn cleanup(&self, source: &str) -> Result<MarkupTree, TransformError>;
}

/// Rewrites color attributes in place via a per-color decision callback.
pub trait ColorTransform {
    /// Invokes `callback` for every color attribute in the tree and stores
    /// each returned value back into the attribute.
    fn rewrite(
        &self,
        tree: &mut MarkupTree,
        callback: &mut ColorCallback<'_>,
    ) -> Result<(), TransformError>;
}

/// General-purpose size reduction over the markup tree.
pub trait OptimizeTransform {
    /// Applies the optimization rules enabled in `options`.
    fn optimize(&self, tree: &mut MarkupTree, options: &OptimizeOptions)
    -> Result<(), TransformError>;
}

/// One implementation of each transform capability.
pub struct Transforms {
    pub cleanup: Box<dyn CleanupTransform>,
    pub colors: Box<dyn ColorTransform>,
    pub optimizer: Box<dyn OptimizeTransform>,
}

impl Default for Transforms {
    fn default() -> Self {
        Self {
            cleanup: Box::new(DefaultCleanup),
            colors: Box::new(DefaultColorRewriter),
            optimizer: Box::new(DefaultOptimizer),
        }
    }
}
