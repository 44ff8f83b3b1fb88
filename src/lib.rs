//! iconset-builder: Build a normalized icon-set document from SVG files
//!
//! This crate imports a directory of individually-authored SVG icons and
//! produces one structured icon-set document in which every icon follows
//! identical conventions: a single bounding box, no editor cruft, and a
//! predictable color model: "themeable" icons have their colors rewritten
//! to `currentColor`, while "fixed-palette" icons keep their colors exactly
//! as authored.
//!
//! # Example
//!
//! ```
//! use iconset_builder::{IconEntry, IconPipeline, ImportedSet};
//!
//! let mut set = ImportedSet::new("my-icons");
//! set.push(IconEntry::icon(
//!     "check",
//!     r##"<svg viewBox="0 0 24 24"><path fill="#112233" d="M4 12l5 5 11-11"/></svg>"##,
//! ));
//!
//! let document = set.build(&IconPipeline::default());
//! assert!(document.icons["check"].body.contains("currentColor"));
//! ```
//!
//! # Substituting transforms
//!
//! The heavyweight transforms (cleanup, color rewrite, optimization) are
//! injectable through the [`Transforms`] bundle, so an alternative
//! implementation can replace any of them without touching the pipeline:
//!
//! ```
//! use iconset_builder::{
//!     DefaultCleanup, IconPipeline, PipelineOptions, Transforms,
//! };
//!
//! let transforms = Transforms {
//!     cleanup: Box::new(DefaultCleanup),
//!     ..Transforms::default()
//! };
//! let pipeline = IconPipeline::with_transforms(PipelineOptions::default(), transforms);
//! # let _ = pipeline;
//! ```

mod classify;
mod import;
mod markup;
mod padding;
mod pipeline;
mod set;
pub mod transform;

pub use classify::{
    ColorToken, DEFAULT_COLOR_THRESHOLD, PaletteVerdict, classify, flat_fills, has_gradient,
};
pub use import::{ImportError, import_directory};
pub use markup::{Element, MarkupError, MarkupTree, Node, ViewBox};
pub use padding::{DEFAULT_PAD_FACTOR, pad_view_box};
pub use pipeline::{IconError, IconPipeline, PipelineOptions, ProcessedIcon};
pub use set::{
    AliasRecord, EntryKind, ExportError, IconEntry, IconRecord, IconSetDocument, ImportedSet,
};
pub use transform::{
    CleanupTransform, ColorCallback, ColorTransform, DefaultCleanup, DefaultColorRewriter,
    DefaultOptimizer, OptimizeOptions, OptimizeTransform, ParsedColor, THEMEABLE_COLOR,
    TransformError, Transforms, parse_color, themeable_policy,
};
