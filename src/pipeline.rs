//! Per-icon normalization pipeline.
//!
//! One icon moves through a fixed sequence: cleanup, optional canvas
//! padding, palette classification, conditional color rewrite, structural
//! optimization. Every step failure is contained to that icon: the
//! controller returns a [`Result`] per icon and the aggregator decides to
//! drop, so one bad file never corrupts or aborts a run.

use thiserror::Error;

use crate::classify::{DEFAULT_COLOR_THRESHOLD, PaletteVerdict, classify};
use crate::markup::{MarkupTree, ViewBox};
use crate::padding::{DEFAULT_PAD_FACTOR, pad_view_box};
use crate::transform::{OptimizeOptions, TransformError, Transforms, colors::themeable_policy};

// ============================================================================
// Errors
// ============================================================================

/// Why one icon was dropped from the set.
///
/// All variants except the diagnostic message are handled identically:
/// the icon is removed and the run continues.
#[derive(Debug, Error)]
pub enum IconError {
    /// The entry exists but carries no renderable markup.
    #[error("icon has no renderable markup")]
    EmptyMarkup,

    /// The cleanup primitive failed.
    #[error("cleanup failed: {0}")]
    Cleanup(#[source] TransformError),

    /// The palette classifier failed.
    #[error("classification failed: {0}")]
    Classification(#[source] TransformError),

    /// The color rewrite primitive failed.
    #[error("color rewrite failed: {0}")]
    ColorRewrite(#[source] TransformError),

    /// The structural optimizer failed.
    #[error("optimization failed: {0}")]
    Optimization(#[source] TransformError),
}

// ============================================================================
// Options
// ============================================================================

/// Pipeline configuration shared by every icon in a run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Whether to expand each icon's view rectangle by a margin.
    pub pad: bool,
    /// Margin factor relative to the icon's larger dimension.
    pub pad_factor: f64,
    /// Distinct-flat-fill count above which an icon is fixed-palette.
    pub color_threshold: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            pad: false,
            pad_factor: DEFAULT_PAD_FACTOR,
            color_threshold: DEFAULT_COLOR_THRESHOLD,
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// The result of running one icon through the pipeline.
#[derive(Debug)]
pub struct ProcessedIcon {
    /// The final, normalized markup tree.
    pub markup: MarkupTree,
    /// The final view rectangle (padding already applied).
    pub view_box: ViewBox,
    /// How the icon's colors were treated.
    pub verdict: PaletteVerdict,
}

/// Runs the per-icon normalization sequence.
pub struct IconPipeline {
    transforms: Transforms,
    options: PipelineOptions,
}

impl IconPipeline {
    /// Creates a pipeline with the built-in transforms.
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            transforms: Transforms::default(),
            options,
        }
    }

    /// Creates a pipeline with substituted transform implementations.
    pub fn with_transforms(options: PipelineOptions, transforms: Transforms) -> Self {
        Self {
            transforms,
            options,
        }
    }

    /// Returns the pipeline configuration.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Processes one icon's raw markup to its final normalized form.
    ///
    /// The icon owns its tree exclusively for the duration of this call;
    /// on error the partially-transformed tree is discarded with it.
    pub fn process(&self, name: &str, source: &str) -> Result<ProcessedIcon, IconError> {
        if source.trim().is_empty() {
            return Err(IconError::EmptyMarkup);
        }

        let mut tree = self
            .transforms
            .cleanup
            .cleanup(source)
            .map_err(IconError::Cleanup)?;

        // Cleanup guarantees a view rectangle; treat its absence as a
        // cleanup contract violation rather than panicking later.
        let mut view_box = tree.view_box().ok_or_else(|| {
            IconError::Cleanup(TransformError::Invalid(
                "cleanup produced no view rectangle".to_string(),
            ))
        })?;

        if self.options.pad {
            view_box = pad_view_box(view_box, self.options.pad_factor);
            tree.set_view_box(view_box);
        }

        let verdict = classify(&tree.to_string(), self.options.color_threshold);

        if verdict == PaletteVerdict::Themeable {
            self.transforms
                .colors
                .rewrite(&mut tree, &mut themeable_policy)
                .map_err(IconError::ColorRewrite)?;
        }

        self.transforms
            .optimizer
            .optimize(&mut tree, &OptimizeOptions::for_icon(name))
            .map_err(IconError::Optimization)?;

        Ok(ProcessedIcon {
            markup: tree,
            view_box,
            verdict,
        })
    }
}

impl Default for IconPipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{CleanupTransform, THEMEABLE_COLOR};

    const MONOTONE: &str =
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="#112233" d="M0 0h24v24z"/></svg>"##;

    const GRADIENT: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><defs><linearGradient id="g"><stop offset="0" stop-color="#ff0000"/><stop offset="1" stop-color="#0000ff"/></linearGradient></defs><rect width="24" height="24" fill="url(#g)"/></svg>"##;

    #[test]
    fn empty_markup_is_rejected_before_cleanup() {
        let pipeline = IconPipeline::default();
        assert!(matches!(
            pipeline.process("foo", "   \n"),
            Err(IconError::EmptyMarkup)
        ));
    }

    #[test]
    fn monotone_icon_is_rewritten_to_current_color() {
        let pipeline = IconPipeline::default();
        let icon = pipeline.process("foo", MONOTONE).unwrap();
        assert_eq!(icon.verdict, PaletteVerdict::Themeable);
        let body = icon.markup.inner_markup();
        assert!(body.contains(THEMEABLE_COLOR));
        assert!(!body.contains("#112233"));
    }

    #[test]
    fn gradient_icon_keeps_its_colors() {
        let pipeline = IconPipeline::default();
        let icon = pipeline.process("bar", GRADIENT).unwrap();
        assert_eq!(icon.verdict, PaletteVerdict::FixedPalette);
        let body = icon.markup.inner_markup();
        assert!(body.contains("#ff0000"));
        assert!(body.contains("#0000ff"));
        // Gradient survives optimization with its id scoped to the icon.
        assert!(body.contains("url(#bar-g)"));
    }

    #[test]
    fn style_block_fills_are_rewritten_for_themeable_icons() {
        let pipeline = IconPipeline::default();
        let source = r##"<svg viewBox="0 0 24 24"><style>.a{fill:#112233}</style><path class="a" d="M0 0h24v24z"/></svg>"##;
        let icon = pipeline.process("foo", source).unwrap();
        assert_eq!(icon.verdict, PaletteVerdict::Themeable);
        let body = icon.markup.inner_markup();
        assert!(body.contains("fill:currentColor"));
        assert!(!body.contains("#112233"));
    }

    #[test]
    fn padding_expands_the_view_box() {
        let pipeline = IconPipeline::new(PipelineOptions {
            pad: true,
            ..PipelineOptions::default()
        });
        let icon = pipeline
            .process(
                "foo",
                r#"<svg viewBox="0 0 20 10"><path d="M0 0z"/></svg>"#,
            )
            .unwrap();
        assert_eq!(icon.view_box, ViewBox::new(-2.0, -2.0, 24.0, 14.0));
        assert_eq!(icon.markup.view_box(), Some(icon.view_box));
    }

    #[test]
    fn padding_disabled_leaves_view_box_alone() {
        let pipeline = IconPipeline::default();
        let icon = pipeline.process("foo", MONOTONE).unwrap();
        assert_eq!(icon.view_box, ViewBox::new(0.0, 0.0, 24.0, 24.0));
    }

    #[test]
    fn cleanup_failure_surfaces_as_icon_error() {
        let pipeline = IconPipeline::default();
        let err = pipeline.process("foo", "<svg><broken").unwrap_err();
        assert!(matches!(err, IconError::Cleanup(_)));
    }

    #[test]
    fn substituted_cleanup_transform_is_used() {
        struct AlwaysFails;
        impl CleanupTransform for AlwaysFails {
            fn cleanup(&self, _source: &str) -> Result<MarkupTree, TransformError> {
                Err(TransformError::Invalid("injected failure".to_string()))
            }
        }

        let transforms = Transforms {
            cleanup: Box::new(AlwaysFails),
            ..Transforms::default()
        };
        let pipeline = IconPipeline::with_transforms(PipelineOptions::default(), transforms);
        let err = pipeline.process("foo", MONOTONE).unwrap_err();
        assert!(err.to_string().contains("injected failure"));
    }

    #[test]
    fn reprocessing_normalized_output_is_stable() {
        let pipeline = IconPipeline::default();
        let first = pipeline.process("foo", MONOTONE).unwrap();
        let reexported = first.markup.to_string();
        let second = pipeline.process("foo", &reexported).unwrap();
        assert_eq!(second.verdict, PaletteVerdict::Themeable);
        assert_eq!(first.markup.inner_markup(), second.markup.inner_markup());
    }

    #[test]
    fn reprocessing_keeps_nested_namespace_declarations() {
        let pipeline = IconPipeline::default();
        let source = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 8 8"><defs><path id="a" d="M0 0z"/></defs><use xmlns:xlink="http://www.w3.org/1999/xlink" xlink:href="#a"/></svg>"##;

        let first = pipeline.process("foo", source).unwrap();
        let body = first.markup.inner_markup();
        assert!(body.contains("xmlns:xlink="));
        assert!(body.contains(r##"xlink:href="#foo-a""##));

        // The first pass's own output must survive a second pass unchanged.
        let second = pipeline.process("foo", &first.markup.to_string()).unwrap();
        assert_eq!(second.markup.inner_markup(), body);
    }
}
