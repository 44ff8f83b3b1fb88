//! Canvas padding: expands an icon's view rectangle by a proportional margin.

use crate::markup::ViewBox;

/// Default padding factor applied when padding is enabled.
pub const DEFAULT_PAD_FACTOR: f64 = 0.10;

/// Expands a view rectangle by a symmetric margin on every side.
///
/// The margin is `factor * max(width, height)`, so the amount of breathing
/// room is proportional to the icon's larger dimension:
///
/// ```
/// use iconset_builder::{pad_view_box, ViewBox};
///
/// let padded = pad_view_box(ViewBox::new(0.0, 0.0, 20.0, 10.0), 0.10);
/// assert_eq!(padded, ViewBox::new(-2.0, -2.0, 24.0, 14.0));
/// ```
pub fn pad_view_box(view_box: ViewBox, factor: f64) -> ViewBox {
    let margin = factor * view_box.width.max(view_box.height);
    ViewBox {
        left: view_box.left - margin,
        top: view_box.top - margin,
        width: view_box.width + 2.0 * margin,
        height: view_box.height + 2.0 * margin,
    }
}
