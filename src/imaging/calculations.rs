//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Bounds;

/// Calculate the largest size that fits inside `bounds` while keeping the
/// aspect ratio of `original`. Images never grow: if the original already
/// fits, it is returned unchanged.
///
/// # Arguments
/// * `original` - Original image dimensions (width, height)
/// * `bounds` - Maximum allowed dimensions
///
/// # Returns
/// * `(width, height)` - Target dimensions, each at least 1px
///
/// # Examples
/// ```
/// # use microsite_gen::imaging::{Bounds, fit_within};
/// // 1200x800 into 600x400 → exact half
/// assert_eq!(fit_within((1200, 800), Bounds::new(600, 400)), (600, 400));
///
/// // Tall image: height is the binding edge
/// assert_eq!(fit_within((1000, 2000), Bounds::new(600, 400)), (200, 400));
///
/// // Already small enough: untouched
/// assert_eq!(fit_within((300, 200), Bounds::new(600, 400)), (300, 200));
/// ```
pub fn fit_within(original: (u32, u32), bounds: Bounds) -> (u32, u32) {
    let (w, h) = original;
    if w == 0 || h == 0 || (w <= bounds.width && h <= bounds.height) {
        return (w, h);
    }

    let scale_w = bounds.width as f64 / w as f64;
    let scale_h = bounds.height as f64 / h as f64;

    if scale_w <= scale_h {
        // Width is the binding edge
        let new_h = (h as f64 * scale_w).round() as u32;
        (bounds.width, new_h.clamp(1, bounds.height))
    } else {
        // Height is the binding edge
        let new_w = (w as f64 * scale_h).round() as u32;
        (new_w.clamp(1, bounds.width), bounds.height)
    }
}
