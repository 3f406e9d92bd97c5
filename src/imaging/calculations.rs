//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Independent horizontal and vertical scale factors from `current` to `target`.
///
/// The adapter's `resize` is deliberately non-uniform: each axis gets its own
/// factor, so a 400x100 image resized to 50x300 scales by (0.125, 3.0).
///
/// # Examples
/// ```
/// # use rendition::imaging::calculations::scale_factors;
/// assert_eq!(scale_factors((400, 100), (200, 100)), (0.5, 1.0));
/// ```
pub fn scale_factors(current: (u32, u32), target: (u32, u32)) -> (f64, f64) {
    let (cur_w, cur_h) = current;
    let (tgt_w, tgt_h) = target;
    (
        tgt_w as f64 / cur_w.max(1) as f64,
        tgt_h as f64 / cur_h.max(1) as f64,
    )
}

/// Scale `source` proportionally so its longer edge equals `max_edge`.
///
/// Never upscales: a source already within `max_edge` is returned unchanged.
/// The shorter edge never rounds down to zero.
pub fn fit_longer_edge(source: (u32, u32), max_edge: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let longer = src_w.max(src_h);
    if longer <= max_edge || longer == 0 {
        return source;
    }

    let ratio = max_edge as f64 / longer as f64;
    if src_w >= src_h {
        (max_edge, ((src_h as f64 * ratio).round() as u32).max(1))
    } else {
        (((src_w as f64 * ratio).round() as u32).max(1), max_edge)
    }
}

/// Derive the missing edge from the source aspect ratio.
///
/// `width` and `height` are the caller's requested edges; when exactly one
/// is given the other follows the source proportions. When both are given
/// they are returned as-is (non-uniform). When neither is given the source
/// size is kept.
pub fn complete_dimensions(
    source: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    let (src_w, src_h) = source;
    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => {
            let h = (w as f64 * src_h as f64 / src_w.max(1) as f64).round() as u32;
            (w, h.max(1))
        }
        (None, Some(h)) => {
            let w = (h as f64 * src_w as f64 / src_h.max(1) as f64).round() as u32;
            (w.max(1), h)
        }
        (None, None) => source,
    }
}
