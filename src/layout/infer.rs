use crate::foundation::core::Slot;
use crate::foundation::error::{StripError, StripResult};
use crate::layout::overlay::{OverlayRect, scan_rects};

/// Minimum height (fraction of canvas height) of a side border.
pub const SIDE_BORDER_MIN_HEIGHT: f64 = 0.6;
/// Minimum width (fraction of canvas width) of a row separator.
pub const SEPARATOR_MIN_WIDTH: f64 = 0.7;
/// Separators must be shorter than this fraction of canvas height.
pub const SEPARATOR_MAX_HEIGHT: f64 = 0.2;

const LEFT_EDGE_TOLERANCE: f64 = 1.0;
const RIGHT_EDGE_TOLERANCE: f64 = 2.0;
const SEPARATOR_MERGE_DISTANCE: f64 = 2.0;

/// Derive content slots from the frame rectangles drawn by an overlay.
///
/// Returns `Ok(None)` when the rects do not describe a recognizable frame (no left/right side
/// border, or no separator) and [`StripError::SlotInferenceMismatch`] when a frame was found but
/// yields a different number of rows than `expected`. Partial results are never returned.
pub fn infer_slots(
    rects: &[OverlayRect],
    expected: usize,
    canvas_width: u32,
    canvas_height: u32,
) -> StripResult<Option<Vec<Slot>>> {
    let w = f64::from(canvas_width);
    let h = f64::from(canvas_height);
    if w <= 0.0 || h <= 0.0 {
        return Ok(None);
    }

    // Tall thin rects flush with an edge. A full-canvas backdrop is neither.
    let is_side = |r: &&OverlayRect| r.height >= SIDE_BORDER_MIN_HEIGHT * h && r.width < 0.5 * w;
    let left = rects
        .iter()
        .filter(is_side)
        .filter(|r| r.x <= LEFT_EDGE_TOLERANCE)
        .last();
    let right = rects
        .iter()
        .filter(is_side)
        .filter(|r| (r.right() - w).abs() <= RIGHT_EDGE_TOLERANCE)
        .last();
    let (Some(left), Some(right)) = (left, right) else {
        tracing::debug!(rects = rects.len(), "overlay has no side borders");
        return Ok(None);
    };

    let content_left = left.right();
    let content_width = right.x - content_left;
    if content_width < 1.0 {
        tracing::debug!(content_left, right = right.x, "side borders overlap");
        return Ok(None);
    }

    let separators = separators(rects, w, h);
    if separators.is_empty() {
        tracing::debug!("overlay has no row separators");
        return Ok(None);
    }

    let mut rows = Vec::with_capacity(separators.len() + 1);
    let mut top = 0.0;
    for sep in &separators {
        rows.push((top, sep.y - top));
        top = sep.bottom();
    }
    rows.push((top, h - top));

    // Separators flush with the top or bottom edge are frame edges, not row breaks.
    let slots: Vec<Slot> = rows
        .into_iter()
        .map(|(y, height)| (y.round(), height.round()))
        .filter(|&(_, height)| height >= 1.0)
        .map(|(y, height)| Slot {
            x: content_left.round().max(0.0) as u32,
            y: y.max(0.0) as u32,
            width: content_width.round() as u32,
            height: height as u32,
        })
        .collect();

    if slots.len() != expected {
        return Err(StripError::SlotInferenceMismatch {
            inferred: slots.len(),
            expected,
        });
    }
    tracing::debug!(?slots, "slots inferred from overlay");
    Ok(Some(slots))
}

/// Wide short rects sorted top to bottom; near-coincident ones merge into their union.
fn separators(rects: &[OverlayRect], w: f64, h: f64) -> Vec<OverlayRect> {
    let mut seps: Vec<OverlayRect> = rects
        .iter()
        .filter(|r| r.width >= SEPARATOR_MIN_WIDTH * w && r.height < SEPARATOR_MAX_HEIGHT * h)
        .copied()
        .collect();
    seps.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut out: Vec<OverlayRect> = Vec::with_capacity(seps.len());
    for sep in seps {
        match out.last_mut() {
            Some(prev) if sep.y - prev.y < SEPARATOR_MERGE_DISTANCE => {
                prev.height = prev.bottom().max(sep.bottom()) - prev.y;
            }
            _ => out.push(sep),
        }
    }
    out
}

/// Markup-level convenience over [`infer_slots`]: any failure degrades to `None`.
pub fn infer_slots_from_overlay(
    markup: &str,
    expected: usize,
    canvas_width: u32,
    canvas_height: u32,
) -> Option<Vec<Slot>> {
    let rects = match scan_rects(markup) {
        Ok(rects) => rects,
        Err(e) => {
            tracing::warn!(error = %e, "overlay scan failed; using default slots");
            return None;
        }
    };
    match infer_slots(&rects, expected, canvas_width, canvas_height) {
        Ok(slots) => slots,
        Err(e) => {
            tracing::warn!(error = %e, "using default slots");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/infer.rs"]
mod tests;
