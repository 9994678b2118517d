use resvg::tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::{
    foundation::color::FrameColor,
    foundation::core::Slot,
    foundation::error::{StripError, StripResult},
    render::canvas::CanvasBuffer,
};

/// rgba(0, 0, 0, 0.08)
const SEPARATOR_COLOR: [u8; 4] = [0, 0, 0, 20];
/// rgba(255, 0, 0, 0.04)
const DEBUG_FILL: [u8; 4] = [255, 0, 0, 10];
/// rgba(255, 0, 0, 0.6)
const DEBUG_OUTLINE: [u8; 4] = [255, 0, 0, 153];
/// rgba(0, 0, 0, 0.85)
const DEBUG_EMPTY: [u8; 4] = [0, 0, 0, 217];
const DEBUG_OUTLINE_WIDTH: f32 = 2.0;

/// Plain frame drawn when the overlay cannot be used: a border stroke along the canvas edge in
/// `color` plus faint separator strokes around every slot.
pub fn draw_fallback_frame(
    canvas: &mut CanvasBuffer,
    slots: &[Slot],
    color: FrameColor,
    border_width: f32,
    separator_width: f32,
) -> StripResult<()> {
    let mut layer = layer_for(canvas)?;

    let full = Rect::from_xywh(0.0, 0.0, canvas.width() as f32, canvas.height() as f32);
    if let Some(full) = full {
        stroke_rect(&mut layer, full, border_width, color.to_rgba8());
    }
    for slot in slots {
        if let Some(rect) = slot_rect(slot) {
            stroke_rect(&mut layer, rect, separator_width, SEPARATOR_COLOR);
        }
    }

    canvas.over_full(layer.data())
}

/// Slot debugging aid: translucent red fill and outline on every slot, empty slots blacked out.
pub fn draw_debug_slots(
    canvas: &mut CanvasBuffer,
    slots: &[Slot],
    filled: &[bool],
) -> StripResult<()> {
    let mut layer = layer_for(canvas)?;
    for (i, slot) in slots.iter().enumerate() {
        let Some(rect) = slot_rect(slot) else {
            continue;
        };
        fill_rect(&mut layer, rect, DEBUG_FILL);
        stroke_rect(&mut layer, rect, DEBUG_OUTLINE_WIDTH, DEBUG_OUTLINE);
        if !filled.get(i).copied().unwrap_or(false) {
            fill_rect(&mut layer, rect, DEBUG_EMPTY);
        }
    }
    canvas.over_full(layer.data())
}

fn layer_for(canvas: &CanvasBuffer) -> StripResult<Pixmap> {
    Pixmap::new(canvas.width(), canvas.height()).ok_or_else(|| {
        StripError::invalid_geometry(format!(
            "cannot allocate {}x{} frame layer",
            canvas.width(),
            canvas.height()
        ))
    })
}

fn slot_rect(slot: &Slot) -> Option<Rect> {
    Rect::from_xywh(
        slot.x as f32,
        slot.y as f32,
        slot.width as f32,
        slot.height as f32,
    )
}

fn paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]));
    paint.anti_alias = true;
    paint
}

fn stroke_rect(layer: &mut Pixmap, rect: Rect, width: f32, rgba: [u8; 4]) {
    if width <= 0.0 {
        return;
    }
    let path = PathBuilder::from_rect(rect);
    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    layer.stroke_path(&path, &paint(rgba), &stroke, Transform::identity(), None);
}

fn fill_rect(layer: &mut Pixmap, rect: Rect, rgba: [u8; 4]) {
    layer.fill_rect(rect, &paint(rgba), Transform::identity(), None);
}

#[cfg(test)]
#[path = "../../tests/unit/render/fallback.rs"]
mod tests;
