use image::{RgbaImage, imageops};

use crate::foundation::core::{CropRect, Slot};
use crate::foundation::error::{StripError, StripResult};

/// Source rectangle that "cover"-fits a `source` image into a `dest` rectangle.
///
/// The crop has the destination's aspect ratio and is centered in the source: wider sources
/// lose their left/right edges, taller sources lose top/bottom. Scaling the crop to the
/// destination fills it completely with no letterboxing.
pub fn compute_cover_crop(
    source_width: u32,
    source_height: u32,
    dest_width: u32,
    dest_height: u32,
) -> StripResult<CropRect> {
    if source_width == 0 || source_height == 0 {
        return Err(StripError::invalid_geometry(format!(
            "source extent must be > 0, got {source_width}x{source_height}"
        )));
    }
    if dest_width == 0 || dest_height == 0 {
        return Err(StripError::invalid_geometry(format!(
            "destination extent must be > 0, got {dest_width}x{dest_height}"
        )));
    }

    let sw = f64::from(source_width);
    let sh = f64::from(source_height);
    let dest_aspect = f64::from(dest_width) / f64::from(dest_height);

    if sw / sh > dest_aspect {
        let crop_w = sh * dest_aspect;
        Ok(CropRect {
            sx: (sw - crop_w) / 2.0,
            sy: 0.0,
            sw: crop_w,
            sh,
        })
    } else {
        let crop_h = sw / dest_aspect;
        Ok(CropRect {
            sx: 0.0,
            sy: (sh - crop_h) / 2.0,
            sw,
            sh: crop_h,
        })
    }
}

/// Crop `source` with [`compute_cover_crop`] and resample it to exactly the slot size.
pub fn fit_photo(source: &RgbaImage, slot: &Slot) -> StripResult<RgbaImage> {
    slot.validate()?;
    let (src_w, src_h) = source.dimensions();
    let crop = compute_cover_crop(src_w, src_h, slot.width, slot.height)?;

    // Snap to whole source pixels, never leaving the source bounds.
    let x = (crop.sx.round() as u32).min(src_w - 1);
    let y = (crop.sy.round() as u32).min(src_h - 1);
    let w = (crop.sw.round() as u32).clamp(1, src_w - x);
    let h = (crop.sh.round() as u32).clamp(1, src_h - y);

    tracing::debug!(
        src_w,
        src_h,
        x,
        y,
        w,
        h,
        dest_w = slot.width,
        dest_h = slot.height,
        crop_aspect = crop.aspect(),
        "cover crop"
    );

    let cropped = imageops::crop_imm(source, x, y, w, h).to_image();
    if (w, h) == (slot.width, slot.height) {
        return Ok(cropped);
    }
    Ok(imageops::resize(
        &cropped,
        slot.width,
        slot.height,
        imageops::FilterType::Triangle,
    ))
}

#[cfg(test)]
#[path = "../tests/unit/fit.rs"]
mod tests;
