use crate::{
    foundation::color::{hsl_to_rgb, rgb_to_hsl},
    foundation::error::{StripError, StripResult},
    grade::params::AdjustmentParameters,
};

/// Red/blue channel shift at full warm (or cool) temperature.
pub const TEMPERATURE_SHIFT: f64 = 30.0;
/// Luminance above which the highlights scale applies.
pub const HIGHLIGHT_THRESHOLD: f64 = 0.8;
/// Luminance below which the shadows scale applies.
pub const SHADOW_THRESHOLD: f64 = 0.25;

/// [`HIGHLIGHT_THRESHOLD`] and [`SHADOW_THRESHOLD`] on the integer luma sum
/// `299 R + 587 G + 114 B`. Pixels exactly on a threshold are left alone.
const HIGHLIGHT_LUMA: u32 = 204_000; // 0.8 * 255 * 1000
const SHADOW_LUMA: u32 = 63_750; // 0.25 * 255 * 1000

/// Resolved, non-neutral stages of one grade.
#[derive(Clone, Copy, Debug, Default)]
struct Stages {
    temperature: Option<f64>,
    highlights: Option<f64>,
    shadows: Option<f64>,
    contrast_factor: Option<f64>,
    vibrance: Option<f64>,
    vignette: Option<f64>,
}

impl Stages {
    fn from_params(params: &AdjustmentParameters) -> Self {
        Self {
            temperature: params.temperature_delta(),
            highlights: params.highlights(),
            shadows: params.shadows(),
            contrast_factor: params.contrast().map(contrast_factor),
            vibrance: params.vibrance(),
            vignette: params.vignette(),
        }
    }

    fn has_per_pixel(&self) -> bool {
        self.temperature.is_some()
            || self.highlights.is_some()
            || self.shadows.is_some()
            || self.contrast_factor.is_some()
            || self.vibrance.is_some()
    }
}

/// Grade a straight-alpha RGBA8 buffer in place.
///
/// Stages run per pixel in a fixed order (temperature, highlights/shadows, contrast, vibrance),
/// each reading the channel values left by the previous one. The vignette is a second pass over
/// the whole buffer. Neutral stages are skipped entirely, so an identity grade leaves the
/// buffer byte-for-byte untouched. Alpha is never modified.
pub fn grade_rgba8(
    data: &mut [u8],
    width: u32,
    height: u32,
    params: &AdjustmentParameters,
) -> StripResult<()> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| StripError::pixel_access("grade buffer size overflow"))?;
    if data.len() != expected_len {
        return Err(StripError::pixel_access(format!(
            "grade expects {expected_len} bytes for {width}x{height} rgba8, got {}",
            data.len()
        )));
    }

    let stages = Stages::from_params(params);
    if stages.has_per_pixel() {
        for px in data.chunks_exact_mut(4) {
            grade_pixel(px, &stages);
        }
    }
    if let Some(amount) = stages.vignette {
        apply_vignette(data, width, height, amount);
    }
    Ok(())
}

/// [`grade_rgba8`] over an `image` buffer.
pub fn grade_image(img: &mut image::RgbaImage, params: &AdjustmentParameters) -> StripResult<()> {
    let (width, height) = img.dimensions();
    grade_rgba8(img, width, height, params)
}

fn grade_pixel(px: &mut [u8], stages: &Stages) {
    let mut rgb = [f64::from(px[0]), f64::from(px[1]), f64::from(px[2])];

    if let Some(delta) = stages.temperature {
        rgb[0] = clamp_channel(rgb[0] + TEMPERATURE_SHIFT * delta);
        rgb[2] = clamp_channel(rgb[2] - TEMPERATURE_SHIFT * delta);
    }

    if stages.highlights.is_some() || stages.shadows.is_some() {
        let luma = luma_sum(rgb);
        let amount = if luma > HIGHLIGHT_LUMA {
            stages.highlights
        } else if luma < SHADOW_LUMA {
            stages.shadows
        } else {
            None
        };
        if let Some(amount) = amount {
            let scale = 1.0 + amount / 100.0;
            for c in &mut rgb {
                *c = clamp_channel(*c * scale);
            }
        }
    }

    if let Some(factor) = stages.contrast_factor {
        for c in &mut rgb {
            *c = apply_contrast(*c, factor);
        }
    }

    if let Some(vibrance) = stages.vibrance {
        let mut hsl = rgb_to_hsl(rgb[0] / 255.0, rgb[1] / 255.0, rgb[2] / 255.0);
        hsl.s = vibrance_saturation(hsl.s, vibrance);
        let (r, g, b) = hsl_to_rgb(hsl);
        rgb = [
            clamp_channel(r * 255.0),
            clamp_channel(g * 255.0),
            clamp_channel(b * 255.0),
        ];
    }

    for (dst, v) in px.iter_mut().zip(rgb) {
        *dst = v.round() as u8;
    }
}

/// `1000 * 255 * L` for Rec. 601 luminance, on channels rounded to integers.
fn luma_sum(rgb: [f64; 3]) -> u32 {
    let [r, g, b] = rgb.map(|c| c.round() as u32);
    299 * r + 587 * g + 114 * b
}

fn clamp_channel(v: f64) -> f64 {
    v.clamp(0.0, 255.0)
}

/// Photographic contrast factor for `contrast` in percent (`[-100, 100]`).
pub fn contrast_factor(contrast: f64) -> f64 {
    let c = contrast.clamp(-100.0, 100.0) / 100.0 * 255.0;
    (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
}

fn apply_contrast(v: f64, factor: f64) -> f64 {
    clamp_channel(factor * (v - 128.0) + 128.0)
}

/// Contrast curve applied to a single channel value.
pub fn adjust_contrast_pixel(v: u8, contrast: f64) -> u8 {
    apply_contrast(f64::from(v), contrast_factor(contrast)).round() as u8
}

/// Saturation after a vibrance boost; the boost shrinks as saturation approaches 1.
pub fn vibrance_saturation(saturation: f64, vibrance: f64) -> f64 {
    let s = saturation.clamp(0.0, 1.0);
    let v = vibrance.clamp(-100.0, 100.0) / 100.0;
    (s + v * (1.0 - s)).clamp(0.0, 1.0)
}

/// Darkening factor at `(x, y)` for a `width` x `height` buffer.
///
/// 1.0 at the buffer center, `1 - amount/100` at the corners, linear in distance in between.
pub fn vignette_factor(x: f64, y: f64, width: u32, height: u32, amount: f64) -> f64 {
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;
    let max_dist = cx.hypot(cy);
    if max_dist <= 0.0 {
        return 1.0;
    }
    let dist = (x - cx).hypot(y - cy);
    let strength = amount.clamp(0.0, 100.0) / 100.0;
    (1.0 - strength * (dist / max_dist)).clamp(0.0, 1.0)
}

fn apply_vignette(data: &mut [u8], width: u32, height: u32, amount: f64) {
    let w = width as usize;
    for (idx, px) in data.chunks_exact_mut(4).enumerate() {
        let x = (idx % w) as f64 + 0.5;
        let y = (idx / w) as f64 + 0.5;
        let factor = vignette_factor(x, y, width, height, amount);
        for c in &mut px[..3] {
            *c = (f64::from(*c) * factor).round() as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grade/engine.rs"]
mod tests;
