use image::RgbaImage;

use crate::foundation::core::Canvas;
use crate::foundation::error::{StripError, StripResult};

pub type PremulRgba8 = [u8; 4];

/// Output raster of one composition run: premultiplied RGBA8, row-major, tightly packed.
///
/// Created fully transparent; everything is drawn with source-over.
#[derive(Clone, PartialEq, Eq)]
pub struct CanvasBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for CanvasBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl CanvasBuffer {
    pub fn new(canvas: Canvas) -> StripResult<Self> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        let len = (canvas.width as usize)
            .checked_mul(canvas.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| StripError::invalid_geometry("canvas byte size overflow"))?;
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied pixel at `(x, y)`, `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Straight-alpha pixel at `(x, y)`.
    pub fn pixel_straight(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixel(x, y).map(unpremultiply)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Draw a straight-alpha image with its top-left corner at `(x, y)`, clipped to the canvas.
    pub fn draw_image(&mut self, img: &RgbaImage, x: u32, y: u32) {
        let (w, h) = img.dimensions();
        self.blend_rows(w, h, x, y, |sx, sy| premultiply(img.get_pixel(sx, sy).0));
    }

    /// Draw a premultiplied `w x h` buffer with its top-left corner at `(x, y)`.
    pub fn draw_premul(&mut self, src: &[u8], w: u32, h: u32, x: u32, y: u32) -> StripResult<()> {
        if src.len() != (w as usize) * (h as usize) * 4 {
            return Err(StripError::pixel_access(format!(
                "draw_premul expects {w}x{h} rgba8, got {} bytes",
                src.len()
            )));
        }
        self.blend_rows(w, h, x, y, |sx, sy| {
            let i = (sy as usize * w as usize + sx as usize) * 4;
            [src[i], src[i + 1], src[i + 2], src[i + 3]]
        });
        Ok(())
    }

    /// Composite a full-canvas premultiplied layer on top.
    pub fn over_full(&mut self, src: &[u8]) -> StripResult<()> {
        over_in_place(&mut self.data, src)
    }

    fn blend_rows(
        &mut self,
        w: u32,
        h: u32,
        x: u32,
        y: u32,
        mut src_at: impl FnMut(u32, u32) -> PremulRgba8,
    ) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for dy in y..y_end {
            for dx in x..x_end {
                let src = src_at(dx - x, dy - y);
                if src[3] == 0 {
                    continue;
                }
                let i = self.index(dx, dy);
                let dst = [
                    self.data[i],
                    self.data[i + 1],
                    self.data[i + 2],
                    self.data[i + 3],
                ];
                self.data[i..i + 4].copy_from_slice(&over(dst, src));
            }
        }
    }
}

/// Porter-Duff source-over on premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> StripResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(StripError::pixel_access(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

pub fn premultiply(px: [u8; 4]) -> PremulRgba8 {
    let a = u16::from(px[3]);
    match a {
        0 => [0, 0, 0, 0],
        255 => px,
        _ => [
            mul_div255(u16::from(px[0]), a),
            mul_div255(u16::from(px[1]), a),
            mul_div255(u16::from(px[2]), a),
            px[3],
        ],
    }
}

pub fn unpremultiply(px: PremulRgba8) -> [u8; 4] {
    let a = u32::from(px[3]);
    match a {
        0 => [0, 0, 0, 0],
        255 => px,
        _ => {
            let un = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
            [un(px[0]), un(px[1]), un(px[2]), px[3]]
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
