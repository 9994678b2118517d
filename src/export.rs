use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context;
use image::{ImageFormat, RgbaImage};

use crate::{
    foundation::error::{StripError, StripResult},
    render::canvas::{CanvasBuffer, unpremultiply},
};

/// Straight-alpha copy of the canvas.
pub fn to_rgba_image(canvas: &CanvasBuffer) -> StripResult<RgbaImage> {
    let mut data = canvas.data().to_vec();
    for px in data.chunks_exact_mut(4) {
        let straight = unpremultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&straight);
    }
    RgbaImage::from_raw(canvas.width(), canvas.height(), data)
        .ok_or_else(|| StripError::pixel_access("canvas buffer does not match its dimensions"))
}

/// PNG bytes of the canvas.
pub fn encode_png(canvas: &CanvasBuffer) -> StripResult<Vec<u8>> {
    let img = to_rgba_image(canvas)?;
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .context("encode strip as png")?;
    Ok(out)
}

/// Write the canvas to `dir/file_name` as PNG, creating `dir` if needed.
pub fn export_png(canvas: &CanvasBuffer, dir: &Path, file_name: &str) -> StripResult<PathBuf> {
    if file_name.trim().is_empty() || file_name.contains(['/', '\\']) {
        return Err(StripError::validation(format!(
            "export file name must be a bare file name, got '{file_name}'"
        )));
    }
    let bytes = encode_png(canvas)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create export directory '{}'", dir.display()))?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), "strip exported");
    Ok(path)
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
