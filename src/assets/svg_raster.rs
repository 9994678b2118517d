use std::{
    path::Path,
    sync::{Arc, OnceLock},
};

use resvg::tiny_skia;

use crate::foundation::error::{StripError, StripResult};

/// Rasterize overlay markup to exactly `width x height` premultiplied RGBA8.
///
/// The document is scaled non-uniformly from its declared size onto the target, so an overlay
/// whose declared size matches the canvas lands pixel-for-pixel on slot coordinates.
pub fn rasterize_overlay(markup: &str, width: u32, height: u32) -> StripResult<Vec<u8>> {
    rasterize_overlay_with_fonts(markup, width, height, system_fontdb())
}

pub fn rasterize_overlay_with_fonts(
    markup: &str,
    width: u32,
    height: u32,
    fontdb: Arc<usvg::fontdb::Database>,
) -> StripResult<Vec<u8>> {
    let opts = usvg::Options {
        fontdb,
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(markup, &opts)
        .map_err(|e| StripError::overlay_fetch(format!("parse overlay svg: {e}")))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        StripError::invalid_geometry(format!("cannot allocate {width}x{height} overlay pixmap"))
    })?;

    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    tracing::debug!(
        width,
        height,
        svg_w = size.width(),
        svg_h = size.height(),
        "overlay rasterized"
    );
    Ok(pixmap.take())
}

/// Font database with system fonts, loaded once per process.
pub fn system_fontdb() -> Arc<usvg::fontdb::Database> {
    static DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Arc::new(db)
    })
    .clone()
}

/// System fonts plus any `.ttf`/`.otf`/`.ttc` files in `dir` and `dir/fonts`.
pub fn fontdb_with_dir(dir: &Path) -> Arc<usvg::fontdb::Database> {
    let mut db = (*system_fontdb()).clone();
    load_fonts_from_dir(&mut db, dir);
    load_fonts_from_dir(&mut db, &dir.join("fonts"));
    tracing::debug!(dir = %dir.display(), faces = db.len(), "font database for overlays");
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
