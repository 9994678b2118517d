//! Photostrip composes captured photos into a single decorative photo-strip image.
//!
//! A strip is a fixed template (layout) with one slot per photo and a colorable SVG frame drawn
//! on top. The library covers the compositing core; capture, storage and UI live elsewhere.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `LayoutId -> Layout` from an explicit [`LayoutRegistry`], then read the
//!    overlay's declared size and frame rectangles. When the frame geometry yields exactly the
//!    layout's slot count, those slots replace the hard-coded defaults.
//! 2. **Prepare** (parallel): decode each photo, cover-fit it to its slot ([`compute_cover_crop`])
//!    and apply its color grade ([`grade_rgba8`]).
//! 3. **Draw**: photos in slot order, then the recolored overlay over the full canvas. A missing or
//!    broken overlay degrades to a plain stroked frame.
//! 4. **Export**: [`encode_png`] / [`export_png`].
//!
//! Failures isolated to one photo or to the overlay never abort a run; they are returned as
//! [`Diagnostic`]s on the [`ComposedStrip`]. Only [`StripError::is_fatal`] errors surface as `Err`.
//!
//! Canvas pixels are premultiplied RGBA8 end-to-end; PNG export un-premultiplies.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod export;
mod fit;
mod foundation;
mod grade;
mod layout;
mod render;
mod session;

pub use assets::decode::{data_url_payload, decode_photo};
pub use assets::manifest::{ManifestEntry, PhotoManifest};
pub use assets::photo::{Photo, PhotoSource};
pub use assets::recolor::recolor_overlay;
pub use assets::source::{
    FsOverlaySource, InMemoryOverlaySource, OverlaySource, normalize_rel_path,
};
pub use assets::svg_raster::{
    fontdb_with_dir, rasterize_overlay, rasterize_overlay_with_fonts, system_fontdb,
};
pub use config::StripConfig;
pub use export::{encode_png, export_png, to_rgba_image};
pub use fit::{compute_cover_crop, fit_photo};
pub use foundation::color::{FrameColor, Hsl, hsl_to_rgb, rgb_to_hsl};
pub use foundation::core::{Canvas, CropRect, Slot};
pub use foundation::error::{StripError, StripResult};
pub use grade::engine::{
    HIGHLIGHT_THRESHOLD, SHADOW_THRESHOLD, TEMPERATURE_SHIFT, adjust_contrast_pixel,
    contrast_factor, grade_image, grade_rgba8, vibrance_saturation, vignette_factor,
};
pub use grade::params::{AdjustmentParameters, FilterKey};
pub use layout::infer::{
    SEPARATOR_MAX_HEIGHT, SEPARATOR_MIN_WIDTH, SIDE_BORDER_MIN_HEIGHT, infer_slots,
    infer_slots_from_overlay,
};
pub use layout::overlay::{
    OverlayGeometry, OverlayRect, canvas_size, overlay_dimensions, scan_rects,
};
pub use layout::registry::{Layout, LayoutId, LayoutRegistry};
pub use render::canvas::{CanvasBuffer, PremulRgba8, over, over_in_place, premultiply, unpremultiply};
pub use render::compositor::{
    ComposeContext, ComposeOptions, ComposedStrip, Diagnostic, SlotSource, compose,
    compose_with_token,
};
pub use render::fallback::{draw_debug_slots, draw_fallback_frame};
pub use session::{RunToken, StripSession};
