use std::{fmt, sync::Arc};

use image::RgbaImage;
use rayon::prelude::*;

use crate::{
    assets::decode::decode_photo,
    assets::photo::Photo,
    assets::recolor::recolor_overlay,
    assets::source::OverlaySource,
    assets::svg_raster::{rasterize_overlay_with_fonts, system_fontdb},
    config::StripConfig,
    fit::fit_photo,
    foundation::color::FrameColor,
    foundation::core::{Canvas, Slot},
    foundation::error::{StripError, StripResult},
    grade::engine::grade_image,
    layout::infer::infer_slots,
    layout::overlay::OverlayGeometry,
    layout::registry::{Layout, LayoutId, LayoutRegistry},
    render::canvas::CanvasBuffer,
    render::fallback::{draw_debug_slots, draw_fallback_frame},
    session::RunToken,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComposeOptions {
    /// With fewer photos than slots, switch to a layout holding exactly that many.
    pub match_layout_to_photos: bool,
    /// Paint slot outlines and black out empty slots.
    pub debug_slots: bool,
    /// Worker threads for photo preparation; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

/// Collaborators and tunables for [`compose`].
#[derive(Clone)]
pub struct ComposeContext<'a> {
    pub registry: &'a LayoutRegistry,
    pub overlays: &'a dyn OverlaySource,
    pub config: &'a StripConfig,
    pub options: ComposeOptions,
    /// Fonts for overlay text; the process-wide system database when `None`.
    pub fonts: Option<Arc<usvg::fontdb::Database>>,
}

impl<'a> ComposeContext<'a> {
    /// Context using the registry carried by `config`.
    pub fn new(config: &'a StripConfig, overlays: &'a dyn OverlaySource) -> Self {
        Self {
            registry: &config.layouts,
            overlays,
            config,
            options: ComposeOptions::default(),
            fonts: None,
        }
    }

    pub fn with_fonts(mut self, fonts: Arc<usvg::fontdb::Database>) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn with_options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }
}

/// A recovered failure recorded during a run.
#[derive(Debug)]
pub struct Diagnostic {
    /// Slot the failure is isolated to, `None` for run-level stages.
    pub slot: Option<usize>,
    pub error: StripError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            Some(i) => write!(f, "slot {i}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Where the slot rectangles of a run came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotSource {
    Default,
    Inferred,
}

/// Finished composition plus everything that degraded along the way.
#[derive(Debug)]
pub struct ComposedStrip {
    pub layout: LayoutId,
    pub slots: Vec<Slot>,
    pub slot_source: SlotSource,
    /// Slot indices that received a photo.
    pub filled: Vec<bool>,
    /// `true` when the overlay was drawn, `false` when the fallback frame was.
    pub overlay_drawn: bool,
    pub canvas: CanvasBuffer,
    pub diagnostics: Vec<Diagnostic>,
}

impl ComposedStrip {
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Compose `photos` into the layout `layout_id`, framed in `frame_color`.
///
/// Only fatal errors ([`StripError::is_fatal`]) are returned as `Err`; per-photo and overlay
/// failures are recovered and listed in [`ComposedStrip::diagnostics`].
#[tracing::instrument(skip(photos, ctx), fields(photos = photos.len()))]
pub fn compose(
    photos: &[Photo],
    layout_id: LayoutId,
    frame_color: FrameColor,
    ctx: &ComposeContext<'_>,
) -> StripResult<ComposedStrip> {
    run(photos, layout_id, frame_color, ctx, None)
}

/// [`compose`] that aborts with [`StripError::Superseded`] as soon as `token` goes stale.
#[tracing::instrument(
    skip(photos, ctx, token),
    fields(photos = photos.len(), generation = token.generation())
)]
pub fn compose_with_token(
    photos: &[Photo],
    layout_id: LayoutId,
    frame_color: FrameColor,
    ctx: &ComposeContext<'_>,
    token: &RunToken,
) -> StripResult<ComposedStrip> {
    run(photos, layout_id, frame_color, ctx, Some(token))
}

fn checkpoint(token: Option<&RunToken>) -> StripResult<()> {
    token.map_or(Ok(()), RunToken::ensure_current)
}

struct Plan<'a> {
    layout: &'a Layout,
    markup: Option<String>,
    canvas: Canvas,
    slots: Vec<Slot>,
    slot_source: SlotSource,
}

fn run(
    photos: &[Photo],
    layout_id: LayoutId,
    frame_color: FrameColor,
    ctx: &ComposeContext<'_>,
    token: Option<&RunToken>,
) -> StripResult<ComposedStrip> {
    let mut diagnostics = Vec::new();
    let plan = plan_layout(photos.len(), layout_id, ctx, &mut diagnostics)?;

    let capacity = plan.slots.len();
    if photos.len() > capacity {
        let error = StripError::PhotoCountMismatch {
            supplied: photos.len(),
            capacity,
        };
        tracing::warn!(%error, "ignoring excess photos");
        diagnostics.push(Diagnostic { slot: None, error });
    }
    let used = &photos[..photos.len().min(capacity)];
    checkpoint(token)?;

    let prepared = prepare_photos(used, &plan.slots, ctx.options.threads, token)?;
    checkpoint(token)?;

    let mut canvas = CanvasBuffer::new(plan.canvas)?;
    let mut filled = vec![false; capacity];
    for (i, (image, errors)) in prepared.into_iter().enumerate() {
        checkpoint(token)?;
        diagnostics.extend(errors.into_iter().map(|error| Diagnostic {
            slot: Some(i),
            error,
        }));
        if let Some(image) = image {
            let slot = &plan.slots[i];
            canvas.draw_image(&image, slot.x, slot.y);
            filled[i] = true;
        }
    }

    if ctx.options.debug_slots {
        draw_debug_slots(&mut canvas, &plan.slots, &filled)?;
    }

    checkpoint(token)?;
    let overlay_drawn = match &plan.markup {
        Some(markup) => match draw_overlay(&mut canvas, markup, frame_color, ctx) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, "overlay could not be drawn; using plain frame");
                diagnostics.push(Diagnostic { slot: None, error });
                false
            }
        },
        None => false,
    };
    if !overlay_drawn {
        draw_fallback_frame(
            &mut canvas,
            &plan.slots,
            frame_color,
            ctx.config.fallback_border_width,
            ctx.config.fallback_separator_width,
        )?;
    }

    Ok(ComposedStrip {
        layout: plan.layout.id,
        slots: plan.slots,
        slot_source: plan.slot_source,
        filled,
        overlay_drawn,
        canvas,
        diagnostics,
    })
}

/// Resolve the layout, load its overlay and settle on canvas size and slot rectangles.
fn plan_layout<'a>(
    photo_count: usize,
    layout_id: LayoutId,
    ctx: &ComposeContext<'a>,
    diagnostics: &mut Vec<Diagnostic>,
) -> StripResult<Plan<'a>> {
    let mut layout = ctx.registry.resolve(layout_id)?;
    if ctx.options.match_layout_to_photos
        && photo_count > 0
        && photo_count < layout.slot_count()
        && let Some(alt) = ctx.registry.best_match_for(photo_count)
    {
        tracing::debug!(from = %layout.id, to = %alt.id, photo_count, "matching layout to photos");
        layout = alt;
    }

    let geometry = ctx
        .overlays
        .load(&layout.overlay)
        .and_then(|markup| OverlayGeometry::parse(&markup).map(|g| (markup, g)));
    let (markup, geometry) = match geometry {
        Ok((markup, geometry)) => (Some(markup), Some(geometry)),
        Err(error) => {
            tracing::warn!(overlay = %layout.overlay, %error, "overlay unavailable");
            diagnostics.push(Diagnostic { slot: None, error });
            (None, None)
        }
    };

    let canvas = match geometry.as_ref().and_then(|g| g.dimensions) {
        Some((width, height)) => Canvas { width, height },
        None => Canvas::around_slots(&layout.default_slots, ctx.config.canvas_margin),
    };
    tracing::debug!(width = canvas.width, height = canvas.height, "canvas size");

    let inferred = match &geometry {
        Some(g) => match infer_slots(&g.rects, layout.slot_count(), canvas.width, canvas.height) {
            Ok(slots) => slots,
            Err(error) => {
                tracing::warn!(%error, "using default slots");
                diagnostics.push(Diagnostic { slot: None, error });
                None
            }
        },
        None => None,
    };
    let (slots, slot_source) = match inferred {
        Some(slots) => (slots, SlotSource::Inferred),
        None => (layout.default_slots.clone(), SlotSource::Default),
    };

    Ok(Plan {
        layout,
        markup,
        canvas,
        slots,
        slot_source,
    })
}

type Prepared = (Option<RgbaImage>, Vec<StripError>);

/// Decode, cover-fit and grade every photo. Photo/slot pairs are independent, so this fans out
/// over rayon; the caller draws the results in slot order.
fn prepare_photos(
    photos: &[Photo],
    slots: &[Slot],
    threads: Option<usize>,
    token: Option<&RunToken>,
) -> StripResult<Vec<Prepared>> {
    let work = || -> Vec<Prepared> {
        photos
            .par_iter()
            .zip(slots.par_iter())
            .enumerate()
            .map(|(i, (photo, slot))| {
                if token.is_some_and(|t| !t.is_current()) {
                    return (None, Vec::new());
                }
                prepare_one(i, photo, slot)
            })
            .collect()
    };

    match threads {
        None => Ok(work()),
        Some(n) => Ok(build_thread_pool(n)?.install(work)),
    }
}

fn prepare_one(index: usize, photo: &Photo, slot: &Slot) -> Prepared {
    let mut errors = Vec::new();
    let fitted = decode_photo(&photo.source).and_then(|img| fit_photo(&img, slot));
    let mut image = match fitted {
        Ok(image) => image,
        Err(error) => {
            tracing::warn!(slot = index, %error, "photo skipped");
            errors.push(error);
            return (None, errors);
        }
    };

    let params = photo.effective_adjustments();
    if !params.is_identity() {
        // The grade checks the buffer before touching any pixel.
        if let Err(error) = grade_image(&mut image, &params) {
            tracing::warn!(slot = index, %error, "placing photo ungraded");
            errors.push(error);
        }
    }
    (Some(image), errors)
}

fn draw_overlay(
    canvas: &mut CanvasBuffer,
    markup: &str,
    frame_color: FrameColor,
    ctx: &ComposeContext<'_>,
) -> StripResult<()> {
    let colored = recolor_overlay(markup, ctx.config.placeholder_color, frame_color);
    let fonts = ctx.fonts.clone().unwrap_or_else(system_fontdb);
    let layer = rasterize_overlay_with_fonts(&colored, canvas.width(), canvas.height(), fonts)?;
    canvas.over_full(&layer)
}

fn build_thread_pool(threads: usize) -> StripResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(StripError::validation("'threads' must be >= 1 when set"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| StripError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
