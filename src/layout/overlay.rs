use kurbo::{Affine, Point, Rect};

use crate::foundation::core::{Canvas, Slot};
use crate::foundation::error::{StripError, StripResult};

/// Axis-aligned `<rect>` found in overlay markup, in the root user space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayRect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Everything the resolver reads from one overlay document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayGeometry {
    /// Declared `(width, height)`, if any.
    pub dimensions: Option<(u32, u32)>,
    pub rects: Vec<OverlayRect>,
}

impl OverlayGeometry {
    pub fn parse(markup: &str) -> StripResult<Self> {
        let opts = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(markup, opts)
            .map_err(|e| StripError::overlay_fetch(format!("parse overlay markup: {e}")))?;
        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(StripError::overlay_fetch(format!(
                "overlay root element is <{}>, expected <svg>",
                root.tag_name().name()
            )));
        }

        let mut rects = Vec::new();
        collect_rects(root, Affine::IDENTITY, &mut rects);
        Ok(Self {
            dimensions: declared_dimensions(root),
            rects,
        })
    }
}

/// Typed list of the overlay's axis-aligned rectangles.
///
/// Own and ancestor `transform` attributes are applied. Rects under a rotation or skew, rects
/// inside non-rendered containers (`defs`, `clipPath`, ...) and rects with missing or
/// non-positive width/height are dropped. Missing `x`/`y` default to 0.
pub fn scan_rects(markup: &str) -> StripResult<Vec<OverlayRect>> {
    Ok(OverlayGeometry::parse(markup)?.rects)
}

/// Declared overlay size: the `viewBox` extent first, then numeric `width`/`height`.
pub fn overlay_dimensions(markup: &str) -> Option<(u32, u32)> {
    OverlayGeometry::parse(markup).ok()?.dimensions
}

/// Output canvas for a run: declared overlay size, else slot bounds plus `margin`.
pub fn canvas_size(markup: Option<&str>, slots: &[Slot], margin: u32) -> Canvas {
    match markup.and_then(overlay_dimensions) {
        Some((width, height)) => Canvas { width, height },
        None => Canvas::around_slots(slots, margin),
    }
}

fn declared_dimensions(svg: roxmltree::Node<'_, '_>) -> Option<(u32, u32)> {
    let from_view_box = svg.attribute("viewBox").and_then(|vb| {
        let parts: Vec<f64> = vb
            .split(|c: char| c.is_ascii_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [_, _, w, h] => positive_extent(*w, *h),
            _ => None,
        }
    });
    from_view_box.or_else(|| {
        let w = parse_length(svg.attribute("width")?)?;
        let h = parse_length(svg.attribute("height")?)?;
        positive_extent(w, h)
    })
}

fn positive_extent(w: f64, h: f64) -> Option<(u32, u32)> {
    let (w, h) = (w.round(), h.round());
    (w >= 1.0 && h >= 1.0 && w <= f64::from(u32::MAX) && h <= f64::from(u32::MAX))
        .then_some((w as u32, h as u32))
}

const NON_RENDERED: &[&str] = &[
    "defs",
    "clipPath",
    "mask",
    "pattern",
    "symbol",
    "marker",
    "linearGradient",
    "radialGradient",
];

fn collect_rects(node: roxmltree::Node<'_, '_>, parent: Affine, out: &mut Vec<OverlayRect>) {
    for child in node.children().filter(roxmltree::Node::is_element) {
        let name = child.tag_name().name();
        if NON_RENDERED.contains(&name) {
            continue;
        }
        let local = match child.attribute("transform") {
            Some(t) => match parse_transform(t) {
                Some(a) => a,
                None => {
                    tracing::debug!(transform = t, "skipping subtree with unparsable transform");
                    continue;
                }
            },
            None => Affine::IDENTITY,
        };
        let ts = parent * local;

        if name == "rect" {
            if let Some(rect) = rect_in_user_space(child, ts) {
                out.push(rect);
            }
            continue;
        }
        collect_rects(child, ts, out);
    }
}

fn rect_in_user_space(node: roxmltree::Node<'_, '_>, ts: Affine) -> Option<OverlayRect> {
    let coord = |name: &str| match node.attribute(name) {
        Some(v) => parse_length(v),
        None => Some(0.0),
    };
    let x = coord("x")?;
    let y = coord("y")?;
    let width = parse_length(node.attribute("width")?)?;
    let height = parse_length(node.attribute("height")?)?;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let [_, b, c, _, _, _] = ts.as_coeffs();
    if b.abs() > 1e-9 || c.abs() > 1e-9 {
        return None;
    }

    let p0 = ts * Point::new(x, y);
    let p1 = ts * Point::new(x + width, y + height);
    let r = Rect::from_points(p0, p1);
    (r.width() > 0.0 && r.height() > 0.0).then_some(OverlayRect {
        x: r.x0,
        y: r.y0,
        width: r.width(),
        height: r.height(),
    })
}

/// Plain user-unit number, `px` suffix tolerated. Percentages and other units are rejected.
fn parse_length(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_suffix("px").unwrap_or(s).trim_end();
    let v: f64 = s.parse().ok()?;
    v.is_finite().then_some(v)
}

/// Parse an SVG `transform` list into a single affine (applied left to right).
fn parse_transform(s: &str) -> Option<Affine> {
    let mut out = Affine::IDENTITY;
    let mut rest = s.trim();
    while !rest.is_empty() {
        let open = rest.find('(')?;
        let close = rest[open..].find(')')? + open;
        let name = rest[..open].trim();
        let args: Vec<f64> = rest[open + 1..close]
            .split(|c: char| c.is_ascii_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect::<Option<_>>()?;

        let step = match (name, args.as_slice()) {
            ("matrix", [a, b, c, d, e, f]) => Affine::new([*a, *b, *c, *d, *e, *f]),
            ("translate", [tx]) => Affine::translate((*tx, 0.0)),
            ("translate", [tx, ty]) => Affine::translate((*tx, *ty)),
            ("scale", [s]) => Affine::scale(*s),
            ("scale", [sx, sy]) => Affine::scale_non_uniform(*sx, *sy),
            ("rotate", [deg]) => Affine::rotate(deg.to_radians()),
            ("rotate", [deg, cx, cy]) => {
                Affine::translate((*cx, *cy))
                    * Affine::rotate(deg.to_radians())
                    * Affine::translate((-cx, -cy))
            }
            ("skewX", [deg]) => Affine::skew(deg.to_radians().tan(), 0.0),
            ("skewY", [deg]) => Affine::skew(0.0, deg.to_radians().tan()),
            _ => return None,
        };
        out *= step;
        rest = rest[close + 1..].trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',');
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/overlay.rs"]
mod tests;
