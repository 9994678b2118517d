use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{StripError, StripResult};

/// Opaque RGB color used for the frame and for overlay placeholder matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FrameColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb` (leading `#` optional) or `rgb(r, g, b)`.
    pub fn parse(s: &str) -> StripResult<Self> {
        let trimmed = s.trim();
        if let Some(body) = trimmed
            .strip_prefix("rgb(")
            .or_else(|| trimmed.strip_prefix("RGB("))
        {
            return parse_rgb_fn(body, s);
        }
        parse_hex(trimmed).ok_or_else(|| {
            StripError::invalid_color(format!(
                "'{s}' is not #rgb, #rrggbb or rgb(r, g, b)"
            ))
        })
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for FrameColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for FrameColor {
    type Err = StripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FrameColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FrameColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_hex(s: &str) -> Option<FrameColor> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    fn nibble(c: &str) -> Option<u8> {
        u8::from_str_radix(c, 16).ok().map(|v| v * 17)
    }
    fn byte(pair: &str) -> Option<u8> {
        u8::from_str_radix(pair, 16).ok()
    }

    match s.len() {
        3 => Some(FrameColor::rgb(
            nibble(&s[0..1])?,
            nibble(&s[1..2])?,
            nibble(&s[2..3])?,
        )),
        6 => Some(FrameColor::rgb(
            byte(&s[0..2])?,
            byte(&s[2..4])?,
            byte(&s[4..6])?,
        )),
        _ => None,
    }
}

fn parse_rgb_fn(body: &str, original: &str) -> StripResult<FrameColor> {
    let bad = || StripError::invalid_color(format!("'{original}' is not a valid rgb() color"));
    let body = body.strip_suffix(')').ok_or_else(bad)?;
    let parts = body
        .split(',')
        .map(|p| p.trim().parse::<u8>().map_err(|_| bad()))
        .collect::<StripResult<Vec<u8>>>()?;
    match parts.as_slice() {
        [r, g, b] => Ok(FrameColor::rgb(*r, *g, *b)),
        _ => Err(bad()),
    }
}

/// Hue in degrees [0, 360), saturation and lightness in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Convert RGB in [0, 1] to HSL.
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> Hsl {
    let r = r.clamp(0.0, 1.0);
    let g = g.clamp(0.0, 1.0);
    let b = b.clamp(0.0, 1.0);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    if delta <= f64::EPSILON {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let h = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsl {
        h: (h * 60.0) % 360.0,
        s,
        l,
    }
}

/// Convert HSL back to RGB in [0, 1].
pub fn hsl_to_rgb(hsl: Hsl) -> (f64, f64, f64) {
    let s = hsl.s.clamp(0.0, 1.0);
    let l = hsl.l.clamp(0.0, 1.0);
    if s <= f64::EPSILON {
        return (l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let h = (hsl.h % 360.0 + 360.0) % 360.0 / 360.0;
    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
