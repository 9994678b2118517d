use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::color::FrameColor,
    foundation::error::{StripError, StripResult},
    layout::registry::LayoutRegistry,
};

/// Tunables shared by every composition run.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StripConfig {
    /// Color the overlay templates are authored in; recolored to the frame color.
    pub placeholder_color: FrameColor,
    pub default_frame_color: FrameColor,
    /// Swatches offered by a color picker.
    pub color_presets: Vec<FrameColor>,
    /// Margin added to the slot bounding box when an overlay declares no size.
    pub canvas_margin: u32,
    pub fallback_border_width: f32,
    pub fallback_separator_width: f32,
    pub export_file_name: String,
    pub layouts: LayoutRegistry,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            placeholder_color: FrameColor::rgb(0x1f, 0x32, 0x4f),
            default_frame_color: FrameColor::rgb(0x88, 0xca, 0xfc),
            color_presets: vec![
                FrameColor::rgb(0xed, 0xcc, 0x6f),
                FrameColor::rgb(0xd2, 0xeb, 0xff),
                FrameColor::rgb(0x88, 0xca, 0xfc),
                FrameColor::rgb(0x40, 0x40, 0x66),
                FrameColor::rgb(0x2b, 0x2c, 0x41),
            ],
            canvas_margin: 30,
            fallback_border_width: 24.0,
            fallback_separator_width: 6.0,
            export_file_name: "photo-strip.png".to_owned(),
            layouts: LayoutRegistry::builtin(),
        }
    }
}

impl StripConfig {
    pub fn from_json_str(s: &str) -> StripResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| StripError::validation(format!("strip config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> StripResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read strip config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> StripResult<()> {
        for (name, width) in [
            ("fallback_border_width", self.fallback_border_width),
            ("fallback_separator_width", self.fallback_separator_width),
        ] {
            if !width.is_finite() || width < 0.0 {
                return Err(StripError::validation(format!(
                    "{name} must be finite and >= 0, got {width}"
                )));
            }
        }

        let name = self.export_file_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(StripError::validation(format!(
                "export_file_name must be a bare file name, got '{}'",
                self.export_file_name
            )));
        }

        self.layouts.validate()
    }
}
