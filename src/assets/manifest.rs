use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    assets::photo::{Photo, PhotoSource},
    foundation::color::FrameColor,
    foundation::error::{StripError, StripResult},
    grade::params::{AdjustmentParameters, FilterKey},
    layout::registry::LayoutId,
};

/// Saved capture session: the ordered photo list plus the choices made on the capture page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhotoManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_color: Option<FrameColor>,
    pub photos: Vec<ManifestEntry>,
}

/// One photo record. Exactly one of `path` or `data_url` is set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustments: Option<AdjustmentParameters>,
}

impl PhotoManifest {
    pub fn from_json_str(s: &str) -> StripResult<Self> {
        let manifest: Self = serde_json::from_str(s)
            .map_err(|e| StripError::validation(format!("photo manifest: {e}")))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn from_path(path: &Path) -> StripResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read photo manifest '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> StripResult<()> {
        for (i, entry) in self.photos.iter().enumerate() {
            if entry.path.is_some() == entry.data_url.is_some() {
                return Err(source_conflict(i));
            }
        }
        Ok(())
    }

    /// Photos in capture order; relative paths resolve against `base_dir`.
    pub fn into_photos(self, base_dir: &Path) -> StripResult<Vec<Photo>> {
        self.photos
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let source = match (entry.path, entry.data_url) {
                    (Some(path), None) if path.is_absolute() => PhotoSource::Path(path),
                    (Some(path), None) => PhotoSource::Path(base_dir.join(path)),
                    (None, Some(url)) => PhotoSource::DataUrl(url),
                    _ => return Err(source_conflict(i)),
                };
                Ok(Photo {
                    source,
                    filter: entry.filter,
                    adjustments: entry.adjustments,
                })
            })
            .collect()
    }
}

fn source_conflict(index: usize) -> StripError {
    StripError::validation(format!(
        "photo manifest entry {index} must set exactly one of 'path' or 'data_url'"
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/manifest.rs"]
mod tests;
