use std::path::PathBuf;

use crate::grade::params::{AdjustmentParameters, FilterKey};

/// Where a captured photo's pixels come from.
#[derive(Clone, PartialEq, Eq)]
pub enum PhotoSource {
    /// Encoded image bytes (PNG, JPEG, ...).
    Encoded(Vec<u8>),
    /// Encoded image file on disk.
    Path(PathBuf),
    /// `data:image/...;base64,...` URL as produced by a browser canvas.
    DataUrl(String),
    /// Straight-alpha RGBA8 pixels, row-major, tightly packed.
    Rgba {
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
}

impl std::fmt::Debug for PhotoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encoded(bytes) => f
                .debug_struct("Encoded")
                .field("len", &bytes.len())
                .finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::DataUrl(url) => f
                .debug_struct("DataUrl")
                .field("prefix", &url.get(..url.find(',').unwrap_or(0)).unwrap_or(""))
                .field("len", &url.len())
                .finish(),
            Self::Rgba { width, height, .. } => f
                .debug_struct("Rgba")
                .field("width", width)
                .field("height", height)
                .finish(),
        }
    }
}

/// One captured photo, immutable once handed to the compositor.
#[derive(Clone, Debug, PartialEq)]
pub struct Photo {
    pub source: PhotoSource,
    pub filter: Option<FilterKey>,
    pub adjustments: Option<AdjustmentParameters>,
}

impl Photo {
    pub fn new(source: PhotoSource) -> Self {
        Self {
            source,
            filter: None,
            adjustments: None,
        }
    }

    pub fn with_filter(mut self, filter: FilterKey) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_adjustments(mut self, adjustments: AdjustmentParameters) -> Self {
        self.adjustments = Some(adjustments);
        self
    }

    /// Filter preset overridden field-by-field by the explicit adjustments.
    pub fn effective_adjustments(&self) -> AdjustmentParameters {
        let base = self.filter.map(FilterKey::preset).unwrap_or_default();
        match &self.adjustments {
            Some(explicit) => base.overlay(explicit),
            None => base,
        }
    }
}
