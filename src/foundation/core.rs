use crate::foundation::error::{StripError, StripResult};

/// Rectangle in the overlay's native coordinate space that receives one photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Slot {
    pub x: u32,
    pub y: u32,
    pub width: u32,  // > 0
    pub height: u32, // > 0
}

impl Slot {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> StripResult<Self> {
        let slot = Self {
            x,
            y,
            width,
            height,
        };
        slot.validate()?;
        Ok(slot)
    }

    pub fn validate(&self) -> StripResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StripError::invalid_geometry(format!(
                "slot at ({}, {}) must have width/height > 0, got {}x{}",
                self.x, self.y, self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }
}

/// Source-space crop rectangle produced by the cover fit.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    pub sx: f64,
    pub sy: f64,
    pub sw: f64,
    pub sh: f64,
}

impl CropRect {
    pub fn aspect(&self) -> f64 {
        self.sw / self.sh
    }
}

/// Output raster dimensions for one composition run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> StripResult<Self> {
        if width == 0 || height == 0 {
            return Err(StripError::invalid_geometry(
                "canvas width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Bounding box of `slots` measured from the origin, plus `margin` on the far edges.
    pub fn around_slots(slots: &[Slot], margin: u32) -> Self {
        let max_w = slots.iter().map(Slot::right).max().unwrap_or(0);
        let max_h = slots.iter().map(Slot::bottom).max().unwrap_or(0);
        Self {
            width: max_w.saturating_add(margin).max(1),
            height: max_h.saturating_add(margin).max(1),
        }
    }
}
