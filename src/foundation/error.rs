/// Convenience result type used across photostrip.
pub type StripResult<T> = Result<T, StripError>;

/// Top-level error taxonomy used by compositing APIs.
///
/// Only a few variants abort a composition run (see [`StripError::is_fatal`]). The rest are
/// isolated to one photo or one pipeline stage and surface as diagnostics on the finished strip.
#[derive(thiserror::Error, Debug)]
pub enum StripError {
    /// Layout id is not part of the registry.
    #[error("unknown layout: {0}")]
    UnknownLayout(String),

    /// Zero or otherwise unusable source/destination extents.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// More photos were supplied than the layout has slots.
    #[error("photo count mismatch: {supplied} photos supplied, layout holds {capacity}")]
    PhotoCountMismatch {
        /// Number of photos handed to the compositor.
        supplied: usize,
        /// Number of slots in the resolved layout.
        capacity: usize,
    },

    /// Overlay markup could not be loaded, parsed or rasterized.
    #[error("overlay fetch failure: {0}")]
    OverlayFetch(String),

    /// Slots inferred from the overlay do not match the layout's slot count.
    #[error("slot inference mismatch: inferred {inferred} slots, expected {expected}")]
    SlotInferenceMismatch {
        /// Number of slots derived from the overlay geometry.
        inferred: usize,
        /// Number of slots the layout declares.
        expected: usize,
    },

    /// Pixel data could not be read back for grading.
    #[error("pixel access failure: {0}")]
    PixelAccess(String),

    /// Frame color string is not a well-formed color.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A photo source could not be decoded into pixels.
    #[error("photo decode failure: {0}")]
    PhotoDecode(String),

    /// Invalid user-provided configuration or inputs.
    #[error("validation error: {0}")]
    Validation(String),

    /// The run was superseded by a newer run before it finished.
    #[error("run superseded (generation {generation})")]
    Superseded {
        /// Generation of the cancelled run.
        generation: u64,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StripError {
    /// Build a [`StripError::UnknownLayout`] value.
    pub fn unknown_layout(msg: impl Into<String>) -> Self {
        Self::UnknownLayout(msg.into())
    }

    /// Build a [`StripError::InvalidGeometry`] value.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build a [`StripError::OverlayFetch`] value.
    pub fn overlay_fetch(msg: impl Into<String>) -> Self {
        Self::OverlayFetch(msg.into())
    }

    /// Build a [`StripError::PixelAccess`] value.
    pub fn pixel_access(msg: impl Into<String>) -> Self {
        Self::PixelAccess(msg.into())
    }

    /// Build a [`StripError::InvalidColor`] value.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    /// Build a [`StripError::PhotoDecode`] value.
    pub fn photo_decode(msg: impl Into<String>) -> Self {
        Self::PhotoDecode(msg.into())
    }

    /// Build a [`StripError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error aborts a whole composition run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownLayout(_) | Self::Validation(_) | Self::Superseded { .. } | Self::Other(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
