use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;

use crate::{
    foundation::color::FrameColor,
    foundation::error::{StripError, StripResult},
    render::compositor::ComposedStrip,
};

/// Handle for one composition run. Stale once a newer run has begun.
#[derive(Clone, Debug)]
pub struct RunToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl RunToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.generation
    }

    /// `Err(Superseded)` once a newer run has begun.
    pub fn ensure_current(&self) -> StripResult<()> {
        if self.is_current() {
            Ok(())
        } else {
            Err(StripError::Superseded {
                generation: self.generation,
            })
        }
    }
}

#[derive(Debug, Default)]
struct Published {
    generation: u64,
    strip: Option<Arc<ComposedStrip>>,
}

/// Caller-side state shared across runs: the generation counter, the last valid frame color and
/// the most recent published strip.
#[derive(Debug)]
pub struct StripSession {
    generation: Arc<AtomicU64>,
    frame_color: Mutex<FrameColor>,
    published: Mutex<Published>,
}

impl StripSession {
    pub fn new(initial_color: FrameColor) -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            frame_color: Mutex::new(initial_color),
            published: Mutex::new(Published::default()),
        }
    }

    pub fn frame_color(&self) -> FrameColor {
        *self.frame_color.lock()
    }

    /// Parse and adopt `input`. On `InvalidColor` the previous color stays in effect.
    pub fn set_frame_color(&self, input: &str) -> StripResult<FrameColor> {
        match FrameColor::parse(input) {
            Ok(color) => {
                *self.frame_color.lock() = color;
                Ok(color)
            }
            Err(e) => {
                tracing::warn!(input, kept = %self.frame_color(), "ignoring invalid frame color");
                Err(e)
            }
        }
    }

    /// Start a new run; every earlier token becomes stale.
    pub fn begin_run(&self) -> RunToken {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        RunToken {
            generation,
            current: Arc::clone(&self.generation),
        }
    }

    /// Hand a finished strip to the export side. Output from a superseded run is dropped.
    pub fn publish(&self, token: &RunToken, strip: ComposedStrip) -> bool {
        let mut published = self.published.lock();
        if !token.is_current() || token.generation < published.generation {
            tracing::debug!(
                generation = token.generation,
                "discarding output of superseded run"
            );
            return false;
        }
        published.generation = token.generation;
        published.strip = Some(Arc::new(strip));
        true
    }

    pub fn latest(&self) -> Option<Arc<ComposedStrip>> {
        self.published.lock().strip.clone()
    }
}

impl Default for StripSession {
    fn default() -> Self {
        Self::new(crate::config::StripConfig::default().default_frame_color)
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
