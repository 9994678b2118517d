use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Slot;
use crate::foundation::error::{StripError, StripResult};

/// Identifier of one of the enumerable strip templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayoutId {
    /// Three stacked photos.
    #[serde(rename = "three-slot", alias = "3")]
    ThreeSlot,
    /// Four stacked photos.
    #[serde(rename = "four-slot", alias = "4v")]
    FourSlot,
    /// Four photos in a 2x2 grid.
    #[serde(rename = "four-grid", alias = "4h")]
    FourGrid,
}

impl LayoutId {
    pub const ALL: [LayoutId; 3] = [LayoutId::ThreeSlot, LayoutId::FourSlot, LayoutId::FourGrid];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ThreeSlot => "three-slot",
            Self::FourSlot => "four-slot",
            Self::FourGrid => "four-grid",
        }
    }

    /// Short key used by the capture pages ("3", "4v", "4h").
    pub fn short_key(self) -> &'static str {
        match self {
            Self::ThreeSlot => "3",
            Self::FourSlot => "4v",
            Self::FourGrid => "4h",
        }
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayoutId {
    type Err = StripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == key || id.short_key() == key)
            .ok_or_else(|| StripError::unknown_layout(format!("'{s}'")))
    }
}

/// One registry entry: overlay reference plus the default slot rectangles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    pub id: LayoutId,
    /// Overlay markup reference, resolved by an [`OverlaySource`](crate::OverlaySource).
    pub overlay: String,
    /// Slots in photo capture order.
    pub default_slots: Vec<Slot>,
}

impl Layout {
    pub fn slot_count(&self) -> usize {
        self.default_slots.len()
    }

    pub fn validate(&self) -> StripResult<()> {
        if self.overlay.trim().is_empty() {
            return Err(StripError::validation(format!(
                "layout '{}' overlay reference must be non-empty",
                self.id
            )));
        }
        if self.default_slots.is_empty() {
            return Err(StripError::validation(format!(
                "layout '{}' must declare at least one slot",
                self.id
            )));
        }
        for slot in &self.default_slots {
            slot.validate()
                .map_err(|e| StripError::validation(format!("layout '{}': {e}", self.id)))?;
        }
        Ok(())
    }
}

/// Explicit layout table handed to the compositor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutRegistry {
    layouts: Vec<Layout>,
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LayoutRegistry {
    pub fn new(layouts: Vec<Layout>) -> StripResult<Self> {
        let registry = Self { layouts };
        registry.validate()?;
        Ok(registry)
    }

    /// The three stock templates shipped under `templates/`.
    pub fn builtin() -> Self {
        fn slots(rects: &[(u32, u32, u32, u32)]) -> Vec<Slot> {
            rects
                .iter()
                .map(|&(x, y, width, height)| Slot {
                    x,
                    y,
                    width,
                    height,
                })
                .collect()
        }

        Self {
            layouts: vec![
                Layout {
                    id: LayoutId::ThreeSlot,
                    overlay: "three-slot.svg".to_owned(),
                    default_slots: slots(&[
                        (30, 33, 534, 385),
                        (30, 433, 534, 385),
                        (30, 833, 534, 385),
                    ]),
                },
                Layout {
                    id: LayoutId::FourSlot,
                    overlay: "four-slot.svg".to_owned(),
                    default_slots: slots(&[
                        (27, 29, 570, 406),
                        (27, 445, 570, 406),
                        (27, 861, 570, 406),
                        (27, 1277, 570, 406),
                    ]),
                },
                Layout {
                    id: LayoutId::FourGrid,
                    overlay: "four-grid.svg".to_owned(),
                    default_slots: slots(&[
                        (30, 28, 414, 592),
                        (456, 28, 414, 592),
                        (30, 630, 414, 592),
                        (456, 630, 414, 592),
                    ]),
                },
            ],
        }
    }

    pub fn validate(&self) -> StripResult<()> {
        if self.layouts.is_empty() {
            return Err(StripError::validation("layout registry must not be empty"));
        }
        for (i, layout) in self.layouts.iter().enumerate() {
            layout.validate()?;
            if self.layouts[..i].iter().any(|l| l.id == layout.id) {
                return Err(StripError::validation(format!(
                    "layout '{}' is declared more than once",
                    layout.id
                )));
            }
        }
        Ok(())
    }

    pub fn resolve(&self, id: LayoutId) -> StripResult<&Layout> {
        self.layouts
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| StripError::unknown_layout(format!("'{id}' is not in the registry")))
    }

    /// Parse `key` as a [`LayoutId`] and resolve it.
    pub fn resolve_str(&self, key: &str) -> StripResult<&Layout> {
        self.resolve(key.parse()?)
    }

    /// First layout, in table order, that holds exactly `photo_count` photos.
    pub fn best_match_for(&self, photo_count: usize) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.slot_count() == photo_count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layout> {
        self.layouts.iter()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/registry.rs"]
mod tests;
