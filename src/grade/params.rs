use serde::{Deserialize, Serialize};

/// Per-photo color adjustments. Every field is optional; an absent field is a no-op.
///
/// Ranges: `temperature` in `[0, 100]` (50 is neutral), `vignette` in `[0, 100]`, everything
/// else in `[-100, 100]`. Out-of-range values are clamped when the grade runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdjustmentParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadows: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vibrance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vignette: Option<f64>,
}

impl AdjustmentParameters {
    /// Temperature offset in `[-1, 1]`, `None` when neutral.
    pub(crate) fn temperature_delta(&self) -> Option<f64> {
        let t = finite(self.temperature)?.clamp(0.0, 100.0);
        let delta = (t - 50.0) / 50.0;
        (delta != 0.0).then_some(delta)
    }

    pub(crate) fn contrast(&self) -> Option<f64> {
        signed(self.contrast)
    }

    pub(crate) fn highlights(&self) -> Option<f64> {
        signed(self.highlights)
    }

    pub(crate) fn shadows(&self) -> Option<f64> {
        signed(self.shadows)
    }

    pub(crate) fn vibrance(&self) -> Option<f64> {
        signed(self.vibrance)
    }

    pub(crate) fn vignette(&self) -> Option<f64> {
        let v = finite(self.vignette)?.clamp(0.0, 100.0);
        (v != 0.0).then_some(v)
    }

    /// True when every stage of the grade would be skipped.
    pub fn is_identity(&self) -> bool {
        self.temperature_delta().is_none()
            && self.contrast().is_none()
            && self.highlights().is_none()
            && self.shadows().is_none()
            && self.vibrance().is_none()
            && self.vignette().is_none()
    }

    /// Field-by-field override: values present in `over` win.
    pub fn overlay(self, over: &AdjustmentParameters) -> Self {
        Self {
            temperature: over.temperature.or(self.temperature),
            contrast: over.contrast.or(self.contrast),
            highlights: over.highlights.or(self.highlights),
            shadows: over.shadows.or(self.shadows),
            vibrance: over.vibrance.or(self.vibrance),
            vignette: over.vignette.or(self.vignette),
        }
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}

fn signed(v: Option<f64>) -> Option<f64> {
    let v = finite(v)?.clamp(-100.0, 100.0);
    (v != 0.0).then_some(v)
}

/// Named looks a capture page can tag a photo with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKey {
    Vintage,
    Warm,
    Cool,
    Faded,
    Vivid,
}

impl FilterKey {
    pub const ALL: [FilterKey; 5] = [
        FilterKey::Vintage,
        FilterKey::Warm,
        FilterKey::Cool,
        FilterKey::Faded,
        FilterKey::Vivid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vintage => "vintage",
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Faded => "faded",
            Self::Vivid => "vivid",
        }
    }

    pub fn preset(self) -> AdjustmentParameters {
        match self {
            Self::Vintage => AdjustmentParameters {
                temperature: Some(68.0),
                contrast: Some(-12.0),
                highlights: Some(-15.0),
                shadows: Some(20.0),
                vibrance: Some(-25.0),
                vignette: Some(45.0),
            },
            Self::Warm => AdjustmentParameters {
                temperature: Some(75.0),
                vibrance: Some(10.0),
                ..AdjustmentParameters::default()
            },
            Self::Cool => AdjustmentParameters {
                temperature: Some(25.0),
                contrast: Some(5.0),
                ..AdjustmentParameters::default()
            },
            Self::Faded => AdjustmentParameters {
                contrast: Some(-30.0),
                shadows: Some(35.0),
                vibrance: Some(-40.0),
                ..AdjustmentParameters::default()
            },
            Self::Vivid => AdjustmentParameters {
                contrast: Some(15.0),
                vibrance: Some(45.0),
                ..AdjustmentParameters::default()
            },
        }
    }
}

impl std::str::FromStr for FilterKey {
    type Err = crate::foundation::error::StripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == key)
            .ok_or_else(|| {
                crate::foundation::error::StripError::validation(format!(
                    "unknown filter '{s}'"
                ))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grade/params.rs"]
mod tests;
