use crate::ThresholdError;
use serde::{Deserialize, Serialize};

/// Which part of the image is assumed to show the background.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Border strips are likely background.
    #[default]
    Border,
    /// The object sits in the center of the frame.
    Center,
}

impl std::str::FromStr for ReferencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "border" => Ok(Self::Border),
            "center" | "centre" => Ok(Self::Center),
            other => Err(format!("unknown reference policy '{other}'")),
        }
    }
}

fn default_fraction() -> f32 {
    0.1
}

/// Parameters for foreground/background disambiguation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionParams {
    #[serde(default)]
    pub policy: ReferencePolicy,
    /// Border strip width relative to each image dimension.
    #[serde(default = "default_fraction")]
    pub border_fraction: f32,
    /// Central rectangle size relative to each image dimension.
    #[serde(default = "default_fraction")]
    pub center_fraction: f32,
}

impl Default for RegionParams {
    fn default() -> Self {
        Self {
            policy: ReferencePolicy::Border,
            border_fraction: default_fraction(),
            center_fraction: default_fraction(),
        }
    }
}

impl RegionParams {
    pub fn with_policy(policy: ReferencePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Check both fractions lie in `(0, 1]`.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for f in [self.border_fraction, self.center_fraction] {
            if !(f > 0.0 && f <= 1.0) {
                return Err(ThresholdError::InvalidFraction(f));
            }
        }
        Ok(())
    }
}
