//! Level difficulty parameters
//!
//! Parameters come from an external source (typically a remote service keyed
//! by theme). The orchestrator substitutes defaults when that source fails;
//! the generator trusts whatever it is handed.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LEVEL_LENGTH;
use crate::error::{Error, Result};

/// Tuning knobs for one generated level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelParams {
    /// Extra gap range on top of the minimum gap
    pub gap_size: f32,
    /// 0-1, scales the lava/bounce/ice probability bands
    pub hazard_density: f32,
    /// Full width of the per-platform height delta range
    pub platform_height_variance: f32,
    /// X of the finish line
    pub level_length: f32,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            gap_size: 200.0,
            hazard_density: 0.2,
            platform_height_variance: 100.0,
            level_length: 5000.0,
        }
    }
}

impl LevelParams {
    /// Parse a `{gapSize, hazardDensity, platformHeightVariance, levelLength}` object
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json.trim())?;
        params.validate()?;
        Ok(params)
    }

    /// Reject NaN/infinite values and courses too long to lay out
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("gapSize", self.gap_size),
            ("hazardDensity", self.hazard_density),
            ("platformHeightVariance", self.platform_height_variance),
            ("levelLength", self.level_length),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(Error::NonFinite { field });
            }
        }
        if self.level_length > MAX_LEVEL_LENGTH {
            return Err(Error::OutOfRange {
                field: "levelLength",
                value: self.level_length,
            });
        }
        Ok(())
    }
}

/// Something that can supply parameters for a theme
pub trait LevelParamsSource {
    fn level_params(&self, theme: &str) -> Result<LevelParams>;
}

impl<F> LevelParamsSource for F
where
    F: Fn(&str) -> Result<LevelParams>,
{
    fn level_params(&self, theme: &str) -> Result<LevelParams> {
        self(theme)
    }
}

/// Ask `source` for parameters, falling back to defaults on any failure
pub fn fetch_level_params<S: LevelParamsSource + ?Sized>(source: &S, theme: &str) -> LevelParams {
    fetch_level_params_or(source, theme, LevelParams::default())
}

/// Ask `source` for parameters, falling back to `fallback` on any failure
pub fn fetch_level_params_or<S: LevelParamsSource + ?Sized>(
    source: &S,
    theme: &str,
    fallback: LevelParams,
) -> LevelParams {
    match source.level_params(theme).and_then(|p| p.validate().map(|_| p)) {
        Ok(params) => {
            log::info!("Level params for '{}': {:?}", theme, params);
            params
        }
        Err(e) => {
            log::warn!("Level params for '{}' unavailable ({}), using fallback", theme, e);
            fallback
        }
    }
}
