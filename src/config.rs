//! Calibration constants for the leverage composite.
//!
//! Stored as a JSON object on disk; every field is optional and falls back to
//! the historical calibration:
//! ```json
//! {
//!   "weights": { "profit_per_worker": 0.4 },
//!   "penalty_alpha": 2.0,
//!   "employment_baselines": { "2013": 64.61 },
//!   "vintage_policy": "strict"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::loader::read_json;

/// How to treat end-year sectors that find no start-year partner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VintagePolicy {
    /// Drop unmatched sectors and log them.
    #[default]
    Lenient,
    /// Fail with [`Error::UnreconciledSectors`].
    Strict,
}

/// Weight applied to each robust sub-score before penalizing.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ComponentWeights {
    pub avg_workers: f64,
    pub employment_growth: f64,
    pub profit_per_worker: f64,
    pub profit_growth: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            avg_workers: 0.20,
            employment_growth: 0.20,
            profit_per_worker: 0.40,
            profit_growth: 0.20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LeverageConfig {
    pub weights: ComponentWeights,
    /// Sharpness of the penalty applied to negative components.
    pub penalty_alpha: f64,
    /// Reference workers-per-enterprise level, in persons.
    pub avg_workers_reference: f64,
    /// Employment growth baseline (percent) keyed by the end year.
    pub employment_baselines: BTreeMap<i32, f64>,
    /// Employment growth baseline for end years not listed above.
    pub default_employment_baseline: f64,
    /// Center for the profit-per-worker growth score.
    pub profit_growth_reference: f64,
    pub vintage_policy: VintagePolicy,
}

impl Default for LeverageConfig {
    fn default() -> Self {
        Self {
            weights: ComponentWeights::default(),
            penalty_alpha: 2.0,
            avg_workers_reference: 400.0,
            employment_baselines: BTreeMap::from([(2013, 64.61)]),
            default_employment_baseline: 7.48,
            profit_growth_reference: 0.0,
            vintage_policy: VintagePolicy::Lenient,
        }
    }
}

impl LeverageConfig {
    /// Loads the config from a JSON file at `path` and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.penalty_alpha.is_finite() && self.penalty_alpha > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "penalty_alpha must be positive, got {}",
                self.penalty_alpha
            )));
        }

        let w = &self.weights;
        for (name, value) in [
            ("avg_workers", w.avg_workers),
            ("employment_growth", w.employment_growth),
            ("profit_per_worker", w.profit_per_worker),
            ("profit_growth", w.profit_growth),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "weight {name} must be non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }

    /// Employment growth baseline for a comparison ending in `end_year`.
    pub fn employment_baseline(&self, end_year: i32) -> f64 {
        self.employment_baselines
            .get(&end_year)
            .copied()
            .unwrap_or(self.default_employment_baseline)
    }

    pub fn strict(mut self) -> Self {
        self.vintage_policy = VintagePolicy::Strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_baselines() {
        let config = LeverageConfig::default();
        assert_eq!(config.employment_baseline(2013), 64.61);
        assert_eq!(config.employment_baseline(2023), 7.48);
        assert_eq!(config.employment_baseline(1999), 7.48);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"weights":{"profit_per_worker":0.5},"vintage_policy":"strict"}"#;
        let config: LeverageConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.weights.profit_per_worker, 0.5);
        assert_eq!(config.weights.avg_workers, 0.20);
        assert_eq!(config.penalty_alpha, 2.0);
        assert_eq!(config.vintage_policy, VintagePolicy::Strict);
        assert_eq!(config.employment_baseline(2013), 64.61);
    }

    #[test]
    fn test_baselines_parse_from_string_keys() {
        let json = r#"{"employment_baselines":{"2018":12.5}}"#;
        let config: LeverageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.employment_baseline(2018), 12.5);
        assert_eq!(config.employment_baseline(2013), 7.48);
    }

    #[test]
    fn test_validate_rejects_bad_alpha() {
        let config = LeverageConfig {
            penalty_alpha: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        let mut config = LeverageConfig::default();
        config.weights.profit_growth = -0.1;
        assert!(config.validate().is_err());
        assert!(LeverageConfig::default().validate().is_ok());
    }
}
