use crate::curves::MAX_CURVE_SAMPLES;
use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Tunables for a change session and the charts it produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Debounce window: a burst settles once no edit arrived for this long.
    pub quiescence_ms: u64,
    /// Points per sampled curve.
    pub curve_samples: usize,
    /// Chart x-range is `headroom · max(Y, Y_baseline)`.
    pub headroom: f64,
    /// Upper bound used when the equilibrium is unbounded or not positive.
    pub max_chart_output: f64,
    /// Carry an approximately equivalent value into the field a regime
    /// toggle activates (`T` from `t·Y`, `t` from `T/Y`, `I` from the
    /// investment function).
    pub sync_on_regime_toggle: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            quiescence_ms: 500,
            curve_samples: 100,
            headroom: 1.5,
            max_chart_output: 10_000.0,
            sync_on_regime_toggle: true,
        }
    }
}

impl SessionSettings {
    pub fn validate(&self) -> ModelResult<()> {
        if self.curve_samples < 2 {
            return Err(ModelError::InvalidSettings(format!(
                "curve_samples must be at least 2, got {}",
                self.curve_samples
            )));
        }
        if self.curve_samples > MAX_CURVE_SAMPLES {
            return Err(ModelError::InvalidSettings(format!(
                "curve_samples must be at most {}, got {}",
                MAX_CURVE_SAMPLES, self.curve_samples
            )));
        }
        if !self.headroom.is_finite() || self.headroom <= 0.0 {
            return Err(ModelError::InvalidSettings(
                "headroom must be positive and finite".to_string(),
            ));
        }
        if !self.max_chart_output.is_finite() || self.max_chart_output <= 0.0 {
            return Err(ModelError::InvalidSettings(
                "max_chart_output must be positive and finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = SessionSettings::default();
        assert_eq!(settings.quiescence_ms, 500);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        let too_few = SessionSettings {
            curve_samples: 1,
            ..SessionSettings::default()
        };
        assert!(too_few.validate().is_err());

        let too_many = SessionSettings {
            curve_samples: MAX_CURVE_SAMPLES + 1,
            ..SessionSettings::default()
        };
        assert!(too_many.validate().is_err());

        let no_headroom = SessionSettings {
            headroom: 0.0,
            ..SessionSettings::default()
        };
        assert!(no_headroom.validate().is_err());

        let infinite_cap = SessionSettings {
            max_chart_output: f64::INFINITY,
            ..SessionSettings::default()
        };
        assert!(infinite_cap.validate().is_err());
    }

    #[test]
    fn zero_quiescence_is_allowed() {
        let immediate = SessionSettings {
            quiescence_ms: 0,
            ..SessionSettings::default()
        };
        assert!(immediate.validate().is_ok());
    }
}
