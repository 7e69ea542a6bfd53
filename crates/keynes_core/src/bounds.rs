//! Slider ranges for the input layer.
//!
//! The solver assumes values inside these ranges but never checks them;
//! edits coming from a host are checked here before they reach a session.

use crate::error::{ModelError, ModelResult};
use crate::params::{FieldId, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl FieldBounds {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

pub fn bounds_for(schema: Schema, field: FieldId) -> Option<FieldBounds> {
    match schema {
        Schema::KeynesianCross => match field {
            FieldId::C0 => Some(FieldBounds::new(0.0, 500.0, 10.0)),
            FieldId::C1 => Some(FieldBounds::new(0.1, 0.95, 0.05)),
            FieldId::Investment => Some(FieldBounds::new(0.0, 500.0, 10.0)),
            FieldId::Government => Some(FieldBounds::new(0.0, 500.0, 10.0)),
            FieldId::Taxes => Some(FieldBounds::new(0.0, 500.0, 10.0)),
            FieldId::TaxRate => Some(FieldBounds::new(0.05, 0.8, 0.05)),
            FieldId::B0 => Some(FieldBounds::new(0.0, 500.0, 10.0)),
            FieldId::B1 => Some(FieldBounds::new(0.0, 0.3, 0.01)),
            FieldId::B2 => Some(FieldBounds::new(0.0, 100.0, 5.0)),
            FieldId::InterestRate => Some(FieldBounds::new(0.0, 10.0, 0.25)),
            _ => None,
        },
        Schema::IsLm => match field {
            FieldId::C0 => Some(FieldBounds::new(0.0, 200.0, 5.0)),
            FieldId::C1 => Some(FieldBounds::new(0.1, 0.9, 0.05)),
            FieldId::AutonomousInvestment => Some(FieldBounds::new(0.0, 200.0, 5.0)),
            FieldId::D1 => Some(FieldBounds::new(0.0, 0.3, 0.01)),
            FieldId::D2 => Some(FieldBounds::new(10.0, 100.0, 5.0)),
            FieldId::Government => Some(FieldBounds::new(0.0, 500.0, 10.0)),
            FieldId::Taxes => Some(FieldBounds::new(0.0, 300.0, 10.0)),
            FieldId::TaxRate => Some(FieldBounds::new(0.05, 0.8, 0.05)),
            FieldId::PolicyRate => Some(FieldBounds::new(0.0, 10.0, 0.25)),
            _ => None,
        },
    }
}

/// Rejects edits that fall outside the slider range of `field`.
pub fn check_edit(schema: Schema, field: FieldId, value: f64) -> ModelResult<()> {
    if field.is_regime() {
        return Err(ModelError::NotNumeric(field));
    }
    if !value.is_finite() {
        return Err(ModelError::NonFinite(field));
    }
    let bounds = bounds_for(schema, field).ok_or(ModelError::FieldNotInSchema { field, schema })?;
    if bounds.contains(value) {
        Ok(())
    } else {
        Err(ModelError::OutOfBounds {
            field,
            value,
            min: bounds.min,
            max: bounds.max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;

    #[test]
    fn every_numeric_field_has_bounds_and_defaults_fit() {
        for schema in [Schema::KeynesianCross, Schema::IsLm] {
            let defaults = ParameterSet::defaults(schema);
            for field in defaults.numeric_fields() {
                let value = defaults.value(field).expect("numeric field");
                assert!(
                    check_edit(schema, field, value).is_ok(),
                    "default {field}={value} outside bounds for {schema}"
                );
            }
        }
    }

    #[test]
    fn check_edit_reports_range() {
        let err = check_edit(Schema::IsLm, FieldId::C1, 0.95).expect_err("c1 capped at 0.9");
        assert_eq!(
            err,
            ModelError::OutOfBounds {
                field: FieldId::C1,
                value: 0.95,
                min: 0.1,
                max: 0.9
            }
        );
        assert!(check_edit(Schema::KeynesianCross, FieldId::C1, 0.95).is_ok());
    }

    #[test]
    fn check_edit_rejects_foreign_fields() {
        assert!(matches!(
            check_edit(Schema::IsLm, FieldId::Investment, 10.0),
            Err(ModelError::FieldNotInSchema { .. })
        ));
    }

    #[test]
    fn clamp_pins_to_range() {
        let bounds = bounds_for(Schema::KeynesianCross, FieldId::TaxRate).expect("t");
        assert_eq!(bounds.clamp(0.9), 0.8);
        assert_eq!(bounds.clamp(0.01), 0.05);
        assert_eq!(bounds.clamp(0.3), 0.3);
    }
}
