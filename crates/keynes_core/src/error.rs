use thiserror::Error;

use crate::params::{FieldId, Schema};

/// Errors raised for misuse of the engine.
///
/// Expected domain edges (the `m == 1` singularity, a collaborator that
/// fails to produce an explanation) are carried as data and never show up
/// here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Cannot compare a {left} parameter set against a {right} parameter set.")]
    SchemaMismatch { left: Schema, right: Schema },
    #[error("Field `{field}` does not exist in the {schema} schema.")]
    FieldNotInSchema { field: FieldId, schema: Schema },
    #[error("Field `{0}` is a regime flag, not a numeric parameter.")]
    NotNumeric(FieldId),
    #[error("The {schema} schema has no {regime} regime to toggle.")]
    UnsupportedRegime { schema: Schema, regime: &'static str },
    #[error("Unknown parameter field: {0}")]
    UnknownField(String),
    #[error("Unknown model schema: {0}")]
    UnknownSchema(String),
    #[error("Value {value} for `{field}` is outside [{min}, {max}].")]
    OutOfBounds {
        field: FieldId,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Value for `{0}` must be finite.")]
    NonFinite(FieldId),
    #[error("Curve sampling needs at least 2 samples, got {0}.")]
    TooFewSamples(usize),
    #[error("Curve sampling allows at most {max} samples, got {count}.")]
    TooManySamples { count: usize, max: usize },
    #[error("Curve range must be finite with upper > lower (got {lower}..{upper}).")]
    InvalidRange { lower: f64, upper: f64 },
    #[error("Invalid session settings: {0}")]
    InvalidSettings(String),
}

/// Convenience type for `Result<T, ModelError>`.
pub type ModelResult<T> = Result<T, ModelError>;
