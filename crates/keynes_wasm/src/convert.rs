//! Host value decoding shared by the exported types.

use anyhow::{anyhow, bail, Context};
use keynes_core::bounds::check_edit;
use keynes_core::narrative::NarrativeError;
use keynes_core::params::{FieldId, ParameterSet, Schema};
use keynes_core::session::Edit;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::JsValue;

/// What the host reports back from the explanation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplanationResponse {
    Text { text: String },
    Failed { reason: NarrativeError },
}

impl From<ExplanationResponse> for Result<String, NarrativeError> {
    fn from(response: ExplanationResponse) -> Self {
        match response {
            ExplanationResponse::Text { text } => Ok(text),
            ExplanationResponse::Failed { reason } => Err(reason),
        }
    }
}

pub fn parse_schema(name: &str) -> anyhow::Result<Schema> {
    name.parse::<Schema>()
        .with_context(|| format!("Unknown model schema '{}'", name))
}

/// Host clocks hand out fractional milliseconds; the session works in whole ones.
pub fn timestamp_ms(now_ms: f64) -> anyhow::Result<u64> {
    if !now_ms.is_finite() || now_ms < 0.0 {
        bail!("Invalid timestamp {} (expected non-negative milliseconds)", now_ms);
    }
    Ok(now_ms.floor() as u64)
}

/// Timer tokens and session ids travel through JS as plain numbers.
pub fn whole_number(value: f64, what: &str) -> anyhow::Result<u64> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(anyhow!("Invalid {} {}", what, value));
    }
    Ok(value as u64)
}

/// Resolves a slider edit and checks it against the field's slider range.
pub fn value_edit(schema: Schema, field: &str, value: f64) -> anyhow::Result<Edit> {
    let field: FieldId = field.parse()?;
    check_edit(schema, field, value).context("Rejected parameter edit")?;
    Ok(Edit::Value { field, value })
}

/// Parameter sets supplied by the host must match the session's schema.
pub fn ensure_schema(params: &ParameterSet, schema: Schema) -> anyhow::Result<()> {
    if params.schema() != schema {
        bail!(
            "Parameter set is for '{}' but the session models '{}'",
            params.schema(),
            schema
        );
    }
    Ok(())
}

/// Serializes for the host with `None` as `null`, not `undefined`.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::new().serialize_missing_as_null(true))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

pub fn to_js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", err))
}
