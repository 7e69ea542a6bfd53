//! Stateless solver, sampling and comparative-statics helpers.

use crate::convert::{parse_schema, to_js, to_js_error};
use anyhow::Context;
use keynes_core::analysis::{compare, multiplier_info, policy_effect, policy_mix};
use keynes_core::bounds::bounds_for;
use keynes_core::curves::{sample, sample_reference};
use keynes_core::equilibrium::solve;
use keynes_core::params::{FieldId, ParameterSet};
use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;

fn decode_params(params_val: JsValue) -> Result<ParameterSet, JsValue> {
    from_value(params_val).map_err(|e| JsValue::from_str(&format!("Invalid parameter set: {}", e)))
}

/// Interleaved `x0, y0, x1, y1, …` samples of either the primary curve or the
/// reference line.
fn curve_values(
    params: &ParameterSet,
    lower: f64,
    upper: f64,
    count: u32,
    reference: bool,
) -> anyhow::Result<Vec<f64>> {
    let series = if reference {
        sample_reference(params, lower, upper, count as usize)
    } else {
        sample(params, lower, upper, count as usize)
    }
    .context("Curve sampling failed")?;
    Ok(series.to_flat())
}

#[wasm_bindgen]
pub fn solve_equilibrium(params_val: JsValue) -> Result<JsValue, JsValue> {
    let params = decode_params(params_val)?;
    to_js(&solve(&params))
}

#[wasm_bindgen]
pub fn sample_curve(
    params_val: JsValue,
    lower: f64,
    upper: f64,
    count: u32,
) -> Result<js_sys::Float64Array, JsValue> {
    let params = decode_params(params_val)?;
    let values = curve_values(&params, lower, upper, count, false).map_err(to_js_error)?;
    Ok(js_sys::Float64Array::from(values.as_slice()))
}

#[wasm_bindgen]
pub fn sample_reference_line(
    params_val: JsValue,
    lower: f64,
    upper: f64,
    count: u32,
) -> Result<js_sys::Float64Array, JsValue> {
    let params = decode_params(params_val)?;
    let values = curve_values(&params, lower, upper, count, true).map_err(to_js_error)?;
    Ok(js_sys::Float64Array::from(values.as_slice()))
}

#[wasm_bindgen]
pub fn default_parameters(schema: &str) -> Result<JsValue, JsValue> {
    let schema = parse_schema(schema).map_err(to_js_error)?;
    to_js(&ParameterSet::defaults(schema))
}

/// Slider range of `field`, or `null` for fields the schema does not show.
#[wasm_bindgen]
pub fn field_bounds(schema: &str, field: &str) -> Result<JsValue, JsValue> {
    let schema = parse_schema(schema).map_err(to_js_error)?;
    let field: FieldId = field
        .parse()
        .map_err(|e| JsValue::from_str(&format!("{}", e)))?;
    to_js(&bounds_for(schema, field))
}

#[wasm_bindgen]
pub fn multiplier_summary(params_val: JsValue) -> Result<JsValue, JsValue> {
    let params = decode_params(params_val)?;
    to_js(&multiplier_info(&params))
}

#[wasm_bindgen]
pub fn compare_parameters(baseline_val: JsValue, current_val: JsValue) -> Result<JsValue, JsValue> {
    let baseline = decode_params(baseline_val)?;
    let current = decode_params(current_val)?;
    let comparison = compare(&baseline, &current)
        .map_err(|e| JsValue::from_str(&format!("Comparison failed: {}", e)))?;
    to_js(&comparison)
}

#[wasm_bindgen]
pub fn simulate_policy(params_val: JsValue, field: &str, shock: f64) -> Result<JsValue, JsValue> {
    let params = decode_params(params_val)?;
    let field: FieldId = field
        .parse()
        .map_err(|e| JsValue::from_str(&format!("{}", e)))?;
    let effect = policy_effect(&params, field, shock)
        .map_err(|e| JsValue::from_str(&format!("Policy simulation failed: {}", e)))?;
    to_js(&effect)
}

#[wasm_bindgen]
pub fn simulate_policy_mix(
    params_val: JsValue,
    government_change: f64,
    rate_change: f64,
) -> Result<JsValue, JsValue> {
    let params = decode_params(params_val)?;
    let comparison = policy_mix(&params, government_change, rate_change)
        .map_err(|e| JsValue::from_str(&format!("Policy simulation failed: {}", e)))?;
    to_js(&comparison)
}

#[cfg(test)]
mod tests {
    use super::curve_values;
    use keynes_core::params::{ParameterSet, Schema};

    #[test]
    fn curve_values_are_interleaved() {
        let params = ParameterSet::defaults(Schema::KeynesianCross);
        let values = curve_values(&params, 0.0, 100.0, 3, false).expect("samples");
        // ZZ = 404 + 0.8 Y under the default lump-sum set
        assert_eq!(values.len(), 6);
        assert_eq!(values[0], 0.0);
        assert!((values[1] - 404.0).abs() < 1e-9);
        assert_eq!(values[4], 100.0);
        assert!((values[5] - 484.0).abs() < 1e-9);
    }

    #[test]
    fn reference_values_follow_policy_rate() {
        let params = ParameterSet::defaults(Schema::IsLm);
        let values = curve_values(&params, 0.0, 500.0, 2, true).expect("samples");
        assert_eq!(values, vec![0.0, 3.0, 500.0, 3.0]);
    }

    #[test]
    fn too_few_samples_is_an_error() {
        let params = ParameterSet::defaults(Schema::IsLm);
        let err = curve_values(&params, 0.0, 1.0, 1, false).expect_err("count < 2");
        assert!(format!("{:#}", err).starts_with("Curve sampling failed"));
    }

    #[test]
    fn oversized_sample_count_is_rejected_before_allocating() {
        let params = ParameterSet::defaults(Schema::KeynesianCross);
        let err = curve_values(&params, 0.0, 1.0, u32::MAX, false).expect_err("count over cap");
        assert!(format!("{:#}", err).contains("at most"));
    }
}
