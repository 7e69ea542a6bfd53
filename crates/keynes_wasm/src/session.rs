//! Change-session wrapper for the browser host.
//!
//! The host owns the real timers: every edit returns the timer to schedule
//! (and the token to cancel), and the host calls `fire` or `poll` back.

use crate::convert::{
    ensure_schema, parse_schema, timestamp_ms, to_js, to_js_error, value_edit, whole_number,
    ExplanationResponse,
};
use anyhow::Context;
use keynes_core::params::{InvestmentRegime, ParameterSet, Schema, TaxRegime};
use keynes_core::session::{ChangeSession, Edit, Settlement};
use keynes_core::settings::SessionSettings;
use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmModelSession {
    schema: Schema,
    session: ChangeSession,
}

fn decode_settings(settings_val: JsValue) -> anyhow::Result<SessionSettings> {
    if settings_val.is_undefined() || settings_val.is_null() {
        return Ok(SessionSettings::default());
    }
    from_value(settings_val)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Invalid session settings")
}

#[wasm_bindgen]
impl WasmModelSession {
    #[wasm_bindgen(constructor)]
    pub fn new(schema: &str, settings_val: JsValue) -> Result<WasmModelSession, JsValue> {
        console_error_panic_hook::set_once();

        let schema = parse_schema(schema).map_err(to_js_error)?;
        let settings = decode_settings(settings_val).map_err(to_js_error)?;
        let session = ChangeSession::new(ParameterSet::defaults(schema), settings)
            .map_err(|e| JsValue::from_str(&format!("Invalid session settings: {}", e)))?;

        Ok(WasmModelSession { schema, session })
    }

    pub fn schema(&self) -> String {
        self.schema.name().to_string()
    }

    pub fn status(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.status())
    }

    pub fn current(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.current())
    }

    pub fn baseline(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.baseline())
    }

    pub fn pending_timer(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.pending_timer())
    }

    pub fn equilibrium(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.equilibrium())
    }

    pub fn chart_frame(&self) -> Result<JsValue, JsValue> {
        let frame = self
            .session
            .chart_frame()
            .map_err(|e| JsValue::from_str(&format!("Chart frame failed: {}", e)))?;
        to_js(&frame)
    }

    pub fn begin_burst(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let now = timestamp_ms(now_ms).map_err(to_js_error)?;
        to_js(&self.session.begin_burst(now))
    }

    pub fn set_value(&mut self, field: &str, value: f64, now_ms: f64) -> Result<JsValue, JsValue> {
        let now = timestamp_ms(now_ms).map_err(to_js_error)?;
        let edit = value_edit(self.schema, field, value).map_err(to_js_error)?;
        self.apply(edit, now)
    }

    pub fn set_lump_sum_tax(&mut self, lump_sum: bool, now_ms: f64) -> Result<JsValue, JsValue> {
        let now = timestamp_ms(now_ms).map_err(to_js_error)?;
        let regime = if lump_sum {
            TaxRegime::LumpSum
        } else {
            TaxRegime::Proportional
        };
        self.apply(Edit::TaxRegime { regime }, now)
    }

    pub fn set_simple_investment(&mut self, simple: bool, now_ms: f64) -> Result<JsValue, JsValue> {
        let now = timestamp_ms(now_ms).map_err(to_js_error)?;
        let regime = if simple {
            InvestmentRegime::Exogenous
        } else {
            InvestmentRegime::Endogenous
        };
        self.apply(Edit::InvestmentRegime { regime }, now)
    }

    /// Returns the settlement, or `null` when the deadline has not passed.
    pub fn poll(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let now = timestamp_ms(now_ms).map_err(to_js_error)?;
        let settlement = self
            .session
            .poll(now)
            .map_err(|e| JsValue::from_str(&format!("Settle failed: {}", e)))?;
        to_js(&settlement)
    }

    /// Timer callback. Stale tokens yield `null`.
    pub fn fire(&mut self, token: f64) -> Result<JsValue, JsValue> {
        let token = whole_number(token, "timer token").map_err(to_js_error)?;
        let settlement = self
            .session
            .fire(token)
            .map_err(|e| JsValue::from_str(&format!("Settle failed: {}", e)))?;
        to_js(&settlement)
    }

    /// Returns the token the host must clear, or `null`.
    pub fn teardown(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.session.teardown())
    }

    /// Starts over from `params_val`, or from the schema defaults when it is
    /// `undefined`.
    pub fn reset(&mut self, params_val: JsValue) -> Result<JsValue, JsValue> {
        let initial = if params_val.is_undefined() || params_val.is_null() {
            ParameterSet::defaults(self.schema)
        } else {
            let params: ParameterSet = from_value(params_val)
                .map_err(|e| JsValue::from_str(&format!("Invalid parameter set: {}", e)))?;
            ensure_schema(&params, self.schema).map_err(to_js_error)?;
            params
        };
        to_js(&self.session.reset(initial))
    }

    pub fn resolve_explanation(
        &mut self,
        session_id: f64,
        response_val: JsValue,
    ) -> Result<JsValue, JsValue> {
        let session_id = whole_number(session_id, "session id").map_err(to_js_error)?;
        let response: ExplanationResponse = from_value(response_val)
            .map_err(|e| JsValue::from_str(&format!("Invalid explanation response: {}", e)))?;
        to_js(&self.session.resolve_explanation(session_id, response.into()))
    }
}

/// Builds the narrative request for a settlement, or `null` when nothing
/// changed.
#[wasm_bindgen]
pub fn explanation_request(settlement_val: JsValue) -> Result<JsValue, JsValue> {
    let settlement: Settlement = from_value(settlement_val)
        .map_err(|e| JsValue::from_str(&format!("Invalid settlement: {}", e)))?;
    to_js(&settlement.explanation_request())
}

impl WasmModelSession {
    fn apply(&mut self, edit: Edit, now: u64) -> Result<JsValue, JsValue> {
        let outcome = self
            .session
            .apply(edit, now)
            .map_err(|e| JsValue::from_str(&format!("Edit rejected: {}", e)))?;
        to_js(&outcome)
    }
}
