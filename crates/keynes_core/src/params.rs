//! Parameter snapshots for the two supported models.
//!
//! A [`ParameterSet`] is an immutable value: every edit produces a new set
//! through [`ParameterSet::with_value`] or one of the regime setters. The
//! change session keeps two of them alive (baseline and current) and
//! compares them after a burst of edits settles.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which model a parameter set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Schema {
    #[serde(rename = "keynesian-cross")]
    KeynesianCross,
    #[serde(rename = "is-lm")]
    IsLm,
}

impl Schema {
    pub fn name(self) -> &'static str {
        match self {
            Schema::KeynesianCross => "keynesian-cross",
            Schema::IsLm => "is-lm",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Schema {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keynesian-cross" | "cross" | "45" => Ok(Schema::KeynesianCross),
            "is-lm" | "islm" => Ok(Schema::IsLm),
            other => Err(ModelError::UnknownSchema(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// T is a fixed amount: disposable income is `Y - T`.
    LumpSum,
    /// T = t·Y: disposable income is `Y·(1 - t)`.
    Proportional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentRegime {
    /// Investment is the fixed input `I`.
    Exogenous,
    /// Investment follows `b0 + b1·Y - b2·i`.
    Endogenous,
}

/// Identifier of a single parameter field, numeric or regime flag.
///
/// Wire names match the symbols shown next to the sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldId {
    #[serde(rename = "c0")]
    C0,
    #[serde(rename = "c1")]
    C1,
    #[serde(rename = "I")]
    Investment,
    #[serde(rename = "G")]
    Government,
    #[serde(rename = "T")]
    Taxes,
    #[serde(rename = "t")]
    TaxRate,
    #[serde(rename = "b0")]
    B0,
    #[serde(rename = "b1")]
    B1,
    #[serde(rename = "b2")]
    B2,
    #[serde(rename = "i")]
    InterestRate,
    #[serde(rename = "I0")]
    AutonomousInvestment,
    #[serde(rename = "d1")]
    D1,
    #[serde(rename = "d2")]
    D2,
    #[serde(rename = "iBar")]
    PolicyRate,
    #[serde(rename = "useLumpSumTax")]
    TaxRegime,
    #[serde(rename = "useSimpleInvestment")]
    InvestmentRegime,
}

impl FieldId {
    pub const ALL: [FieldId; 16] = [
        FieldId::C0,
        FieldId::C1,
        FieldId::Investment,
        FieldId::Government,
        FieldId::Taxes,
        FieldId::TaxRate,
        FieldId::B0,
        FieldId::B1,
        FieldId::B2,
        FieldId::InterestRate,
        FieldId::AutonomousInvestment,
        FieldId::D1,
        FieldId::D2,
        FieldId::PolicyRate,
        FieldId::TaxRegime,
        FieldId::InvestmentRegime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FieldId::C0 => "c0",
            FieldId::C1 => "c1",
            FieldId::Investment => "I",
            FieldId::Government => "G",
            FieldId::Taxes => "T",
            FieldId::TaxRate => "t",
            FieldId::B0 => "b0",
            FieldId::B1 => "b1",
            FieldId::B2 => "b2",
            FieldId::InterestRate => "i",
            FieldId::AutonomousInvestment => "I0",
            FieldId::D1 => "d1",
            FieldId::D2 => "d2",
            FieldId::PolicyRate => "iBar",
            FieldId::TaxRegime => "useLumpSumTax",
            FieldId::InvestmentRegime => "useSimpleInvestment",
        }
    }

    pub fn is_regime(self) -> bool {
        matches!(self, FieldId::TaxRegime | FieldId::InvestmentRegime)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

/// Goods-market ("45-degree") model parameters.
///
/// Both tax fields and both investment descriptions are kept regardless of
/// the active regime so a toggle can switch back without losing values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossParams {
    pub c0: f64,
    pub c1: f64,
    #[serde(rename = "I")]
    pub investment: f64,
    #[serde(rename = "G")]
    pub government: f64,
    #[serde(rename = "T")]
    pub taxes: f64,
    #[serde(rename = "t")]
    pub tax_rate: f64,
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    #[serde(rename = "i")]
    pub interest_rate: f64,
    pub tax_regime: TaxRegime,
    pub investment_regime: InvestmentRegime,
}

impl Default for CrossParams {
    fn default() -> Self {
        Self {
            c0: 180.0,
            c1: 0.8,
            investment: 160.0,
            government: 160.0,
            taxes: 120.0,
            tax_rate: 0.2,
            b0: 160.0,
            b1: 0.05,
            b2: 10.0,
            interest_rate: 3.0,
            tax_regime: TaxRegime::LumpSum,
            investment_regime: InvestmentRegime::Exogenous,
        }
    }
}

impl CrossParams {
    fn slot(&self, field: FieldId) -> Option<f64> {
        match field {
            FieldId::C0 => Some(self.c0),
            FieldId::C1 => Some(self.c1),
            FieldId::Investment => Some(self.investment),
            FieldId::Government => Some(self.government),
            FieldId::Taxes => Some(self.taxes),
            FieldId::TaxRate => Some(self.tax_rate),
            FieldId::B0 => Some(self.b0),
            FieldId::B1 => Some(self.b1),
            FieldId::B2 => Some(self.b2),
            FieldId::InterestRate => Some(self.interest_rate),
            _ => None,
        }
    }

    fn slot_mut(&mut self, field: FieldId) -> Option<&mut f64> {
        match field {
            FieldId::C0 => Some(&mut self.c0),
            FieldId::C1 => Some(&mut self.c1),
            FieldId::Investment => Some(&mut self.investment),
            FieldId::Government => Some(&mut self.government),
            FieldId::Taxes => Some(&mut self.taxes),
            FieldId::TaxRate => Some(&mut self.tax_rate),
            FieldId::B0 => Some(&mut self.b0),
            FieldId::B1 => Some(&mut self.b1),
            FieldId::B2 => Some(&mut self.b2),
            FieldId::InterestRate => Some(&mut self.interest_rate),
            _ => None,
        }
    }
}

/// IS-LM parameters with a pegged policy rate (horizontal LM).
///
/// Investment is always `I0 + d1·Y - d2·i`; only the tax regime toggles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsLmParams {
    pub c0: f64,
    pub c1: f64,
    #[serde(rename = "I0")]
    pub autonomous_investment: f64,
    pub d1: f64,
    pub d2: f64,
    #[serde(rename = "G")]
    pub government: f64,
    #[serde(rename = "T")]
    pub taxes: f64,
    #[serde(rename = "t")]
    pub tax_rate: f64,
    #[serde(rename = "iBar")]
    pub policy_rate: f64,
    pub tax_regime: TaxRegime,
}

impl Default for IsLmParams {
    fn default() -> Self {
        Self {
            c0: 100.0,
            c1: 0.6,
            autonomous_investment: 80.0,
            d1: 0.1,
            d2: 40.0,
            government: 150.0,
            taxes: 100.0,
            tax_rate: 0.2,
            policy_rate: 3.0,
            tax_regime: TaxRegime::LumpSum,
        }
    }
}

impl IsLmParams {
    fn slot(&self, field: FieldId) -> Option<f64> {
        match field {
            FieldId::C0 => Some(self.c0),
            FieldId::C1 => Some(self.c1),
            FieldId::AutonomousInvestment => Some(self.autonomous_investment),
            FieldId::D1 => Some(self.d1),
            FieldId::D2 => Some(self.d2),
            FieldId::Government => Some(self.government),
            FieldId::Taxes => Some(self.taxes),
            FieldId::TaxRate => Some(self.tax_rate),
            FieldId::PolicyRate => Some(self.policy_rate),
            _ => None,
        }
    }

    fn slot_mut(&mut self, field: FieldId) -> Option<&mut f64> {
        match field {
            FieldId::C0 => Some(&mut self.c0),
            FieldId::C1 => Some(&mut self.c1),
            FieldId::AutonomousInvestment => Some(&mut self.autonomous_investment),
            FieldId::D1 => Some(&mut self.d1),
            FieldId::D2 => Some(&mut self.d2),
            FieldId::Government => Some(&mut self.government),
            FieldId::Taxes => Some(&mut self.taxes),
            FieldId::TaxRate => Some(&mut self.tax_rate),
            FieldId::PolicyRate => Some(&mut self.policy_rate),
            _ => None,
        }
    }
}

/// An immutable snapshot of every parameter of one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum ParameterSet {
    #[serde(rename = "keynesian-cross")]
    Cross(CrossParams),
    #[serde(rename = "is-lm")]
    IsLm(IsLmParams),
}

impl ParameterSet {
    pub fn defaults(schema: Schema) -> Self {
        match schema {
            Schema::KeynesianCross => ParameterSet::Cross(CrossParams::default()),
            Schema::IsLm => ParameterSet::IsLm(IsLmParams::default()),
        }
    }

    pub fn schema(&self) -> Schema {
        match self {
            ParameterSet::Cross(_) => Schema::KeynesianCross,
            ParameterSet::IsLm(_) => Schema::IsLm,
        }
    }

    pub fn tax_regime(&self) -> TaxRegime {
        match self {
            ParameterSet::Cross(p) => p.tax_regime,
            ParameterSet::IsLm(p) => p.tax_regime,
        }
    }

    /// Investment regime, or `None` for schemas where it cannot be toggled.
    pub fn investment_regime(&self) -> Option<InvestmentRegime> {
        match self {
            ParameterSet::Cross(p) => Some(p.investment_regime),
            ParameterSet::IsLm(_) => None,
        }
    }

    /// Reads a numeric field.
    pub fn value(&self, field: FieldId) -> ModelResult<f64> {
        if field.is_regime() {
            return Err(ModelError::NotNumeric(field));
        }
        let slot = match self {
            ParameterSet::Cross(p) => p.slot(field),
            ParameterSet::IsLm(p) => p.slot(field),
        };
        slot.ok_or(ModelError::FieldNotInSchema {
            field,
            schema: self.schema(),
        })
    }

    /// Returns a copy with one numeric field replaced.
    pub fn with_value(&self, field: FieldId, value: f64) -> ModelResult<ParameterSet> {
        if field.is_regime() {
            return Err(ModelError::NotNumeric(field));
        }
        if !value.is_finite() {
            return Err(ModelError::NonFinite(field));
        }
        let schema = self.schema();
        let mut next = *self;
        let slot = match &mut next {
            ParameterSet::Cross(p) => p.slot_mut(field),
            ParameterSet::IsLm(p) => p.slot_mut(field),
        };
        let slot = slot.ok_or(ModelError::FieldNotInSchema { field, schema })?;
        *slot = value;
        Ok(next)
    }

    pub fn with_tax_regime(&self, regime: TaxRegime) -> ParameterSet {
        let mut next = *self;
        match &mut next {
            ParameterSet::Cross(p) => p.tax_regime = regime,
            ParameterSet::IsLm(p) => p.tax_regime = regime,
        }
        next
    }

    pub fn with_investment_regime(&self, regime: InvestmentRegime) -> ModelResult<ParameterSet> {
        match self {
            ParameterSet::Cross(p) => Ok(ParameterSet::Cross(CrossParams {
                investment_regime: regime,
                ..*p
            })),
            ParameterSet::IsLm(_) => Err(ModelError::UnsupportedRegime {
                schema: Schema::IsLm,
                regime: "investment",
            }),
        }
    }

    /// Every numeric field stored by this schema, active or not.
    pub fn numeric_fields(&self) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|field| !field.is_regime() && self.value(*field).is_ok())
            .collect()
    }

    /// Fails with [`ModelError::SchemaMismatch`] unless both sets share a schema.
    pub fn ensure_same_schema(&self, other: &ParameterSet) -> ModelResult<()> {
        if self.schema() == other.schema() {
            Ok(())
        } else {
            Err(ModelError::SchemaMismatch {
                left: self.schema(),
                right: other.schema(),
            })
        }
    }
}
