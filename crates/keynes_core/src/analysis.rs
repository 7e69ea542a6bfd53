//! Comparative statics on top of the solver: multiplier breakdowns,
//! hypothetical policy shocks, before/after comparisons and the heuristic
//! value carry-over applied when a regime is toggled.

use crate::bounds::bounds_for;
use crate::delta::diff;
use crate::equilibrium::{multiplier_for, solve, Equilibrium};
use crate::error::{ModelError, ModelResult};
use crate::model::{scaled, LinearModel, Model};
use crate::params::{FieldId, InvestmentRegime, ParameterSet, Schema, TaxRegime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierInfo {
    pub multiplier: f64,
    pub marginal_rate: f64,
    /// `c1` under lump-sum taxes, `c1·(1 - t)` under proportional taxes.
    pub effective_mpc: f64,
    /// `c1·t`, the propensity lost to proportional taxation.
    pub tax_leakage: f64,
    /// `di/dY` of the IS curve; IS-LM only.
    pub is_slope: Option<f64>,
}

pub fn multiplier_info(params: &ParameterSet) -> MultiplierInfo {
    let (c1, tax_rate) = match params {
        ParameterSet::Cross(p) => (p.c1, p.tax_rate),
        ParameterSet::IsLm(p) => (p.c1, p.tax_rate),
    };
    let (effective_mpc, tax_leakage) = match params.tax_regime() {
        TaxRegime::LumpSum => (c1, 0.0),
        TaxRegime::Proportional => (c1 * (1.0 - tax_rate), c1 * tax_rate),
    };
    let model = params.model();
    let is_slope = match model {
        Model::IsLm(islm) => Some(islm.is_slope()),
        Model::Cross(_) => None,
    };
    let equilibrium = solve(params);
    MultiplierInfo {
        multiplier: multiplier_for(equilibrium.marginal_rate),
        marginal_rate: equilibrium.marginal_rate,
        effective_mpc,
        tax_leakage,
        is_slope,
    }
}

/// Which plotted curve a parameter shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Demand,
    Is,
    Lm,
}

pub fn affected_curve(schema: Schema, field: FieldId) -> Curve {
    match (schema, field) {
        (Schema::KeynesianCross, _) => Curve::Demand,
        (Schema::IsLm, FieldId::PolicyRate) => Curve::Lm,
        (Schema::IsLm, _) => Curve::Is,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonetaryStance {
    Expansionary,
    Contractionary,
    Neutral,
}

/// Stance implied by a move of the policy rate.
pub fn monetary_stance(rate_change: f64) -> MonetaryStance {
    if rate_change < 0.0 {
        MonetaryStance::Expansionary
    } else if rate_change > 0.0 {
        MonetaryStance::Contractionary
    } else {
        MonetaryStance::Neutral
    }
}

/// `after - before`, or `None` when either side is unbounded.
fn finite_change(before: f64, after: f64) -> Option<f64> {
    if before.is_finite() && after.is_finite() {
        Some(after - before)
    } else {
        None
    }
}

/// Before/after bundle shared by settlements and policy experiments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub changed_field: Option<FieldId>,
    pub baseline: Equilibrium,
    pub current: Equilibrium,
    pub output_change: Option<f64>,
    pub consumption_change: Option<f64>,
    pub investment_change: Option<f64>,
}

pub fn compare(baseline: &ParameterSet, current: &ParameterSet) -> ModelResult<Comparison> {
    let changed_field = diff(baseline, current)?;
    let before = solve(baseline);
    let after = solve(current);
    Ok(Comparison {
        changed_field,
        baseline: before,
        current: after,
        output_change: finite_change(before.output, after.output),
        consumption_change: finite_change(before.consumption, after.consumption),
        investment_change: finite_change(before.investment, after.investment),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyEffect {
    pub field: FieldId,
    pub shock: f64,
    pub comparison: Comparison,
    /// `ΔY / Δfield`; `None` for a zero shock or an unbounded side.
    pub effective_multiplier: Option<f64>,
}

/// Solves before and after shifting `field` by `shock`.
pub fn policy_effect(params: &ParameterSet, field: FieldId, shock: f64) -> ModelResult<PolicyEffect> {
    let shocked = params.with_value(field, params.value(field)? + shock)?;
    let comparison = compare(params, &shocked)?;
    let effective_multiplier = match comparison.output_change {
        Some(change) if shock != 0.0 => Some(change / shock),
        _ => None,
    };
    Ok(PolicyEffect {
        field,
        shock,
        comparison,
        effective_multiplier,
    })
}

/// Simultaneous fiscal and monetary move on an IS-LM set.
pub fn policy_mix(params: &ParameterSet, government_change: f64, rate_change: f64) -> ModelResult<Comparison> {
    if params.schema() != Schema::IsLm {
        return Err(ModelError::FieldNotInSchema {
            field: FieldId::PolicyRate,
            schema: params.schema(),
        });
    }
    let shifted = params
        .with_value(
            FieldId::Government,
            params.value(FieldId::Government)? + government_change,
        )?
        .with_value(
            FieldId::PolicyRate,
            params.value(FieldId::PolicyRate)? + rate_change,
        )?;
    let before = solve(params);
    let after = solve(&shifted);
    Ok(Comparison {
        // two fields move at once; report the one that leads attribution
        changed_field: diff(params, &shifted)?,
        baseline: before,
        current: after,
        output_change: finite_change(before.output, after.output),
        consumption_change: finite_change(before.consumption, after.consumption),
        investment_change: finite_change(before.investment, after.investment),
    })
}

fn clamp_to_slider(schema: Schema, field: FieldId, value: f64) -> f64 {
    match bounds_for(schema, field) {
        Some(bounds) => bounds.clamp(value),
        None => value,
    }
}

/// Upper limit for `T` carried over from `t·Y`, shared by both schemas.
pub const MAX_CARRIED_TAXES: f64 = 500.0;

/// Carries an approximately equivalent value into the field that `toggled`
/// activates, based on the equilibrium of `before`.
///
/// This is a heuristic: the resulting equilibrium is close to, but not
/// generally equal to, the pre-toggle one.
pub fn synchronize_toggle(before: &ParameterSet, toggled: ParameterSet) -> ModelResult<ParameterSet> {
    before.ensure_same_schema(&toggled)?;
    let schema = before.schema();
    let output = solve(before).output;
    let mut next = toggled;

    match (before.tax_regime(), toggled.tax_regime()) {
        (TaxRegime::LumpSum, TaxRegime::Proportional) => {
            let rate = if output.is_finite() && output > 0.0 {
                clamp_to_slider(schema, FieldId::TaxRate, before.value(FieldId::Taxes)? / output)
            } else {
                0.25
            };
            next = next.with_value(FieldId::TaxRate, rate)?;
        }
        (TaxRegime::Proportional, TaxRegime::LumpSum) => {
            let taxes = scaled(before.value(FieldId::TaxRate)?, output);
            next = next.with_value(FieldId::Taxes, taxes.clamp(0.0, MAX_CARRIED_TAXES))?;
        }
        _ => {}
    }

    if let (Some(InvestmentRegime::Endogenous), Some(InvestmentRegime::Exogenous)) =
        (before.investment_regime(), toggled.investment_regime())
    {
        let level = before.model().investment(output);
        next = next.with_value(
            FieldId::Investment,
            clamp_to_slider(schema, FieldId::Investment, level),
        )?;
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{CrossParams, IsLmParams};
    use approx::assert_relative_eq;

    #[test]
    fn multiplier_info_for_proportional_cross() {
        let params = ParameterSet::Cross(CrossParams {
            tax_regime: TaxRegime::Proportional,
            tax_rate: 0.25,
            ..CrossParams::default()
        });
        let info = multiplier_info(&params);
        assert_relative_eq!(info.effective_mpc, 0.6, max_relative = 1e-12);
        assert_relative_eq!(info.tax_leakage, 0.2, max_relative = 1e-12);
        assert_relative_eq!(info.multiplier, 2.5, max_relative = 1e-9);
        assert_eq!(info.is_slope, None);
    }

    #[test]
    fn multiplier_info_for_islm_reports_is_slope() {
        let info = multiplier_info(&ParameterSet::defaults(Schema::IsLm));
        assert_relative_eq!(info.multiplier, 1.0 / 0.3, max_relative = 1e-9);
        assert_relative_eq!(
            info.is_slope.expect("IS-LM slope"),
            -0.3 / 40.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn government_shock_multiplier_matches_closed_form() {
        let effect = policy_effect(
            &ParameterSet::defaults(Schema::KeynesianCross),
            FieldId::Government,
            10.0,
        )
        .expect("G shock");
        assert_eq!(effect.comparison.changed_field, Some(FieldId::Government));
        assert_relative_eq!(
            effect.effective_multiplier.expect("finite"),
            5.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn tax_shock_multiplier_is_negative() {
        let effect = policy_effect(&ParameterSet::defaults(Schema::IsLm), FieldId::Taxes, 10.0)
            .expect("T shock");
        // -c1 / (1 - c1 - d1)
        assert_relative_eq!(
            effect.effective_multiplier.expect("finite"),
            -2.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn zero_shock_has_no_multiplier() {
        let effect = policy_effect(&ParameterSet::defaults(Schema::IsLm), FieldId::Government, 0.0)
            .expect("zero shock");
        assert_eq!(effect.effective_multiplier, None);
        assert_eq!(effect.comparison.changed_field, None);
    }

    #[test]
    fn rate_cut_is_expansionary_and_lifts_output() {
        let mix = policy_mix(&ParameterSet::defaults(Schema::IsLm), 0.0, -1.0).expect("mix");
        assert_eq!(monetary_stance(-1.0), MonetaryStance::Expansionary);
        assert_eq!(mix.changed_field, Some(FieldId::PolicyRate));
        // ΔY = d2 / 0.3
        assert_relative_eq!(
            mix.output_change.expect("finite"),
            40.0 / 0.3,
            max_relative = 1e-9
        );
        assert!(policy_mix(&ParameterSet::defaults(Schema::KeynesianCross), 1.0, 0.0).is_err());
    }

    #[test]
    fn curve_attribution() {
        assert_eq!(affected_curve(Schema::IsLm, FieldId::PolicyRate), Curve::Lm);
        assert_eq!(affected_curve(Schema::IsLm, FieldId::Government), Curve::Is);
        assert_eq!(
            affected_curve(Schema::KeynesianCross, FieldId::Taxes),
            Curve::Demand
        );
        assert_eq!(monetary_stance(0.0), MonetaryStance::Neutral);
        assert_eq!(monetary_stance(0.5), MonetaryStance::Contractionary);
    }

    #[test]
    fn comparison_changes_are_none_when_unbounded() {
        let baseline = ParameterSet::defaults(Schema::KeynesianCross);
        let singular = baseline.with_value(FieldId::C1, 1.0).expect("c1");
        let cmp = compare(&baseline, &singular).expect("same schema");
        assert_eq!(cmp.output_change, None);
        assert_eq!(cmp.investment_change, Some(0.0));
    }

    #[test]
    fn lump_sum_to_proportional_uses_average_rate() {
        let before = ParameterSet::defaults(Schema::KeynesianCross);
        let toggled = before.with_tax_regime(TaxRegime::Proportional);
        let synced = synchronize_toggle(&before, toggled).expect("sync");
        assert_relative_eq!(
            synced.value(FieldId::TaxRate).expect("t"),
            120.0 / 2020.0,
            max_relative = 1e-9
        );

        // T / Y = 50 / 2300, clamped up to the slider minimum
        let light = before.with_value(FieldId::Taxes, 50.0).expect("T");
        let synced = synchronize_toggle(&light, light.with_tax_regime(TaxRegime::Proportional))
            .expect("sync");
        assert_eq!(synced.value(FieldId::TaxRate).expect("t"), 0.05);

        let islm_before = ParameterSet::IsLm(IsLmParams {
            taxes: 150.0,
            ..IsLmParams::default()
        });
        let synced = synchronize_toggle(&islm_before, islm_before.with_tax_regime(TaxRegime::Proportional))
            .expect("sync");
        let y = solve(&islm_before).output;
        assert_relative_eq!(
            synced.value(FieldId::TaxRate).expect("t"),
            150.0 / y,
            max_relative = 1e-12
        );
    }

    #[test]
    fn proportional_to_lump_sum_carries_tax_take() {
        let before = ParameterSet::Cross(CrossParams {
            tax_regime: TaxRegime::Proportional,
            ..CrossParams::default()
        });
        let synced = synchronize_toggle(&before, before.with_tax_regime(TaxRegime::LumpSum))
            .expect("sync");
        // t·Y = 0.2 · 500 / 0.36 ≈ 277.8
        assert_relative_eq!(
            synced.value(FieldId::Taxes).expect("T"),
            0.2 * 500.0 / 0.36,
            max_relative = 1e-9
        );

        let singular = ParameterSet::Cross(CrossParams {
            tax_regime: TaxRegime::Proportional,
            c1: 1.0,
            tax_rate: 0.0,
            ..CrossParams::default()
        });
        let synced = synchronize_toggle(&singular, singular.with_tax_regime(TaxRegime::LumpSum))
            .expect("sync");
        assert_eq!(synced.value(FieldId::Taxes).expect("T"), 0.0);
    }

    #[test]
    fn carried_taxes_are_capped_at_500_for_both_schemas() {
        // IS-LM: t·Y = 0.8 · 680 / 0.78 ≈ 697.4
        let islm = ParameterSet::IsLm(IsLmParams {
            tax_regime: TaxRegime::Proportional,
            tax_rate: 0.8,
            government: 500.0,
            policy_rate: 0.0,
            ..IsLmParams::default()
        });
        let synced =
            synchronize_toggle(&islm, islm.with_tax_regime(TaxRegime::LumpSum)).expect("sync");
        assert_eq!(synced.value(FieldId::Taxes).expect("T"), MAX_CARRIED_TAXES);

        // IS-LM: t·Y = 0.35 · 680 / 0.51 ≈ 466.7, above the 300 slider maximum
        let islm = ParameterSet::IsLm(IsLmParams {
            tax_regime: TaxRegime::Proportional,
            tax_rate: 0.35,
            government: 500.0,
            policy_rate: 0.0,
            ..IsLmParams::default()
        });
        let synced =
            synchronize_toggle(&islm, islm.with_tax_regime(TaxRegime::LumpSum)).expect("sync");
        let y = solve(&islm).output;
        assert!(0.35 * y > 300.0 && 0.35 * y < MAX_CARRIED_TAXES);
        assert_relative_eq!(
            synced.value(FieldId::Taxes).expect("T"),
            0.35 * y,
            max_relative = 1e-12
        );

        // cross: t·Y = 0.5 · 840 / 0.6 = 700
        let cross = ParameterSet::Cross(CrossParams {
            tax_regime: TaxRegime::Proportional,
            tax_rate: 0.5,
            government: 500.0,
            ..CrossParams::default()
        });
        let synced =
            synchronize_toggle(&cross, cross.with_tax_regime(TaxRegime::LumpSum)).expect("sync");
        assert_eq!(synced.value(FieldId::Taxes).expect("T"), MAX_CARRIED_TAXES);
    }

    #[test]
    fn endogenous_to_exogenous_carries_investment_level() {
        let before = ParameterSet::Cross(CrossParams {
            investment_regime: InvestmentRegime::Endogenous,
            ..CrossParams::default()
        });
        let toggled = before
            .with_investment_regime(InvestmentRegime::Exogenous)
            .expect("cross");
        let synced = synchronize_toggle(&before, toggled).expect("sync");
        let eq = solve(&before);
        assert_relative_eq!(
            synced.value(FieldId::Investment).expect("I"),
            eq.investment,
            max_relative = 1e-9
        );
        assert_relative_eq!(solve(&synced).output, eq.output, max_relative = 1e-9);
    }
}
