//! Change attribution between two parameter snapshots.
//!
//! Regime flags are compared first (investment, then tax). With matching
//! regimes, a fixed priority list of the numeric fields that are active in
//! the current regime is scanned and the first difference is reported. When
//! several fields differ only the highest-priority one is returned.

use crate::error::ModelResult;
use crate::params::{FieldId, InvestmentRegime, ParameterSet, TaxRegime};

/// Numeric fields in attribution order for the active regimes of `params`.
pub fn priority_fields(params: &ParameterSet) -> Vec<FieldId> {
    let tax_field = match params.tax_regime() {
        TaxRegime::LumpSum => FieldId::Taxes,
        TaxRegime::Proportional => FieldId::TaxRate,
    };
    match params {
        ParameterSet::Cross(p) => {
            let mut fields = vec![FieldId::C0, FieldId::C1];
            match p.investment_regime {
                InvestmentRegime::Exogenous => fields.push(FieldId::Investment),
                InvestmentRegime::Endogenous => fields.extend([
                    FieldId::B0,
                    FieldId::B1,
                    FieldId::B2,
                    FieldId::InterestRate,
                ]),
            }
            fields.extend([FieldId::Government, tax_field]);
            fields
        }
        ParameterSet::IsLm(_) => vec![
            FieldId::C0,
            FieldId::C1,
            FieldId::AutonomousInvestment,
            FieldId::D1,
            FieldId::D2,
            FieldId::Government,
            FieldId::PolicyRate,
            tax_field,
        ],
    }
}

/// The single field that explains the move from `baseline` to `current`,
/// or `None` when nothing economically meaningful changed.
pub fn diff(baseline: &ParameterSet, current: &ParameterSet) -> ModelResult<Option<FieldId>> {
    baseline.ensure_same_schema(current)?;

    if baseline.investment_regime() != current.investment_regime() {
        return Ok(Some(FieldId::InvestmentRegime));
    }
    if baseline.tax_regime() != current.tax_regime() {
        return Ok(Some(FieldId::TaxRegime));
    }

    for field in priority_fields(current) {
        if baseline.value(field)? != current.value(field)? {
            return Ok(Some(field));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::params::{CrossParams, Schema};
    use proptest::prelude::*;

    #[test]
    fn identical_sets_have_no_delta() {
        for schema in [Schema::KeynesianCross, Schema::IsLm] {
            let params = ParameterSet::defaults(schema);
            assert_eq!(diff(&params, &params), Ok(None));
        }
    }

    #[test]
    fn reports_single_numeric_change() {
        let baseline = ParameterSet::defaults(Schema::IsLm);
        let current = baseline
            .with_value(FieldId::PolicyRate, 4.0)
            .expect("iBar");
        assert_eq!(diff(&baseline, &current), Ok(Some(FieldId::PolicyRate)));
    }

    #[test]
    fn first_field_by_priority_wins() {
        let baseline = ParameterSet::defaults(Schema::KeynesianCross);
        let current = baseline
            .with_value(FieldId::Taxes, 50.0)
            .and_then(|p| p.with_value(FieldId::C1, 0.7))
            .expect("edits");
        assert_eq!(diff(&baseline, &current), Ok(Some(FieldId::C1)));
    }

    #[test]
    fn inactive_fields_are_ignored() {
        let baseline = ParameterSet::defaults(Schema::KeynesianCross);
        // lump-sum regime: t is not part of the model
        let current = baseline.with_value(FieldId::TaxRate, 0.5).expect("t");
        assert_eq!(diff(&baseline, &current), Ok(None));

        // exogenous investment: b-coefficients are inactive
        let current = baseline.with_value(FieldId::B1, 0.2).expect("b1");
        assert_eq!(diff(&baseline, &current), Ok(None));
    }

    #[test]
    fn investment_regime_is_checked_before_tax_regime() {
        let baseline = ParameterSet::defaults(Schema::KeynesianCross);
        let current = baseline
            .with_tax_regime(TaxRegime::Proportional)
            .with_investment_regime(InvestmentRegime::Endogenous)
            .expect("cross supports investment regime");
        assert_eq!(
            diff(&baseline, &current),
            Ok(Some(FieldId::InvestmentRegime))
        );

        let tax_only = baseline.with_tax_regime(TaxRegime::Proportional);
        assert_eq!(diff(&baseline, &tax_only), Ok(Some(FieldId::TaxRegime)));
    }

    #[test]
    fn endogenous_priority_list_covers_investment_function() {
        let params = ParameterSet::Cross(CrossParams {
            investment_regime: InvestmentRegime::Endogenous,
            tax_regime: TaxRegime::Proportional,
            ..CrossParams::default()
        });
        assert_eq!(
            priority_fields(&params),
            vec![
                FieldId::C0,
                FieldId::C1,
                FieldId::B0,
                FieldId::B1,
                FieldId::B2,
                FieldId::InterestRate,
                FieldId::Government,
                FieldId::TaxRate,
            ]
        );
    }

    #[test]
    fn mismatched_schemas_are_misuse() {
        let cross = ParameterSet::defaults(Schema::KeynesianCross);
        let islm = ParameterSet::defaults(Schema::IsLm);
        assert!(matches!(
            diff(&cross, &islm),
            Err(ModelError::SchemaMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn diff_of_self_is_none(c0 in 0.0..500.0f64, g in 0.0..500.0f64, t in 0.05..0.8f64) {
            let params = ParameterSet::defaults(Schema::KeynesianCross)
                .with_value(FieldId::C0, c0)
                .and_then(|p| p.with_value(FieldId::Government, g))
                .and_then(|p| p.with_value(FieldId::TaxRate, t))
                .unwrap()
                .with_tax_regime(TaxRegime::Proportional);
            prop_assert_eq!(diff(&params, &params), Ok(None));
        }
    }
}
