//! Regime combinations as explicit variants.
//!
//! A [`ParameterSet`] stores every field of its schema plus the regime flags.
//! [`ParameterSet::model`] resolves the flags once and returns a variant that
//! carries only the fields that take part in its formulas, so the solver and
//! the curve generator never branch on booleans.

use crate::params::{InvestmentRegime, ParameterSet, TaxRegime};

/// A linear fixed-point model `Y = A + m·Y`.
pub trait LinearModel {
    /// Autonomous spending `A` as shown to the user.
    fn autonomous_spending(&self) -> f64;

    /// Output-independent term of the fixed-point equation.
    ///
    /// Equal to [`LinearModel::autonomous_spending`] unless an interest rate
    /// term enters separately (IS-LM, where it is `A - d2·ī`).
    fn intercept(&self) -> f64 {
        self.autonomous_spending()
    }

    /// Marginal spending rate `m`.
    fn marginal_rate(&self) -> f64;

    /// Interest rate the model operates at, when it has one.
    fn interest_rate(&self) -> Option<f64>;

    fn consumption(&self, output: f64) -> f64;

    fn investment(&self, output: f64) -> f64;

    /// The plotted relation at `x`: demand `Z(Y)` for the cross, the IS
    /// interest rate `i(Y)` for IS-LM.
    fn curve_value(&self, x: f64) -> f64;

    /// The line the curve is intersected with: the 45-degree line for the
    /// cross, the horizontal LM for IS-LM.
    fn reference_value(&self, x: f64) -> f64;
}

/// `coef · value`, treating `0 · ∞` as zero so unbounded output never
/// produces NaN components.
pub(crate) fn scaled(coef: f64, value: f64) -> f64 {
    if coef == 0.0 {
        0.0
    } else {
        coef * value
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossModel {
    LumpSumExogenous {
        c0: f64,
        c1: f64,
        investment: f64,
        government: f64,
        taxes: f64,
    },
    LumpSumEndogenous {
        c0: f64,
        c1: f64,
        government: f64,
        taxes: f64,
        b0: f64,
        b1: f64,
        b2: f64,
        interest_rate: f64,
    },
    ProportionalExogenous {
        c0: f64,
        c1: f64,
        investment: f64,
        government: f64,
        tax_rate: f64,
    },
    ProportionalEndogenous {
        c0: f64,
        c1: f64,
        government: f64,
        tax_rate: f64,
        b0: f64,
        b1: f64,
        b2: f64,
        interest_rate: f64,
    },
}

impl LinearModel for CrossModel {
    fn autonomous_spending(&self) -> f64 {
        match *self {
            CrossModel::LumpSumExogenous {
                c0,
                c1,
                investment,
                government,
                taxes,
            } => c0 + investment + government - c1 * taxes,
            CrossModel::LumpSumEndogenous {
                c0,
                c1,
                government,
                taxes,
                b0,
                b2,
                interest_rate,
                ..
            } => c0 + government - c1 * taxes + b0 - b2 * interest_rate,
            CrossModel::ProportionalExogenous {
                c0,
                investment,
                government,
                ..
            } => c0 + investment + government,
            CrossModel::ProportionalEndogenous {
                c0,
                government,
                b0,
                b2,
                interest_rate,
                ..
            } => c0 + government + b0 - b2 * interest_rate,
        }
    }

    fn marginal_rate(&self) -> f64 {
        match *self {
            CrossModel::LumpSumExogenous { c1, .. } => c1,
            CrossModel::LumpSumEndogenous { c1, b1, .. } => c1 + b1,
            CrossModel::ProportionalExogenous { c1, tax_rate, .. } => c1 * (1.0 - tax_rate),
            CrossModel::ProportionalEndogenous {
                c1, tax_rate, b1, ..
            } => c1 * (1.0 - tax_rate) + b1,
        }
    }

    fn interest_rate(&self) -> Option<f64> {
        match *self {
            CrossModel::LumpSumExogenous { .. } | CrossModel::ProportionalExogenous { .. } => None,
            CrossModel::LumpSumEndogenous { interest_rate, .. }
            | CrossModel::ProportionalEndogenous { interest_rate, .. } => Some(interest_rate),
        }
    }

    fn consumption(&self, output: f64) -> f64 {
        match *self {
            CrossModel::LumpSumExogenous { c0, c1, taxes, .. }
            | CrossModel::LumpSumEndogenous { c0, c1, taxes, .. } => {
                c0 + scaled(c1, output - taxes)
            }
            CrossModel::ProportionalExogenous {
                c0, c1, tax_rate, ..
            }
            | CrossModel::ProportionalEndogenous {
                c0, c1, tax_rate, ..
            } => c0 + scaled(c1 * (1.0 - tax_rate), output),
        }
    }

    fn investment(&self, output: f64) -> f64 {
        match *self {
            CrossModel::LumpSumExogenous { investment, .. }
            | CrossModel::ProportionalExogenous { investment, .. } => investment,
            CrossModel::LumpSumEndogenous {
                b0,
                b1,
                b2,
                interest_rate,
                ..
            }
            | CrossModel::ProportionalEndogenous {
                b0,
                b1,
                b2,
                interest_rate,
                ..
            } => b0 + scaled(b1, output) - b2 * interest_rate,
        }
    }

    fn curve_value(&self, x: f64) -> f64 {
        self.autonomous_spending() + scaled(self.marginal_rate(), x)
    }

    fn reference_value(&self, x: f64) -> f64 {
        x
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IsLmModel {
    LumpSum {
        c0: f64,
        c1: f64,
        i0: f64,
        d1: f64,
        d2: f64,
        government: f64,
        taxes: f64,
        policy_rate: f64,
    },
    Proportional {
        c0: f64,
        c1: f64,
        i0: f64,
        d1: f64,
        d2: f64,
        government: f64,
        tax_rate: f64,
        policy_rate: f64,
    },
}

impl IsLmModel {
    fn d2(&self) -> f64 {
        match *self {
            IsLmModel::LumpSum { d2, .. } | IsLmModel::Proportional { d2, .. } => d2,
        }
    }

    fn policy_rate(&self) -> f64 {
        match *self {
            IsLmModel::LumpSum { policy_rate, .. } | IsLmModel::Proportional { policy_rate, .. } => {
                policy_rate
            }
        }
    }

    /// Slope `di/dY` of the IS curve: `-(1 - m) / d2`.
    pub fn is_slope(&self) -> f64 {
        -(1.0 - self.marginal_rate()) / self.d2()
    }

    /// Output read off the IS relation at an arbitrary interest rate.
    pub fn is_output(&self, interest_rate: f64) -> f64 {
        let denominator = 1.0 - self.marginal_rate();
        (self.autonomous_spending() - self.d2() * interest_rate) / denominator
    }
}

impl LinearModel for IsLmModel {
    fn autonomous_spending(&self) -> f64 {
        match *self {
            IsLmModel::LumpSum {
                c0,
                c1,
                i0,
                government,
                taxes,
                ..
            } => c0 + i0 + government - c1 * taxes,
            IsLmModel::Proportional {
                c0, i0, government, ..
            } => c0 + i0 + government,
        }
    }

    fn intercept(&self) -> f64 {
        self.autonomous_spending() - self.d2() * self.policy_rate()
    }

    fn marginal_rate(&self) -> f64 {
        match *self {
            IsLmModel::LumpSum { c1, d1, .. } => c1 + d1,
            IsLmModel::Proportional {
                c1, d1, tax_rate, ..
            } => c1 * (1.0 - tax_rate) + d1,
        }
    }

    fn interest_rate(&self) -> Option<f64> {
        Some(self.policy_rate())
    }

    fn consumption(&self, output: f64) -> f64 {
        match *self {
            IsLmModel::LumpSum { c0, c1, taxes, .. } => c0 + scaled(c1, output - taxes),
            IsLmModel::Proportional {
                c0, c1, tax_rate, ..
            } => c0 + scaled(c1 * (1.0 - tax_rate), output),
        }
    }

    fn investment(&self, output: f64) -> f64 {
        match *self {
            IsLmModel::LumpSum {
                i0,
                d1,
                d2,
                policy_rate,
                ..
            }
            | IsLmModel::Proportional {
                i0,
                d1,
                d2,
                policy_rate,
                ..
            } => i0 + scaled(d1, output) - d2 * policy_rate,
        }
    }

    fn curve_value(&self, x: f64) -> f64 {
        let denominator = 1.0 - self.marginal_rate();
        (self.autonomous_spending() - x * denominator) / self.d2()
    }

    fn reference_value(&self, _x: f64) -> f64 {
        self.policy_rate()
    }
}

/// The resolved model for one parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Model {
    Cross(CrossModel),
    IsLm(IsLmModel),
}

impl Model {
    fn inner(&self) -> &dyn LinearModel {
        match self {
            Model::Cross(model) => model,
            Model::IsLm(model) => model,
        }
    }
}

impl LinearModel for Model {
    fn autonomous_spending(&self) -> f64 {
        self.inner().autonomous_spending()
    }

    fn intercept(&self) -> f64 {
        self.inner().intercept()
    }

    fn marginal_rate(&self) -> f64 {
        self.inner().marginal_rate()
    }

    fn interest_rate(&self) -> Option<f64> {
        self.inner().interest_rate()
    }

    fn consumption(&self, output: f64) -> f64 {
        self.inner().consumption(output)
    }

    fn investment(&self, output: f64) -> f64 {
        self.inner().investment(output)
    }

    fn curve_value(&self, x: f64) -> f64 {
        self.inner().curve_value(x)
    }

    fn reference_value(&self, x: f64) -> f64 {
        self.inner().reference_value(x)
    }
}

impl ParameterSet {
    /// Resolves the regime flags into the matching model variant.
    pub fn model(&self) -> Model {
        match *self {
            ParameterSet::Cross(p) => {
                let model = match (p.tax_regime, p.investment_regime) {
                    (TaxRegime::LumpSum, InvestmentRegime::Exogenous) => {
                        CrossModel::LumpSumExogenous {
                            c0: p.c0,
                            c1: p.c1,
                            investment: p.investment,
                            government: p.government,
                            taxes: p.taxes,
                        }
                    }
                    (TaxRegime::LumpSum, InvestmentRegime::Endogenous) => {
                        CrossModel::LumpSumEndogenous {
                            c0: p.c0,
                            c1: p.c1,
                            government: p.government,
                            taxes: p.taxes,
                            b0: p.b0,
                            b1: p.b1,
                            b2: p.b2,
                            interest_rate: p.interest_rate,
                        }
                    }
                    (TaxRegime::Proportional, InvestmentRegime::Exogenous) => {
                        CrossModel::ProportionalExogenous {
                            c0: p.c0,
                            c1: p.c1,
                            investment: p.investment,
                            government: p.government,
                            tax_rate: p.tax_rate,
                        }
                    }
                    (TaxRegime::Proportional, InvestmentRegime::Endogenous) => {
                        CrossModel::ProportionalEndogenous {
                            c0: p.c0,
                            c1: p.c1,
                            government: p.government,
                            tax_rate: p.tax_rate,
                            b0: p.b0,
                            b1: p.b1,
                            b2: p.b2,
                            interest_rate: p.interest_rate,
                        }
                    }
                };
                Model::Cross(model)
            }
            ParameterSet::IsLm(p) => {
                let model = match p.tax_regime {
                    TaxRegime::LumpSum => IsLmModel::LumpSum {
                        c0: p.c0,
                        c1: p.c1,
                        i0: p.autonomous_investment,
                        d1: p.d1,
                        d2: p.d2,
                        government: p.government,
                        taxes: p.taxes,
                        policy_rate: p.policy_rate,
                    },
                    TaxRegime::Proportional => IsLmModel::Proportional {
                        c0: p.c0,
                        c1: p.c1,
                        i0: p.autonomous_investment,
                        d1: p.d1,
                        d2: p.d2,
                        government: p.government,
                        tax_rate: p.tax_rate,
                        policy_rate: p.policy_rate,
                    },
                };
                Model::IsLm(model)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{CrossParams, IsLmParams, Schema};
    use approx::assert_relative_eq;

    #[test]
    fn lump_sum_exogenous_terms() {
        let model = ParameterSet::defaults(Schema::KeynesianCross).model();
        assert!(matches!(
            model,
            Model::Cross(CrossModel::LumpSumExogenous { .. })
        ));
        assert_relative_eq!(model.autonomous_spending(), 404.0, max_relative = 1e-12);
        assert_relative_eq!(model.marginal_rate(), 0.8, max_relative = 1e-12);
        assert_eq!(model.interest_rate(), None);
    }

    #[test]
    fn proportional_endogenous_terms() {
        let params = ParameterSet::Cross(CrossParams {
            tax_regime: TaxRegime::Proportional,
            investment_regime: InvestmentRegime::Endogenous,
            ..CrossParams::default()
        });
        let model = params.model();
        // c0 + G + b0 - b2·i = 180 + 160 + 160 - 30
        assert_relative_eq!(model.autonomous_spending(), 470.0, max_relative = 1e-12);
        // c1·(1 - t) + b1 = 0.64 + 0.05
        assert_relative_eq!(model.marginal_rate(), 0.69, max_relative = 1e-12);
        assert_eq!(model.interest_rate(), Some(3.0));
        assert_relative_eq!(model.investment(100.0), 135.0, max_relative = 1e-12);
    }

    #[test]
    fn islm_intercept_subtracts_interest_term() {
        let model = ParameterSet::defaults(Schema::IsLm).model();
        assert_relative_eq!(model.autonomous_spending(), 270.0, max_relative = 1e-12);
        assert_relative_eq!(model.intercept(), 150.0, max_relative = 1e-12);
        assert_relative_eq!(model.marginal_rate(), 0.7, max_relative = 1e-12);
        assert_eq!(model.reference_value(1234.0), 3.0);
    }

    #[test]
    fn is_curve_passes_through_pegged_equilibrium() {
        let params = ParameterSet::IsLm(IsLmParams::default());
        let Model::IsLm(model) = params.model() else {
            panic!("expected IS-LM model");
        };
        assert_relative_eq!(model.is_output(3.0), 500.0, max_relative = 1e-12);
        assert_relative_eq!(model.curve_value(500.0), 3.0, max_relative = 1e-12);
        assert_relative_eq!(model.is_slope(), -0.3 / 40.0, max_relative = 1e-12);
    }

    #[test]
    fn zero_coefficient_never_produces_nan() {
        assert_eq!(scaled(0.0, f64::INFINITY), 0.0);
        assert_eq!(scaled(0.5, f64::INFINITY), f64::INFINITY);
    }
}
