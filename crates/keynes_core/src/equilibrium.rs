use crate::model::LinearModel;
use crate::params::ParameterSet;
use serde::{Deserialize, Serialize};

/// `|1 - m|` at or below this is treated as the `m == 1` singularity.
pub const SINGULARITY_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    /// Equilibrium output `Y`; `f64::INFINITY` when the model is singular.
    pub output: f64,
    /// Operating interest rate (`ī` for IS-LM, `i` for endogenous investment).
    pub interest_rate: Option<f64>,
    pub consumption: f64,
    pub investment: f64,
    pub autonomous_spending: f64,
    pub marginal_rate: f64,
}

impl Equilibrium {
    pub fn is_unbounded(&self) -> bool {
        self.output == f64::INFINITY
    }

    /// Spending multiplier `1 / (1 - m)`, infinite at the singularity.
    pub fn multiplier(&self) -> f64 {
        multiplier_for(self.marginal_rate)
    }
}

pub(crate) fn multiplier_for(marginal_rate: f64) -> f64 {
    let denominator = 1.0 - marginal_rate;
    if denominator.abs() <= SINGULARITY_TOLERANCE {
        f64::INFINITY
    } else {
        1.0 / denominator
    }
}

/// Solves `Y = A + m·Y` in closed form for the regime combination of `params`.
pub fn solve(params: &ParameterSet) -> Equilibrium {
    solve_model(&params.model())
}

pub fn solve_model<M: LinearModel + ?Sized>(model: &M) -> Equilibrium {
    let marginal_rate = model.marginal_rate();
    let denominator = 1.0 - marginal_rate;
    let output = if denominator.abs() <= SINGULARITY_TOLERANCE {
        f64::INFINITY
    } else {
        model.intercept() / denominator
    };

    Equilibrium {
        output,
        interest_rate: model.interest_rate(),
        consumption: model.consumption(output),
        investment: model.investment(output),
        autonomous_spending: model.autonomous_spending(),
        marginal_rate,
    }
}
