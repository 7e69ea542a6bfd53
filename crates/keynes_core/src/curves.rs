//! Curve sampling for the plot renderer.
//!
//! The generator draws the whole demand (or IS) relation over a range, not
//! just the fixed point. Baseline and current series are sampled over the
//! same x-range so they can be overlaid directly.

use crate::equilibrium::{solve, Equilibrium};
use crate::error::{ModelError, ModelResult};
use crate::model::{LinearModel, Model};
use crate::params::ParameterSet;
use crate::settings::SessionSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveSeries {
    pub points: Vec<CurvePoint>,
}

impl CurveSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&CurvePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&CurvePoint> {
        self.points.last()
    }

    /// Interleaved `[x0, y0, x1, y1, ...]`.
    pub fn to_flat(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }
}

/// Largest sample count a single series may request.
pub const MAX_CURVE_SAMPLES: usize = 100_000;

/// `count` evenly spaced values from `lower` to `upper`, both included.
fn grid(lower: f64, upper: f64, count: usize) -> ModelResult<Vec<f64>> {
    if count < 2 {
        return Err(ModelError::TooFewSamples(count));
    }
    if count > MAX_CURVE_SAMPLES {
        return Err(ModelError::TooManySamples {
            count,
            max: MAX_CURVE_SAMPLES,
        });
    }
    if !lower.is_finite() || !upper.is_finite() || upper <= lower {
        return Err(ModelError::InvalidRange { lower, upper });
    }
    let step = (upper - lower) / (count - 1) as f64;
    let mut xs: Vec<f64> = (0..count).map(|j| lower + j as f64 * step).collect();
    // Pin the endpoint; accumulated rounding must not drop it.
    xs[count - 1] = upper;
    Ok(xs)
}

fn sample_with<F>(model: &Model, lower: f64, upper: f64, count: usize, eval: F) -> ModelResult<CurveSeries>
where
    F: Fn(&Model, f64) -> f64,
{
    let points = grid(lower, upper, count)?
        .into_iter()
        .map(|x| CurvePoint {
            x,
            y: eval(model, x),
        })
        .collect();
    Ok(CurveSeries { points })
}

/// Samples the regime-appropriate demand (cross) or IS (IS-LM) relation.
pub fn sample(params: &ParameterSet, lower: f64, upper: f64, count: usize) -> ModelResult<CurveSeries> {
    sample_with(&params.model(), lower, upper, count, |m, x| m.curve_value(x))
}

/// Samples the reference line: 45 degrees for the cross, the LM at `ī`.
pub fn sample_reference(
    params: &ParameterSet,
    lower: f64,
    upper: f64,
    count: usize,
) -> ModelResult<CurveSeries> {
    sample_with(&params.model(), lower, upper, count, |m, x| m.reference_value(x))
}

/// `headroom · max(Y, Y_baseline or 0)`, falling back to `max_chart_output`
/// when that is not a usable positive number.
pub fn chart_upper_bound(
    current: &Equilibrium,
    baseline: Option<&Equilibrium>,
    headroom: f64,
    max_chart_output: f64,
) -> f64 {
    let peak = current
        .output
        .max(baseline.map_or(0.0, |eq| eq.output));
    let bound = peak * headroom;
    if bound.is_finite() && bound > 0.0 {
        bound
    } else {
        max_chart_output
    }
}

/// Everything the plot renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub curve: CurveSeries,
    pub reference: CurveSeries,
    pub equilibrium: Equilibrium,
    pub baseline_curve: Option<CurveSeries>,
    pub baseline_reference: Option<CurveSeries>,
    pub baseline_equilibrium: Option<Equilibrium>,
}

pub fn chart_frame(
    current: &ParameterSet,
    baseline: Option<&ParameterSet>,
    settings: &SessionSettings,
) -> ModelResult<ChartFrame> {
    if let Some(base) = baseline {
        base.ensure_same_schema(current)?;
    }
    let equilibrium = solve(current);
    let baseline_equilibrium = baseline.map(solve);
    let upper_bound = chart_upper_bound(
        &equilibrium,
        baseline_equilibrium.as_ref(),
        settings.headroom,
        settings.max_chart_output,
    );
    let lower_bound = 0.0;
    let count = settings.curve_samples;

    let (baseline_curve, baseline_reference) = match baseline {
        Some(base) => (
            Some(sample(base, lower_bound, upper_bound, count)?),
            Some(sample_reference(base, lower_bound, upper_bound, count)?),
        ),
        None => (None, None),
    };

    Ok(ChartFrame {
        lower_bound,
        upper_bound,
        curve: sample(current, lower_bound, upper_bound, count)?,
        reference: sample_reference(current, lower_bound, upper_bound, count)?,
        equilibrium,
        baseline_curve,
        baseline_reference,
        baseline_equilibrium,
    })
}
