//! WASM bindings for `keynes_core`: a stateful change session for the slider
//! UI plus stateless solver and sampling helpers.

mod convert;
pub mod equilibrium;
pub mod session;

pub use equilibrium::{
    compare_parameters, default_parameters, field_bounds, multiplier_summary, sample_curve,
    sample_reference_line, simulate_policy, simulate_policy_mix, solve_equilibrium,
};
pub use session::{explanation_request, WasmModelSession};
