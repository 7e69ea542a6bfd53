/// The `keynes_core` crate is the equilibrium engine behind the Keynesian cross
/// and IS-LM (pegged rate) explorers.
///
/// Key components:
/// - **Parameters**: `ParameterSet` snapshots and the regime variants they resolve to (`model`).
/// - **Solver**: closed-form equilibria, with an unbounded sentinel at the singularity.
/// - **Curves**: sampled demand/IS and reference series plus full chart frames.
/// - **Delta**: attribution of a change to a single field or regime flag.
/// - **Session**: the change-session coalescer that turns edit bursts into one settlement.
pub mod analysis;
pub mod bounds;
pub mod curves;
pub mod delta;
pub mod equilibrium;
pub mod error;
pub mod model;
pub mod narrative;
pub mod params;
pub mod session;
pub mod settings;

pub use error::{ModelError, ModelResult};
pub use params::{FieldId, InvestmentRegime, ParameterSet, Schema, TaxRegime};
