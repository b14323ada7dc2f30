//! Core model and analysis for snow micropenetrometer (SMP) profiles.
//!
//! The sidebar module is a toolkit-free view-model: it projects a bound
//! profile into rows and turns user edits into commands for the owning
//! controller, which stays the only writer of the profile.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod profile;
pub mod sidebar;
pub mod telemetry;

pub use prelude::{ProcessingStage, StageInput, StageOutput};
