//! Randomized mission generation for the DCS World simulator.
//!
//! A [`template::MissionTemplate`] describes the kind of mission wanted, the
//! [`generator`] turns it into a concrete [`mission::Mission`] drawing on the
//! static [`config::Library`], and [`export`] writes the `.miz` archive and
//! the briefing. The member crates are re-exported so front-ends depend on
//! this package only.

pub mod pipeline;

pub use forge_config as config;
pub use forge_core as core;
pub use forge_export as export;
pub use forge_generator as generator;
pub use forge_mission as mission;
pub use forge_template as template;

pub use pipeline::{ForgeError, Job, JobReport, MissionSummary, run};

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
