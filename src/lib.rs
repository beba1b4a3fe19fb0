pub mod calculator;
pub mod classifier;
pub mod combination;
pub mod config;
pub mod cooccurrence;
pub mod engine;
pub mod errors;
pub mod io;
pub mod profiler;
pub mod sample;
pub mod selector;

pub use config::FaldiscoConfig;
pub use engine::{EngineOutput, TableLabels};
pub use errors::FaldiscoError;
pub use sample::Sample;

/// Runs the full pipeline over an already-loaded sample, mirroring the
/// shape of the teacher's `create_matrix_from_pairs` top-level entry point:
/// one call that wires together every stage and hands back the finished
/// output.
pub fn find_field_alignment(sample: &Sample, labels: &TableLabels, cfg: &FaldiscoConfig) -> EngineOutput {
    engine::run(sample, labels, cfg)
}
