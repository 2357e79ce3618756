//! IO module - output sinks and restart input for ring sampling runs.

mod input;
mod writers;

pub use input::read_biases;
pub use writers::{write_params, OpsWriter, UsWriter, VtfWriter};
