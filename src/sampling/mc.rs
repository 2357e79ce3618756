//! Metropolis step loop over the ring move set.

use rand::Rng;
use tracing::{debug, info};

use crate::biases::Biases;
use crate::connectivity::check_consistency;
use crate::energy::total_energy;
use crate::error::{Error, Result};
use crate::io::{OpsWriter, VtfWriter};
use crate::lattice::Lattice;
use crate::moves::{radius_move, recenter, translation_move};
use crate::params::RunParams;
use crate::system::System;

/// Per-move-type attempt and acceptance accounting for one MC block.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    pub translation_attempts: u64,
    pub translation_accepts: u64,
    pub radius_attempts: u64,
    pub radius_accepts: u64,
}

impl RunStats {
    pub fn translation_rate(&self) -> f64 {
        if self.translation_attempts == 0 {
            0.0
        } else {
            self.translation_accepts as f64 / self.translation_attempts as f64
        }
    }

    pub fn radius_rate(&self) -> f64 {
        if self.radius_attempts == 0 {
            0.0
        } else {
            self.radius_accepts as f64 / self.radius_attempts as f64
        }
    }
}

/// Run one MC block: recenter, then `steps` move attempts with bias
/// counting, emitting order parameters and a trajectory frame every
/// `write_interval` steps.
pub fn run<R: Rng>(
    system: &mut System,
    lattice: &mut Lattice,
    params: &RunParams,
    biases: &mut Biases,
    ops: &mut OpsWriter,
    vtf: &mut VtfWriter,
    rng: &mut R,
) -> Result<RunStats> {
    recenter(system, lattice);
    let mut stats = RunStats::default();

    for step in 1..=params.steps {
        if rng.gen::<f64>() < params.radius_move_freq {
            stats.radius_attempts += 1;
            if radius_move(system, lattice, biases, rng) {
                stats.radius_accepts += 1;
            }
        } else {
            stats.translation_attempts += 1;
            if translation_move(system, lattice, rng) {
                stats.translation_accepts += 1;
            }
        }
        biases.update_counts(lattice.height());

        if step % params.write_interval == 0 {
            if !check_consistency(system, lattice)? {
                return Err(Error::Inconsistency(format!(
                    "disconnected configuration at step {step}"
                )));
            }
            system.energy = total_energy(system, lattice);
            ops.write_step(step, system.energy, lattice.height(), lattice.radius())?;
            vtf.write_frame(system)?;
            debug!(
                step,
                energy = system.energy,
                height = lattice.height(),
                "recorded frame"
            );
        }
    }

    info!(
        translation = stats.translation_rate(),
        radius = stats.radius_rate(),
        "block acceptance rates"
    );
    Ok(stats)
}
