//! Energy terms: filament bending, crosslinker overlap, and umbrella bias.
//!
//! All energies are in Joules; acceptance probabilities divide by kB T.

use nalgebra::Vector2;

use crate::biases::Biases;
use crate::lattice::Lattice;
use crate::params::SystemParams;
use crate::system::{Filament, System};

/// Boltzmann constant (J/K).
pub const KB: f64 = 1.380649e-23;

/// Bending energy of one filament at ring radius `radius`.
pub fn bending_energy(params: &SystemParams, radius: f64) -> f64 {
    params.ei * params.filament_length / (2.0 * radius * radius)
}

/// Overlap energy of a filament with total overlap length `length`.
///
/// Statistical free energy of crosslinkers populating an overlap of
/// `length / delta` sites, from the two-site binding model.
pub fn overlap_energy(params: &SystemParams, length: f64) -> f64 {
    let occupancy_factor =
        params.ks * params.ks * params.xc / (params.kd * (params.ks + params.xc).powi(2));
    -(length * KB * params.temp / params.delta) * (1.0 + occupancy_factor).ln()
}

/// Total overlap length of a filament in the active view: delta times the
/// number of occupied x-adjacent sites over all of its sites, counted
/// without de-duplication.
pub fn overlap_length(params: &SystemParams, lattice: &Lattice, filament: &Filament) -> f64 {
    let mut neighbors = 0u32;
    for &pos in filament.coors() {
        for dx in [-1, 1] {
            if lattice.occupant(pos + Vector2::new(dx, 0)).is_some() {
                neighbors += 1;
            }
        }
    }
    params.delta * f64::from(neighbors)
}

/// Overlap plus bending energy of a single filament in the active view.
pub fn filament_energy(params: &SystemParams, lattice: &Lattice, filament: &Filament) -> f64 {
    let length = overlap_length(params, lattice, filament);
    overlap_energy(params, length) + bending_energy(params, lattice.radius())
}

/// Total system energy in the active view, without the bias term. Each
/// overlap pair is seen from both filaments, hence the factor 1/2.
pub fn total_energy(system: &System, lattice: &Lattice) -> f64 {
    let params = &system.params;
    let mut overlap = 0.0;
    for filament in &system.filaments {
        let length = overlap_length(params, lattice, filament);
        overlap += overlap_energy(params, length);
    }
    let bending = system.filaments.len() as f64 * bending_energy(params, lattice.radius());
    overlap / 2.0 + bending
}

/// Total system energy in the active view, including the bias at the
/// active height.
pub fn total_energy_biased(system: &System, lattice: &Lattice, biases: &Biases) -> f64 {
    total_energy(system, lattice) + biases.bias_energy(lattice.height())
}

/// Energy change of a translation move: only the moved filament's terms
/// differ, evaluated under the current then the trial view. Leaves the
/// trial view active.
pub fn translation_delta(system: &mut System, lattice: &mut Lattice, index: usize) -> f64 {
    system.use_current(lattice);
    let before = filament_energy(&system.params, lattice, &system.filaments[index]);
    system.use_trial(lattice);
    let after = filament_energy(&system.params, lattice, &system.filaments[index]);
    after - before
}

/// Energy change of a radius move: full biased totals under the current
/// then the trial view. Leaves the trial view active.
pub fn radius_delta(system: &mut System, lattice: &mut Lattice, biases: &Biases) -> f64 {
    system.use_current(lattice);
    let before = total_energy_biased(system, lattice, biases);
    system.use_trial(lattice);
    let after = total_energy_biased(system, lattice, biases);
    after - before
}
