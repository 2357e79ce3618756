//! ringmc - Monte Carlo sampling of crosslinker-bound filament rings
//!
//! This crate samples equilibrium configurations of semi-flexible
//! filaments on a cylindrical lattice. Scaffold filaments close a ring
//! whose circumference is the order parameter; Metropolis moves translate
//! filaments and resize the ring, and umbrella sampling flattens the
//! circumference histogram across iterations.

pub mod biases;
pub mod connectivity;
pub mod energy;
pub mod error;
pub mod io;
pub mod lattice;
pub mod moves;
pub mod params;
pub mod sampling;
pub mod startup;
pub mod system;

// Re-export commonly used types at crate root
pub use biases::{analytical_free_energy, Biases};
pub use connectivity::{check_consistency, ring_and_system_connected};
pub use energy::{total_energy, total_energy_biased, KB};
pub use error::{Error, Result};
pub use lattice::{Lattice, Pos, SiteId};
pub use moves::{metropolis, radius_move, recenter, translation_move};
pub use params::{read_config, Config, RunParams, SystemParams};
pub use sampling::{run, run_us, RunStats};
pub use startup::{generate_uniform_config, initialize_system};
pub use system::{Filament, System};
