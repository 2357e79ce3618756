//! Deterministic uniform-overlap starting configuration.
//!
//! Filaments are laid down in vertical stripes walking outward in x. Even
//! columns start at y = 0 and odd columns at y = lf - overlap, so adjacent
//! columns overlap by `overlap` sites at both ends; successive filaments
//! within a column advance by 2 (lf - overlap), leaving a gap of
//! lf - 2*overlap sites. Half the scaffolds land in each of the first two
//! columns and close the ring exactly once around the lattice.

use crate::error::{Error, Result};
use crate::lattice::{Lattice, Pos};
use crate::params::SystemParams;
use crate::system::{Filament, System};

/// Build the initial filaments at the lattice's current height with the
/// given overlap, assign indices in placement order, and populate the
/// occupancies.
pub fn generate_uniform_config(
    params: &SystemParams,
    lattice: &mut Lattice,
    overlap: usize,
) -> Result<System> {
    if params.n_scaffolds < 2 || params.n_scaffolds % 2 != 0 {
        return Err(Error::Domain(format!(
            "uniform startup needs an even scaffold count of at least 2, got {}",
            params.n_scaffolds
        )));
    }
    if params.lf % 2 != 0 {
        return Err(Error::Domain(format!(
            "uniform startup needs an even filament length, got {}",
            params.lf
        )));
    }
    if params.n_filaments < params.n_scaffolds {
        return Err(Error::Domain(format!(
            "{} filaments cannot include {} scaffolds",
            params.n_filaments, params.n_scaffolds
        )));
    }
    if overlap > params.lf / 2 {
        return Err(Error::Domain(format!(
            "overlap {overlap} exceeds half the filament length {}",
            params.lf
        )));
    }
    let period = lattice.height() + 1;
    if params.n_scaffolds * (params.lf - overlap) != period as usize {
        return Err(Error::Domain(format!(
            "scaffolds with overlap {overlap} span {} sites but the lattice period is {period}",
            params.n_scaffolds * (params.lf - overlap)
        )));
    }

    let per_column = params.n_scaffolds / 2;
    let stride = 2 * (params.lf - overlap) as i32;
    let lf = params.lf as i32;

    let mut filaments = Vec::with_capacity(params.n_filaments);
    let mut x = 0;
    'place: loop {
        let column_start = if x % 2 == 0 {
            0
        } else {
            (params.lf - overlap) as i32
        };
        for slot in 0..per_column {
            if filaments.len() == params.n_filaments {
                break 'place;
            }
            let y0 = column_start + slot as i32 * stride;
            let coors = (0..lf)
                .map(|site| Pos::new(x, (y0 + site).rem_euclid(period)))
                .collect();
            filaments.push(Filament::new(filaments.len(), coors));
        }
        x += 1;
    }

    let system = System::new(params.clone(), filaments);
    system.update_occupancies(lattice);
    Ok(system)
}

/// Startup at the minimum height with half-length overlaps.
pub fn initialize_system(params: &SystemParams, lattice: &mut Lattice) -> Result<System> {
    generate_uniform_config(params, lattice, params.lf / 2)
}
