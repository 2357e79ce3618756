//! The Monte Carlo move set.
//!
//! Moves propose in the trial view, then either promote it into current
//! (accept) or overwrite it from current (revert). Geometric failures
//! (collisions, broken connectivity, out-of-range heights) are ordinary
//! rejections, not errors.

use nalgebra::Vector2;
use rand::Rng;

use crate::biases::Biases;
use crate::connectivity::ring_and_system_connected;
use crate::energy::{self, KB};
use crate::lattice::{Lattice, Pos, SiteId};
use crate::system::System;

/// Metropolis criterion: accept with probability min(1, mult e^{-dE/kBT}).
pub fn metropolis<R: Rng>(rng: &mut R, delta: f64, temp: f64, mult: f64) -> bool {
    let p = mult * (-delta / (KB * temp)).exp();
    p >= 1.0 || p > rng.gen::<f64>()
}

fn revert_filament(system: &mut System, lattice: &mut Lattice, index: usize) {
    system.accept_current_filament(index, lattice);
    system.use_current(lattice);
}

fn revert_all(system: &mut System, lattice: &mut Lattice) {
    system.accept_current_all(lattice);
    system.use_current(lattice);
}

/// Translate one random non-reference filament by one site along the
/// periodic axis. Returns whether the move was accepted.
pub fn translation_move<R: Rng>(
    system: &mut System,
    lattice: &mut Lattice,
    rng: &mut R,
) -> bool {
    let index = rng.gen_range(1..system.filaments.len());
    let dy: i32 = if rng.gen::<bool>() { 1 } else { -1 };

    system.use_trial(lattice);
    let old_coors = system.filaments[index].coors().to_vec();
    for &pos in &old_coors {
        lattice.remove(pos);
    }
    let mut new_coors = Vec::with_capacity(old_coors.len());
    for (site, &pos) in old_coors.iter().enumerate() {
        let dest = lattice.wrap(pos + Vector2::new(0, dy));
        if !lattice.insert(dest, SiteId { filament: index, site }) {
            revert_filament(system, lattice, index);
            return false;
        }
        new_coors.push(dest);
    }
    *system.filaments[index].coors_mut() = new_coors;

    if !ring_and_system_connected(system, lattice) {
        revert_filament(system, lattice, index);
        return false;
    }

    let delta = energy::translation_delta(system, lattice, index);
    if metropolis(rng, delta, system.params.temp, 1.0) {
        system.accept_trial_filament(index, lattice);
        system.use_current(lattice);
        true
    } else {
        revert_filament(system, lattice, index);
        false
    }
}

/// Split point of a filament at height `height`: the number of leading
/// sites up to and including the last site before the wrap seam (y ==
/// height), or 0 if the filament does not wrap there.
fn split_point(coors: &[Pos], height: i32) -> usize {
    let mut split = 0;
    for (site, pos) in coors.iter().take(coors.len() - 1).enumerate() {
        if pos.y == height {
            split = site + 1;
        }
    }
    split
}

/// Every filament's consecutive sites step by (0, 1) modulo the period.
fn filaments_contiguous(system: &System, lattice: &Lattice) -> bool {
    let period = lattice.height() + 1;
    system.filaments.iter().all(|filament| {
        filament.coors().windows(2).all(|pair| {
            pair[1].x == pair[0].x && (pair[1].y - pair[0].y).rem_euclid(period) == 1
        })
    })
}

/// Grow or shrink the ring circumference by one lattice site. Each
/// filament's prefix through its split point shifts with the seam so the
/// chains stay contiguous across the resized period.
pub fn radius_move<R: Rng>(
    system: &mut System,
    lattice: &mut Lattice,
    biases: &Biases,
    rng: &mut R,
) -> bool {
    let dir: i32 = if rng.gen::<bool>() { 1 } else { -1 };
    let new_height = lattice.current_height() + dir;
    if new_height < lattice.min_height || new_height > lattice.max_height {
        return false;
    }

    system.use_trial(lattice);
    let seam = lattice.height();
    for index in 0..system.filaments.len() {
        let coors = system.filaments[index].coors().to_vec();
        let split = split_point(&coors, seam);
        for &pos in &coors[..split] {
            lattice.remove(pos);
        }
        for (site, &pos) in coors[..split].iter().enumerate() {
            let dest = pos + Vector2::new(0, dir);
            if !lattice.insert(dest, SiteId { filament: index, site }) {
                revert_all(system, lattice);
                return false;
            }
            system.filaments[index].coors_mut()[site] = dest;
        }
    }
    lattice.update_radius(new_height);

    if !filaments_contiguous(system, lattice) {
        revert_all(system, lattice);
        return false;
    }
    // A growing ring can stretch the scaffolds apart.
    if dir == 1 && !ring_and_system_connected(system, lattice) {
        revert_all(system, lattice);
        return false;
    }

    let delta = energy::radius_delta(system, lattice, biases);
    if metropolis(rng, delta, system.params.temp, 1.0) {
        system.accept_trial_all(lattice);
        system.use_current(lattice);
        true
    } else {
        revert_all(system, lattice);
        false
    }
}

/// Translate all filaments uniformly so filament 0 site 0 sits at y = 0,
/// then rebuild the occupancies. Run once before sampling.
pub fn recenter(system: &mut System, lattice: &mut Lattice) {
    let dy = -system.filaments[0].current_coors()[0].y;
    if dy != 0 {
        for filament in &mut system.filaments {
            filament.use_current();
            for pos in filament.coors_mut() {
                *pos = lattice.wrap(*pos + Vector2::new(0, dy));
            }
            filament.accept_current();
        }
    }
    system.update_occupancies(lattice);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::total_energy;
    use crate::lattice::Pos;
    use crate::params::SystemParams;
    use crate::system::Filament;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(n_filaments: usize, n_scaffolds: usize, lf: usize) -> SystemParams {
        SystemParams {
            ks: 1e-6,
            kd: 1e-6,
            temp: 300.0,
            delta: 5.4e-9,
            xc: 1e-6,
            ei: 6.9e-26,
            filament_length: lf as f64 * 5.4e-9,
            lf,
            n_filaments,
            n_scaffolds,
        }
    }

    fn column(index: usize, x: i32, ys: &[i32]) -> Filament {
        Filament::new(index, ys.iter().map(|&y| Pos::new(x, y)).collect())
    }

    fn four_ring() -> (System, Lattice) {
        // Four scaffolds close the ring at the minimum height, two per
        // column. Same-column pairs leave translation collisions and
        // genuine energy deltas reachable.
        let p = params(4, 4, 4);
        let mut lattice = Lattice::new(p.delta, 7, p.min_height(), p.max_height());
        let system = System::new(
            p,
            vec![
                column(0, 0, &[0, 1, 2, 3]),
                column(1, 1, &[2, 3, 4, 5]),
                column(2, 0, &[4, 5, 6, 7]),
                column(3, 1, &[6, 7, 0, 1]),
            ],
        );
        system.update_occupancies(&mut lattice);
        (system, lattice)
    }

    #[test]
    fn metropolis_always_accepts_downhill() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..32 {
            assert!(metropolis(&mut rng, -1e-21, 300.0, 1.0));
            assert!(metropolis(&mut rng, 0.0, 300.0, 1.0));
        }
    }

    #[test]
    fn metropolis_rejects_large_uphill() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..32 {
            assert!(!metropolis(&mut rng, 1e-18, 300.0, 1.0));
        }
    }

    #[test]
    fn split_points_follow_the_seam() {
        assert_eq!(
            split_point(
                &[Pos::new(0, 2), Pos::new(0, 3), Pos::new(0, 0), Pos::new(0, 1)],
                3
            ),
            2
        );
        // No wrap at the seam: nothing moves.
        assert_eq!(
            split_point(
                &[Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2), Pos::new(0, 3)],
                3
            ),
            0
        );
        // A final site at the seam is not a wrap.
        assert_eq!(
            split_point(
                &[Pos::new(0, 4), Pos::new(0, 5), Pos::new(0, 6), Pos::new(0, 7)],
                7
            ),
            0
        );
    }

    #[test]
    fn move_attempts_preserve_view_invariants() {
        let (mut system, mut lattice) = four_ring();
        let mut rng = StdRng::seed_from_u64(7);
        let biases = Biases::new(
            lattice.min_height,
            lattice.max_height,
            1,
            2.0,
            system.params.temp,
        );
        for _ in 0..200 {
            if rng.gen::<f64>() < 0.3 {
                radius_move(&mut system, &mut lattice, &biases, &mut rng);
            } else {
                translation_move(&mut system, &mut lattice, &mut rng);
            }
            assert!(system.views_agree(&lattice));
            assert!(lattice.using_current());
            assert!(filaments_contiguous(&system, &lattice));
            let sites: usize = system.filaments.iter().map(Filament::len).sum();
            assert_eq!(lattice.occupancy().len(), sites);
        }
    }

    #[test]
    fn rejected_move_leaves_energy_unchanged() {
        // Filament 2 shares its column with the reference filament and
        // collides whichever way it translates, so rejections are
        // reachable from any seed. Restart from a fresh system after
        // accepted attempts and compare energies after the first reject.
        let (mut system, mut lattice) = four_ring();
        let before = total_energy(&system, &lattice);
        let mut rng = StdRng::seed_from_u64(3);
        let mut rejected = false;
        for _ in 0..100 {
            if !translation_move(&mut system, &mut lattice, &mut rng) {
                rejected = true;
                break;
            }
            let fresh = four_ring();
            system = fresh.0;
            lattice = fresh.1;
        }
        assert!(rejected);
        assert_relative_eq!(total_energy(&system, &lattice), before, epsilon = 1e-35);
        assert!(system.views_agree(&lattice));
        assert_eq!(lattice.height(), 7);
    }

    #[test]
    fn radius_move_respects_height_bounds() {
        let (mut system, mut lattice) = four_ring();
        let biases = Biases::new(
            lattice.min_height,
            lattice.max_height,
            1,
            2.0,
            system.params.temp,
        );
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            let height_before = lattice.current_height();
            let accepted = radius_move(&mut system, &mut lattice, &biases, &mut rng);
            if accepted {
                assert_eq!((lattice.current_height() - height_before).abs(), 1);
                assert_relative_eq!(
                    lattice.radius(),
                    system.params.delta * (lattice.current_height() + 1) as f64
                        / (2.0 * std::f64::consts::PI),
                    epsilon = 1e-24
                );
            } else {
                assert_eq!(lattice.current_height(), height_before);
            }
            assert!(lattice.current_height() >= lattice.min_height);
            assert!(lattice.current_height() <= lattice.max_height);
            assert!(system.views_agree(&lattice));
        }
    }

    #[test]
    fn recenter_pins_reference_filament_to_origin() {
        let p = params(2, 2, 4);
        let mut lattice = Lattice::new(p.delta, 3, p.min_height(), p.max_height());
        let mut system = System::new(
            p,
            vec![
                column(0, 0, &[2, 3, 0, 1]),
                column(1, 1, &[0, 1, 2, 3]),
            ],
        );
        system.update_occupancies(&mut lattice);
        recenter(&mut system, &mut lattice);
        assert_eq!(system.filaments[0].coors()[0], Pos::new(0, 0));
        // Relative geometry is preserved.
        assert_eq!(system.filaments[1].coors()[0], Pos::new(1, 2));
        assert!(system.views_agree(&lattice));
        assert!(ring_and_system_connected(&system, &lattice));
    }
}
