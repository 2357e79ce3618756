//! Filaments and the system that owns them.
//!
//! Each filament carries a current and a trial copy of its site
//! coordinates, mirroring the lattice's shadow occupancies. Moves mutate
//! the trial copy and either promote it (accept) or overwrite it from the
//! current copy (reject); at move boundaries the two copies agree.

use crate::lattice::{Lattice, Pos, SiteId};
use crate::params::SystemParams;

/// A semi-flexible filament occupying `lf` contiguous lattice sites along
/// the periodic axis. Filament 0 is the positional reference and never
/// translates.
#[derive(Debug, Clone)]
pub struct Filament {
    pub index: usize,
    current_coors: Vec<Pos>,
    trial_coors: Vec<Pos>,
    using_current: bool,
}

impl Filament {
    pub fn new(index: usize, coors: Vec<Pos>) -> Self {
        let trial_coors = coors.clone();
        Self {
            index,
            current_coors: coors,
            trial_coors,
            using_current: true,
        }
    }

    /// Number of sites (`lf`); fixed for the filament's lifetime.
    pub fn len(&self) -> usize {
        self.current_coors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_coors.is_empty()
    }

    /// Coordinates of the active view.
    pub fn coors(&self) -> &[Pos] {
        if self.using_current {
            &self.current_coors
        } else {
            &self.trial_coors
        }
    }

    pub fn coors_mut(&mut self) -> &mut Vec<Pos> {
        if self.using_current {
            &mut self.current_coors
        } else {
            &mut self.trial_coors
        }
    }

    pub fn current_coors(&self) -> &[Pos] {
        &self.current_coors
    }

    pub fn trial_coors(&self) -> &[Pos] {
        &self.trial_coors
    }

    pub fn use_current(&mut self) {
        self.using_current = true;
    }

    pub fn use_trial(&mut self) {
        self.using_current = false;
    }

    /// Promote trial coordinates into current.
    pub fn accept_trial(&mut self) {
        self.current_coors.clone_from(&self.trial_coors);
    }

    /// Overwrite trial coordinates with current (revert).
    pub fn accept_current(&mut self) {
        self.trial_coors.clone_from(&self.current_coors);
    }

    pub fn views_agree(&self) -> bool {
        self.current_coors == self.trial_coors
    }
}

/// The full assembly: parameters, filaments, and the last computed total
/// energy (observable only, updated by the driver).
pub struct System {
    pub params: SystemParams,
    pub filaments: Vec<Filament>,
    pub energy: f64,
}

impl System {
    pub fn new(params: SystemParams, filaments: Vec<Filament>) -> Self {
        Self {
            params,
            filaments,
            energy: 0.0,
        }
    }

    /// Switch every filament and the lattice to the current view.
    pub fn use_current(&mut self, lattice: &mut Lattice) {
        for filament in &mut self.filaments {
            filament.use_current();
        }
        lattice.use_current();
    }

    /// Switch every filament and the lattice to the trial view.
    pub fn use_trial(&mut self, lattice: &mut Lattice) {
        for filament in &mut self.filaments {
            filament.use_trial();
        }
        lattice.use_trial();
    }

    /// Promote one filament's trial state plus the whole occupancy.
    pub fn accept_trial_filament(&mut self, index: usize, lattice: &mut Lattice) {
        self.filaments[index].accept_trial();
        lattice.accept_trial();
    }

    /// Revert one filament's trial state plus the whole occupancy.
    pub fn accept_current_filament(&mut self, index: usize, lattice: &mut Lattice) {
        self.filaments[index].accept_current();
        lattice.accept_current();
    }

    /// Promote the trial state of every filament and the lattice.
    pub fn accept_trial_all(&mut self, lattice: &mut Lattice) {
        for filament in &mut self.filaments {
            filament.accept_trial();
        }
        lattice.accept_trial();
    }

    /// Revert the trial state of every filament and the lattice.
    pub fn accept_current_all(&mut self, lattice: &mut Lattice) {
        for filament in &mut self.filaments {
            filament.accept_current();
        }
        lattice.accept_current();
    }

    /// Full rebuild of both occupancy maps from filament coordinates.
    pub fn update_occupancies(&self, lattice: &mut Lattice) {
        let current: Vec<(Pos, SiteId)> = self.site_ids(|f| f.current_coors()).collect();
        let trial: Vec<(Pos, SiteId)> = self.site_ids(|f| f.trial_coors()).collect();
        lattice.rebuild_occupancies(current.into_iter(), trial.into_iter());
    }

    fn site_ids<'a, F>(&'a self, coors: F) -> impl Iterator<Item = (Pos, SiteId)> + 'a
    where
        F: Fn(&'a Filament) -> &'a [Pos] + 'a,
    {
        self.filaments.iter().flat_map(move |filament| {
            coors(filament).iter().enumerate().map(move |(site, &pos)| {
                (
                    pos,
                    SiteId {
                        filament: filament.index,
                        site,
                    },
                )
            })
        })
    }

    /// Move-boundary invariant: every trial view matches its current view.
    pub fn views_agree(&self, lattice: &Lattice) -> bool {
        lattice.views_agree() && self.filaments.iter().all(Filament::views_agree)
    }
}
