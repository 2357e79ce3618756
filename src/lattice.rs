//! Cylindrical lattice with a periodic circumferential axis.
//!
//! Positions are integer (x, y) pairs; y wraps with period `height + 1`
//! while x is unbounded. The lattice keeps two occupancy maps (current and
//! trial) and exposes whichever the active view selects, so moves can
//! mutate trial state and promote or discard it wholesale.

use std::collections::HashMap;
use std::f64::consts::PI;

use nalgebra::Vector2;

/// Integer lattice position.
pub type Pos = Vector2<i32>;

/// Back-reference from an occupied site to its filament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteId {
    pub filament: usize,
    pub site: usize,
}

pub struct Lattice {
    pub min_height: i32,
    pub max_height: i32,
    delta: f64,
    current_height: i32,
    trial_height: i32,
    using_current: bool,
    radius: f64,
    current_occupancy: HashMap<Pos, SiteId>,
    trial_occupancy: HashMap<Pos, SiteId>,
}

impl Lattice {
    /// New lattice at `height`, with hard bounds `[min_height, max_height]`.
    pub fn new(delta: f64, height: i32, min_height: i32, max_height: i32) -> Self {
        Self {
            min_height,
            max_height,
            delta,
            current_height: height,
            trial_height: height,
            using_current: true,
            radius: delta * (height + 1) as f64 / (2.0 * PI),
            current_occupancy: HashMap::new(),
            trial_occupancy: HashMap::new(),
        }
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Height of the active view.
    pub fn height(&self) -> i32 {
        if self.using_current {
            self.current_height
        } else {
            self.trial_height
        }
    }

    pub fn current_height(&self) -> i32 {
        self.current_height
    }

    pub fn trial_height(&self) -> i32 {
        self.trial_height
    }

    pub fn using_current(&self) -> bool {
        self.using_current
    }

    /// Ring radius implied by the active height.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Set the active height and recompute the radius.
    pub fn update_radius(&mut self, height: i32) {
        if self.using_current {
            self.current_height = height;
        } else {
            self.trial_height = height;
        }
        self.radius = self.delta * (height + 1) as f64 / (2.0 * PI);
    }

    /// Wrap a position back into `[0, height]` on the periodic axis.
    /// Callers keep displacements within one period, so a single
    /// adjustment suffices.
    pub fn wrap(&self, mut pos: Pos) -> Pos {
        let height = self.height();
        if pos.y > height {
            pos.y -= height + 1;
        } else if pos.y < 0 {
            pos.y += height + 1;
        }
        pos
    }

    pub fn use_current(&mut self) {
        self.using_current = true;
        self.radius = self.delta * (self.current_height + 1) as f64 / (2.0 * PI);
    }

    pub fn use_trial(&mut self) {
        self.using_current = false;
        self.radius = self.delta * (self.trial_height + 1) as f64 / (2.0 * PI);
    }

    /// Promote trial occupancy and height into current.
    pub fn accept_trial(&mut self) {
        self.current_occupancy.clone_from(&self.trial_occupancy);
        self.current_height = self.trial_height;
    }

    /// Overwrite trial occupancy and height with current (revert).
    pub fn accept_current(&mut self) {
        self.trial_occupancy.clone_from(&self.current_occupancy);
        self.trial_height = self.current_height;
    }

    /// Occupant of `pos` in the active view, if any.
    pub fn occupant(&self, pos: Pos) -> Option<SiteId> {
        self.occupancy().get(&pos).copied()
    }

    /// Insert into the active view. Returns false (and leaves the map
    /// unchanged) if the site is already occupied.
    pub fn insert(&mut self, pos: Pos, id: SiteId) -> bool {
        use std::collections::hash_map::Entry;
        match self.occupancy_mut().entry(pos) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(id);
                true
            }
        }
    }

    /// Remove from the active view.
    pub fn remove(&mut self, pos: Pos) -> Option<SiteId> {
        self.occupancy_mut().remove(&pos)
    }

    pub fn occupancy(&self) -> &HashMap<Pos, SiteId> {
        if self.using_current {
            &self.current_occupancy
        } else {
            &self.trial_occupancy
        }
    }

    fn occupancy_mut(&mut self) -> &mut HashMap<Pos, SiteId> {
        if self.using_current {
            &mut self.current_occupancy
        } else {
            &mut self.trial_occupancy
        }
    }

    /// Rebuild both occupancy maps from scratch.
    pub fn rebuild_occupancies<I>(&mut self, current: I, trial: I)
    where
        I: Iterator<Item = (Pos, SiteId)>,
    {
        self.current_occupancy.clear();
        self.trial_occupancy.clear();
        for (pos, id) in current {
            self.current_occupancy.insert(pos, id);
        }
        for (pos, id) in trial {
            self.trial_occupancy.insert(pos, id);
        }
    }

    /// Value equality of the two occupancy maps (move-boundary invariant).
    pub fn views_agree(&self) -> bool {
        self.current_height == self.trial_height
            && self.current_occupancy == self.trial_occupancy
    }
}
