//! Umbrella biases over the lattice height.
//!
//! Heights are binned between the lattice bounds; each bin carries a count
//! accumulated during an iteration, derived frequency and unbiased
//! probability estimates, and a bias energy added to the Hamiltonian.

use std::f64::consts::PI;

use crate::energy::{bending_energy, overlap_energy, KB};
use crate::params::SystemParams;

pub struct Biases {
    numbins: usize,
    min_height: i32,
    max_height: i32,
    binsize: i32,
    barriers: Vec<i32>,
    pub counts: Vec<u64>,
    pub freqs: Vec<f64>,
    pub probs: Vec<f64>,
    pub enes: Vec<f64>,
    max_bias_diff: f64,
    temp: f64,
}

impl Biases {
    /// `max_bias_diff` is the per-update clamp in units of kB T.
    pub fn new(
        min_height: i32,
        max_height: i32,
        binwidth: usize,
        max_bias_diff: f64,
        temp: f64,
    ) -> Self {
        let range = max_height - min_height + 1;
        let numbins = (range / binwidth as i32) as usize;
        let binsize = range / numbins as i32;
        let barriers = (1..numbins as i32)
            .map(|i| min_height + i * binsize)
            .collect();
        Self {
            numbins,
            min_height,
            max_height,
            binsize,
            barriers,
            counts: vec![0; numbins],
            freqs: vec![0.0; numbins],
            probs: vec![0.0; numbins],
            enes: vec![0.0; numbins],
            max_bias_diff,
            temp,
        }
    }

    pub fn numbins(&self) -> usize {
        self.numbins
    }

    /// Bin of a height: the first barrier it falls below, else the last
    /// bin.
    pub fn bin(&self, height: i32) -> usize {
        self.barriers
            .iter()
            .position(|&barrier| height < barrier)
            .unwrap_or(self.numbins - 1)
    }

    /// Bias energy at a height (J).
    pub fn bias_energy(&self, height: i32) -> f64 {
        self.enes[self.bin(height)]
    }

    /// Record one MC step spent at a height.
    pub fn update_counts(&mut self, height: i32) {
        let bin = self.bin(height);
        self.counts[bin] += 1;
    }

    /// Replace the bias energies wholesale (restart from file).
    pub fn set_enes(&mut self, enes: Vec<f64>) {
        assert_eq!(enes.len(), self.numbins);
        self.enes = enes;
    }

    /// Seed each bin with the negated analytical free energy, averaged
    /// over the bin's lower and upper barrier heights.
    pub fn seed_analytical(&mut self, params: &SystemParams) {
        for bin in 0..self.numbins {
            let lower = self.min_height + bin as i32 * self.binsize;
            let upper = lower + self.binsize;
            let free_energy = (analytical_free_energy(params, lower, self.max_height)
                + analytical_free_energy(params, upper, self.max_height))
                / 2.0;
            self.enes[bin] = -free_energy;
        }
    }

    /// One flat-histogram refinement from the counts of a finished
    /// iteration. Unvisited bins are pushed down by the full clamp;
    /// visited bins move toward kB T ln(prob), clamped. Counts reset.
    pub fn update_biases(&mut self) {
        let kt = KB * self.temp;
        let clamp = self.max_bias_diff * kt;
        let total: u64 = self.counts.iter().sum();
        let norm: f64 = self
            .counts
            .iter()
            .zip(&self.enes)
            .map(|(&c, &u)| c as f64 * (u / kt).exp())
            .sum();

        for bin in 0..self.numbins {
            let count = self.counts[bin];
            if count == 0 {
                self.freqs[bin] = 0.0;
                self.probs[bin] = 0.0;
                self.enes[bin] -= clamp;
            } else {
                self.freqs[bin] = count as f64 / total as f64;
                self.probs[bin] = count as f64 * (self.enes[bin] / kt).exp() / norm;
                let diff = (kt * self.probs[bin].ln() - self.enes[bin]).clamp(-clamp, clamp);
                self.enes[bin] += diff;
            }
            self.counts[bin] = 0;
        }
    }
}

/// Free energy of the ideal ring at a given height: Nsca scaffold-scaffold
/// overlaps of the geometrically determined length, two overlaps for each
/// non-scaffold filament, plus bending for every filament.
pub fn analytical_free_energy(params: &SystemParams, height: i32, max_height: i32) -> f64 {
    let radius = params.delta * (height + 1) as f64 / (2.0 * PI);
    let radius_max = params.delta * (max_height + 1) as f64 / (2.0 * PI);
    let overlap = 2.0 * PI * (radius_max - radius) / params.n_scaffolds as f64;
    let n_overlaps = params.n_scaffolds + 2 * (params.n_filaments - params.n_scaffolds);
    n_overlaps as f64 * overlap_energy(params, overlap)
        + params.n_filaments as f64 * bending_energy(params, radius)
}
