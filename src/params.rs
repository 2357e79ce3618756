//! Run and system parameters, read from a YAML config file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Physical parameters of the ring system. Immutable over a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemParams {
    /// Crosslinker binding dissociation constant (M)
    pub ks: f64,
    /// Crosslinker doubly-bound dissociation constant (M)
    pub kd: f64,
    /// Temperature (K)
    pub temp: f64,
    /// Lattice spacing (m)
    pub delta: f64,
    /// Crosslinker concentration (M)
    pub xc: f64,
    /// Filament bending rigidity (N m^2)
    pub ei: f64,
    /// Filament contour length (m)
    #[serde(rename = "length")]
    pub filament_length: f64,
    /// Sites per filament
    pub lf: usize,
    /// Total number of filaments
    pub n_filaments: usize,
    /// Number of scaffold filaments forming the ring
    pub n_scaffolds: usize,
}

impl SystemParams {
    /// Largest allowed lattice height: scaffolds placed end to end.
    pub fn max_height(&self) -> i32 {
        (self.n_scaffolds * self.lf) as i32 - 1
    }

    /// Smallest allowed lattice height: scaffolds at half-length overlap.
    pub fn min_height(&self) -> i32 {
        (self.n_scaffolds * self.lf / 2) as i32 - 1
    }
}

/// Knobs of a single umbrella-sampling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunParams {
    /// MC steps per umbrella iteration
    pub steps: u64,
    /// Steps between trajectory/order-parameter records
    #[serde(default = "RunParams::default_write_interval")]
    pub write_interval: u64,
    /// Output file stem
    pub filebase: String,
    /// Probability of attempting a radius move instead of a translation
    #[serde(default = "RunParams::default_radius_move_freq")]
    pub radius_move_freq: f64,
    /// Bias-update clamp, in units of kB T
    #[serde(default = "RunParams::default_max_bias_diff")]
    pub max_bias_diff: f64,
    /// Number of umbrella iterations
    pub iters: usize,
    /// Seed biases from the analytical ring model instead of zeros
    #[serde(default)]
    pub analytical_biases: bool,
    /// Heights per bias bin
    #[serde(default = "RunParams::default_binwidth")]
    pub binwidth: usize,
    /// Iteration row to restart biases from (requires `biases_file`)
    #[serde(default)]
    pub restart_iter: Option<usize>,
    /// Bias matrix written by a previous run
    #[serde(default)]
    pub biases_file: Option<String>,
    /// RNG seed; absent means entropy-seeded
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RunParams {
    fn default_write_interval() -> u64 {
        1000
    }
    fn default_radius_move_freq() -> f64 {
        0.2
    }
    fn default_max_bias_diff() -> f64 {
        2.0
    }
    fn default_binwidth() -> usize {
        1
    }
}

/// Full run configuration as stored in the YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub system: SystemParams,
    pub run: RunParams,
}

pub fn read_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: Config = serde_yaml::from_reader(reader)?;
    Ok(config)
}
