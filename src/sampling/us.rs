//! Umbrella-sampling driver: iterated MC blocks with flat-histogram bias
//! refinement between them.

use rand::Rng;
use tracing::info;

use crate::biases::Biases;
use crate::error::Result;
use crate::io::{self, OpsWriter, UsWriter, VtfWriter};
use crate::lattice::Lattice;
use crate::params::Config;
use crate::sampling::mc;
use crate::system::System;

/// Run the full umbrella-sampling schedule. Biases are seeded from a
/// restart file, from the analytical ring model, or left at zero; each
/// iteration runs one MC block, then records counts, refines the biases,
/// and records frequencies and bias energies.
pub fn run_us<R: Rng>(
    system: &mut System,
    lattice: &mut Lattice,
    config: &Config,
    rng: &mut R,
) -> Result<()> {
    let run = &config.run;
    io::write_params(format!("{}.parms", run.filebase), &config.system, run)?;

    let mut biases = Biases::new(
        lattice.min_height,
        lattice.max_height,
        run.binwidth,
        run.max_bias_diff,
        config.system.temp,
    );
    let start_iter = match (&run.biases_file, run.restart_iter) {
        (Some(path), Some(iter)) => {
            biases.set_enes(io::read_biases(path, iter, biases.numbins())?);
            info!(iter, path = %path, "restarted biases");
            iter + 1
        }
        _ => {
            if run.analytical_biases {
                biases.seed_analytical(&config.system);
                info!("seeded analytical biases");
            }
            0
        }
    };

    let mut counts_out = UsWriter::create(
        format!("{}.counts", run.filebase),
        lattice.min_height,
        lattice.max_height,
    )?;
    let mut freqs_out = UsWriter::create(
        format!("{}.freqs", run.filebase),
        lattice.min_height,
        lattice.max_height,
    )?;
    let mut biases_out = UsWriter::create(
        format!("{}.biases", run.filebase),
        lattice.min_height,
        lattice.max_height,
    )?;

    for iter in start_iter..run.iters {
        info!(iter, "umbrella iteration");
        let mut ops = OpsWriter::create(format!("{}_iter-{iter}.ops", run.filebase))?;
        let mut vtf = VtfWriter::create(format!("{}_iter-{iter}.vtf", run.filebase), system)?;
        mc::run(system, lattice, run, &mut biases, &mut ops, &mut vtf, rng)?;

        counts_out.write_counts(&biases.counts)?;
        biases.update_biases();
        freqs_out.write_row(&biases.freqs)?;
        biases_out.write_row(&biases.enes)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{RunParams, SystemParams};
    use crate::startup::initialize_system;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;

    fn config(filebase: String, iters: usize) -> Config {
        Config {
            system: SystemParams {
                ks: 1e-6,
                kd: 1e-6,
                temp: 300.0,
                delta: 5.4e-9,
                xc: 1e-6,
                ei: 6.9e-26,
                filament_length: 2.16e-8,
                lf: 4,
                n_filaments: 4,
                n_scaffolds: 4,
            },
            run: RunParams {
                steps: 100,
                write_interval: 50,
                filebase,
                radius_move_freq: 0.3,
                max_bias_diff: 2.0,
                iters,
                analytical_biases: false,
                binwidth: 1,
                restart_iter: None,
                biases_file: None,
                seed: Some(5),
            },
        }
    }

    fn filebase(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("ringmc-us-{}-{}", std::process::id(), name));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn two_iterations_emit_all_sinks() {
        let base = filebase("full");
        let config = config(base.clone(), 2);
        let mut lattice = Lattice::new(
            config.system.delta,
            config.system.min_height(),
            config.system.min_height(),
            config.system.max_height(),
        );
        let mut system = initialize_system(&config.system, &mut lattice).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        run_us(&mut system, &mut lattice, &config, &mut rng).unwrap();

        let numbins = (config.system.max_height() - config.system.min_height() + 1) as usize;
        for suffix in ["counts", "freqs", "biases"] {
            let text = fs::read_to_string(format!("{base}.{suffix}")).unwrap();
            let lines: Vec<&str> = text.lines().collect();
            assert_eq!(lines.len(), 3, "{suffix} should have header + 2 rows");
            assert_eq!(lines[0].split_whitespace().count(), numbins);
            assert_eq!(lines[1].split_whitespace().count(), numbins);
        }
        // Counts of the first iteration sum to the step count.
        let counts_text = fs::read_to_string(format!("{base}.counts")).unwrap();
        let first_row: u64 = counts_text
            .lines()
            .nth(1)
            .unwrap()
            .split_whitespace()
            .map(|f| f.parse::<u64>().unwrap())
            .sum();
        assert_eq!(first_row, config.run.steps);

        assert!(fs::read_to_string(format!("{base}.parms")).is_ok());
        for iter in 0..2 {
            assert!(fs::metadata(format!("{base}_iter-{iter}.ops")).is_ok());
            assert!(fs::metadata(format!("{base}_iter-{iter}.vtf")).is_ok());
        }

        for suffix in ["counts", "freqs", "biases", "parms"] {
            fs::remove_file(format!("{base}.{suffix}")).ok();
        }
        for iter in 0..2 {
            fs::remove_file(format!("{base}_iter-{iter}.ops")).ok();
            fs::remove_file(format!("{base}_iter-{iter}.vtf")).ok();
        }
    }

    #[test]
    fn restart_resumes_after_the_given_iteration() {
        let base = filebase("restart");
        let mut first = config(base.clone(), 1);
        first.run.steps = 60;
        let mut lattice = Lattice::new(
            first.system.delta,
            first.system.min_height(),
            first.system.min_height(),
            first.system.max_height(),
        );
        let mut system = initialize_system(&first.system, &mut lattice).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        run_us(&mut system, &mut lattice, &first, &mut rng).unwrap();

        let restart_base = filebase("restart-second");
        let mut second = config(restart_base.clone(), 3);
        second.run.steps = 60;
        second.run.restart_iter = Some(0);
        second.run.biases_file = Some(format!("{base}.biases"));
        run_us(&mut system, &mut lattice, &second, &mut rng).unwrap();

        // Iterations 1 and 2 ran; iteration 0 was skipped.
        assert!(fs::metadata(format!("{restart_base}_iter-0.ops")).is_err());
        assert!(fs::metadata(format!("{restart_base}_iter-1.ops")).is_ok());
        assert!(fs::metadata(format!("{restart_base}_iter-2.ops")).is_ok());

        for suffix in ["counts", "freqs", "biases", "parms"] {
            fs::remove_file(format!("{base}.{suffix}")).ok();
            fs::remove_file(format!("{restart_base}.{suffix}")).ok();
        }
        fs::remove_file(format!("{base}_iter-0.ops")).ok();
        fs::remove_file(format!("{base}_iter-0.vtf")).ok();
        for iter in 1..3 {
            fs::remove_file(format!("{restart_base}_iter-{iter}.ops")).ok();
            fs::remove_file(format!("{restart_base}_iter-{iter}.vtf")).ok();
        }
    }
}
