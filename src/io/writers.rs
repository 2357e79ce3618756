//! Output sinks: order parameters, VTF trajectory, umbrella matrices, and
//! the parameters dump.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::params::{RunParams, SystemParams};
use crate::system::System;

/// Order-parameter sink: one row per recorded step.
pub struct OpsWriter {
    writer: BufWriter<File>,
}

impl OpsWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "step energy height radius")?;
        Ok(Self { writer })
    }

    pub fn write_step(&mut self, step: u64, energy: f64, height: i32, radius: f64) -> Result<()> {
        writeln!(self.writer, "{} {} {} {}", step, energy, height, radius)?;
        Ok(())
    }
}

/// VTF trajectory sink. Atoms are numbered per filament in placement
/// order; x is scaled by 10 so the narrow columns stay readable next to
/// the circumferential axis.
pub struct VtfWriter {
    writer: BufWriter<File>,
}

impl VtfWriter {
    pub fn create<P: AsRef<Path>>(path: P, system: &System) -> Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        let mut atom = 0usize;
        for filament in &system.filaments {
            let last = atom + filament.len() - 1;
            writeln!(writer, "a {}:{} c {} r 2.5", atom, last, filament.index)?;
            atom = last + 1;
        }
        writeln!(writer)?;
        Ok(Self { writer })
    }

    pub fn write_frame(&mut self, system: &System) -> Result<()> {
        writeln!(self.writer, "t")?;
        for filament in &system.filaments {
            for pos in filament.coors() {
                writeln!(self.writer, "{} {} 0", pos.x * 10, pos.y)?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Umbrella matrix sink (.counts/.freqs/.biases): a header of the integer
/// heights, then one row of per-bin values per iteration.
pub struct UsWriter {
    writer: BufWriter<File>,
}

impl UsWriter {
    pub fn create<P: AsRef<Path>>(path: P, min_height: i32, max_height: i32) -> Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        for height in min_height..=max_height {
            write!(writer, "{} ", height)?;
        }
        writeln!(writer)?;
        Ok(Self { writer })
    }

    pub fn write_row(&mut self, values: &[f64]) -> Result<()> {
        for value in values {
            write!(self.writer, "{} ", value)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_counts(&mut self, counts: &[u64]) -> Result<()> {
        for count in counts {
            write!(self.writer, "{} ", count)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// The exact key set of the parameters dump.
#[derive(Serialize)]
struct ParamsReport<'a> {
    lf: usize,
    #[serde(rename = "T")]
    temp: f64,
    kd: f64,
    ks: f64,
    #[serde(rename = "EI")]
    ei: f64,
    #[serde(rename = "Lf")]
    filament_length: f64,
    #[serde(rename = "Xc")]
    xc: f64,
    #[serde(rename = "Nfil")]
    n_filaments: usize,
    #[serde(rename = "Nsca")]
    n_scaffolds: usize,
    delta: f64,
    steps: u64,
    write_interval: u64,
    filebase: &'a str,
    max_bias_diff: f64,
    radius_move_freq: f64,
    iters: usize,
    analytical_biases: bool,
    binwidth: usize,
}

pub fn write_params<P: AsRef<Path>>(
    path: P,
    system: &SystemParams,
    run: &RunParams,
) -> Result<()> {
    let report = ParamsReport {
        lf: system.lf,
        temp: system.temp,
        kd: system.kd,
        ks: system.ks,
        ei: system.ei,
        filament_length: system.filament_length,
        xc: system.xc,
        n_filaments: system.n_filaments,
        n_scaffolds: system.n_scaffolds,
        delta: system.delta,
        steps: run.steps,
        write_interval: run.write_interval,
        filebase: &run.filebase,
        max_bias_diff: run.max_bias_diff,
        radius_move_freq: run.radius_move_freq,
        iters: run.iters,
        analytical_biases: run.analytical_biases,
        binwidth: run.binwidth,
    };
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}
