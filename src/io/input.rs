//! Bias restart input: the `.biases` matrix written by a previous run.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

/// Read the bias energies of one iteration from a bias matrix. The header
/// line is skipped; data row `iter` must hold `numbins` values.
pub fn read_biases<P: AsRef<Path>>(path: P, iter: usize, numbins: usize) -> Result<Vec<f64>> {
    let path_text = path.as_ref().display().to_string();
    let reader = BufReader::new(File::open(&path)?);
    let line = reader
        .lines()
        .nth(1 + iter)
        .transpose()?
        .ok_or_else(|| Error::BiasFile {
            path: path_text.clone(),
            detail: format!("no row for iteration {iter}"),
        })?;

    let enes = line
        .split_whitespace()
        .map(|field| {
            field.parse::<f64>().map_err(|_| Error::BiasFile {
                path: path_text.clone(),
                detail: format!("unparseable value {field:?} in iteration {iter}"),
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    if enes.len() != numbins {
        return Err(Error::BiasFile {
            path: path_text,
            detail: format!(
                "iteration {iter} has {} values, expected {numbins}",
                enes.len()
            ),
        });
    }
    Ok(enes)
}
