//! Connectivity oracle: is the assembly one crosslinked component, and do
//! the scaffolds close a ring around the periodic axis?
//!
//! Two filaments are crosslinked wherever a site of one sits at x +/- 1
//! from a site of the other. The search walks this adjacency graph with an
//! explicit path stack; a neighbor that is already on the path closes a
//! cycle, and the cycle wraps the lattice exactly once when the cumulative
//! y-length mismatch equals the period. The smallest wrapping cycle found
//! must contain exactly `n_scaffolds` filaments.

use std::collections::HashSet;

use nalgebra::Vector2;

use crate::error::{Error, Result};
use crate::lattice::Lattice;
use crate::system::System;

/// One filament on the search path, with its scan resume state. `cum` is
/// the cumulative y-length at the entry site; each filament is scanned
/// from its entry site down to site 0, then from entry + 1 up to the end.
struct Frame {
    filament: usize,
    entry: usize,
    cum: i32,
    cursor: i32,
    dir: i32,
}

struct Search {
    ring_contiguous: bool,
    n_connected: usize,
    min_cycle: usize,
}

fn search(system: &System, lattice: &Lattice, start: usize) -> Search {
    let n_filaments = system.filaments.len();
    let n_scaffolds = system.params.n_scaffolds;
    let period = lattice.height() + 1;

    let mut connected: HashSet<usize> = HashSet::new();
    connected.insert(start);
    let mut ring_contiguous = false;
    // Upper bound for the minimization over wrapping cycles.
    let mut min_cycle = n_filaments;

    let mut stack = vec![Frame {
        filament: start,
        entry: 0,
        cum: 0,
        cursor: 0,
        dir: -1,
    }];

    while let Some(top) = stack.last() {
        let top_index = stack.len() - 1;
        let (filament, entry, cum, cursor, dir) =
            (top.filament, top.entry, top.cum, top.cursor, top.dir);
        let lf = system.filaments[filament].len() as i32;

        if cursor < 0 {
            // Downward leg exhausted; scan upward from past the entry.
            stack[top_index].dir = 1;
            stack[top_index].cursor = entry as i32 + 1;
            continue;
        }
        if cursor >= lf {
            stack.pop();
            continue;
        }

        let site = cursor as usize;
        let cum_here = cum + (site as i32 - entry as i32);
        let pos = system.filaments[filament].coors()[site];

        let mut descended = false;
        for dx in [-1, 1] {
            let Some(id) = lattice.occupant(pos + Vector2::new(dx, 0)) else {
                continue;
            };
            if let Some(k) = stack.iter().position(|f| f.filament == id.filament) {
                let cum_adjacent =
                    stack[k].cum + (id.site as i32 - stack[k].entry as i32);
                let winding = cum_here - cum_adjacent;
                if winding.abs() == period {
                    ring_contiguous = true;
                    min_cycle = min_cycle.min(stack.len() - k);
                    if connected.len() == n_filaments && min_cycle == n_scaffolds {
                        return Search {
                            ring_contiguous,
                            n_connected: connected.len(),
                            min_cycle,
                        };
                    }
                }
            } else if !connected.contains(&id.filament) {
                connected.insert(id.filament);
                if ring_contiguous
                    && connected.len() == n_filaments
                    && min_cycle == n_scaffolds
                {
                    return Search {
                        ring_contiguous,
                        n_connected: connected.len(),
                        min_cycle,
                    };
                }
                stack.push(Frame {
                    filament: id.filament,
                    entry: id.site,
                    cum: cum_here,
                    cursor: id.site as i32,
                    dir: -1,
                });
                descended = true;
                break;
            }
        }
        if descended {
            // The same site is rescanned after the child pops, so its
            // remaining neighbor is still examined.
            continue;
        }
        stack[top_index].cursor += dir;
    }

    Search {
        ring_contiguous,
        n_connected: connected.len(),
        min_cycle,
    }
}

fn connected_from(system: &System, lattice: &Lattice, start: usize) -> bool {
    let result = search(system, lattice, start);
    result.ring_contiguous
        && result.n_connected == system.filaments.len()
        && result.min_cycle == system.params.n_scaffolds
}

/// True iff the filaments form one crosslinked assembly and the scaffolds
/// close a ring wrapping the lattice exactly once.
pub fn ring_and_system_connected(system: &System, lattice: &Lattice) -> bool {
    connected_from(system, lattice, 0)
}

/// Repeat the check from every start filament. Mixed answers indicate an
/// implementation bug and are fatal.
pub fn check_consistency(system: &System, lattice: &Lattice) -> Result<bool> {
    let verdict = connected_from(system, lattice, 0);
    for start in 1..system.filaments.len() {
        if connected_from(system, lattice, start) != verdict {
            return Err(Error::Inconsistency(format!(
                "connectivity verdict from filament {start} disagrees with filament 0"
            )));
        }
    }
    Ok(verdict)
}
