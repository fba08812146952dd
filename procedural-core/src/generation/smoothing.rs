//! Cellular-automata smoothing.
//!
//! Each pass reads the previous grid and writes a newly allocated one, so rows
//! are independent and can be computed in parallel without changing the result.

use rayon::prelude::*;

use super::grid::{Cell, Grid};
use crate::constants::SMOOTHING_THRESHOLD;

/// Run `iterations` smoothing passes and return the final grid.
pub fn smooth(grid: Grid, iterations: u32) -> Grid {
    (0..iterations).fold(grid, |current, _| smooth_pass(&current))
}

/// One majority-rule pass over the interior. Border cells are copied unchanged.
pub fn smooth_pass(snapshot: &Grid) -> Grid {
    let tiles = (0..snapshot.height)
        .into_par_iter()
        .map(|y| {
            (0..snapshot.width)
                .map(|x| next_state(snapshot, x, y))
                .collect::<Vec<Cell>>()
        })
        .collect();

    Grid {
        width: snapshot.width,
        height: snapshot.height,
        tiles,
    }
}

fn next_state(snapshot: &Grid, x: usize, y: usize) -> Cell {
    let current = snapshot.tiles[y][x];
    if !snapshot.is_interior((x, y)) {
        return current;
    }

    let walls = snapshot.wall_neighbors((x, y));
    if walls > SMOOTHING_THRESHOLD {
        Cell::Wall
    } else if walls < SMOOTHING_THRESHOLD {
        Cell::Floor
    } else {
        current
    }
}
