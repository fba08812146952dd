//! Connected-component labeling of floor cells.
//!
//! Regions are 4-connected and returned in first-encounter order of a
//! row-major scan. That order carries no meaning beyond determinism: region 0
//! is not guaranteed to be the largest cave.

use std::collections::{HashSet, VecDeque};

use super::grid::{Grid, GridPos};

/// A maximal 4-connected set of floor cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub cells: Vec<GridPos>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.cells.contains(&pos)
    }

    pub fn to_set(&self) -> HashSet<GridPos> {
        self.cells.iter().copied().collect()
    }
}

/// Partition every floor cell into regions.
pub fn find_regions(grid: &Grid) -> Vec<Region> {
    let mut visited = vec![vec![false; grid.width]; grid.height];
    let mut regions = Vec::new();

    for pos in grid.positions() {
        let (x, y) = pos;
        if visited[y][x] || !grid.is_floor(pos) {
            continue;
        }
        regions.push(flood(grid, pos, &mut visited));
    }

    regions
}

/// Flood fill from one cell. Returns an empty region if `start` is not floor.
pub fn flood_fill(grid: &Grid, start: GridPos) -> Region {
    if !grid.is_floor(start) {
        return Region::default();
    }
    let mut visited = vec![vec![false; grid.width]; grid.height];
    flood(grid, start, &mut visited)
}

fn flood(grid: &Grid, start: GridPos, visited: &mut [Vec<bool>]) -> Region {
    let mut cells = Vec::new();
    let mut queue = VecDeque::new();

    visited[start.1][start.0] = true;
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        cells.push(cell);
        for (nx, ny) in grid.orthogonal_neighbors(cell) {
            if visited[ny][nx] || !grid.is_floor((nx, ny)) {
                continue;
            }
            visited[ny][nx] = true;
            queue.push_back((nx, ny));
        }
    }

    Region { cells }
}
