//! Cell grid owned by the generation pipeline.
//!
//! Cells are stored row-major as `tiles[y][x]`. Coordinates are `(x, y)`
//! tuples throughout the crate.

use serde::{Deserialize, Serialize};

/// Grid coordinate `(x, y)`
pub type GridPos = (usize, usize);

/// Binary cell state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Floor,
}

impl Cell {
    /// Wire value: 0 = floor, 1 = wall
    pub fn to_u8(self) -> u8 {
        match self {
            Cell::Floor => 0,
            Cell::Wall => 1,
        }
    }

    pub fn is_floor(self) -> bool {
        self == Cell::Floor
    }
}

/// Offsets of the 4-connected neighbourhood
pub const ORTHOGONAL: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Vec<Cell>>,
}

impl Grid {
    /// A grid with every cell set to `fill`
    pub fn filled(width: usize, height: usize, fill: Cell) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![fill; width]; height],
        }
    }

    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn is_border(&self, (x, y): GridPos) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// True for cells strictly inside the border ring
    pub fn is_interior(&self, (x, y): GridPos) -> bool {
        x > 0 && y > 0 && x < self.width.saturating_sub(1) && y < self.height.saturating_sub(1)
    }

    pub fn get(&self, (x, y): GridPos) -> Option<Cell> {
        self.tiles.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn is_floor(&self, pos: GridPos) -> bool {
        self.get(pos) == Some(Cell::Floor)
    }

    pub fn set(&mut self, (x, y): GridPos, cell: Cell) {
        if let Some(slot) = self.tiles.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    /// Set an interior cell to floor. Border and out-of-range cells are ignored.
    pub fn carve(&mut self, pos: GridPos) {
        if self.is_interior(pos) {
            self.set(pos, Cell::Floor);
        }
    }

    /// Clamp a coordinate into the interior rectangle.
    pub fn clamp_interior(&self, (x, y): GridPos) -> GridPos {
        (
            x.clamp(1, self.width.saturating_sub(2).max(1)),
            y.clamp(1, self.height.saturating_sub(2).max(1)),
        )
    }

    /// In-bounds 4-connected neighbours of a cell
    pub fn orthogonal_neighbors(&self, (x, y): GridPos) -> impl Iterator<Item = GridPos> + '_ {
        ORTHOGONAL.iter().filter_map(move |&(dx, dy)| {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            self.in_bounds(nx, ny).then_some((nx as usize, ny as usize))
        })
    }

    /// Number of walls among the 8 Moore neighbours; out-of-bounds cells are not counted.
    pub fn wall_neighbors(&self, (x, y): GridPos) -> usize {
        let mut count = 0;
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if self.in_bounds(nx, ny) && self.tiles[ny as usize][nx as usize] == Cell::Wall {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn floor_count(&self) -> usize {
        self.tiles
            .iter()
            .map(|row| row.iter().filter(|c| c.is_floor()).count())
            .sum()
    }

    /// Every border cell is a wall
    pub fn border_intact(&self) -> bool {
        self.positions()
            .filter(|&p| self.is_border(p))
            .all(|p| self.get(p) == Some(Cell::Wall))
    }

    /// All coordinates in row-major order
    pub fn positions(&self) -> impl Iterator<Item = GridPos> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }
}

/// Squared Euclidean distance between two grid cells
pub fn distance_sq(a: GridPos, b: GridPos) -> u64 {
    let dx = a.0.abs_diff(b.0) as u64;
    let dy = a.1.abs_diff(b.1) as u64;
    dx * dx + dy * dy
}
