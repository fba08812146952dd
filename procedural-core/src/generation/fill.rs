//! Initial random fill.

use super::grid::{Cell, Grid};
use super::rng::CaveRng;

/// Fill a fresh grid: border cells are walls, each interior cell is a wall
/// with probability `fill_percentage / 100`.
pub fn random_fill(width: usize, height: usize, fill_percentage: u32, rng: &mut CaveRng) -> Grid {
    let mut grid = Grid::filled(width, height, Cell::Wall);

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let cell = if rng.below(100) < fill_percentage {
                Cell::Wall
            } else {
                Cell::Floor
            };
            grid.tiles[y][x] = cell;
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_is_wall() {
        let mut rng = CaveRng::new(3);
        let grid = random_fill(20, 12, 0, &mut rng);
        assert!(grid.border_intact());
    }

    #[test]
    fn test_extremes() {
        let mut rng = CaveRng::new(3);
        let open = random_fill(10, 10, 0, &mut rng);
        assert_eq!(open.floor_count(), 64);

        let solid = random_fill(10, 10, 100, &mut rng);
        assert_eq!(solid.floor_count(), 0);
    }

    #[test]
    fn test_fill_ratio_roughly_matches() {
        let mut rng = CaveRng::new(11);
        let grid = random_fill(102, 102, 45, &mut rng);
        let interior = 100 * 100;
        let walls = interior - grid.floor_count();
        let ratio = walls as f64 / interior as f64;
        assert!((0.40..0.50).contains(&ratio), "wall ratio {ratio}");
    }

    #[test]
    fn test_deterministic() {
        let a = random_fill(30, 30, 45, &mut CaveRng::new(8));
        let b = random_fill(30, 30, 45, &mut CaveRng::new(8));
        assert_eq!(a, b);
    }
}
