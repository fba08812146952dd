//! Region bridging, reachability repair and tunnel carving.

use std::collections::HashSet;

use tracing::debug;

use super::grid::{distance_sq, Grid, GridPos};
use super::regions::{find_regions, flood_fill};
use super::rng::CaveRng;

/// Counters reported by the connection phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionReport {
    pub regions_found: usize,
    pub bridges: usize,
    pub repaired_rooms: usize,
    pub repaired_regions: usize,
}

/// Bridge every region to the first one found, then make sure every room
/// center and every remaining floor region is reachable from spawn.
pub fn connect(
    grid: &mut Grid,
    spawn: GridPos,
    room_centers: &[GridPos],
    rng: &mut CaveRng,
) -> ConnectionReport {
    let mut report = bridge_regions(grid, spawn, rng);
    report.repaired_rooms = repair_room_reachability(grid, spawn, room_centers, rng);
    report.repaired_regions = repair_stray_regions(grid, spawn, rng);
    report
}

/// Tunnel each region to the anchor: the first region scanned that does not
/// hold spawn. The spawn region is never bridged wherever it falls in scan
/// order; spawn is only ever joined by the repair passes.
pub fn bridge_regions(grid: &mut Grid, spawn: GridPos, rng: &mut CaveRng) -> ConnectionReport {
    let regions = find_regions(grid);
    let mut report = ConnectionReport {
        regions_found: regions.len(),
        ..ConnectionReport::default()
    };

    let (spawn_region, others): (Vec<_>, Vec<_>) =
        regions.iter().partition(|region| region.contains(spawn));
    if let Some(region) = spawn_region.first() {
        debug!(cells = region.len(), "skipping spawn region during bridging");
    }

    let Some((anchor, rest)) = others.split_first() else {
        return report;
    };

    for region in rest {
        if let Some((from, to)) = closest_pair(&anchor.cells, &region.cells) {
            carve_tunnel(grid, from, to, rng);
            report.bridges += 1;
        }
    }

    report
}

/// Tunnel every room center that spawn cannot reach to its nearest reachable cell.
pub fn repair_room_reachability(
    grid: &mut Grid,
    spawn: GridPos,
    room_centers: &[GridPos],
    rng: &mut CaveRng,
) -> usize {
    let mut reachable = flood_fill(grid, spawn).to_set();
    let mut repaired = 0;

    for &center in room_centers {
        if reachable.contains(&center) {
            continue;
        }
        let Some(target) = nearest(center, &reachable) else {
            continue;
        };
        debug!(?center, ?target, "tunnelling unreachable room to spawn network");
        carve_tunnel(grid, center, target, rng);
        reachable = flood_fill(grid, spawn).to_set();
        repaired += 1;
    }

    repaired
}

/// Tunnel any floor region still cut off from spawn.
pub fn repair_stray_regions(grid: &mut Grid, spawn: GridPos, rng: &mut CaveRng) -> usize {
    let mut repaired = 0;

    loop {
        let reachable = flood_fill(grid, spawn).to_set();
        let stray = find_regions(grid)
            .into_iter()
            .find(|region| !region.cells.iter().any(|c| reachable.contains(c)));
        let Some(stray) = stray else {
            break;
        };

        let reached: Vec<GridPos> = reachable.iter().copied().collect();
        let Some((from, to)) = closest_pair(&stray.cells, &sorted(reached)) else {
            break;
        };
        carve_tunnel(grid, from, to, rng);
        repaired += 1;
    }

    repaired
}

/// Exhaustive closest pair between two point sets, O(n * m).
/// Ties resolve to the first pair found.
pub fn closest_pair(a: &[GridPos], b: &[GridPos]) -> Option<(GridPos, GridPos)> {
    let mut best: Option<(u64, GridPos, GridPos)> = None;
    for &p in a {
        for &q in b {
            let d = distance_sq(p, q);
            match best {
                Some((bd, _, _)) if d >= bd => {}
                _ => best = Some((d, p, q)),
            }
        }
    }
    best.map(|(_, p, q)| (p, q))
}

/// Nearest member of `cells` to `from`. Ties resolve to the lowest row-major position.
fn nearest(from: GridPos, cells: &HashSet<GridPos>) -> Option<GridPos> {
    cells
        .iter()
        .copied()
        .min_by_key(|&(x, y)| (distance_sq(from, (x, y)), y, x))
}

fn sorted(mut cells: Vec<GridPos>) -> Vec<GridPos> {
    cells.sort_by_key(|&(x, y)| (y, x));
    cells
}

/// Carve a corridor at least two cells wide from `start` to `end`.
///
/// Each step advances x toward the target, then y. The stepped-to cell is
/// carved together with one perpendicular neighbour on a side picked by the
/// shared RNG. Endpoints are clamped into the interior and the border is never
/// carved.
pub fn carve_tunnel(grid: &mut Grid, start: GridPos, end: GridPos, rng: &mut CaveRng) {
    let (mut x, mut y) = grid.clamp_interior(start);
    let (tx, ty) = grid.clamp_interior(end);

    carve_wide(grid, (x, y), Axis::Horizontal, rng);
    while (x, y) != (tx, ty) {
        if x != tx {
            x = if x < tx { x + 1 } else { x - 1 };
            carve_wide(grid, (x, y), Axis::Horizontal, rng);
        }
        if y != ty {
            y = if y < ty { y + 1 } else { y - 1 };
            carve_wide(grid, (x, y), Axis::Vertical, rng);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn carve_wide(grid: &mut Grid, pos: GridPos, axis: Axis, rng: &mut CaveRng) {
    grid.carve(pos);

    let (x, y) = pos;
    let positive = rng.coin();
    let (a, b) = match axis {
        Axis::Horizontal => ((x, y + 1), (x, y.saturating_sub(1))),
        Axis::Vertical => ((x + 1, y), (x.saturating_sub(1), y)),
    };
    let (first, second) = if positive { (a, b) } else { (b, a) };

    if grid.is_interior(first) {
        grid.carve(first);
    } else if grid.is_interior(second) {
        grid.carve(second);
    }
}
