//! Spawn room and noise-edged room carving.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::CaveConfig;
use super::grid::{distance_sq, Grid, GridPos};
use super::rng::CaveRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomKind {
    /// Player spawn; never eligible for hostile spawners
    Spawn,
    Standard,
}

/// A carved room. Only the center and nominal radius survive carving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub center: GridPos,
    pub radius: u32,
    pub kind: RoomKind,
}

/// Result of the carving phase
#[derive(Debug, Clone)]
pub struct CarvedRooms {
    pub spawn: Room,
    pub rooms: Vec<Room>,
    pub skipped: u32,
}

/// Carve the spawn room, then `room_count` rooms kept clear of it.
pub fn carve_rooms(grid: &mut Grid, config: &CaveConfig, rng: &mut CaveRng) -> CarvedRooms {
    let perlin = Perlin::new(rng.next_u32());

    let spawn_center = sample_inset(grid, config.placement_margin, rng);
    carve_disc(grid, spawn_center, config.spawn_radius as f32);
    let spawn = Room {
        center: spawn_center,
        radius: config.spawn_radius,
        kind: RoomKind::Spawn,
    };
    debug!(x = spawn_center.0, y = spawn_center.1, "spawn room carved");

    let exclusion_sq = config.spawn_exclusion_sq();
    let mut rooms = Vec::with_capacity(config.room_count as usize);
    let mut skipped = 0;

    for index in 0..config.room_count {
        let Some(center) = place_room(grid, config, spawn_center, exclusion_sq, rng) else {
            warn!(
                room = index,
                attempts = config.max_placement_attempts,
                "no room position clear of spawn, skipping room"
            );
            skipped += 1;
            continue;
        };

        let radius = rng.range_inclusive(
            config.room_radius.saturating_sub(1),
            config.room_radius.saturating_add(1),
        );
        carve_noisy_room(grid, center, radius, config, &perlin);
        rooms.push(Room {
            center,
            radius,
            kind: RoomKind::Standard,
        });
    }

    CarvedRooms {
        spawn,
        rooms,
        skipped,
    }
}

/// Rejection-sample an inset position at least the exclusion distance from spawn.
fn place_room(
    grid: &Grid,
    config: &CaveConfig,
    spawn: GridPos,
    exclusion_sq: u64,
    rng: &mut CaveRng,
) -> Option<GridPos> {
    (0..config.max_placement_attempts)
        .map(|_| sample_inset(grid, config.placement_margin, rng))
        .find(|&candidate| distance_sq(candidate, spawn) >= exclusion_sq)
}

/// Half-open sampling range along one axis, shrinking the margin on small grids
fn inset_range(len: usize, margin: usize) -> (usize, usize) {
    let lo = margin.min(len.saturating_sub(1) / 2).max(1);
    let hi = len.saturating_sub(lo).max(lo + 1);
    (lo, hi)
}

pub(crate) fn sample_inset(grid: &Grid, margin: usize, rng: &mut CaveRng) -> GridPos {
    let (x_lo, x_hi) = inset_range(grid.width, margin);
    let (y_lo, y_hi) = inset_range(grid.height, margin);
    (rng.range(x_lo, x_hi), rng.range(y_lo, y_hi))
}

/// Carve all interior cells within Euclidean `radius` of `center`
pub fn carve_disc(grid: &mut Grid, center: GridPos, radius: f32) {
    let reach = (radius.ceil() as usize).min(grid.width.max(grid.height));
    carve_where(grid, center, reach, |_, dist| dist <= radius);
}

fn carve_noisy_room(
    grid: &mut Grid,
    center: GridPos,
    radius: u32,
    config: &CaveConfig,
    perlin: &Perlin,
) {
    let edge = config.room_edge_noise;
    let reach = (radius as usize)
        .saturating_add(edge.ceil() as usize)
        .min(grid.width.max(grid.height));
    let frequency = config.noise_frequency;
    carve_where(grid, center, reach, |(x, y), dist| {
        let sample = perlin.get([x as f64 * frequency, y as f64 * frequency]);
        let noise = ((sample + 1.0) * 0.5).clamp(0.0, 1.0) as f32;
        dist <= radius as f32 + noise * edge
    });
}

fn carve_where<F>(grid: &mut Grid, center: GridPos, reach: usize, mut keep: F)
where
    F: FnMut(GridPos, f32) -> bool,
{
    let (cx, cy) = center;
    let x_range =
        cx.saturating_sub(reach)..=cx.saturating_add(reach).min(grid.width.saturating_sub(1));
    let y_range =
        cy.saturating_sub(reach)..=cy.saturating_add(reach).min(grid.height.saturating_sub(1));

    for y in y_range {
        for x in x_range.clone() {
            let dist = (distance_sq((x, y), center) as f32).sqrt();
            if keep((x, y), dist) {
                grid.carve((x, y));
            }
        }
    }
}
