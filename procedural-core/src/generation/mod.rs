//! Procedural cave generation.
//!
//! Pipeline, in fixed order:
//! 1. `fill`      - random wall/floor noise with a solid border
//! 2. `smoothing` - cellular-automata passes
//! 3. `rooms`     - spawn room plus noise-edged rooms
//! 4. `regions`   - flood-fill connected components
//! 5. `connect`   - bridges, reachability repair, tunnels
//!
//! A single seeded `CaveRng` drives every random decision, so a config
//! (including its seed) always produces the same `CaveLayout`.

pub mod config;
pub mod connect;
pub mod fill;
pub mod floor_manager;
pub mod grid;
pub mod regions;
pub mod rng;
pub mod rooms;
pub mod smoothing;

use std::collections::HashSet;

use bevy::app::{App, Plugin, Startup, Update};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use tracing::{debug, info, info_span};

use crate::constants::{BOSS_FLOOR_INTERVAL, BOSS_ROOM_RADIUS_MULT};
use crate::error::Result;
use crate::logging::PhaseTimer;

pub use config::{CaveConfig, Offset};
pub use grid::{Cell, Grid, GridPos};
pub use rooms::{Room, RoomKind};

use connect::ConnectionReport;
use floor_manager::{DungeonProgress, FloorReadyEvent, FloorTransitionEvent};
use rng::CaveRng;

/// Registers cave generation and floor progression with a Bevy app.
///
/// Floor 1 is generated at startup into the `ActiveFloor` resource; sending
/// `FloorTransitionEvent` generates the next one.
pub struct CavePlugin {
    pub config: CaveConfig,
}

impl CavePlugin {
    pub fn new(config: CaveConfig) -> Self {
        Self { config }
    }
}

impl Plugin for CavePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(CaveSettings(self.config.clone()))
            .insert_resource(DungeonProgress::new(self.config.seed))
            .add_event::<FloorTransitionEvent>()
            .add_event::<FloorReadyEvent>()
            .add_systems(Startup, floor_manager::generate_first_floor)
            .add_systems(Update, floor_manager::handle_floor_transitions);
    }
}

/// Base configuration every floor is derived from
#[derive(Resource, Debug, Clone)]
pub struct CaveSettings(pub CaveConfig);

/// Dungeon seed - the root of every floor's generation seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonSeed {
    pub seed: u64,
}

impl Default for DungeonSeed {
    fn default() -> Self {
        Self {
            seed: crate::constants::DEFAULT_SEED,
        }
    }
}

impl DungeonSeed {
    /// Deterministic per-floor seed from dungeon seed and floor number
    pub fn floor_hash(&self, floor: u32) -> u64 {
        let mut hasher = Sha3_256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(floor.to_le_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}

/// Which layout a floor uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    Standard,
    /// Milestone floor: a single wide arena instead of the room set
    Boss,
}

impl LayoutKind {
    pub fn for_floor(floor: u32) -> Self {
        if floor > 0 && floor % BOSS_FLOOR_INTERVAL == 0 {
            Self::Boss
        } else {
            Self::Standard
        }
    }

    /// Adjust a base config for this layout kind
    pub fn apply(&self, base: &CaveConfig) -> CaveConfig {
        match self {
            Self::Standard => base.clone(),
            Self::Boss => CaveConfig {
                room_count: 1,
                room_radius: base.room_radius.saturating_mul(BOSS_ROOM_RADIUS_MULT),
                ..base.clone()
            },
        }
    }
}

/// Finished cave, handed read-only to renderers and spawn systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaveLayout {
    pub grid: Grid,
    pub cell_size: f32,
    pub offset: Offset,
    pub seed: u64,
    /// Player spawn room; never listed in `rooms`
    pub spawn: Room,
    /// Rooms eligible for enemy spawner placement
    pub rooms: Vec<Room>,
    /// Rooms dropped because no position clear of spawn was found
    pub skipped_rooms: u32,
}

impl CaveLayout {
    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.grid.get((x, y))
    }

    pub fn spawn_center(&self) -> GridPos {
        self.spawn.center
    }

    /// Centers of the non-spawn rooms, for hostile spawner placement
    pub fn spawner_sites(&self) -> Vec<GridPos> {
        self.rooms.iter().map(|r| r.center).collect()
    }

    /// Every recorded center, spawn first
    pub fn all_room_centers(&self) -> Vec<GridPos> {
        std::iter::once(self.spawn.center)
            .chain(self.rooms.iter().map(|r| r.center))
            .collect()
    }

    /// World-space position of a cell, shared by renderers and spawners
    pub fn world_position(&self, x: usize, y: usize) -> [f32; 3] {
        world_position(self.cell_size, self.offset, x, y)
    }

    pub fn border_intact(&self) -> bool {
        self.grid.border_intact()
    }

    /// Recorded centers that cannot be reached from spawn
    pub fn unreachable_room_centers(&self) -> Vec<GridPos> {
        let reachable: HashSet<GridPos> =
            regions::flood_fill(&self.grid, self.spawn.center).to_set();
        self.all_room_centers()
            .into_iter()
            .filter(|c| !reachable.contains(c))
            .collect()
    }

    /// Every floor cell (and so every room center) is reachable from spawn
    pub fn is_fully_connected(&self) -> bool {
        let reachable = regions::flood_fill(&self.grid, self.spawn.center);
        reachable.len() == self.grid.floor_count() && self.unreachable_room_centers().is_empty()
    }
}

/// `(x * cell_size + offset.x, y * cell_size + offset.y, 0)`
pub fn world_position(cell_size: f32, offset: Offset, x: usize, y: usize) -> [f32; 3] {
    [
        x as f32 * cell_size + offset.x,
        y as f32 * cell_size + offset.y,
        0.0,
    ]
}

/// Run the whole pipeline. Fails only if the configuration is rejected.
pub fn generate_cave(config: &CaveConfig) -> Result<CaveLayout> {
    config.validate()?;

    let _span = info_span!("generate_cave", seed = config.seed).entered();
    let mut rng = CaveRng::new(config.seed);

    let mut grid = {
        let _phase = PhaseTimer::start("fill_and_smooth");
        let grid = fill::random_fill(config.width, config.height, config.fill_percentage, &mut rng);
        smoothing::smooth(grid, config.smoothing_iterations)
    };
    debug!(
        floor_cells = grid.floor_count(),
        passes = config.smoothing_iterations,
        "noise filled and smoothed"
    );

    let carved = {
        let _phase = PhaseTimer::start("rooms");
        rooms::carve_rooms(&mut grid, config, &mut rng)
    };
    let centers: Vec<GridPos> = carved.rooms.iter().map(|r| r.center).collect();

    let report: ConnectionReport = {
        let _phase = PhaseTimer::start("connect");
        connect::connect(&mut grid, carved.spawn.center, &centers, &mut rng)
    };
    debug!(
        regions = report.regions_found,
        bridges = report.bridges,
        repaired_rooms = report.repaired_rooms,
        repaired_regions = report.repaired_regions,
        "regions connected"
    );

    let layout = CaveLayout {
        grid,
        cell_size: config.cell_size,
        offset: config.offset,
        seed: config.seed,
        spawn: carved.spawn,
        rooms: carved.rooms,
        skipped_rooms: carved.skipped,
    };

    debug_assert!(layout.border_intact(), "generated cave broke its border");
    debug_assert!(layout.is_fully_connected(), "generated cave is not connected");

    info!(
        width = layout.width(),
        height = layout.height(),
        rooms = layout.rooms.len(),
        skipped = layout.skipped_rooms,
        "cave generated"
    );

    Ok(layout)
}
