//! Centralized generation constants for the cave procedural core.
//!
//! Defaults for `CaveConfig` and the fixed tuning values of the individual
//! generation phases live here so the pipeline, the FFI bridge and the CLI
//! agree on a single source of truth.

// =====================================================
// Grid
// =====================================================

/// Default grid width in cells
pub const DEFAULT_WIDTH: usize = 50;

/// Default grid height in cells
pub const DEFAULT_HEIGHT: usize = 50;

/// Smallest legal grid side: one border cell on each side plus one interior cell
pub const MIN_GRID_SIDE: usize = 3;

/// Default world units per grid cell
pub const DEFAULT_CELL_SIZE: f32 = 1.0;

// =====================================================
// Noise fill & smoothing
// =====================================================

/// Default chance (percent) that an interior cell starts as a wall
pub const DEFAULT_FILL_PERCENTAGE: u32 = 45;

/// Default number of cellular-automata passes
pub const DEFAULT_SMOOTHING_ITERATIONS: u32 = 5;

/// Wall-neighbour count above which a cell becomes a wall (below it becomes floor)
pub const SMOOTHING_THRESHOLD: usize = 4;

// =====================================================
// Rooms
// =====================================================

/// Default number of rooms carved in addition to the spawn room
pub const DEFAULT_ROOM_COUNT: u32 = 5;

/// Default base room radius
pub const DEFAULT_ROOM_RADIUS: u32 = 3;

/// Default multiplier for noise-driven room edge protrusions
pub const DEFAULT_ROOM_EDGE_NOISE: f32 = 0.5;

/// Fixed radius of the spawn room
pub const DEFAULT_SPAWN_RADIUS: u32 = 2;

/// Distance kept between room centers and the grid border
pub const DEFAULT_PLACEMENT_MARGIN: usize = 5;

/// Rooms must be at least `room_radius * SPAWN_EXCLUSION_FACTOR` away from spawn
pub const SPAWN_EXCLUSION_FACTOR: u32 = 3;

/// Sampling frequency of the Perlin noise used on room edges
pub const DEFAULT_NOISE_FREQUENCY: f64 = 0.1;

/// Rejection-sampling cap before a room is skipped
pub const DEFAULT_MAX_PLACEMENT_ATTEMPTS: u32 = 100;

// =====================================================
// Seeds & progression
// =====================================================

/// Default generation seed
pub const DEFAULT_SEED: u64 = 42;

/// Every Nth floor is a boss floor
pub const BOSS_FLOOR_INTERVAL: u32 = 10;

/// Boss arenas use this multiple of the base room radius
pub const BOSS_ROOM_RADIUS_MULT: u32 = 2;
