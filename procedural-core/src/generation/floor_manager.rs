//! Floor transition and progression system.
//!
//! Tracks the current and deepest floor, derives each floor's seed and layout
//! kind, and regenerates the cave when the player moves on.

use bevy::prelude::*;
use tracing::{error, info};

use super::{generate_cave, CaveConfig, CaveLayout, CaveSettings, DungeonSeed, LayoutKind};
use crate::error::Result;

/// Currently loaded floor
#[derive(Resource, Debug, Clone)]
pub struct ActiveFloor {
    pub floor_number: u32,
    pub kind: LayoutKind,
    pub layout: CaveLayout,
}

/// Event: request a floor change
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorTransitionEvent {
    /// Go one floor deeper
    Descend,
    /// Rebuild the current floor from the (possibly changed) settings
    Regenerate,
}

/// Event: a new floor layout is ready for rendering and spawning
#[derive(Event, Debug, Clone)]
pub struct FloorReadyEvent {
    pub floor_number: u32,
    pub kind: LayoutKind,
    pub layout: CaveLayout,
}

/// Dungeon progression tracker
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct DungeonProgress {
    pub dungeon_seed: DungeonSeed,
    pub current_floor: u32,
    pub highest_reached: u32,
}

impl DungeonProgress {
    pub fn new(seed: u64) -> Self {
        Self {
            dungeon_seed: DungeonSeed { seed },
            current_floor: 1,
            highest_reached: 1,
        }
    }

    /// Move one floor down and return the new floor number
    pub fn advance(&mut self) -> u32 {
        self.current_floor = self.current_floor.saturating_add(1);
        self.highest_reached = self.highest_reached.max(self.current_floor);
        self.current_floor
    }

    /// Config for `floor`: layout kind applied, seed replaced by the floor hash
    pub fn config_for_floor(&self, base: &CaveConfig, floor: u32) -> CaveConfig {
        let mut config = LayoutKind::for_floor(floor).apply(base);
        config.seed = self.dungeon_seed.floor_hash(floor);
        config
    }

    pub fn generate_current(&self, base: &CaveConfig) -> Result<CaveLayout> {
        generate_cave(&self.config_for_floor(base, self.current_floor))
    }
}

/// System: build floor 1 at startup
pub fn generate_first_floor(
    settings: Res<CaveSettings>,
    progress: Res<DungeonProgress>,
    mut ready_events: EventWriter<FloorReadyEvent>,
    mut commands: Commands,
) {
    publish_floor(&settings.0, &progress, &mut ready_events, &mut commands);
}

/// System: generate floors on transition requests
pub fn handle_floor_transitions(
    mut transition_events: EventReader<FloorTransitionEvent>,
    mut ready_events: EventWriter<FloorReadyEvent>,
    settings: Res<CaveSettings>,
    mut progress: ResMut<DungeonProgress>,
    mut commands: Commands,
) {
    for event in transition_events.read() {
        if *event == FloorTransitionEvent::Descend {
            progress.advance();
        }
        publish_floor(&settings.0, &progress, &mut ready_events, &mut commands);
    }
}

fn publish_floor(
    base: &CaveConfig,
    progress: &DungeonProgress,
    ready_events: &mut EventWriter<FloorReadyEvent>,
    commands: &mut Commands,
) {
    let floor_number = progress.current_floor;
    let kind = LayoutKind::for_floor(floor_number);

    let layout = match progress.generate_current(base) {
        Ok(layout) => layout,
        Err(e) => {
            error!(floor = floor_number, "Floor generation failed: {}", e);
            return;
        }
    };

    commands.insert_resource(ActiveFloor {
        floor_number,
        kind,
        layout: layout.clone(),
    });
    ready_events.send(FloorReadyEvent {
        floor_number,
        kind,
        layout,
    });

    info!(floor = floor_number, ?kind, "Floor ready");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::CavePlugin;
    use crate::logging::LoggingPlugin;

    #[test]
    fn test_progress_new() {
        let progress = DungeonProgress::new(42);
        assert_eq!(progress.current_floor, 1);
        assert_eq!(progress.highest_reached, 1);
    }

    #[test]
    fn test_progress_advance() {
        let mut progress = DungeonProgress::new(42);
        assert_eq!(progress.advance(), 2);
        assert_eq!(progress.advance(), 3);
        assert_eq!(progress.highest_reached, 3);
    }

    #[test]
    fn test_floor_configs_differ_by_seed() {
        let progress = DungeonProgress::new(42);
        let base = CaveConfig::default();
        let one = progress.config_for_floor(&base, 1);
        let two = progress.config_for_floor(&base, 2);
        assert_ne!(one.seed, two.seed);
        assert_eq!(one.room_count, base.room_count);
    }

    #[test]
    fn test_boss_floor_config() {
        let progress = DungeonProgress::new(42);
        let base = CaveConfig::default();
        let boss = progress.config_for_floor(&base, 10);
        assert_eq!(boss.room_count, 1);
        assert_eq!(boss.room_radius, 6);
        let layout = generate_cave(&boss).unwrap();
        assert!(layout.rooms.len() <= 1);
        assert!(layout.is_fully_connected());
    }

    #[test]
    fn test_boss_floor_with_huge_radius() {
        let progress = DungeonProgress {
            current_floor: 10,
            highest_reached: 10,
            ..DungeonProgress::new(42)
        };
        let base = CaveConfig {
            width: 20,
            height: 20,
            room_radius: u32::MAX / 2 + 1,
            max_placement_attempts: 5,
            ..CaveConfig::default()
        };
        let layout = progress.generate_current(&base).unwrap();
        assert!(layout.rooms.is_empty());
        assert_eq!(layout.skipped_rooms, 1);
        assert!(layout.is_fully_connected());
    }

    #[test]
    fn test_floor_generation_consistency() {
        let progress = DungeonProgress::new(42);
        let base = CaveConfig::default();
        let a = progress.generate_current(&base).unwrap();
        let b = progress.generate_current(&base).unwrap();
        assert_eq!(a.grid, b.grid, "Same floor should generate identically");
    }

    #[test]
    fn test_plugin_generates_first_floor() {
        let mut app = App::new();
        app.add_plugins(CavePlugin::new(CaveConfig::default()));
        app.update();

        let floor = app.world().resource::<ActiveFloor>();
        assert_eq!(floor.floor_number, 1);
        assert_eq!(floor.kind, LayoutKind::Standard);
        assert!(floor.layout.is_fully_connected());
    }

    #[test]
    fn test_plugin_descends_on_event() {
        let mut app = App::new();
        app.add_plugins(CavePlugin::new(CaveConfig::default()));
        app.update();
        let first = app.world().resource::<ActiveFloor>().layout.clone();

        app.world_mut().send_event(FloorTransitionEvent::Descend);
        app.update();

        let floor = app.world().resource::<ActiveFloor>();
        assert_eq!(floor.floor_number, 2);
        assert_ne!(floor.layout.grid, first.grid);
        assert_eq!(app.world().resource::<DungeonProgress>().highest_reached, 2);
    }

    #[test]
    fn test_plugin_with_logging() {
        let mut app = App::new();
        app.add_plugins((
            LoggingPlugin::default(),
            CavePlugin::new(CaveConfig::default().with_seed(9)),
        ));
        app.update();
        assert!(app.world().contains_resource::<ActiveFloor>());
    }

    #[test]
    fn test_plugin_regenerate_keeps_floor() {
        let mut app = App::new();
        app.add_plugins(CavePlugin::new(CaveConfig::default()));
        app.update();

        app.world_mut().send_event(FloorTransitionEvent::Regenerate);
        app.update();

        assert_eq!(app.world().resource::<ActiveFloor>().floor_number, 1);
        assert_eq!(app.world().resource::<DungeonProgress>().current_floor, 1);
    }
}
