//! Cave visualization.
//!
//! Renders generated layouts as ASCII maps for the CLI and logs, and flattens
//! them into world-space tile placements for an external renderer.

use serde::{Deserialize, Serialize};

use crate::generation::{CaveLayout, Cell};

const WALL_GLYPH: char = '#';
const FLOOR_GLYPH: char = '.';
const SPAWN_GLYPH: char = 'S';
const ROOM_GLYPH: char = 'R';

/// One tile for a renderer to instantiate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub x: usize,
    pub y: usize,
    pub cell: Cell,
    pub position: [f32; 3],
}

/// ASCII map, row 0 first. Spawn and room centers are marked.
pub fn render_ascii(layout: &CaveLayout) -> String {
    let mut rows: Vec<Vec<char>> = layout
        .grid
        .tiles
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Cell::Wall => WALL_GLYPH,
                    Cell::Floor => FLOOR_GLYPH,
                })
                .collect()
        })
        .collect();

    let marks = layout
        .rooms
        .iter()
        .map(|room| (room.center, ROOM_GLYPH))
        .chain(std::iter::once((layout.spawn_center(), SPAWN_GLYPH)));
    for ((x, y), glyph) in marks {
        // Layouts can arrive deserialized; ignore centers off the grid
        if let Some(cell) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = glyph;
        }
    }

    let mut out = String::with_capacity(layout.width() * layout.height() + layout.height());
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}

/// Every cell with its world-space position, row-major
pub fn tile_placements(layout: &CaveLayout) -> Vec<TilePlacement> {
    layout
        .grid
        .positions()
        .filter_map(|(x, y)| {
            layout.cell(x, y).map(|cell| TilePlacement {
                x,
                y,
                cell,
                position: layout.world_position(x, y),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{generate_cave, CaveConfig, Offset};
    use std::collections::HashSet;

    #[test]
    fn test_ascii_dimensions_and_markers() {
        let layout = generate_cave(&CaveConfig::default()).unwrap();
        let ascii = render_ascii(&layout);
        let lines: Vec<&str> = ascii.lines().collect();
        assert_eq!(lines.len(), layout.height());
        assert!(lines.iter().all(|l| l.chars().count() == layout.width()));
        assert_eq!(ascii.matches(SPAWN_GLYPH).count(), 1);
        let distinct: HashSet<_> = layout.spawner_sites().into_iter().collect();
        assert_eq!(ascii.matches(ROOM_GLYPH).count(), distinct.len());
        assert!(lines[0].chars().all(|c| c == WALL_GLYPH));
    }

    #[test]
    fn test_out_of_range_centers_ignored() {
        let mut layout = generate_cave(&CaveConfig::default()).unwrap();
        let mut stray = layout.spawn;
        stray.center = (500, 3);
        layout.rooms.push(stray);
        layout.spawn.center = (7, 900);

        let json = serde_json::to_string(&layout).unwrap();
        let restored: CaveLayout = serde_json::from_str(&json).unwrap();
        let ascii = render_ascii(&restored);
        assert_eq!(ascii.lines().count(), restored.height());
        assert_eq!(ascii.matches(SPAWN_GLYPH).count(), 0);
    }

    #[test]
    fn test_tile_placements_cover_grid() {
        let config = CaveConfig {
            width: 20,
            height: 15,
            cell_size: 0.5,
            offset: Offset { x: 1.0, y: 2.0 },
            ..CaveConfig::default()
        };
        let layout = generate_cave(&config).unwrap();
        let tiles = tile_placements(&layout);
        assert_eq!(tiles.len(), 300);
        let last = tiles.last().unwrap();
        assert_eq!((last.x, last.y), (19, 14));
        assert_eq!(last.position, [10.5, 9.0, 0.0]);
        assert_eq!(last.cell, Cell::Wall);
        let floors = tiles.iter().filter(|t| t.cell == Cell::Floor).count();
        assert_eq!(floors, layout.grid.floor_count());
    }
}
