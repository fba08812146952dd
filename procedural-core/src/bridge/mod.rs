//! FFI Bridge Layer: cave core <-> game engine host
//!
//! This module exposes C-ABI functions a host engine can call via DLL loading.
//! Data is serialized as JSON across the boundary.
//! Every function returning `*mut c_char` hands over a heap-allocated string
//! the caller must release with `free_string`.

use serde::{Deserialize, Serialize};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use tracing::warn;

use crate::generation::floor_manager::DungeonProgress;
use crate::generation::{generate_cave, CaveConfig, CaveLayout, DungeonSeed, LayoutKind, Offset};

// ========================
// Data transfer types
// ========================

/// Cave layout for engine-side rendering and spawning
#[derive(Debug, Serialize, Deserialize)]
pub struct CaveLayoutResponse {
    pub width: usize,
    pub height: usize,
    pub cell_size: f32,
    pub offset: Offset,
    pub seed: u64,
    pub tiles: Vec<Vec<u8>>, // 0 = floor, 1 = wall
    pub spawn: RoomInfo,
    /// Rooms eligible for enemy spawners (never includes spawn)
    pub rooms: Vec<RoomInfo>,
    pub skipped_rooms: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomInfo {
    pub x: usize,
    pub y: usize,
    pub radius: u32,
    pub world_position: [f32; 3],
}

impl From<&CaveLayout> for CaveLayoutResponse {
    fn from(layout: &CaveLayout) -> Self {
        let room_info = |room: &crate::generation::Room| RoomInfo {
            x: room.center.0,
            y: room.center.1,
            radius: room.radius,
            world_position: layout.world_position(room.center.0, room.center.1),
        };

        Self {
            width: layout.width(),
            height: layout.height(),
            cell_size: layout.cell_size,
            offset: layout.offset,
            seed: layout.seed,
            tiles: layout
                .grid
                .tiles
                .iter()
                .map(|row| row.iter().map(|c| c.to_u8()).collect())
                .collect(),
            spawn: room_info(&layout.spawn),
            rooms: layout.rooms.iter().map(room_info).collect(),
            skipped_rooms: layout.skipped_rooms,
        }
    }
}

/// Dungeon floor: layout plus progression metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct DungeonFloorResponse {
    pub floor: u32,
    pub kind: String,
    pub layout: CaveLayoutResponse,
}

/// Error payload returned instead of a layout
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Config validation result
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub error: Option<String>,
}

// ========================
// Helper: safe JSON return
// ========================

fn json_to_cstring<T: Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

fn error_to_cstring(error: impl ToString) -> *mut c_char {
    json_to_cstring(&ErrorResponse {
        error: error.to_string(),
    })
}

fn parse_cstr(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_owned()) }
}

// ========================
// C-ABI: Core
// ========================

/// Version string
#[no_mangle]
pub extern "C" fn get_version() -> *mut c_char {
    CString::new(env!("CARGO_PKG_VERSION"))
        .unwrap_or_default()
        .into_raw()
}

/// Free a string allocated by Rust.
/// Called from the host — ptr must be from a prior Rust FFI allocation or null.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            drop(CString::from_raw(ptr));
        }
    }
}

// ========================
// C-ABI: Cave generation
// ========================

/// Generate a cave from a JSON `CaveConfig` (missing fields use defaults).
/// Null input returns null; malformed JSON or a rejected config returns
/// `{"error": "..."}`.
#[no_mangle]
pub extern "C" fn generate_cave_json(config_json: *const c_char) -> *mut c_char {
    let Some(json_str) = parse_cstr(config_json) else {
        return std::ptr::null_mut();
    };

    let config = match CaveConfig::from_json(&json_str) {
        Ok(config) => config,
        Err(e) => {
            warn!("Unparseable cave config from host: {}", e);
            return error_to_cstring(e);
        }
    };

    match generate_cave(&config) {
        Ok(layout) => json_to_cstring(&CaveLayoutResponse::from(&layout)),
        Err(e) => {
            warn!("Cave config from host failed validation: {}", e);
            error_to_cstring(e)
        }
    }
}

/// Generate a cave with default parameters and the given seed
#[no_mangle]
pub extern "C" fn generate_cave_default(seed: u64) -> *mut c_char {
    match generate_cave(&CaveConfig::default().with_seed(seed)) {
        Ok(layout) => json_to_cstring(&CaveLayoutResponse::from(&layout)),
        Err(e) => error_to_cstring(e),
    }
}

/// Generate dungeon floor `floor` (1-based) with default parameters
#[no_mangle]
pub extern "C" fn generate_dungeon_floor(seed: u64, floor: u32) -> *mut c_char {
    if floor == 0 {
        return error_to_cstring("floor numbers start at 1");
    }

    let progress = DungeonProgress {
        current_floor: floor,
        highest_reached: floor,
        ..DungeonProgress::new(seed)
    };
    match progress.generate_current(&CaveConfig::default()) {
        Ok(layout) => json_to_cstring(&DungeonFloorResponse {
            floor,
            kind: format!("{:?}", LayoutKind::for_floor(floor)),
            layout: CaveLayoutResponse::from(&layout),
        }),
        Err(e) => error_to_cstring(e),
    }
}

/// Deterministic per-floor generation seed
#[no_mangle]
pub extern "C" fn get_floor_seed(seed: u64, floor: u32) -> u64 {
    DungeonSeed { seed }.floor_hash(floor)
}

/// Validate a JSON `CaveConfig` without generating anything
#[no_mangle]
pub extern "C" fn validate_cave_config(config_json: *const c_char) -> *mut c_char {
    let Some(json_str) = parse_cstr(config_json) else {
        return std::ptr::null_mut();
    };

    let result = CaveConfig::from_json(&json_str).and_then(|c| c.validate());
    let response = match result {
        Ok(()) => ValidationResponse {
            valid: true,
            error: None,
        },
        Err(e) => ValidationResponse {
            valid: false,
            error: Some(e.to_string()),
        },
    };
    json_to_cstring(&response)
}

/// Default config as JSON, for hosts building their own
#[no_mangle]
pub extern "C" fn get_default_cave_config() -> *mut c_char {
    json_to_cstring(&CaveConfig::default())
}

// ========================
// Tests
// ========================
