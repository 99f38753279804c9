//! Board tiles.
//!
//! A tile occupies one grid cell. Turn tables and springboards animate on the
//! board beat; every kind can be flagged for destruction when an item is
//! placed over it, and its own state machine despawns it on the next tick.

use bevy_ecs::prelude::Component;
use serde::Serialize;

use crate::components::itemicon::ItemKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TileKind {
    Basic,
    TurnTable,
    SpringBoard,
}

impl From<ItemKind> for TileKind {
    fn from(item: ItemKind) -> Self {
        match item {
            ItemKind::Floor => TileKind::Basic,
            ItemKind::TurnTable => TileKind::TurnTable,
            ItemKind::SpringBoard => TileKind::SpringBoard,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub x: i32,
    pub z: i32,
    pub kind: TileKind,
    /// Set by the grid when the tile is replaced; polled by every tile state.
    pub pending_destroy: bool,
    /// Yaw of the turn table top in degrees. Unused by other kinds.
    pub table_yaw: f32,
}

impl Tile {
    pub fn new(x: i32, z: i32, kind: TileKind) -> Self {
        Self {
            x,
            z,
            kind,
            pending_destroy: false,
            table_yaw: 0.0,
        }
    }
}

/// Tile behaviour.
///
/// `Spin` and `Spring` are only entered by turn tables and springboards
/// respectively; basic tiles stay `Idle` until destroyed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileState {
    Idle,
    Spin { start_yaw: f32 },
    Spring,
    Destroy,
}
