//! Placement ghost state.
//!
//! While the player is placing an item, a ghost follows the pointer across the
//! board. Each tick the pointer hit is resolved to the four surrounding
//! lattice cells, nearest first, and the ghost snaps to the first one the item
//! accepts ("accepted"). When none accepts, it floats at the raw pointer
//! position ("rejected") and clicks are ignored.
//!
//! Confirmation needs a fresh press: the button-up of the click that opened
//! the ghost has to be seen first, otherwise that same click would place it.

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Resource;
use glam::Vec2;

use crate::components::itemicon::ItemKind;

/// Where the ghost is drawn and whether it can be confirmed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GhostMode {
    /// Snapped to a cell the item accepts.
    Accepted { x: i32, z: i32 },
    /// No acceptable cell nearby; drawn at the raw pointer position.
    Rejected(Vec2),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ghost {
    pub item: ItemKind,
    pub mode: GhostMode,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PlacementState {
    pub ghost: Option<Ghost>,
    /// A button release was seen since the ghost opened.
    pub release_seen: bool,
}

impl PlacementState {
    pub fn in_progress(&self) -> bool {
        self.ghost.is_some()
    }

    /// Open a ghost for `item`, initially rejected at `at`.
    pub fn open(&mut self, item: ItemKind, at: Vec2) {
        self.ghost = Some(Ghost {
            item,
            mode: GhostMode::Rejected(at),
        });
        self.release_seen = false;
    }

    pub fn close(&mut self) {
        self.ghost = None;
        self.release_seen = false;
    }
}

/// The four lattice cells around `(px, pz)`, nearest first.
///
/// Cells are generated floor/floor, floor/ceil, ceil/floor, ceil/ceil and
/// stably sorted by Euclidean distance, so exact ties keep that order.
/// On an integer coordinate floor and ceil coincide and cells repeat.
pub fn lattice_candidates(px: f32, pz: f32) -> ArrayVec<(i32, i32), 4> {
    let (fx, cx) = (px.floor() as i32, px.ceil() as i32);
    let (fz, cz) = (pz.floor() as i32, pz.ceil() as i32);
    let mut cells: ArrayVec<(i32, i32), 4> = [(fx, fz), (fx, cz), (cx, fz), (cx, cz)].into();
    let point = Vec2::new(px, pz);
    let distance = |cell: &(i32, i32)| Vec2::new(cell.0 as f32, cell.1 as f32).distance(point);
    cells.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
    cells
}

/// Resolve the ghost for `item` at pointer `(px, pz)`.
///
/// `has_tile` reports whether a cell is occupied on the grid.
pub fn resolve_ghost(
    item: ItemKind,
    px: f32,
    pz: f32,
    has_tile: impl Fn(i32, i32) -> bool,
) -> GhostMode {
    lattice_candidates(px, pz)
        .into_iter()
        .find(|(x, z)| item.accepts(has_tile(*x, *z)))
        .map_or(GhostMode::Rejected(Vec2::new(px, pz)), |(x, z)| {
            GhostMode::Accepted { x, z }
        })
}
