//! Sparse tile grid.
//!
//! Maps integer cells `(x, z)` to tile entities. A missing cell is not an
//! error: it is a hole, and the actor falls if it steps onto one.

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;

#[derive(Resource, Debug, Default)]
pub struct TileGrid {
    cells: FxHashMap<(i32, i32), Entity>,
}

impl TileGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, x: i32, z: i32) -> Option<Entity> {
        self.cells.get(&(x, z)).copied()
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        self.cells.contains_key(&(x, z))
    }

    /// Store `tile` at `(x, z)`, returning the tile it displaced.
    pub fn insert(&mut self, x: i32, z: i32, tile: Entity) -> Option<Entity> {
        self.cells.insert((x, z), tile)
    }

    pub fn remove(&mut self, x: i32, z: i32) -> Option<Entity> {
        self.cells.remove(&(x, z))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

/// Cells of the round start platform of `radius`.
///
/// A cell is included when the integer part of its distance from the origin
/// does not exceed `radius`.
pub fn disk_cells(radius: i32) -> Vec<(i32, i32)> {
    let mut cells = Vec::new();
    for x in -radius..=radius {
        for z in -radius..=radius {
            let distance = ((x * x + z * z) as f32).sqrt() as i32;
            if distance <= radius {
                cells.push((x, z));
            }
        }
    }
    cells
}
