//! Placement handler.
//!
//! - [`on_placement_signal`] – placement service: an icon click opens a ghost
//! - [`update_placement`] – per tick: track the pointer, resolve the ghost,
//!   and confirm on a fresh press
//!
//! Confirming publishes `ItemLocationSelected`; the grid service does the
//! actual placement.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info};

use crate::components::itemicon::ItemIcon;
use crate::events::signal::Signal;
use crate::resources::input::PointerInput;
use crate::resources::placement::{GhostMode, PlacementState, resolve_ghost};
use crate::resources::signalbus::{GameBus, publish};
use crate::resources::tilegrid::TileGrid;

fn pointer_point(world: &World) -> Option<Vec2> {
    let hit = world.get_resource::<PointerInput>()?.world_hit?;
    Some(Vec2::new(hit.x, hit.z))
}

/// Placement service listener.
pub fn on_placement_signal(world: &mut World, _service: Entity, signal: &Signal) {
    let Signal::ItemIconClicked(icon) = *signal else {
        return;
    };
    let Some(item) = world.get::<ItemIcon>(icon).map(|i| i.item) else {
        return;
    };
    let at = pointer_point(world).unwrap_or(Vec2::ZERO);
    if let Some(mut placement) = world.get_resource_mut::<PlacementState>() {
        placement.open(item, at);
        info!("placement: picking a cell for {:?}", item);
    }
    resolve(world);
}

/// Re-resolve the open ghost against the current pointer and grid.
fn resolve(world: &mut World) {
    let Some(point) = pointer_point(world) else {
        return;
    };
    let Some(item) = world
        .get_resource::<PlacementState>()
        .and_then(|p| p.ghost)
        .map(|g| g.item)
    else {
        return;
    };
    let mode = {
        let grid = world.resource::<TileGrid>();
        resolve_ghost(item, point.x, point.y, |x, z| grid.contains(x, z))
    };
    if let Some(ghost) = world.resource_mut::<PlacementState>().ghost.as_mut() {
        ghost.mode = mode;
    }
}

/// Per-tick placement input handling.
pub fn update_placement(world: &mut World) {
    let Some(input) = world.get_resource::<PointerInput>().copied() else {
        return;
    };
    let open = world
        .get_resource::<PlacementState>()
        .is_some_and(PlacementState::in_progress);
    if open {
        if input.released {
            world.resource_mut::<PlacementState>().release_seen = true;
        }
        resolve(world);

        let placement = world.resource::<PlacementState>().clone();
        if input.pressed
            && placement.release_seen
            && let Some(ghost) = placement.ghost
        {
            match ghost.mode {
                GhostMode::Accepted { x, z } => {
                    world.resource_mut::<PlacementState>().close();
                    publish::<GameBus>(
                        world,
                        Signal::ItemLocationSelected {
                            item: ghost.item,
                            x,
                            z,
                        },
                    );
                }
                GhostMode::Rejected(at) => {
                    debug!("placement: no cell for {:?} near {:?}", ghost.item, at);
                }
            }
        }
    }
    world.resource_mut::<PointerInput>().clear_edges();
}
