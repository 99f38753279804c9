//! Scene service entities.
//!
//! Scene resources (the beat clock, the grid, the spawners, the placement
//! handler, the scoreboard) react to signals too. The bus identifies
//! listeners by entity, so each of them is represented by one service entity
//! spawned with the scene. The service entity owns the subscription; the
//! callback then works on the resource.

use bevy_ecs::prelude::Component;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Stops the beat clock counting moves once the actor falls.
    Clock,
    /// Applies confirmed placements to the tile grid.
    Grid,
    /// Inserts a command at the back of the command conveyor.
    CommandSpawner,
    /// Inserts an item icon at the back of the icon conveyor.
    IconSpawner,
    /// Opens placement ghosts when an item icon is clicked.
    Placement,
    /// Tracks moves and shows the final rating.
    Scoreboard,
}
