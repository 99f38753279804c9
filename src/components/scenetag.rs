//! Scene ownership tag.
//!
//! Every entity spawned while loading a scene carries a [`SceneTag`] naming
//! that scene. Unloading a scene despawns exactly the entities tagged with it;
//! untagged entities (the global flow, the loader) live for the whole process.

use bevy_ecs::prelude::Component;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneTag {
    Menu,
    Game,
}
