use bevy_ecs::prelude::*;
use log::info;

use crate::components::flow::Loader;
use crate::events::signal::Signal;
use crate::resources::signalbus::{AppBus, publish};

/// Fire `FinishedLoading` once per loader, on its first tick.
pub fn run_loader(world: &mut World) {
    let pending: Vec<Entity> = world
        .query::<(Entity, &Loader)>()
        .iter(world)
        .filter(|(_, loader)| !loader.fired)
        .map(|(e, _)| e)
        .collect();
    for entity in pending {
        if let Some(mut loader) = world.get_mut::<Loader>(entity) {
            loader.fired = true;
        }
        info!("loader {:?}: finished", entity);
        publish::<AppBus>(world, Signal::FinishedLoading);
    }
}
