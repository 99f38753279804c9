//! Scene loading and unloading.
//!
//! A scene is a set of resources plus every entity tagged with its
//! [`SceneTag`]. Loading inserts the resources, spawns the entities and
//! registers the scene's service listeners; unloading despawns the tagged
//! entities and removes the resources, bus included, so nothing subscribed in
//! a scene can outlive it.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::actor::Heading;
use crate::components::command::CommandKind;
use crate::components::flow::StartButton;
use crate::components::itemicon::ItemKind;
use crate::components::scenetag::SceneTag;
use crate::components::service::Service;
use crate::components::tile::TileKind;
use crate::events::signal::SignalKind;
use crate::resources::beatclock::BeatClock;
use crate::resources::conveyor::{CommandConveyor, IconConveyor};
use crate::resources::gameconfig::GameConfig;
use crate::resources::placement::PlacementState;
use crate::resources::pool::{self, Pool};
use crate::resources::rng::GameRng;
use crate::resources::scoreboard::Scoreboard;
use crate::resources::signalbus::{GameBus, MenuBus, SignalBus, SignalCallback, subscribe};
use crate::resources::tilegrid::{TileGrid, disk_cells};
use crate::systems::actor::spawn_actor;
use crate::systems::beatclock::on_clock_signal;
use crate::systems::camera::spawn_camera;
use crate::systems::command::{fill_command_conveyor, on_command_spawner_signal};
use crate::systems::itemicon::on_icon_spawner_signal;
use crate::systems::placement::on_placement_signal;
use crate::systems::scoreboard::on_scoreboard_signal;
use crate::systems::tile::{on_grid_signal, spawn_tile};

fn despawn_tagged(world: &mut World, tag: SceneTag) -> usize {
    let entities: Vec<Entity> = world
        .query::<(Entity, &SceneTag)>()
        .iter(world)
        .filter(|(_, t)| **t == tag)
        .map(|(e, _)| e)
        .collect();
    for entity in &entities {
        world.despawn(*entity);
    }
    entities.len()
}

pub fn load_menu_scene(world: &mut World) {
    world.insert_resource(SignalBus::<MenuBus>::new());
    world.spawn((StartButton, SceneTag::Menu));
    info!("menu scene loaded");
}

pub fn unload_menu_scene(world: &mut World) {
    let despawned = despawn_tagged(world, SceneTag::Menu);
    world.remove_resource::<SignalBus<MenuBus>>();
    info!("menu scene unloaded ({} entities)", despawned);
}

fn spawn_service(world: &mut World, service: Service, kinds: &[SignalKind], callback: SignalCallback) {
    let entity = world.spawn((service, SceneTag::Game)).id();
    for kind in kinds {
        subscribe::<GameBus>(world, *kind, entity, callback);
    }
}

/// Build the game scene from the process-wide [`GameConfig`].
pub fn load_game_scene(world: &mut World) {
    let config = world.get_resource::<GameConfig>().cloned().unwrap_or_default();

    world.insert_resource(SignalBus::<GameBus>::new());
    world.insert_resource(BeatClock::new(config.seconds_per_beat));
    world.insert_resource(TileGrid::new());
    world.insert_resource(GameRng::new(config.seed));
    world.insert_resource(CommandConveyor::new(config.command_slots));
    world.insert_resource(IconConveyor::new(config.icon_slots));
    world.insert_resource(Pool::<CommandKind>::new(config.commands.clone()));
    world.insert_resource(Pool::<ItemKind>::new(config.items.clone()));
    world.insert_resource(PlacementState::default());
    world.insert_resource(Scoreboard::default());

    for (x, z) in disk_cells(config.start_platform_radius) {
        spawn_tile(world, x, z, TileKind::Basic);
    }

    spawn_service(world, Service::Clock, &[SignalKind::FallStarted], on_clock_signal);
    spawn_service(
        world,
        Service::Grid,
        &[SignalKind::ItemLocationSelected],
        on_grid_signal,
    );
    spawn_service(
        world,
        Service::CommandSpawner,
        &[SignalKind::BeatStarted],
        on_command_spawner_signal,
    );
    spawn_service(
        world,
        Service::IconSpawner,
        &[SignalKind::BeatStarted],
        on_icon_spawner_signal,
    );
    spawn_service(
        world,
        Service::Placement,
        &[SignalKind::ItemIconClicked],
        on_placement_signal,
    );
    spawn_service(
        world,
        Service::Scoreboard,
        &[SignalKind::BeatStarted, SignalKind::FallFinished],
        on_scoreboard_signal,
    );

    pool::seed::<CommandKind>(world);
    pool::seed::<ItemKind>(world);
    fill_command_conveyor(world);

    spawn_actor(world, 0, 0, Heading::North);
    spawn_camera(world, config.camera_offset, config.min_fly_speed);

    info!(
        "game scene loaded: {} tiles, {} command slots, {}s per beat",
        world.resource::<TileGrid>().len(),
        config.command_slots,
        config.seconds_per_beat
    );
}

pub fn unload_game_scene(world: &mut World) {
    let despawned = despawn_tagged(world, SceneTag::Game);
    world.remove_resource::<SignalBus<GameBus>>();
    world.remove_resource::<BeatClock>();
    world.remove_resource::<TileGrid>();
    world.remove_resource::<GameRng>();
    world.remove_resource::<CommandConveyor>();
    world.remove_resource::<IconConveyor>();
    world.remove_resource::<Pool<CommandKind>>();
    world.remove_resource::<Pool<ItemKind>>();
    world.remove_resource::<PlacementState>();
    world.remove_resource::<Scoreboard>();
    info!("game scene unloaded ({} entities)", despawned);
}
