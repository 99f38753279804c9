//! Game systems.
//!
//! Exclusive systems (`fn(&mut World)`) run once per tick, plus the state
//! hooks and bus callbacks they drive.
//!
//! Submodules overview
//! - [`actor`] – actor state machine and spawning
//! - [`beatclock`] – advance the beat clock and publish `BeatStarted`
//! - [`camera`] – camera follow state
//! - [`command`] – command conveyor spawner and command states
//! - [`conveyor`] – belt lifecycle shared by commands and item icons
//! - [`flow`] – global flow state machine (load, menu, game)
//! - [`itemicon`] – item icon conveyor and icon clicks
//! - [`loader`] – boot loader
//! - [`placement`] – placement ghost and confirmation
//! - [`scene`] – scene load and unload
//! - [`scoreboard`] – move rating and back-to-menu action
//! - [`statemachine`] – generic drive loop and bus plumbing for state machines
//! - [`tile`] – tile states and grid mutation
//! - [`time`] – update simulation time and delta

pub mod actor;
pub mod beatclock;
pub mod camera;
pub mod command;
pub mod conveyor;
pub mod flow;
pub mod itemicon;
pub mod loader;
pub mod placement;
pub mod scene;
pub mod scoreboard;
pub mod statemachine;
pub mod tile;
pub mod time;
