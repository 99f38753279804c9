//! ECS components for entities.
//!
//! Components hold per-entity data; behaviour lives in the state enums driven
//! by [`crate::systems`].
//!
//! Submodules overview:
//! - [`actor`] – grid cell, heading and behaviour states of the walking actor
//! - [`animationcue`] – clip name and normalized position for the render adapter
//! - [`camera`] – follow camera rig
//! - [`command`] – conveyor commands and the shared belt lifecycle
//! - [`conveyed`] – slot occupancy of an entity riding a conveyor
//! - [`flow`] – global flow states, loader and menu button
//! - [`itemicon`] – item icons and the placeable item kinds
//! - [`pose`] – world-space position and yaw
//! - [`scenetag`] – which scene owns an entity
//! - [`service`] – signal-listening stand-ins for scene resources
//! - [`statemachine`] – generic per-entity finite state machine
//! - [`tile`] – board tiles and their states

pub mod actor;
pub mod animationcue;
pub mod camera;
pub mod command;
pub mod conveyed;
pub mod flow;
pub mod itemicon;
pub mod pose;
pub mod scenetag;
pub mod service;
pub mod statemachine;
pub mod tile;
