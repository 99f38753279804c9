//! Global application flow.
//!
//! One process-wide entity carries `StateMachine<FlowState>`:
//!
//! ```text
//! Load ──FinishedLoading──▶ Menu ──StartPressed──▶ Game ──GameOver──▶ Menu ...
//! ```
//!
//! Entering `Menu` or `Game` loads that scene; leaving it unsubscribes first
//! and then unloads the scene.

use bevy_ecs::prelude::Component;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowState {
    Load,
    Menu,
    Game,
}

/// Marker for the global flow entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct GlobalFlow;

/// Boot loader. Publishes `FinishedLoading` on its first tick.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Loader {
    pub fired: bool,
}

/// The menu's start button.
#[derive(Component, Debug, Clone, Copy)]
pub struct StartButton;
