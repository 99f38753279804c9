//! tempobot library.
//!
//! Beat-synchronized tile rhythm puzzle core: ECS components, resources,
//! systems and signals, plus the [`game::GameRuntime`] facade used by the
//! binary and the integration tests.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
