//! Error type for the fallible parts of the core.
//!
//! Only setup-time and pool operations return errors. Invariant violations
//! inside state machines are reported with `debug_assert!` plus an error log
//! and abandon the operation instead, see the crate docs.

use bevy_ecs::prelude::Entity;

/// Result alias carrying [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A pool was asked for a species it has no entry for.
    #[error("no pool entry for species {0}")]
    UnknownSpecies(String),
    /// A weighted draw was requested over weights summing to zero.
    #[error("pool weights sum to zero, nothing can be drawn")]
    ZeroTotalWeight,
    /// The draw weights add up to more than a `u32` can hold.
    #[error("pool weights overflow u32")]
    WeightOverflow,
    /// An entity was released that is not in the pool's active set.
    #[error("{0:?} is not an active pooled entity")]
    NotActive(Entity),
    #[error("failed to load config file: {0}")]
    ConfigLoad(String),
    #[error("failed to save config file: {0}")]
    ConfigSave(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
