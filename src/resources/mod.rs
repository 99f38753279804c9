//! ECS resources made available to systems.
//!
//! Process-wide resources (`WorldTime`, `GameConfig`, the app bus) live for
//! the whole run. Everything else is scene-scoped: inserted when a scene
//! loads and removed when it unloads.
//!
//! Overview
//! - `beatclock` – fixed-period phase clock and the `Beat` cycle
//! - `conveyor` – slot chains for commands and item icons
//! - `gameconfig` – INI-backed tuning values
//! - `input` – per-tick pointer state written by the input adapter
//! - `placement` – placement ghost and lattice candidate ranking
//! - `pool` – generic active/inactive entity pool with weighted draws
//! - `rng` – seedable random source
//! - `scoreboard` – moves survived and final rating
//! - `signalbus` – scoped publish/subscribe buses
//! - `tilegrid` – sparse cell → tile map and start platform shape
//! - `worldtime` – simulation time and delta
pub mod beatclock;
pub mod conveyor;
pub mod gameconfig;
pub mod input;
pub mod placement;
pub mod pool;
pub mod rng;
pub mod scoreboard;
pub mod signalbus;
pub mod tilegrid;
pub mod worldtime;
