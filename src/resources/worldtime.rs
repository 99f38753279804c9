use bevy_ecs::prelude::Resource;

/// Frame time shared by every system of one tick.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct WorldTime {
    /// Seconds since the runtime started.
    pub elapsed: f32,
    /// Seconds covered by the current tick.
    pub delta: f32,
    /// Number of ticks run so far.
    pub ticks: u64,
}
