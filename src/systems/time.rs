//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per tick, before the schedule runs.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is the frame delta in seconds. Negative deltas are clamped to zero.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let dt = dt.max(0.0);
    wt.elapsed += dt;
    wt.delta = dt;
    wt.ticks += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_elapsed_and_counts_ticks() {
        let mut world = World::new();
        world.init_resource::<WorldTime>();
        update_world_time(&mut world, 0.25);
        update_world_time(&mut world, 0.5);
        let wt = world.resource::<WorldTime>();
        assert_eq!(wt.elapsed, 0.75);
        assert_eq!(wt.delta, 0.5);
        assert_eq!(wt.ticks, 2);
    }
}
