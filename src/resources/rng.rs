//! Seedable random source for weighted draws.

use bevy_ecs::prelude::Resource;
use fastrand::Rng;

/// Random generator shared by every weighted pool draw in a scene.
///
/// Seeding it makes a whole session reproducible, which the integration tests
/// rely on.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub Rng);

impl GameRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => GameRng(Rng::with_seed(seed)),
            None => GameRng(Rng::new()),
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        GameRng::new(None)
    }
}
