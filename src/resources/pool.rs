//! Generic object pool for reusable entities.
//!
//! A [`Pool<K>`] partitions every entity it ever created for species type `K`
//! into an active and an inactive set. An entity is always in exactly one of
//! the two. Released entities keep their component values until whoever
//! acquires them next overwrites what it needs.
//!
//! # Usage
//!
//! ```ignore
//! world.insert_resource(Pool::new(vec![
//!     PoolEntry { species: CommandKind::GoStraight, weight: 4, seed: 4 },
//!     PoolEntry { species: CommandKind::TurnLeft, weight: 1, seed: 2 },
//! ]));
//! seed::<CommandKind>(&mut world);
//!
//! let command = acquire_weighted::<CommandKind>(&mut world)?;
//! // ... later, from the command's own Pooled state:
//! world.resource_mut::<Pool<CommandKind>>().release(command)?;
//! ```
//!
//! Construction of new instances is delegated to [`Species::spawn_instance`],
//! so the pool itself never knows which components an instance carries.

use bevy_ecs::prelude::{Entity, Mut, Resource, World};
use fastrand::Rng;
use log::debug;
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::{CoreError, Result};
use crate::resources::rng::GameRng;

/// A closed set of interchangeable entity kinds managed by one pool.
pub trait Species: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Spawn a brand new, not yet activated instance.
    fn spawn_instance(self, world: &mut World) -> Entity;
}

/// Per-species configuration: draw weight and how many instances to pre-build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolEntry<K> {
    pub species: K,
    pub weight: u32,
    pub seed: u32,
}

#[derive(Resource, Debug)]
pub struct Pool<K: Species> {
    entries: Vec<PoolEntry<K>>,
    active: Vec<Entity>,
    inactive: Vec<Entity>,
    species: FxHashMap<Entity, K>,
}

impl<K: Species> Pool<K> {
    pub fn new(entries: Vec<PoolEntry<K>>) -> Self {
        Self {
            entries,
            active: Vec::new(),
            inactive: Vec::new(),
            species: FxHashMap::default(),
        }
    }

    pub fn entries(&self) -> &[PoolEntry<K>] {
        &self.entries
    }

    pub fn has_species(&self, species: K) -> bool {
        self.entries.iter().any(|e| e.species == species)
    }

    /// Move the first inactive instance of `species` to the active set.
    pub fn take_inactive(&mut self, species: K) -> Option<Entity> {
        let index = self
            .inactive
            .iter()
            .position(|e| self.species.get(e) == Some(&species))?;
        let entity = self.inactive.remove(index);
        self.active.push(entity);
        Some(entity)
    }

    /// Register a freshly spawned instance directly as active.
    pub fn adopt(&mut self, entity: Entity, species: K) {
        self.species.insert(entity, species);
        self.active.push(entity);
    }

    /// Register a freshly spawned instance as inactive.
    pub fn stash(&mut self, entity: Entity, species: K) {
        self.species.insert(entity, species);
        self.inactive.push(entity);
    }

    /// Move an active entity back to the inactive set.
    pub fn release(&mut self, entity: Entity) -> Result<()> {
        let index = self
            .active
            .iter()
            .position(|e| *e == entity)
            .ok_or(CoreError::NotActive(entity))?;
        self.active.remove(index);
        self.inactive.push(entity);
        debug!("pool: released {:?}", entity);
        Ok(())
    }

    /// Pick a species proportionally to its weight.
    ///
    /// The draw is uniform over `[0, total)`; the first entry whose cumulative
    /// weight exceeds it wins, so zero-weight entries are never chosen.
    pub fn draw(&self, rng: &mut Rng) -> Result<K> {
        let total = total_weight(&self.entries).ok_or(CoreError::WeightOverflow)?;
        if total == 0 {
            return Err(CoreError::ZeroTotalWeight);
        }
        let mut roll = rng.u32(0..total);
        for entry in &self.entries {
            if roll < entry.weight {
                return Ok(entry.species);
            }
            roll -= entry.weight;
        }
        unreachable!("roll {roll} escaped a total weight of {total}")
    }

    /// First active entity matching `predicate`, in activation order.
    pub fn find_active_where(&self, mut predicate: impl FnMut(Entity) -> bool) -> Option<Entity> {
        self.active.iter().copied().find(|e| predicate(*e))
    }

    pub fn active(&self) -> &[Entity] {
        &self.active
    }

    pub fn inactive(&self) -> &[Entity] {
        &self.inactive
    }

    pub fn is_active(&self, entity: Entity) -> bool {
        self.active.contains(&entity)
    }

    pub fn is_inactive(&self, entity: Entity) -> bool {
        self.inactive.contains(&entity)
    }

    pub fn species_of(&self, entity: Entity) -> Option<K> {
        self.species.get(&entity).copied()
    }
}

/// Sum of the draw weights, or `None` when it does not fit in a `u32`.
pub fn total_weight<K>(entries: &[PoolEntry<K>]) -> Option<u32> {
    entries
        .iter()
        .try_fold(0u32, |total, entry| total.checked_add(entry.weight))
}

/// Pre-build every entry's `seed` count of inactive instances.
pub fn seed<K: Species>(world: &mut World) {
    let entries = world.resource::<Pool<K>>().entries().to_vec();
    for entry in entries {
        for _ in 0..entry.seed {
            let entity = entry.species.spawn_instance(world);
            world.resource_mut::<Pool<K>>().stash(entity, entry.species);
        }
    }
}

/// Get an active instance of `species`, reusing an inactive one if possible.
pub fn acquire<K: Species>(world: &mut World, species: K) -> Result<Entity> {
    let mut pool = world.resource_mut::<Pool<K>>();
    if !pool.has_species(species) {
        return Err(CoreError::UnknownSpecies(format!("{species:?}")));
    }
    if let Some(entity) = pool.take_inactive(species) {
        debug!("pool: reused {:?} as {:?}", entity, species);
        return Ok(entity);
    }
    let entity = species.spawn_instance(world);
    world.resource_mut::<Pool<K>>().adopt(entity, species);
    debug!("pool: spawned {:?} as {:?}", entity, species);
    Ok(entity)
}

/// Draw a species by weight using the scene's [`GameRng`], then acquire it.
pub fn acquire_weighted<K: Species>(world: &mut World) -> Result<(Entity, K)> {
    let species = world.resource_scope(|world, mut rng: Mut<GameRng>| {
        world.resource::<Pool<K>>().draw(&mut rng.0)
    })?;
    let entity = acquire(world, species)?;
    Ok((entity, species))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::Component;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Fruit {
        Apple,
        Pear,
        Plum,
    }

    #[derive(Component)]
    struct Label(Fruit);

    impl Species for Fruit {
        fn spawn_instance(self, world: &mut World) -> Entity {
            world.spawn(Label(self)).id()
        }
    }

    fn make_world(entries: Vec<PoolEntry<Fruit>>) -> World {
        let mut world = World::new();
        world.insert_resource(Pool::new(entries));
        world.insert_resource(GameRng::new(Some(7)));
        world
    }

    fn entry(species: Fruit, weight: u32, seed: u32) -> PoolEntry<Fruit> {
        PoolEntry {
            species,
            weight,
            seed,
        }
    }

    #[test]
    fn seed_fills_inactive_set() {
        let mut world = make_world(vec![entry(Fruit::Apple, 1, 2), entry(Fruit::Pear, 1, 1)]);
        seed::<Fruit>(&mut world);
        let pool = world.resource::<Pool<Fruit>>();
        assert_eq!(pool.inactive().len(), 3);
        assert!(pool.active().is_empty());
    }

    #[test]
    fn release_then_acquire_reuses_same_entity() {
        let mut world = make_world(vec![entry(Fruit::Apple, 1, 0)]);
        let first = acquire(&mut world, Fruit::Apple).unwrap();
        world.resource_mut::<Pool<Fruit>>().release(first).unwrap();
        let second = acquire(&mut world, Fruit::Apple).unwrap();
        assert_eq!(first, second);

        let pool = world.resource::<Pool<Fruit>>();
        assert!(pool.is_active(first));
        assert!(!pool.is_inactive(first));
    }

    #[test]
    fn acquire_prefers_matching_species() {
        let mut world = make_world(vec![entry(Fruit::Apple, 1, 1), entry(Fruit::Pear, 1, 1)]);
        seed::<Fruit>(&mut world);
        let pear = acquire(&mut world, Fruit::Pear).unwrap();
        assert_eq!(world.get::<Label>(pear).unwrap().0, Fruit::Pear);
        assert_eq!(world.resource::<Pool<Fruit>>().inactive().len(), 1);
    }

    #[test]
    fn acquire_unknown_species_is_an_error() {
        let mut world = make_world(vec![entry(Fruit::Apple, 1, 0)]);
        assert!(matches!(
            acquire(&mut world, Fruit::Plum),
            Err(CoreError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn releasing_inactive_entity_is_an_error() {
        let mut world = make_world(vec![entry(Fruit::Apple, 1, 0)]);
        let apple = acquire(&mut world, Fruit::Apple).unwrap();
        let mut pool = world.resource_mut::<Pool<Fruit>>();
        pool.release(apple).unwrap();
        assert!(matches!(pool.release(apple), Err(CoreError::NotActive(_))));
        assert_eq!(pool.inactive().len(), 1);
    }

    #[test]
    fn zero_total_weight_cannot_draw() {
        let pool = Pool::new(vec![entry(Fruit::Apple, 0, 0), entry(Fruit::Pear, 0, 0)]);
        let mut rng = Rng::with_seed(1);
        assert!(matches!(pool.draw(&mut rng), Err(CoreError::ZeroTotalWeight)));
    }

    #[test]
    fn overflowing_total_weight_cannot_draw() {
        let pool = Pool::new(vec![entry(Fruit::Apple, u32::MAX, 0), entry(Fruit::Pear, 1, 0)]);
        let mut rng = Rng::with_seed(1);
        assert_eq!(total_weight(pool.entries()), None);
        assert!(matches!(pool.draw(&mut rng), Err(CoreError::WeightOverflow)));
    }

    #[test]
    fn total_weight_sums_up_to_u32_max() {
        let entries = [entry(Fruit::Apple, u32::MAX - 1, 0), entry(Fruit::Pear, 1, 0)];
        assert_eq!(total_weight(&entries), Some(u32::MAX));
    }

    #[test]
    fn zero_weight_species_is_never_drawn() {
        let pool = Pool::new(vec![
            entry(Fruit::Apple, 0, 0),
            entry(Fruit::Pear, 3, 0),
            entry(Fruit::Plum, 0, 0),
        ]);
        let mut rng = Rng::with_seed(3);
        for _ in 0..500 {
            assert_eq!(pool.draw(&mut rng).unwrap(), Fruit::Pear);
        }
    }

    #[test]
    fn draw_frequencies_follow_weights() {
        let pool = Pool::new(vec![
            entry(Fruit::Apple, 1, 0),
            entry(Fruit::Pear, 3, 0),
            entry(Fruit::Plum, 6, 0),
        ]);
        let mut rng = Rng::with_seed(42);
        let draws = 20_000;
        let mut counts = [0u32; 3];
        for _ in 0..draws {
            match pool.draw(&mut rng).unwrap() {
                Fruit::Apple => counts[0] += 1,
                Fruit::Pear => counts[1] += 1,
                Fruit::Plum => counts[2] += 1,
            }
        }
        let expected = [0.1, 0.3, 0.6];
        for (count, expected) in counts.iter().zip(expected) {
            let freq = *count as f64 / draws as f64;
            assert!((freq - expected).abs() < 0.02, "{freq} vs {expected}");
        }
    }

    #[test]
    fn find_active_where_scans_active_only() {
        let mut world = make_world(vec![entry(Fruit::Apple, 1, 0), entry(Fruit::Pear, 1, 0)]);
        let apple = acquire(&mut world, Fruit::Apple).unwrap();
        let pear = acquire(&mut world, Fruit::Pear).unwrap();
        world.resource_mut::<Pool<Fruit>>().release(pear).unwrap();

        let pool = world.resource::<Pool<Fruit>>();
        let found = pool.find_active_where(|e| pool.species_of(e) == Some(Fruit::Pear));
        assert_eq!(found, None);
        let found = pool.find_active_where(|e| pool.species_of(e) == Some(Fruit::Apple));
        assert_eq!(found, Some(apple));
    }
}
