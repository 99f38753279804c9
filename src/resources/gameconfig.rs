//! Game configuration resource.
//!
//! Tuning values loaded from an INI file. Every value has a safe default, so
//! a missing file or a missing key simply keeps the default. The
//! configuration is read once at startup and is not changed afterwards.
//!
//! # Configuration File Format
//!
//! ```ini
//! [tempo]
//! seconds_per_beat = 0.5
//!
//! [board]
//! start_platform_radius = 4
//!
//! [conveyor]
//! command_slots = 6
//! icon_slots = 5
//!
//! [commands]
//! go_straight_weight = 4
//! go_straight_pool = 6
//! turn_left_weight = 1
//! turn_left_pool = 2
//! turn_right_weight = 1
//! turn_right_pool = 2
//!
//! [items]
//! floor_weight = 2
//! floor_pool = 3
//! turn_table_weight = 1
//! turn_table_pool = 2
//! spring_board_weight = 1
//! spring_board_pool = 2
//!
//! [camera]
//! offset_x = 0.0
//! offset_y = 6.0
//! offset_z = -5.0
//! min_fly_speed = 2.0
//!
//! [rng]
//! seed = 1234
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec3;
use log::info;
use std::path::{Path, PathBuf};

use crate::components::command::CommandKind;
use crate::components::itemicon::ItemKind;
use crate::error::{CoreError, Result};
use crate::resources::pool::{PoolEntry, total_weight};

/// Default safe values for startup
const DEFAULT_SECONDS_PER_BEAT: f32 = 0.5;
const DEFAULT_START_PLATFORM_RADIUS: i32 = 4;
/// Largest start platform; keeps the squared cell distances inside `i32`.
pub const MAX_START_PLATFORM_RADIUS: i32 = 1024;
const DEFAULT_COMMAND_SLOTS: usize = 6;
const DEFAULT_ICON_SLOTS: usize = 5;
const DEFAULT_CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 6.0, -5.0);
const DEFAULT_MIN_FLY_SPEED: f32 = 2.0;
const DEFAULT_CONFIG_PATH: &str = "./tempobot.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Length of one beat phase in seconds.
    pub seconds_per_beat: f32,
    /// Radius of the round platform the actor starts on.
    pub start_platform_radius: i32,
    /// Slots on the command conveyor, spawn slot included.
    pub command_slots: usize,
    /// Slots on the item icon conveyor, spawn slot included.
    pub icon_slots: usize,
    /// Draw weight and pre-built pool size per command kind.
    pub commands: Vec<PoolEntry<CommandKind>>,
    /// Draw weight and pre-built pool size per item kind.
    pub items: Vec<PoolEntry<ItemKind>>,
    /// Camera position relative to the actor.
    pub camera_offset: Vec3,
    pub min_fly_speed: f32,
    /// Fixed seed for the weighted draws; random when absent.
    pub seed: Option<u64>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            seconds_per_beat: DEFAULT_SECONDS_PER_BEAT,
            start_platform_radius: DEFAULT_START_PLATFORM_RADIUS,
            command_slots: DEFAULT_COMMAND_SLOTS,
            icon_slots: DEFAULT_ICON_SLOTS,
            commands: vec![
                entry(CommandKind::GoStraight, 4, 6),
                entry(CommandKind::TurnLeft, 1, 2),
                entry(CommandKind::TurnRight, 1, 2),
            ],
            items: vec![
                entry(ItemKind::Floor, 2, 3),
                entry(ItemKind::TurnTable, 1, 2),
                entry(ItemKind::SpringBoard, 1, 2),
            ],
            camera_offset: DEFAULT_CAMERA_OFFSET,
            min_fly_speed: DEFAULT_MIN_FLY_SPEED,
            seed: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. The result is
    /// validated before it is accepted.
    pub fn load_from_file(&mut self) -> Result<()> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(CoreError::ConfigLoad)?;

        // [tempo] section
        if let Some(spb) = config.getfloat("tempo", "seconds_per_beat").ok().flatten() {
            self.seconds_per_beat = spb as f32;
        }

        // [board] section
        if let Some(radius) = config
            .getint("board", "start_platform_radius")
            .ok()
            .flatten()
        {
            self.start_platform_radius = narrow("board", "start_platform_radius", radius)?;
        }

        // [conveyor] section
        if let Some(slots) = config.getuint("conveyor", "command_slots").ok().flatten() {
            self.command_slots = narrow("conveyor", "command_slots", slots)?;
        }
        if let Some(slots) = config.getuint("conveyor", "icon_slots").ok().flatten() {
            self.icon_slots = narrow("conveyor", "icon_slots", slots)?;
        }

        // [commands] and [items] sections
        read_entries(&config, "commands", &mut self.commands, CommandKind::config_key)?;
        read_entries(&config, "items", &mut self.items, ItemKind::config_key)?;

        // [camera] section
        if let Some(x) = config.getfloat("camera", "offset_x").ok().flatten() {
            self.camera_offset.x = x as f32;
        }
        if let Some(y) = config.getfloat("camera", "offset_y").ok().flatten() {
            self.camera_offset.y = y as f32;
        }
        if let Some(z) = config.getfloat("camera", "offset_z").ok().flatten() {
            self.camera_offset.z = z as f32;
        }
        if let Some(speed) = config.getfloat("camera", "min_fly_speed").ok().flatten() {
            self.min_fly_speed = speed as f32;
        }

        // [rng] section
        if let Some(seed) = config.getuint("rng", "seed").ok().flatten() {
            self.seed = Some(seed);
        }

        self.validate()?;

        info!(
            "Loaded config: {}s/beat, platform radius {}, {} command slots, {} icon slots, seed={:?}",
            self.seconds_per_beat,
            self.start_platform_radius,
            self.command_slots,
            self.icon_slots,
            self.seed
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<()> {
        let mut config = Ini::new();

        config.set(
            "tempo",
            "seconds_per_beat",
            Some(self.seconds_per_beat.to_string()),
        );
        config.set(
            "board",
            "start_platform_radius",
            Some(self.start_platform_radius.to_string()),
        );
        config.set(
            "conveyor",
            "command_slots",
            Some(self.command_slots.to_string()),
        );
        config.set("conveyor", "icon_slots", Some(self.icon_slots.to_string()));

        write_entries(&mut config, "commands", &self.commands, CommandKind::config_key);
        write_entries(&mut config, "items", &self.items, ItemKind::config_key);

        config.set("camera", "offset_x", Some(self.camera_offset.x.to_string()));
        config.set("camera", "offset_y", Some(self.camera_offset.y.to_string()));
        config.set("camera", "offset_z", Some(self.camera_offset.z.to_string()));
        config.set(
            "camera",
            "min_fly_speed",
            Some(self.min_fly_speed.to_string()),
        );
        if let Some(seed) = self.seed {
            config.set("rng", "seed", Some(seed.to_string()));
        }

        config
            .write(&self.config_path)
            .map_err(|e| CoreError::ConfigSave(e.to_string()))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Reject values the core cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.seconds_per_beat > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "seconds_per_beat must be positive, got {}",
                self.seconds_per_beat
            )));
        }
        if !(0..=MAX_START_PLATFORM_RADIUS).contains(&self.start_platform_radius) {
            return Err(CoreError::InvalidConfig(format!(
                "start_platform_radius must be in 0..={MAX_START_PLATFORM_RADIUS}, got {}",
                self.start_platform_radius
            )));
        }
        if self.command_slots < 2 || self.icon_slots < 2 {
            return Err(CoreError::InvalidConfig(format!(
                "conveyors need at least 2 slots, got {} command and {} icon slots",
                self.command_slots, self.icon_slots
            )));
        }
        check_weights("command", &self.commands)?;
        check_weights("item", &self.items)?;
        if !self
            .commands
            .iter()
            .any(|e| e.species == CommandKind::GoStraight)
        {
            return Err(CoreError::InvalidConfig(
                "go_straight must be configured, it is forced after every turn".to_string(),
            ));
        }
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

fn entry<K>(species: K, weight: u32, seed: u32) -> PoolEntry<K> {
    PoolEntry {
        species,
        weight,
        seed,
    }
}

/// Convert an INI integer to the field's type, rejecting out of range values.
fn narrow<T, U>(section: &str, key: &str, value: T) -> Result<U>
where
    T: Copy + std::fmt::Display,
    U: TryFrom<T>,
{
    U::try_from(value).map_err(|_| {
        CoreError::InvalidConfig(format!("{section}.{key} = {value} is out of range"))
    })
}

fn check_weights<K>(label: &str, entries: &[PoolEntry<K>]) -> Result<()> {
    match total_weight(entries) {
        None => Err(CoreError::InvalidConfig(format!(
            "{label} weights overflow u32"
        ))),
        Some(0) => Err(CoreError::InvalidConfig(format!(
            "{label} weights sum to zero"
        ))),
        Some(_) => Ok(()),
    }
}

fn read_entries<K: Copy>(
    config: &Ini,
    section: &str,
    entries: &mut [PoolEntry<K>],
    key: fn(K) -> &'static str,
) -> Result<()> {
    for entry in entries.iter_mut() {
        let name = key(entry.species);
        let weight_key = format!("{name}_weight");
        if let Some(weight) = config.getuint(section, &weight_key).ok().flatten() {
            entry.weight = narrow(section, &weight_key, weight)?;
        }
        let pool_key = format!("{name}_pool");
        if let Some(pool) = config.getuint(section, &pool_key).ok().flatten() {
            entry.seed = narrow(section, &pool_key, pool)?;
        }
    }
    Ok(())
}

fn write_entries<K: Copy>(
    config: &mut Ini,
    section: &str,
    entries: &[PoolEntry<K>],
    key: fn(K) -> &'static str,
) {
    for entry in entries {
        let name = key(entry.species);
        config.set(section, &format!("{name}_weight"), Some(entry.weight.to_string()));
        config.set(section, &format!("{name}_pool"), Some(entry.seed.to_string()));
    }
}
