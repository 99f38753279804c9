//! Conveyor commands.
//!
//! A command tells the actor what to do on its next move. Commands ride the
//! command conveyor from the spawn slot to the front slot; the one at the
//! front is the actor's head command.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommandKind {
    GoStraight,
    TurnLeft,
    TurnRight,
}

impl CommandKind {
    pub const ALL: [CommandKind; 3] = [
        CommandKind::GoStraight,
        CommandKind::TurnLeft,
        CommandKind::TurnRight,
    ];

    pub fn is_turn(self) -> bool {
        !matches!(self, CommandKind::GoStraight)
    }

    /// Key used for this kind in the `[commands]` config section.
    pub fn config_key(self) -> &'static str {
        match self {
            CommandKind::GoStraight => "go_straight",
            CommandKind::TurnLeft => "turn_left",
            CommandKind::TurnRight => "turn_right",
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
}

/// Conveyor lifecycle shared by commands and item icons.
///
/// - `Idle` – resting in its slot, waiting for the board to move
/// - `Slide` – moved to the successor slot, drawn from `start` back to rest
/// - `Pooled` – released to the pool, no slot
/// - `GameOver` – frozen after the actor fell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeltState {
    Idle,
    Slide { start: Vec2 },
    Pooled,
    GameOver,
}

/// State machine payload for commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandState(pub BeltState);
