//! Item icons and the items they place.

use bevy_ecs::prelude::Component;
use serde::Serialize;

use crate::components::command::BeltState;

/// Something the player can put on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemKind {
    /// Plain floor; only where there is no tile yet.
    Floor,
    /// Rotates the actor left; replaces an existing tile.
    TurnTable,
    /// Throws the actor two cells ahead; replaces an existing tile.
    SpringBoard,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Floor, ItemKind::TurnTable, ItemKind::SpringBoard];

    /// Key used for this kind in the `[items]` config section.
    pub fn config_key(self) -> &'static str {
        match self {
            ItemKind::Floor => "floor",
            ItemKind::TurnTable => "turn_table",
            ItemKind::SpringBoard => "spring_board",
        }
    }

    /// Whether this item may be placed on a cell that `has_tile` or not.
    pub fn accepts(self, has_tile: bool) -> bool {
        match self {
            ItemKind::Floor => !has_tile,
            ItemKind::TurnTable | ItemKind::SpringBoard => has_tile,
        }
    }
}

/// A clickable icon on the item conveyor.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemIcon {
    pub item: ItemKind,
}

/// State machine payload for item icons. Same belt lifecycle as commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemIconState(pub BeltState);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_goes_on_holes_and_the_rest_on_tiles() {
        assert!(ItemKind::Floor.accepts(false));
        assert!(!ItemKind::Floor.accepts(true));
        assert!(ItemKind::TurnTable.accepts(true));
        assert!(!ItemKind::SpringBoard.accepts(false));
    }
}
