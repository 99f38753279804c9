//! Signal enum and kind tags.
//!
//! A [`Signal`] is immutable once fired. It is delivered synchronously to every
//! listener subscribed to its [`SignalKind`] and then dropped; buses never keep
//! a history.
//!
//! Which bus carries which signal:
//!
//! | Signal                 | Bus                                             |
//! |------------------------|-------------------------------------------------|
//! | `FinishedLoading`      | [`AppBus`](crate::resources::signalbus::AppBus)   |
//! | `StartPressed`         | [`MenuBus`](crate::resources::signalbus::MenuBus) |
//! | everything else        | [`GameBus`](crate::resources::signalbus::GameBus) |

use bevy_ecs::prelude::Entity;

use crate::components::itemicon::ItemKind;
use crate::resources::beatclock::Beat;

/// A fired signal together with its payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// Boot work is done; the global flow may leave its load state.
    FinishedLoading,
    /// The menu's start button was pressed.
    StartPressed,
    /// The beat clock entered a new phase.
    BeatStarted(Beat),
    /// The actor stepped off the board. Sole game-over trigger.
    FallStarted,
    /// The fall animation finished; the actor is now inert.
    FallFinished,
    /// The player asked to leave the game scene.
    GameOver,
    /// An item icon on the item conveyor was clicked.
    ItemIconClicked(Entity),
    /// A placement ghost was confirmed at a lattice cell.
    ItemLocationSelected { item: ItemKind, x: i32, z: i32 },
}

/// Payload-free tag used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    FinishedLoading,
    StartPressed,
    BeatStarted,
    FallStarted,
    FallFinished,
    GameOver,
    ItemIconClicked,
    ItemLocationSelected,
}

impl Signal {
    /// The subscription key this signal is delivered under.
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::FinishedLoading => SignalKind::FinishedLoading,
            Signal::StartPressed => SignalKind::StartPressed,
            Signal::BeatStarted(_) => SignalKind::BeatStarted,
            Signal::FallStarted => SignalKind::FallStarted,
            Signal::FallFinished => SignalKind::FallFinished,
            Signal::GameOver => SignalKind::GameOver,
            Signal::ItemIconClicked(_) => SignalKind::ItemIconClicked,
            Signal::ItemLocationSelected { .. } => SignalKind::ItemLocationSelected,
        }
    }

    /// The beat carried by a `BeatStarted` signal.
    pub fn beat(&self) -> Option<Beat> {
        match self {
            Signal::BeatStarted(beat) => Some(*beat),
            _ => None,
        }
    }
}
