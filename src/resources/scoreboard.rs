//! End-of-run scoreboard.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

/// Moves survived so far and the rating shown once the actor has fallen.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scoreboard {
    pub moves: u32,
    pub comment: &'static str,
    pub visible: bool,
}

impl Scoreboard {
    /// Copy the move counter and refresh the rating.
    pub fn record(&mut self, moves: u32) {
        self.moves = moves;
        self.comment = rating(moves);
    }
}

/// Rating line for a run of `moves`.
pub fn rating(moves: u32) -> &'static str {
    match moves {
        0..10 => "Whoops",
        10..20 => "Not Bad",
        20..40 => "Pretty Good",
        40..80 => "Dang, you're good",
        80..150 => "Super Duper",
        _ => "You are Amazing!!!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_thresholds() {
        assert_eq!(rating(0), "Whoops");
        assert_eq!(rating(9), "Whoops");
        assert_eq!(rating(10), "Not Bad");
        assert_eq!(rating(39), "Pretty Good");
        assert_eq!(rating(40), "Dang, you're good");
        assert_eq!(rating(149), "Super Duper");
        assert_eq!(rating(150), "You are Amazing!!!");
    }

    #[test]
    fn record_updates_comment() {
        let mut board = Scoreboard::default();
        board.record(25);
        assert_eq!(board.moves, 25);
        assert_eq!(board.comment, "Pretty Good");
        assert!(!board.visible);
    }
}
