//! Beat clock resource.
//!
//! The [`BeatClock`] partitions wall-clock time into fixed-length phases
//! ([`Beat`]s). It is advanced once per tick by
//! [`advance_beat_clock`](crate::systems::beatclock::advance_beat_clock), which
//! publishes a `BeatStarted` signal for every phase boundary crossed.
//!
//! # Timing contract
//!
//! - Overshoot is carried over: crossing a boundary subtracts exactly one
//!   period, it never resets the accumulator. Long runs do not drift.
//! - Several periods elapsing in one tick produce several beats, one per
//!   period, in order.
//! - [`BeatClock::progress`] is always in `[0, 1)` after a tick and is what
//!   every state machine uses to interpolate within a phase.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

/// A phase of the repeating beat cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Beat {
    /// Only ever the initial phase; never published.
    #[default]
    Intro,
    /// The actor commits to its next move.
    ActorMove,
    /// The board (conveyors, tiles) shifts and the actor lands.
    BoardMove,
}

impl Beat {
    /// The phase that follows `self`.
    pub fn next(self) -> Beat {
        match self {
            Beat::Intro => Beat::ActorMove,
            Beat::ActorMove => Beat::BoardMove,
            Beat::BoardMove => Beat::ActorMove,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct BeatClock {
    period: f32,
    elapsed: f32,
    current: Beat,
    moves_completed: u32,
    game_over: bool,
}

impl BeatClock {
    /// Create a clock in the `Intro` phase.
    ///
    /// `period` is the phase length in seconds and must be positive; the
    /// configuration layer rejects anything else before it gets here.
    pub fn new(period: f32) -> Self {
        debug_assert!(period > 0.0, "beat period must be positive, got {period}");
        Self {
            period,
            elapsed: 0.0,
            current: Beat::Intro,
            moves_completed: 0,
            game_over: false,
        }
    }

    /// Add frame time to the accumulator without crossing any boundary.
    pub fn accumulate(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Cross one phase boundary if a full period is pending.
    ///
    /// Returns the new phase, or `None` once the accumulator is below one
    /// period. Call in a loop until it returns `None`.
    pub fn next_beat(&mut self) -> Option<Beat> {
        if self.elapsed < self.period {
            return None;
        }
        self.elapsed -= self.period;
        self.current = self.current.next();
        if self.current == Beat::ActorMove && !self.game_over {
            self.moves_completed += 1;
        }
        Some(self.current)
    }

    /// Fraction of the current phase already elapsed.
    pub fn progress(&self) -> f32 {
        self.elapsed / self.period
    }

    pub fn current(&self) -> Beat {
        self.current
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    pub fn moves_completed(&self) -> u32 {
        self.moves_completed
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Stop counting moves. Set when the actor starts falling.
    pub fn set_game_over(&mut self) {
        self.game_over = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(clock: &mut BeatClock) -> Vec<Beat> {
        std::iter::from_fn(|| clock.next_beat()).collect()
    }

    #[test]
    fn cycle_starts_with_intro_and_never_returns() {
        let mut clock = BeatClock::new(0.5);
        assert_eq!(clock.current(), Beat::Intro);
        clock.accumulate(0.5 * 6.0);
        assert_eq!(
            drain(&mut clock),
            vec![
                Beat::ActorMove,
                Beat::BoardMove,
                Beat::ActorMove,
                Beat::BoardMove,
                Beat::ActorMove,
                Beat::BoardMove,
            ]
        );
    }

    #[test]
    fn exact_multiple_of_period_fires_exactly_k_beats() {
        let mut clock = BeatClock::new(0.5);
        let mut beats = Vec::new();
        for _ in 0..8 {
            clock.accumulate(0.25);
            beats.extend(drain(&mut clock));
        }
        assert_eq!(beats.len(), 4);
        assert_eq!(clock.moves_completed(), 2);
        assert_eq!(clock.progress(), 0.0);
    }

    #[test]
    fn overshoot_is_carried_over() {
        let mut clock = BeatClock::new(0.5);
        clock.accumulate(0.75);
        assert_eq!(drain(&mut clock), vec![Beat::ActorMove]);
        assert_eq!(clock.progress(), 0.5);
        clock.accumulate(0.25);
        assert_eq!(drain(&mut clock), vec![Beat::BoardMove]);
        assert_eq!(clock.progress(), 0.0);
    }

    #[test]
    fn below_one_period_fires_nothing() {
        let mut clock = BeatClock::new(1.0);
        clock.accumulate(0.5);
        assert!(drain(&mut clock).is_empty());
        assert_eq!(clock.current(), Beat::Intro);
        assert_eq!(clock.progress(), 0.5);
    }

    #[test]
    fn moves_stop_counting_after_game_over() {
        let mut clock = BeatClock::new(0.5);
        clock.accumulate(1.0);
        drain(&mut clock);
        assert_eq!(clock.moves_completed(), 1);
        clock.set_game_over();
        clock.accumulate(2.0);
        assert_eq!(drain(&mut clock).len(), 4);
        assert_eq!(clock.moves_completed(), 1);
    }
}
