//! Animation cue component.
//!
//! State machines do not play animations. They publish which clip should be
//! showing and how far into it the render adapter should sample, and the
//! adapter does the rest.

use bevy_ecs::prelude::Component;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AnimationCue {
    /// Clip name, e.g. `"Walk"` or `"SpringBoardIdle"`.
    pub clip: &'static str,
    /// Normalized position inside the clip, in `[0, 1)`.
    pub progress: f32,
}

impl AnimationCue {
    pub fn new(clip: &'static str) -> Self {
        Self {
            clip,
            progress: 0.0,
        }
    }

    pub fn set(&mut self, clip: &'static str, progress: f32) {
        self.clip = clip;
        self.progress = progress;
    }
}
