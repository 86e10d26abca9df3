//! Animation state: progress, trail and the Idle/Animating/Complete machine.
//!
//! ```text
//!   ┌──────┐  begin()   ┌───────────┐ progress == 1 ┌──────────┐
//!   │ Idle │ ─────────► │ Animating │ ────────────► │ Complete │
//!   └──────┘            └───────────┘               └──────────┘
//!       ▲                  │    ▲                         │
//!       │                  └────┘ advance_to()            │
//!       └──────────────────── reset() ────────────────────┘
//! ```

use crate::coordinate::{interpolate, Coordinate};
use crate::path::Path;
use crate::progress::Progress;
use serde::{Deserialize, Serialize};

/// Lifecycle state of one animation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    Idle,
    Animating,
    Complete,
}

impl std::fmt::Display for AnimationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AnimationState::Idle => "idle",
            AnimationState::Animating => "animating",
            AnimationState::Complete => "complete",
        };
        write!(f, "{}", name)
    }
}

/// Progress and trail of a marker travelling from `start` to `end`.
#[derive(Debug, Clone)]
pub struct Animation {
    start: Coordinate,
    end: Coordinate,
    progress: Progress,
    path: Path,
    state: AnimationState,
    steps: u64,
}

impl Animation {
    /// Creates an idle animation with `Path = [start]` and zero progress.
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self {
            start,
            end,
            progress: Progress::START,
            path: Path::starting_at(start),
            state: AnimationState::Idle,
            steps: 0,
        }
    }

    /// Idle -> Animating. Returns false if the animation was not idle.
    pub fn begin(&mut self) -> bool {
        if self.state != AnimationState::Idle {
            return false;
        }
        self.state = AnimationState::Animating;
        true
    }

    /// Moves the marker to `target` progress and appends the new position.
    ///
    /// Returns `None` without touching any state unless the animation is
    /// `Animating`. Progress never decreases: a lower target keeps the
    /// current value.
    pub fn advance_to(&mut self, target: Progress) -> Option<Coordinate> {
        if self.state != AnimationState::Animating {
            return None;
        }

        let next = self.progress.max(target);
        let position = interpolate(self.start, self.end, next.value());

        self.progress = next;
        self.path.push(position);
        self.steps += 1;

        if next.is_complete() {
            self.state = AnimationState::Complete;
        }
        Some(position)
    }

    /// Discards progress and trail and returns to Idle.
    pub fn reset(&mut self) {
        *self = Self::new(self.start, self.end);
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn end(&self) -> Coordinate {
        self.end
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Number of successful `advance_to` calls.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Current marker position (the last trail point).
    pub fn position(&self) -> Coordinate {
        self.path.last()
    }

    pub fn is_complete(&self) -> bool {
        self.state == AnimationState::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Animation {
        Animation::new(Coordinate::new(27.5620, 80.6820), Coordinate::new(26.8467, 80.9462))
    }

    #[test]
    fn test_new_animation_is_idle() {
        let anim = route();
        assert_eq!(anim.state(), AnimationState::Idle);
        assert_eq!(anim.progress(), Progress::START);
        assert_eq!(anim.path().len(), 1);
        assert_eq!(anim.position(), anim.start());
    }

    #[test]
    fn test_idle_does_not_advance() {
        let mut anim = route();
        assert_eq!(anim.advance_to(Progress::new(0.5)), None);
        assert_eq!(anim.path().len(), 1);
        assert_eq!(anim.steps(), 0);
    }

    #[test]
    fn test_begin_only_from_idle() {
        let mut anim = route();
        assert!(anim.begin());
        assert!(!anim.begin());
        assert_eq!(anim.state(), AnimationState::Animating);
    }

    #[test]
    fn test_advance_to_complete() {
        let mut anim = route();
        anim.begin();

        let mid = anim.advance_to(Progress::new(0.5)).unwrap();
        assert_eq!(anim.state(), AnimationState::Animating);
        assert_eq!(anim.path().last(), mid);

        let end = anim.advance_to(Progress::COMPLETE).unwrap();
        assert_eq!(end, anim.end());
        assert!(anim.is_complete());
        assert_eq!(anim.path().len(), 3);
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut anim = route();
        anim.begin();
        anim.advance_to(Progress::COMPLETE);

        let before = anim.path().clone();
        assert_eq!(anim.advance_to(Progress::COMPLETE), None);
        assert_eq!(anim.advance_to(Progress::new(0.3)), None);
        assert_eq!(anim.path(), &before);
        assert_eq!(anim.progress(), Progress::COMPLETE);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut anim = route();
        anim.begin();
        anim.advance_to(Progress::new(0.6));
        anim.advance_to(Progress::new(0.2));
        assert_eq!(anim.progress(), Progress::new(0.6));
        assert_eq!(anim.path().len(), 3);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut anim = route();
        anim.begin();
        anim.advance_to(Progress::COMPLETE);

        anim.reset();
        assert_eq!(anim.state(), AnimationState::Idle);
        assert_eq!(anim.path().len(), 1);
        assert_eq!(anim.path().first(), anim.start());
        assert_eq!(anim.steps(), 0);
    }
}
