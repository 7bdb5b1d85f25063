use crate::math::Matrix2D;
use std::time::{Duration, Instant};

/// Length of every transformation transition
pub const TRANSITION_DURATION: Duration = Duration::from_millis(1000);

/// Quadratic ease-in-out of linear progress in `[0, 1]`
pub fn ease_in_out(progress: f64) -> f64 {
    if progress < 0.5 {
        2.0 * progress * progress
    } else {
        1.0 - (-2.0 * progress + 2.0).powi(2) / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum AnimationState {
    Idle,
    Animating { started_at: Instant },
}

/// Animates the displayed transformation from the identity to a target.
///
/// Call [`AnimationDriver::tick`] once per frame; [`AnimationDriver::value`]
/// is the eased interpolation factor to render with. A new request while a
/// transition runs restarts the transition against the new target.
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    state: AnimationState,
    target: Matrix2D,
    resting: Matrix2D,
    value: f64,
    duration: Duration,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self {
            state: AnimationState::Idle,
            target: Matrix2D::identity(),
            resting: Matrix2D::identity(),
            value: 1.0,
            duration: TRANSITION_DURATION,
        }
    }

    /// Starts a transition towards `target`, superseding any running one
    pub fn request(&mut self, target: Matrix2D, now: Instant) {
        if self.is_animating() {
            log::debug!("Retargeting transition to {target}");
        } else {
            log::debug!("Starting transition to {target}");
        }
        self.state = AnimationState::Animating { started_at: now };
        self.target = target;
        self.value = 0.0;
    }

    /// Advances the transition to `now` and returns the eased value
    pub fn tick(&mut self, now: Instant) -> f64 {
        let AnimationState::Animating { started_at } = self.state else {
            return self.value;
        };

        let elapsed = now.saturating_duration_since(started_at);
        let progress = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);

        if progress >= 1.0 {
            log::debug!("Transition to {} finished", self.target);
            self.state = AnimationState::Idle;
            self.resting = self.target;
            self.value = 1.0;
        } else {
            self.value = ease_in_out(progress);
        }
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimationState::Animating { .. })
    }

    /// The most recently requested transformation
    pub fn target(&self) -> Matrix2D {
        self.target
    }

    /// The last transformation a transition completed on
    pub fn resting(&self) -> Matrix2D {
        self.resting
    }

    /// The transformation to draw this frame
    pub fn display_matrix(&self) -> Matrix2D {
        Matrix2D::identity().lerp(&self.target, self.value)
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new()
    }
}
