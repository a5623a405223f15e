//! Pointer interaction state fed by the host each frame.

use bevy::prelude::*;

/// One pointer sample in normalized viewport coordinates, origin bottom-left.
///
/// `active` is the interaction flag read by the ink splat and the velocity
/// nudge (any value above zero counts). `strength` is a separate channel read
/// by the inverse-square forcing guard, which only trips above 1.0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub active: f32,
    pub strength: f32,
}

impl PointerState {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active > 0.0
    }
}

/// Current and previous pointer samples.
///
/// The previous sample is refreshed per input event, not per frame, so drag
/// vectors are only non-zero while the pointer actually moves.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    pub current: PointerState,
    pub previous: PointerState,
}

impl PointerTracker {
    /// Record a pointer-move event.
    pub fn move_to(&mut self, position: Vec2, strength: f32) {
        self.previous = self.current;
        self.current = PointerState {
            position,
            active: 1.0,
            strength,
        };
    }

    /// Record a pointer-leave event. The current sample is zeroed while the
    /// previous one survives a frame so the solver sees the transition.
    pub fn leave(&mut self) {
        self.previous = self.current;
        self.current = PointerState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_retains_previous_sample() {
        let mut tracker = PointerTracker::default();
        tracker.move_to(Vec2::new(0.2, 0.8), 0.0);
        tracker.move_to(Vec2::new(0.4, 0.6), 2.0);

        assert_eq!(tracker.previous.position, Vec2::new(0.2, 0.8));
        assert_eq!(tracker.current.position, Vec2::new(0.4, 0.6));
        assert_eq!(tracker.current.strength, 2.0);
        assert!(tracker.current.is_active());
    }

    #[test]
    fn leave_zeroes_current_and_keeps_previous() {
        let mut tracker = PointerTracker::default();
        tracker.move_to(Vec2::new(0.5, 0.5), 0.0);
        tracker.leave();

        assert_eq!(tracker.current, PointerState::default());
        assert_eq!(tracker.previous.position, Vec2::new(0.5, 0.5));
        assert!(tracker.previous.is_active());
    }
}
