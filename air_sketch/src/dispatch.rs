//! Debounced gesture → command dispatch.
//!
//! A command fires on the tick a gesture *changes* to `FIST` (clear) or
//! `OPEN_HAND` (analyze), provided the previous command's cooldown has run
//! out.  The last-seen gesture is latched every tick whether or not anything
//! fired, so holding a pose never re-fires it.

use hand_pose::Gesture;
use tracing::debug;

/// Minimum gap between two dispatched commands.
pub const COOLDOWN_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Wipe the persistent layer.
    Clear,
    /// Send the drawing to the classifier.
    Analyze,
}

#[derive(Clone, Debug, Default)]
pub struct ActionDispatcher {
    last_gesture:    Gesture,
    /// `None` until the first command fires.
    cooldown_end_ms: Option<u64>,
}

impl ActionDispatcher {
    pub fn new() -> Self { Self::default() }

    pub fn last_gesture(&self) -> Gesture { self.last_gesture }
    pub fn cooldown_end_ms(&self) -> Option<u64> { self.cooldown_end_ms }

    fn cooling_down(&self, now_ms: u64) -> bool {
        matches!(self.cooldown_end_ms, Some(end) if now_ms <= end)
    }

    /// Feed this tick's gesture; returns the command to run, if any.
    pub fn observe(&mut self, gesture: Gesture, now_ms: u64) -> Option<Command> {
        let changed = gesture != self.last_gesture;
        self.last_gesture = gesture;
        if !changed {
            return None;
        }
        if self.cooling_down(now_ms) {
            debug!(%gesture, now_ms, "gesture change suppressed by cooldown");
            return None;
        }

        let command = match gesture {
            Gesture::Fist     => Command::Clear,
            Gesture::OpenHand => Command::Analyze,
            Gesture::IndexFingerUp | Gesture::None => return None,
        };
        self.cooldown_end_ms = Some(now_ms.saturating_add(COOLDOWN_MS));
        debug!(?command, now_ms, "command dispatched");
        Some(command)
    }
}
