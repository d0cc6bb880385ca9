//! One landmark frame in, one batch of canvas effects out.
//!
//! [`step`] is the whole per-tick pipeline:
//!
//! 1. classify the frame's gesture,
//! 2. wipe the interaction layer and redraw the skeleton (if a hand is
//!    present),
//! 3. run the pen ([`StrokeEngine`]),
//! 4. run the command debouncer ([`ActionDispatcher`]).
//!
//! It is pure in the sense that matters for testing: all state lives in the
//! [`Session`] value passed in and returned, all effects are described as
//! [`CanvasOp`]s, and time is an argument.

use hand_pose::{FrameEvent, Gesture, HandFrame, Landmark};
use ink_canvas::{CanvasOp, LayerId};

use crate::dispatch::{ActionDispatcher, Command};
use crate::stroke::{Mode, StrokeEngine};

#[derive(Clone, Debug, Default)]
pub struct Session {
    pen:        StrokeEngine,
    dispatcher: ActionDispatcher,
}

/// Everything one tick produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub gesture: Gesture,
    /// Effects in application order; always starts with an interaction clear.
    pub ops:     Vec<CanvasOp>,
    pub command: Option<Command>,
}

pub fn step(mut session: Session, event: &FrameEvent, mode: Mode, now_ms: u64) -> (Session, Tick) {
    let gesture = event.gesture();
    let hand = event.hand();

    let mut ops = vec![CanvasOp::Clear(LayerId::Interaction)];
    if let Some(frame) = hand {
        ops.push(CanvasOp::Skeleton { layer: LayerId::Interaction, frame: frame.clone() });
    }
    session.pen.tick(mode, gesture, hand.map(HandFrame::index_tip), &mut ops);
    let command = session.dispatcher.observe(gesture, now_ms);

    (session, Tick { gesture, ops, command })
}

impl Session {
    pub fn new() -> Self { Self::default() }

    /// [`step`] in place.
    pub fn advance(&mut self, event: &FrameEvent, mode: Mode, now_ms: u64) -> Tick {
        let (next, tick) = step(std::mem::take(self), event, mode, now_ms);
        *self = next;
        tick
    }

    pub fn is_drawing(&self) -> bool { self.pen.is_drawing() }
    pub fn stroke(&self) -> &[Landmark] { self.pen.stroke() }
    pub fn last_gesture(&self) -> Gesture { self.dispatcher.last_gesture() }
    pub fn cooldown_end_ms(&self) -> Option<u64> { self.dispatcher.cooldown_end_ms() }

    /// Forget the stroke in progress (shutdown, mode reset).
    pub fn abandon_stroke(&mut self) -> usize {
        self.pen.abandon()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{INK_COLOR, PREVIEW_COLOR};
    use hand_pose::{synth_frame, Pose};
    use ink_canvas::{InkSurface, LayeredCanvas};

    const W: usize = 160;
    const H: usize = 120;

    fn hand(pose: Pose, x: f32, y: f32) -> FrameEvent {
        FrameEvent::Hand(synth_frame(pose, Landmark::new(x, y)))
    }

    struct Rig {
        session: Session,
        canvas:  LayeredCanvas,
        now:     u64,
    }

    impl Rig {
        fn new() -> Self {
            Rig { session: Session::new(), canvas: LayeredCanvas::new(W, H), now: 0 }
        }

        fn tick(&mut self, event: FrameEvent, mode: Mode) -> Tick {
            self.now += 33;
            let tick = self.session.advance(&event, mode, self.now);
            self.canvas.apply_all(&tick.ops);
            tick
        }
    }

    fn mirrored_px(x: f32) -> usize {
        (W as f32 * (1.0 - x)) as usize
    }

    #[test]
    fn every_tick_starts_with_interaction_clear() {
        let mut rig = Rig::new();
        for event in [hand(Pose::Pointing, 0.5, 0.5), FrameEvent::NoHand, hand(Pose::Open, 0.5, 0.5)] {
            let tick = rig.tick(event, Mode::Draw);
            assert_eq!(tick.ops[0], CanvasOp::Clear(LayerId::Interaction));
        }
    }

    #[test]
    fn skeleton_only_when_hand_present() {
        let mut rig = Rig::new();
        let with = rig.tick(hand(Pose::Relaxed, 0.5, 0.5), Mode::Draw);
        assert!(matches!(with.ops[1], CanvasOp::Skeleton { layer: LayerId::Interaction, .. }));
        assert!(!rig.canvas.interaction().is_blank());

        let without = rig.tick(FrameEvent::NoHand, Mode::Draw);
        assert_eq!(without.ops, vec![CanvasOp::Clear(LayerId::Interaction)]);
        assert_eq!(without.gesture, Gesture::None);
        assert!(rig.canvas.interaction().is_blank());
    }

    #[test]
    fn step_leaves_its_input_untouched() {
        let before = Session::new();
        let (after, tick) = step(before.clone(), &hand(Pose::Pointing, 0.3, 0.3), Mode::Draw, 0);
        assert!(!before.is_drawing());
        assert!(after.is_drawing());
        assert_eq!(tick.gesture, Gesture::IndexFingerUp);
    }

    // ── drawing ─────────────────────────────────────────────────────────────

    /// Ten pointing ticks left to right, then the hand leaves.
    fn draw_line(rig: &mut Rig) -> Vec<f32> {
        let xs: Vec<f32> = (0..10).map(|i| 0.2 + i as f32 * 0.6 / 9.0).collect();
        for (i, &x) in xs.iter().enumerate() {
            let tick = rig.tick(hand(Pose::Pointing, x, 0.5), Mode::Draw);
            assert_eq!(tick.gesture, Gesture::IndexFingerUp);
            assert_eq!(rig.session.stroke().len(), i + 1);
            assert!(rig.canvas.persistent().is_blank(), "ink before the stroke ended");
        }
        let end = rig.tick(FrameEvent::NoHand, Mode::Draw);
        let committed: Vec<_> = end.ops.iter()
            .filter_map(|op| match op {
                CanvasOp::Stroke { layer: LayerId::Persistent, points, .. } => Some(points.len()),
                _ => None,
            })
            .collect();
        assert_eq!(committed, vec![10]);
        xs
    }

    #[test]
    fn draw_then_lose_hand_commits_line() {
        let mut rig = Rig::new();
        let xs = draw_line(&mut rig);

        let ink = rig.canvas.persistent();
        for &x in &xs {
            assert_eq!(ink.pixel(mirrored_px(x), 60), INK_COLOR, "x = {x}");
        }
        // Continuous between the end points.
        for px in mirrored_px(0.8)..=mirrored_px(0.2) {
            assert_eq!(ink.pixel(px, 60), INK_COLOR, "gap at column {px}");
        }
        // 8 px wide around y = 60.
        assert_eq!(ink.pixel(80, 56), INK_COLOR);
        assert_eq!(ink.pixel(80, 63), INK_COLOR);
        assert_eq!(ink.alpha_at(80, 55), 0);
        assert_eq!(ink.alpha_at(80, 64), 0);

        assert!(rig.canvas.interaction().is_blank());
        assert!(!rig.session.is_drawing());
        assert!(rig.session.stroke().is_empty());
    }

    #[test]
    fn preview_disappears_once_committed() {
        let mut rig = Rig::new();
        rig.tick(hand(Pose::Pointing, 0.3, 0.5), Mode::Draw);
        rig.tick(hand(Pose::Pointing, 0.4, 0.5), Mode::Draw);
        let preview = rig.canvas.interaction().pixel(mirrored_px(0.35), 60);
        assert_eq!(preview, PREVIEW_COLOR);

        // Hand stays but relaxes: stroke commits, preview is gone.
        rig.tick(hand(Pose::Relaxed, 0.4, 0.5), Mode::Draw);
        assert!(!rig.canvas.interaction().pixels().contains(&PREVIEW_COLOR));
        assert_eq!(rig.canvas.persistent().pixel(mirrored_px(0.35), 60), INK_COLOR);
    }

    #[test]
    fn single_point_episode_leaves_no_ink() {
        let mut rig = Rig::new();
        rig.tick(hand(Pose::Pointing, 0.5, 0.5), Mode::Draw);
        rig.tick(FrameEvent::NoHand, Mode::Draw);
        assert!(rig.canvas.persistent().is_blank());
    }

    #[test]
    fn hand_loss_mid_stroke_still_commits() {
        let mut rig = Rig::new();
        for x in [0.3, 0.4, 0.5] {
            rig.tick(hand(Pose::Pointing, x, 0.5), Mode::Draw);
        }
        rig.tick(FrameEvent::NoHand, Mode::Draw);
        assert!(!rig.canvas.persistent().is_blank());
    }

    #[test]
    fn abandoned_stroke_is_never_inked() {
        let mut rig = Rig::new();
        for x in [0.3, 0.4, 0.5] {
            rig.tick(hand(Pose::Pointing, x, 0.5), Mode::Draw);
        }
        assert_eq!(rig.session.abandon_stroke(), 3);
        rig.tick(FrameEvent::NoHand, Mode::Draw);
        assert!(rig.canvas.persistent().is_blank());
    }

    // ── erasing ─────────────────────────────────────────────────────────────

    #[test]
    fn erasing_along_the_line_removes_it() {
        let mut rig = Rig::new();
        draw_line(&mut rig);
        assert!(!rig.canvas.persistent().is_blank());

        let centres = [0.2, 0.35, 0.5, 0.65, 0.8];
        for x in centres {
            let tick = rig.tick(hand(Pose::Pointing, x, 0.5), Mode::Erase);
            assert_eq!(tick.command, None);
            assert!(rig.session.stroke().is_empty());
        }

        let ink = rig.canvas.persistent();
        for x in centres {
            let (cx, cy) = (mirrored_px(x) as f32, 60.0);
            for py in 0..H {
                for px in 0..W {
                    let (dx, dy) = (px as f32 + 0.5 - cx, py as f32 + 0.5 - cy);
                    if dx * dx + dy * dy <= 24.0 * 24.0 {
                        assert_eq!(ink.alpha_at(px, py), 0, "({px}, {py}) near {x}");
                    }
                }
            }
        }
        assert!(ink.is_blank());
        assert!(!rig.canvas.interaction().pixels().contains(&PREVIEW_COLOR));
    }

    #[test]
    fn erase_then_draw_again() {
        let mut rig = Rig::new();
        rig.tick(hand(Pose::Pointing, 0.5, 0.5), Mode::Erase);
        rig.tick(FrameEvent::NoHand, Mode::Erase);
        assert!(rig.canvas.persistent().is_blank());

        rig.tick(hand(Pose::Pointing, 0.4, 0.5), Mode::Draw);
        rig.tick(hand(Pose::Pointing, 0.6, 0.5), Mode::Draw);
        rig.tick(FrameEvent::NoHand, Mode::Draw);
        assert_eq!(rig.canvas.persistent().pixel(80, 60), INK_COLOR);
    }

    // ── commands ────────────────────────────────────────────────────────────

    #[test]
    fn fist_clears_once_per_cooldown() {
        let mut session = Session::new();
        let relaxed = hand(Pose::Relaxed, 0.5, 0.4);
        let fist = hand(Pose::Fist, 0.5, 0.4);

        assert_eq!(session.advance(&relaxed, Mode::Draw, 0).command, None);
        let first = session.advance(&fist, Mode::Draw, 10);
        assert_eq!(first.gesture, Gesture::Fist);
        assert_eq!(first.command, Some(Command::Clear));

        for i in 0..38u64 {
            let t = 20 + i * 25;
            assert_eq!(session.advance(&fist, Mode::Draw, t).command, None, "t = {t}");
        }
        // Cooldown long over, but the fist never changed.
        assert_eq!(session.advance(&fist, Mode::Draw, 1_500).command, None);
        assert_eq!(session.cooldown_end_ms(), Some(1_010));
    }

    #[test]
    fn open_hand_requests_analysis() {
        let mut session = Session::new();
        let tick = session.advance(&hand(Pose::Open, 0.5, 0.4), Mode::Draw, 0);
        assert_eq!(tick.gesture, Gesture::OpenHand);
        assert_eq!(tick.command, Some(Command::Analyze));
    }

    #[test]
    fn hand_loss_resets_last_gesture() {
        let mut session = Session::new();
        let fist = hand(Pose::Fist, 0.5, 0.4);
        session.advance(&fist, Mode::Draw, 0);
        session.advance(&FrameEvent::NoHand, Mode::Draw, 500);
        assert_eq!(session.last_gesture(), Gesture::None);
        // Fist reappears after the cooldown: counts as a new gesture.
        assert_eq!(session.advance(&fist, Mode::Draw, 1_200).command, Some(Command::Clear));
    }

    #[test]
    fn fist_ends_a_stroke_and_clears() {
        let mut rig = Rig::new();
        rig.tick(hand(Pose::Pointing, 0.3, 0.5), Mode::Draw);
        rig.tick(hand(Pose::Pointing, 0.6, 0.5), Mode::Draw);
        let tick = rig.tick(hand(Pose::Fist, 0.6, 0.5), Mode::Draw);
        // The stroke is committed in the same tick the clear is requested;
        // executing the command is the host's job.
        assert_eq!(tick.command, Some(Command::Clear));
        assert!(!rig.canvas.persistent().is_blank());
    }
}
