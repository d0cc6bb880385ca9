//! Top-level application state.
//!
//! `AppState` owns the [`Session`], the [`LayeredCanvas`] it draws on, the
//! classifier slot, and the status line.  [`run`] wires it to a frame source
//! and the visualizer and drives everything at display rate.  Analysis runs
//! on the classifier's own thread; each tick collects a finished answer.

use std::path::PathBuf;
use std::time::Instant;

use hand_pose::{FrameEvent, Gesture};
use ink_canvas::{CanvasOp, InkSurface, LayerId, LayeredCanvas};
use tracing::{debug, info};

use crate::classifier::{self, AnalyzeOutcome, ClassifierSlot};
use crate::dispatch::Command;
use crate::session::{Session, Tick};
use crate::stroke::Mode;
use crate::tracker::{self, FrameSource, ProcessTracker, SimHand};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where frames come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceConfig {
    /// Mouse and keyboard in the window.
    Simulated,
    /// Command line of a pose-estimation helper.
    Tracker(String),
    /// A recorded JSON-lines file.
    Replay(PathBuf),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub width:      usize,
    pub height:     usize,
    pub mode:       Mode,
    pub source:     SourceConfig,
    /// Command line of the drawing classifier; analysis is disabled without it.
    pub classifier: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            width:      1280,
            height:     720,
            mode:       Mode::Draw,
            source:     SourceConfig::Simulated,
            classifier: None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    session:    Session,
    mode:       Mode,
    canvas:     LayeredCanvas,
    classifier: ClassifierSlot,
    gesture:    Gesture,
    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig, classifier: ClassifierSlot) -> Self {
        let status = if classifier.is_available() {
            "Draw something and open your hand to analyze it!".to_string()
        } else {
            "Drawing only: no classifier loaded.".to_string()
        };
        AppState {
            session:    Session::new(),
            mode:       cfg.mode,
            canvas:     LayeredCanvas::new(cfg.width, cfg.height),
            classifier,
            gesture:    Gesture::None,
            status,
        }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            info!(mode = mode.name(), "mode changed");
            self.mode = mode;
        }
    }

    /// Wipe committed ink.  The interaction layer is left to the next tick.
    pub fn clear(&mut self) {
        self.canvas.apply(&CanvasOp::Clear(LayerId::Persistent));
        self.status = "Canvas cleared.".to_string();
        info!("canvas cleared");
    }

    /// Start classifying the committed ink.  Returns without waiting for the
    /// model; see [`AppState::poll_analysis`].
    pub fn analyze(&mut self) -> AnalyzeOutcome {
        let outcome = classifier::analyze(self.canvas.persistent(), &mut self.classifier);
        self.status = outcome.message();
        outcome
    }

    /// Show the classifier's answer if one has arrived since the last call.
    pub fn poll_analysis(&mut self) -> Option<AnalyzeOutcome> {
        let outcome = self.classifier.poll()?;
        self.status = outcome.message();
        Some(outcome)
    }

    /// One tick: collect any finished analysis, run the session, apply its
    /// ops, then its command.
    pub fn handle_frame(&mut self, event: &FrameEvent, now_ms: u64) -> Tick {
        self.poll_analysis();
        let tick = self.session.advance(event, self.mode, now_ms);
        self.canvas.apply_all(&tick.ops);
        if tick.gesture != self.gesture {
            debug!(gesture = %tick.gesture, "gesture");
            self.gesture = tick.gesture;
        }
        match tick.command {
            Some(Command::Clear)   => self.clear(),
            Some(Command::Analyze) => { self.analyze(); }
            None                   => {}
        }
        tick
    }

    /// Drop any stroke in progress and the overlay.
    pub fn stop(&mut self) {
        let dropped = self.session.abandon_stroke();
        if dropped > 0 {
            debug!(points = dropped, "in-progress stroke discarded");
        }
        self.canvas.apply(&CanvasOp::Clear(LayerId::Interaction));
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn mode(&self)    -> Mode            { self.mode }
    pub fn gesture(&self) -> Gesture         { self.gesture }
    pub fn canvas(&self)  -> &LayeredCanvas  { &self.canvas }
    pub fn session(&self) -> &Session        { &self.session }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

enum Driver {
    Sim(SimHand),
    Stream(Box<dyn FrameSource>),
}

/// Run the full application until the window closes, the user quits, or
/// the frame stream ends.
pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    // ── Frame source ──────────────────────────────────────────────────────
    let mut driver = match &cfg.source {
        SourceConfig::Simulated       => Driver::Sim(SimHand::new()),
        SourceConfig::Tracker(cmd)    => Driver::Stream(Box::new(ProcessTracker::spawn(cmd)?)),
        SourceConfig::Replay(path)    => Driver::Stream(Box::new(tracker::open_replay(path)?)),
    };

    // ── Classifier (optional; failure only disables analysis) ────────────
    let slot = classifier::load(cfg.classifier.as_deref());

    let mut vis = Visualizer::new(cfg.width, cfg.height)?;
    let mut app = AppState::new(&cfg, slot);
    info!(width = cfg.width, height = cfg.height, source = ?cfg.source, "air sketch running");

    // ── Main loop ─────────────────────────────────────────────────────────
    let start = Instant::now();
    while vis.is_open() {
        let input = vis.poll_input();
        if input.quit { break; }

        if let Some(mode) = input.mode { app.set_mode(mode); }
        if input.clear   { app.clear(); }
        if input.analyze { app.analyze(); }

        let event = match &mut driver {
            Driver::Sim(sim) => {
                sim.set(input.hand);
                sim.next_frame()
            }
            Driver::Stream(source) => source.next_frame(),
        };
        let Some(event) = event else {
            info!("frame stream ended");
            break;
        };

        let now_ms = start.elapsed().as_millis() as u64;
        app.handle_frame(&event, now_ms);
        vis.render(app.canvas(), app.mode(), app.gesture(), &app.status);
    }

    app.stop();
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, ClassifierError, Prediction, LABELS};
    use hand_pose::{synth_frame, Landmark, Pose};
    use ink_canvas::Thumbnail;
    use std::thread;
    use std::time::Duration;

    struct AlwaysHeart;

    impl Classifier for AlwaysHeart {
        fn classify(&mut self, _: &Thumbnail) -> Result<Prediction, ClassifierError> {
            Prediction::from_probabilities(&[0.05, 0.9, 0.03, 0.02], &LABELS)
        }
    }

    /// Answers "heart" after a fixed delay.
    struct Slow(Duration);

    impl Classifier for Slow {
        fn classify(&mut self, input: &Thumbnail) -> Result<Prediction, ClassifierError> {
            thread::sleep(self.0);
            AlwaysHeart.classify(input)
        }
    }

    fn small() -> AppConfig {
        AppConfig { width: 160, height: 120, ..AppConfig::default() }
    }

    fn make_app() -> AppState {
        AppState::new(&small(), ClassifierSlot::ready(AlwaysHeart))
    }

    fn hand(pose: Pose, x: f32) -> FrameEvent {
        FrameEvent::Hand(synth_frame(pose, Landmark::new(x, 0.5)))
    }

    /// Poll until the classifier's answer lands in the status line.
    fn settle(app: &mut AppState) -> AnalyzeOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = app.poll_analysis() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "classifier never answered");
            thread::sleep(Duration::from_millis(2));
        }
    }

    /// Draw a short stroke and lift.  Returns the clock after the last tick.
    fn scribble(app: &mut AppState, mut now: u64) -> u64 {
        for x in [0.3, 0.4, 0.5, 0.6] {
            now += 33;
            app.handle_frame(&hand(Pose::Pointing, x), now);
        }
        now += 33;
        app.handle_frame(&FrameEvent::NoHand, now);
        now
    }

    #[test]
    fn default_config() {
        let cfg = AppConfig::default();
        assert_eq!((cfg.width, cfg.height), (1280, 720));
        assert_eq!(cfg.mode, Mode::Draw);
        assert_eq!(cfg.source, SourceConfig::Simulated);
        assert!(cfg.classifier.is_none());
    }

    #[test]
    fn frames_leave_ink() {
        let mut app = make_app();
        scribble(&mut app, 0);
        assert!(!app.canvas().persistent().is_blank());
        assert!(app.canvas().interaction().is_blank());
    }

    #[test]
    fn fist_wipes_the_canvas() {
        let mut app = make_app();
        let now = scribble(&mut app, 0);
        let tick = app.handle_frame(&hand(Pose::Fist, 0.5), now + 33);
        assert_eq!(tick.command, Some(Command::Clear));
        assert!(app.canvas().persistent().is_blank());
        assert_eq!(app.status, "Canvas cleared.");
    }

    #[test]
    fn open_hand_reports_prediction() {
        let mut app = make_app();
        let now = scribble(&mut app, 0);
        app.handle_frame(&hand(Pose::Open, 0.5), now + 33);
        assert_eq!(app.status, "Analyzing...");
        assert!(matches!(settle(&mut app), AnalyzeOutcome::Predicted(_)));
        assert_eq!(app.status, "I see a heart! (Confidence: 90%)");
    }

    #[test]
    fn slow_model_does_not_stall_drawing() {
        let mut app = AppState::new(&small(), ClassifierSlot::ready(Slow(Duration::from_millis(500))));
        let mut now = scribble(&mut app, 0);

        now += 33;
        let began = Instant::now();
        let tick = app.handle_frame(&hand(Pose::Open, 0.5), now);
        assert!(began.elapsed() < Duration::from_millis(200), "analyze tick blocked");
        assert_eq!(tick.command, Some(Command::Analyze));
        assert_eq!(app.status, "Analyzing...");

        // The pen keeps working while the model thinks.
        for x in [0.2, 0.3] {
            now += 33;
            app.handle_frame(&hand(Pose::Pointing, x), now);
        }
        assert!(began.elapsed() < Duration::from_millis(400), "drawing ticks blocked");
        assert!(!app.canvas().interaction().is_blank());
        assert_eq!(app.status, "Analyzing...");

        // A later tick picks up the answer.
        thread::sleep(Duration::from_millis(600));
        now += 33;
        app.handle_frame(&hand(Pose::Pointing, 0.4), now);
        assert_eq!(app.status, "I see a heart! (Confidence: 90%)");
        assert!(app.session().is_drawing());
    }

    #[test]
    fn open_hand_on_empty_canvas_asks_for_a_drawing() {
        let mut app = make_app();
        let tick = app.handle_frame(&hand(Pose::Open, 0.5), 0);
        assert_eq!(tick.command, Some(Command::Analyze));
        assert_eq!(app.status, "Please draw something first!");
        assert!(app.canvas().persistent().is_blank());
    }

    #[test]
    fn analyze_without_classifier_still_draws() {
        let mut app = AppState::new(&small(), classifier::load(None));
        let now = scribble(&mut app, 0);
        assert!(!app.canvas().persistent().is_blank());
        app.handle_frame(&hand(Pose::Open, 0.5), now + 33);
        assert!(app.status.starts_with("Model not ready"));
    }

    #[test]
    fn manual_controls() {
        let mut app = make_app();
        scribble(&mut app, 0);
        assert_eq!(app.analyze(), AnalyzeOutcome::Pending);
        assert!(matches!(settle(&mut app), AnalyzeOutcome::Predicted(_)));
        app.clear();
        assert!(app.canvas().persistent().is_blank());
        assert_eq!(app.analyze(), AnalyzeOutcome::EmptyCanvas);
    }

    #[test]
    fn erase_mode_from_the_host() {
        let mut app = make_app();
        let now = scribble(&mut app, 0);
        app.set_mode(Mode::Erase);
        let mut t = now;
        for x in [0.3, 0.4, 0.5, 0.6] {
            t += 33;
            app.handle_frame(&hand(Pose::Pointing, x), t);
        }
        assert!(app.canvas().persistent().is_blank());
        assert!(app.session().stroke().is_empty());
    }

    #[test]
    fn stop_discards_stroke_in_progress() {
        let mut app = make_app();
        app.handle_frame(&hand(Pose::Pointing, 0.3), 0);
        app.handle_frame(&hand(Pose::Pointing, 0.5), 33);
        assert!(!app.canvas().interaction().is_blank());
        app.stop();
        assert!(app.canvas().interaction().is_blank());
        assert!(!app.session().is_drawing());
        app.handle_frame(&FrameEvent::NoHand, 66);
        assert!(app.canvas().persistent().is_blank());
    }

    #[test]
    fn gesture_is_tracked_for_display() {
        let mut app = make_app();
        app.handle_frame(&hand(Pose::Pointing, 0.3), 0);
        assert_eq!(app.gesture(), Gesture::IndexFingerUp);
        app.handle_frame(&FrameEvent::NoHand, 33);
        assert_eq!(app.gesture(), Gesture::None);
    }
}
