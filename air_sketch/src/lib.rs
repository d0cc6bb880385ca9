//! # air_sketch
//!
//! Freehand drawing in the air.  A pose engine reports one hand's landmarks
//! per camera tick; the index fingertip becomes a pen on a mirrored canvas,
//! and two whole-hand gestures act as buttons.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Mode | Action |
//! |---|---|---|
//! | Index finger up (others curled) | Draw | Extend the stroke; live preview follows the finger |
//! | Index finger up (others curled) | Erase | Punch a 25 px hole in the ink at the fingertip |
//! | Anything else / hand lost | Draw | Commit the stroke (≥ 2 points) as permanent ink |
//! | Fist | either | Clear the canvas |
//! | Open hand (thumb spread) | either | Classify the drawing |
//!
//! Clear and analyze fire on the tick the gesture *appears*, at most once per
//! second.  Analysis runs in the background; drawing carries on meanwhile.
//!
//! ## Frame sources
//!
//! * (default) — **Simulation**: the mouse is the fingertip.
//! * `--tracker <cmd>` — a helper process streaming JSON landmark lines.
//! * `--replay <file>` — the same lines from a file.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse over canvas | Hand in frame, fingertip under the pointer |
//! | Left button held | Point (index finger up) |
//! | `F` held / `O` held | Fist / open hand |
//! | `D` / `E` | Draw / erase mode |
//! | `C` / `A` | Clear / analyze |
//! | `Q` or `Escape` | Quit |

pub mod stroke;
pub mod dispatch;
pub mod session;
pub mod process;
pub mod classifier;
pub mod tracker;
pub mod visualizer;
pub mod app;

pub use stroke::{Mode, StrokeEngine};
pub use dispatch::{ActionDispatcher, Command};
pub use session::{step, Session, Tick};
pub use classifier::{analyze, AnalyzeOutcome, Classifier, ClassifierSlot, ClassifierWorker, Prediction};
pub use tracker::{FrameSource, JsonLinesSource, SimHand};
pub use app::{run, AppConfig, AppState, SourceConfig};
