//! Turning the persistent layer into a label.
//!
//! The classifier itself is pluggable ([`Classifier`]); the bundled
//! [`ProcessClassifier`] drives an external model over JSON lines:
//!
//! ```text
//! ← READY
//! → {"size":192,"pixels":[0.0, 0.0, …192·192·3 floats…]}
//! ← {"probabilities":[0.02,0.91,0.05,0.02]}
//! ```
//!
//! A loaded model runs on its own thread behind a [`ClassifierWorker`]:
//! [`analyze`] hands it a thumbnail and returns at once, and the render loop
//! picks the answer up with [`ClassifierSlot::poll`] on a later tick.
//!
//! A model that failed to load leaves the slot [`ClassifierSlot::Unavailable`];
//! drawing keeps working and only analysis reports the problem.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use ink_canvas::{Layer, Thumbnail, THUMBNAIL_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::process::{ChildPipe, ProcessError};

/// Output classes, in the model's output order.
pub const LABELS: [&str; 4] = ["bow", "heart", "mountain", "ramen"];

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("malformed classifier reply: {0}")]
    Reply(#[from] serde_json::Error),
    #[error("classifier returned no probabilities")]
    NoProbabilities,
    #[error("classifier returned {got} probabilities for {expected} labels")]
    Arity { got: usize, expected: usize },
    #[error("classifier returned probability {0} outside [0, 1]")]
    OutOfRange(f32),
}

// ════════════════════════════════════════════════════════════════════════════
// Prediction
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub label:      String,
    /// Probability of `label`, in `[0, 1]`.
    pub confidence: f32,
}

impl Prediction {
    /// Arg-max over `probabilities`; ties go to the earlier label.  Every
    /// entry must be a finite value in `[0, 1]`.
    pub fn from_probabilities(probabilities: &[f32], labels: &[&str]) -> Result<Self, ClassifierError> {
        if probabilities.is_empty() {
            return Err(ClassifierError::NoProbabilities);
        }
        if probabilities.len() != labels.len() {
            return Err(ClassifierError::Arity { got: probabilities.len(), expected: labels.len() });
        }
        if let Some(&bad) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(ClassifierError::OutOfRange(bad));
        }
        let mut best = 0;
        for (i, &p) in probabilities.iter().enumerate() {
            if p > probabilities[best] {
                best = i;
            }
        }
        Ok(Prediction { label: labels[best].to_string(), confidence: probabilities[best] })
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let percent = (self.confidence * 100.0).round() as i32;
        write!(f, "I see a {}! (Confidence: {}%)", self.label, percent)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Classifier seam
// ════════════════════════════════════════════════════════════════════════════

/// A model.  Runs on the worker thread, so it must be `Send`.
pub trait Classifier: Send {
    fn classify(&mut self, input: &Thumbnail) -> Result<Prediction, ClassifierError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnalyzeOutcome {
    Predicted(Prediction),
    /// Handed to the model; the answer arrives on a later poll.
    Pending,
    /// Nothing drawn; the classifier was not consulted.
    EmptyCanvas,
    Unavailable(String),
    Failed(String),
}

impl AnalyzeOutcome {
    /// The line shown to the user.
    pub fn message(&self) -> String {
        match self {
            AnalyzeOutcome::Predicted(p)     => p.to_string(),
            AnalyzeOutcome::Pending          => "Analyzing...".to_string(),
            AnalyzeOutcome::EmptyCanvas      => "Please draw something first!".to_string(),
            AnalyzeOutcome::Unavailable(why) => format!("Model not ready: {why}"),
            AnalyzeOutcome::Failed(why)      => format!("Analysis failed: {why}"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ClassifierWorker — the model's thread
// ════════════════════════════════════════════════════════════════════════════

/// Handle to a classifier running on its own thread.  At most one thumbnail
/// is in flight; dropping the handle ends the thread after its current job.
pub struct ClassifierWorker {
    job_tx:    Sender<Thumbnail>,
    result_rx: Receiver<Result<Prediction, ClassifierError>>,
    busy:      bool,
}

impl ClassifierWorker {
    pub fn spawn(mut classifier: Box<dyn Classifier>) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<Thumbnail>();
        let (result_tx, result_rx) = mpsc::channel();

        thread::spawn(move || {
            for thumbnail in job_rx {
                if result_tx.send(classifier.classify(&thumbnail)).is_err() {
                    break;
                }
            }
        });

        ClassifierWorker { job_tx, result_rx, busy: false }
    }

    pub fn is_busy(&self) -> bool { self.busy }

    /// Queue `thumbnail` unless a job is already running.
    fn submit(&mut self, thumbnail: Thumbnail) -> AnalyzeOutcome {
        if self.busy {
            debug!("analysis already running");
            return AnalyzeOutcome::Pending;
        }
        if self.job_tx.send(thumbnail).is_err() {
            return AnalyzeOutcome::Failed("classifier thread stopped".to_string());
        }
        self.busy = true;
        AnalyzeOutcome::Pending
    }

    /// The finished job's outcome, if one arrived (non-blocking).
    pub fn poll(&mut self) -> Option<AnalyzeOutcome> {
        if !self.busy {
            return None;
        }
        let outcome = match self.result_rx.try_recv() {
            Ok(Ok(prediction)) => {
                info!(label = %prediction.label, confidence = prediction.confidence, "drawing classified");
                AnalyzeOutcome::Predicted(prediction)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "classification failed");
                AnalyzeOutcome::Failed(err.to_string())
            }
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                warn!("classifier thread stopped mid-job");
                AnalyzeOutcome::Failed("classifier thread stopped".to_string())
            }
        };
        self.busy = false;
        Some(outcome)
    }
}

pub enum ClassifierSlot {
    Ready(ClassifierWorker),
    /// Why there is no model.
    Unavailable(String),
}

impl ClassifierSlot {
    /// Start `classifier` on its worker thread.
    pub fn ready(classifier: impl Classifier + 'static) -> Self {
        ClassifierSlot::Ready(ClassifierWorker::spawn(Box::new(classifier)))
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ClassifierSlot::Ready(_))
    }

    pub fn poll(&mut self) -> Option<AnalyzeOutcome> {
        match self {
            ClassifierSlot::Ready(worker)  => worker.poll(),
            ClassifierSlot::Unavailable(_) => None,
        }
    }
}

impl fmt::Debug for ClassifierSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifierSlot::Ready(w)          => write!(f, "Ready {{ busy: {} }}", w.is_busy()),
            ClassifierSlot::Unavailable(why)  => write!(f, "Unavailable({why:?})"),
        }
    }
}

/// Start classifying the persistent layer.  An empty layer short-circuits
/// before the model is touched; otherwise the answer is [`AnalyzeOutcome::Pending`]
/// and the result comes from [`ClassifierSlot::poll`].
pub fn analyze(layer: &Layer, slot: &mut ClassifierSlot) -> AnalyzeOutcome {
    if layer.is_blank() {
        return AnalyzeOutcome::EmptyCanvas;
    }
    match slot {
        ClassifierSlot::Ready(worker)    => worker.submit(layer.thumbnail(THUMBNAIL_SIZE)),
        ClassifierSlot::Unavailable(why) => AnalyzeOutcome::Unavailable(why.clone()),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ProcessClassifier
// ════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct Request<'a> {
    size:   usize,
    pixels: &'a [f32],
}

#[derive(Deserialize)]
struct Reply {
    #[serde(default)]
    probabilities: Vec<f32>,
}

pub struct ProcessClassifier {
    pipe: ChildPipe,
}

impl ProcessClassifier {
    pub fn spawn(command_line: &str) -> Result<Self, ClassifierError> {
        Ok(ProcessClassifier { pipe: ChildPipe::spawn_ready(command_line)? })
    }
}

impl Classifier for ProcessClassifier {
    fn classify(&mut self, input: &Thumbnail) -> Result<Prediction, ClassifierError> {
        let request = serde_json::to_string(&Request { size: input.size, pixels: &input.rgb })?;
        self.pipe.write_line(&request)?;
        let line = self.pipe.read_line()?
            .ok_or_else(|| ProcessError::Closed(self.pipe.command().to_string()))?;
        let reply: Reply = serde_json::from_str(line.trim())?;
        Prediction::from_probabilities(&reply.probabilities, &LABELS)
    }
}

/// Start the configured classifier, or explain why there is none.
pub fn load(command_line: Option<&str>) -> ClassifierSlot {
    let Some(command_line) = command_line else {
        return ClassifierSlot::Unavailable("no classifier configured".to_string());
    };
    match ProcessClassifier::spawn(command_line) {
        Ok(classifier) => ClassifierSlot::ready(classifier),
        Err(err) => {
            warn!(error = %err, "classifier unavailable, drawing only");
            ClassifierSlot::Unavailable(err.to_string())
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
