//! # hand_pose
//!
//! Single-hand landmark frames and the gesture vocabulary built on them.
//!
//! * [`landmark`] — the fixed 21-point schema, [`HandFrame`], [`FrameEvent`]
//! * [`gesture`]  — priority-ordered classifier: [`classify`] → [`Gesture`]
//! * [`wire`]     — JSON-lines protocol of an external pose engine
//! * [`pose`]     — synthetic frames for simulation and tests
//!
//! ## Quick start
//!
//! ```rust
//! use hand_pose::{classify, synth_frame, Gesture, Landmark, Pose};
//!
//! let frame = synth_frame(Pose::Pointing, Landmark::new(0.4, 0.5));
//! assert_eq!(classify(&frame), Gesture::IndexFingerUp);
//! ```

pub mod landmark;
pub mod gesture;
pub mod wire;
pub mod pose;

pub use landmark::{FrameEvent, HandFrame, Landmark, HAND_CONNECTIONS, LANDMARK_COUNT};
pub use gesture::{classify, Gesture, FINGER_MARGIN};
pub use wire::{decode_line, WireError};
pub use pose::{synth_frame, Pose};
