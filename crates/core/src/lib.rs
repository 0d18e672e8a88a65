//! Event-derivation engine for live interview proctoring.
//!
//! Turns per-frame face and object detections into a short, timestamped,
//! de-duplicated session log ("No face detected for more than 10 seconds",
//! "Phone detected in frame", ...). Detection models, capture and rendering
//! are external; they meet this crate at the ports in `detection::domain`.

pub mod detection;
pub mod monitoring;
pub mod shared;
