//! Gesture interpretation
//!
//! Classifies a hand from the mean fingertip-to-wrist distance and debounces
//! the result into one-shot fist/palm signals.

pub mod interpreter;
pub mod landmarks;

pub use interpreter::{GestureInterpreter, GestureSignal, HandPose};
pub use landmarks::HandLandmarks;
