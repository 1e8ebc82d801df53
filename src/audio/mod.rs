//! Microphone capture for voice input via cpal.

pub mod recorder;

pub use recorder::{AudioClip, Recorder};
