//! Sensory guide hooks
//!
//! Narration, haptics, and ambient noise

pub mod haptics;
pub mod narrator;
pub mod noise;

pub use haptics::{HapticCue, Haptics, NullHaptics};
pub use narrator::{Narrator, NullNarrator, VoiceSettings};
pub use noise::{AmbientAudio, BrownNoise, BrownNoiseBed, NullAmbient, OnePoleLowPass};
