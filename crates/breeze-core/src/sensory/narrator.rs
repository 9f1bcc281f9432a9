//! Phase narration capability.

use serde::{Deserialize, Serialize};

/// Speech tuning for relaxation guidance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub lang: String,
    /// Slightly slower than normal speech
    pub rate: f32,
    /// Slightly lower pitch
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            lang: "ja-JP".to_string(),
            rate: 0.9,
            pitch: 0.8,
            volume: 0.8,
        }
    }
}

/// Receives phase labels on every phase change while voice guidance is on.
///
/// Implementations must supersede any utterance still in flight rather than
/// queueing, and must swallow platform failures; a narrator error never
/// reaches the session flow.
pub trait Narrator {
    fn speak(&mut self, text: &str);
}

/// Used in tests and on platforms without speech synthesis
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNarrator;

impl Narrator for NullNarrator {
    fn speak(&mut self, _text: &str) {}
}
