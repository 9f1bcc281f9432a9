//! Breeze core domain: breathing rhythms, session timing, and the mood flow.
//!
//! Everything here is single-threaded and tick-driven: timers take explicit
//! microsecond timestamps instead of reading the clock, so every operation
//! is a pure state transition. Platform capabilities (speech, vibration,
//! audio output, remote storage) sit behind traits with no-op
//! implementations for tests and headless platforms.

pub mod config;
pub mod domain;
pub mod flow;
pub mod remote;
pub mod rhythm;
pub mod rhythm_timer;
pub mod sensory;
pub mod session_timer;

#[cfg(test)]
mod tests_flow;
#[cfg(test)]
mod tests_proptest;

// Configuration
pub use config::{AudioConfig, BreezeConfig, ConfigError, GuideConfig, RhythmConfig, SessionConfig};

// Domain types
pub use domain::{dt_sec, dt_us, dt_whole_secs, DomainError, MoodScore, SessionRecord};

// Flow orchestrator
pub use flow::{FlowState, HistorySink, MoodSessionFlow, NullHistory};

// Remote persistence boundary
pub use remote::{NullRemote, RemotePayload, RemoteSink};

// Rhythm registry
pub use rhythm::{builtin_rhythms, get_rhythm, BreathPhase, Rhythm, RhythmStep, StepPosition};

// Timers
pub use rhythm_timer::{PhaseChange, RhythmTimer};
pub use session_timer::SessionTimer;

// Guide capabilities
pub use sensory::{
    AmbientAudio, BrownNoiseBed, HapticCue, Haptics, Narrator, NullAmbient, NullHaptics,
    NullNarrator, VoiceSettings,
};
