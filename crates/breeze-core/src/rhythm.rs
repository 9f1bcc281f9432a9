//! Breathing Rhythm Registry
//!
//! Defines the built-in guided breathing rhythms and the pure phase
//! derivation the wall-clock timer is built on.
//!
//! # Rhythms Available
//! - **3-6**: Inhale 3s / Exhale 6s (extended exhale, beginner)
//! - **7-11**: Inhale 7s / Exhale 11s (deep calm)
//! - **box**: 4s inhale / hold / exhale / hold

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One labeled segment of a breathing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
}

/// One phase of a breathing cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RhythmStep {
    pub phase: BreathPhase,
    /// Phase length in whole seconds, always >= 1
    pub duration_secs: u32,
    /// Display label, narrated when voice guidance is on
    pub label: String,
    /// Rendering hint for the breathing visual, opaque to the timers
    pub scale: f32,
}

/// A named, ordered, non-empty cycle of steps, repeated indefinitely
/// during a session. Fixed configuration data, not user-editable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rhythm {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Short description of the cadence
    pub description: String,
    pub steps: Vec<RhythmStep>,
}

/// Position within a rhythm derived from elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPosition {
    pub index: usize,
    /// Integer seconds remaining in the step, in [1, duration]
    pub remaining_secs: u32,
}

impl Rhythm {
    /// Total cycle length in seconds
    pub fn cycle_secs(&self) -> u64 {
        self.steps.iter().map(|s| s.duration_secs as u64).sum()
    }

    /// The step containing second `elapsed_secs` (0-indexed) of the infinite
    /// repetition of this rhythm's duration sequence. Pure; returns `None`
    /// for an empty or zero-length rhythm.
    pub fn step_at(&self, elapsed_secs: u64) -> Option<StepPosition> {
        let cycle = self.cycle_secs();
        if cycle == 0 {
            return None;
        }
        let mut into_cycle = elapsed_secs % cycle;
        for (index, step) in self.steps.iter().enumerate() {
            let dur = step.duration_secs as u64;
            if into_cycle < dur {
                return Some(StepPosition {
                    index,
                    remaining_secs: (dur - into_cycle) as u32,
                });
            }
            into_cycle -= dur;
        }
        // Unreachable: into_cycle < cycle and the durations sum to cycle
        None
    }
}

fn step(phase: BreathPhase, duration_secs: u32, label: &str, scale: f32) -> RhythmStep {
    RhythmStep {
        phase,
        duration_secs,
        label: label.to_string(),
        scale,
    }
}

/// Get all built-in rhythms
pub fn builtin_rhythms() -> HashMap<String, Rhythm> {
    let mut rhythms = HashMap::new();

    rhythms.insert(
        "3-6".to_string(),
        Rhythm {
            id: "3-6".to_string(),
            name: "3-6 Breathing".to_string(),
            description: "Inhale (3s) / Exhale (6s)".to_string(),
            steps: vec![
                step(BreathPhase::Inhale, 3, "Breathe in", 1.5),
                step(BreathPhase::Exhale, 6, "Breathe out", 1.0),
            ],
        },
    );

    rhythms.insert(
        "7-11".to_string(),
        Rhythm {
            id: "7-11".to_string(),
            name: "7-11 Breathing".to_string(),
            description: "Inhale (7s) / Exhale (11s)".to_string(),
            steps: vec![
                step(BreathPhase::Inhale, 7, "Breathe in", 1.5),
                step(BreathPhase::Exhale, 11, "Breathe out", 1.0),
            ],
        },
    );

    rhythms.insert(
        "box".to_string(),
        Rhythm {
            id: "box".to_string(),
            name: "Box Breathing".to_string(),
            description: "Inhale (4s) / Hold (4s) / Exhale (4s) / Hold (4s)".to_string(),
            steps: vec![
                step(BreathPhase::Inhale, 4, "Breathe in", 1.5),
                step(BreathPhase::Hold, 4, "Hold", 1.5),
                step(BreathPhase::Exhale, 4, "Breathe out", 1.0),
                step(BreathPhase::Hold, 4, "Hold", 1.0),
            ],
        },
    );

    rhythms
}

/// Get a rhythm by id
pub fn get_rhythm(id: &str) -> Option<Rhythm> {
    builtin_rhythms().remove(id)
}
