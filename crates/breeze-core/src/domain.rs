use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// STRICT TIME HELPERS — Prevent Wraparound
// ============================================================================

/// Compute time delta with saturating subtraction to prevent wraparound.
/// If clocks go backwards (now < last), returns 0 instead of wrapping to a huge value.
#[inline]
pub fn dt_us(now_us: i64, last_us: i64) -> u64 {
    if now_us >= last_us {
        (now_us - last_us) as u64
    } else {
        // Clock went backwards
        0
    }
}

/// Compute time delta in seconds. Convenience wrapper around `dt_us`.
#[inline]
pub fn dt_sec(now_us: i64, last_us: i64) -> f32 {
    (dt_us(now_us, last_us) as f32) / 1_000_000.0
}

/// Whole elapsed seconds between two microsecond timestamps.
#[inline]
pub fn dt_whole_secs(now_us: i64, last_us: i64) -> u64 {
    dt_us(now_us, last_us) / 1_000_000
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("mood score out of range: {0} (expected 1-5)")]
    MoodOutOfRange(u8),
    #[error("unknown rhythm: {0}")]
    UnknownRhythm(String),
}

// ============================================================================
// MOOD SCORE
// ============================================================================

/// Self-reported mood on a 1-5 scale, captured before and after a session.
/// Construction is validated; a score outside [1, 5] never exists at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MoodScore(u8);

impl MoodScore {
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::MoodOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for MoodScore {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MoodScore> for u8 {
    fn from(score: MoodScore) -> u8 {
        score.0
    }
}

// ============================================================================
// SESSION RECORD
// ============================================================================

/// One finished mood-before -> mood-after session. Immutable once built; the
/// history store is the sole writer of persisted records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque unique id
    pub id: String,
    /// Completion instant (UTC)
    pub timestamp: DateTime<Utc>,
    /// User-selected session length in seconds
    pub duration_seconds: u32,
    pub mood_before: MoodScore,
    pub mood_after: MoodScore,
    /// References a `Rhythm` from the built-in registry
    pub rhythm_id: String,
}

impl SessionRecord {
    /// Build a record at the given completion instant. Falls back to the unix
    /// epoch if `now_us` is outside chrono's representable range.
    pub fn new(
        now_us: i64,
        duration_seconds: u32,
        mood_before: MoodScore,
        mood_after: MoodScore,
        rhythm_id: &str,
    ) -> Self {
        let timestamp = DateTime::<Utc>::from_timestamp_micros(now_us).unwrap_or_default();
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            duration_seconds,
            mood_before,
            mood_after,
            rhythm_id: rhythm_id.to_string(),
        }
    }
}
