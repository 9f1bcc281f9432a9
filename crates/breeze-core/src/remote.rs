//! Remote persistence boundary.
//!
//! A finished session is forwarded to an external document store,
//! best-effort and at-most-once. The implementation supplies the anonymous
//! client identifier and the server assigns the timestamp; the core only
//! ships the session fields.

use serde::{Deserialize, Serialize};

use crate::domain::MoodScore;

/// Payload shape the external store expects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemotePayload {
    pub selected_minutes: u32,
    pub completed: bool,
    pub mood_before: MoodScore,
    pub mood_after: MoodScore,
}

/// Fire-and-forget delivery of a finished session. A failed write is
/// accepted as lost; the flow logs and swallows the error and never blocks
/// on or surfaces it.
pub trait RemoteSink {
    fn submit(&mut self, payload: &RemotePayload) -> Result<(), String>;
}

/// Used when no remote store is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRemote;

impl RemoteSink for NullRemote {
    fn submit(&mut self, _payload: &RemotePayload) -> Result<(), String> {
        Ok(())
    }
}
