//! Mood-session flow.
//!
//! Top-level orchestrator for one timed breathing session: capture mood,
//! run both timers together, and on completion capture mood again and emit a
//! finished record. Owns start/stop of `RhythmTimer` and `SessionTimer`;
//! collaborators (narration, haptics, ambient audio, history, remote store)
//! are fire-and-forget and their failures never reach the state machine.

use crate::config::BreezeConfig;
use crate::domain::{DomainError, MoodScore, SessionRecord};
use crate::remote::{NullRemote, RemotePayload, RemoteSink};
use crate::rhythm::{get_rhythm, Rhythm, RhythmStep};
use crate::rhythm_timer::{PhaseChange, RhythmTimer};
use crate::sensory::{
    AmbientAudio, HapticCue, Haptics, Narrator, NullAmbient, NullHaptics, NullNarrator,
};
use crate::session_timer::SessionTimer;

/// Receives each finished record for durable local history. Implemented by
/// the store crate; the flow logs and swallows append failures.
pub trait HistorySink {
    fn append(&mut self, record: &SessionRecord) -> Result<(), String>;
}

/// Used when no durable history is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHistory;

impl HistorySink for NullHistory {
    fn append(&mut self, _record: &SessionRecord) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    AwaitingMoodBefore,
    Running,
    AwaitingMoodAfter,
}

pub struct MoodSessionFlow {
    state: FlowState,
    rhythm_timer: RhythmTimer,
    session_timer: SessionTimer,
    selected_rhythm: Rhythm,
    selected_minutes: u32,
    mood_before: Option<MoodScore>,
    voice_on: bool,
    sound_on: bool,
    narrator: Box<dyn Narrator>,
    haptics: Box<dyn Haptics>,
    audio: Box<dyn AmbientAudio>,
    history: Box<dyn HistorySink>,
    remote: Box<dyn RemoteSink>,
}

impl MoodSessionFlow {
    /// Flow with null collaborators; wire real ones with the setters.
    pub fn new(rhythm: Rhythm, selected_minutes: u32) -> Self {
        let mut rhythm_timer = RhythmTimer::new();
        rhythm_timer.set_rhythm(rhythm.clone());
        Self {
            state: FlowState::Idle,
            rhythm_timer,
            session_timer: SessionTimer::new(),
            selected_rhythm: rhythm,
            selected_minutes,
            mood_before: None,
            voice_on: false,
            sound_on: false,
            narrator: Box::new(NullNarrator),
            haptics: Box::new(NullHaptics),
            audio: Box::new(NullAmbient),
            history: Box::new(NullHistory),
            remote: Box::new(NullRemote),
        }
    }

    /// Resolve the configured default rhythm, duration and toggles.
    pub fn from_config(config: &BreezeConfig) -> Result<Self, DomainError> {
        let rhythm = get_rhythm(&config.rhythm.default_rhythm)
            .ok_or_else(|| DomainError::UnknownRhythm(config.rhythm.default_rhythm.clone()))?;
        let mut flow = Self::new(rhythm, config.session.default_minutes);
        flow.voice_on = config.guide.voice_enabled;
        flow.sound_on = config.guide.sound_enabled;
        Ok(flow)
    }

    pub fn set_narrator(&mut self, narrator: Box<dyn Narrator>) {
        self.narrator = narrator;
    }

    pub fn set_haptics(&mut self, haptics: Box<dyn Haptics>) {
        self.haptics = haptics;
    }

    pub fn set_audio(&mut self, audio: Box<dyn AmbientAudio>) {
        self.audio = audio;
    }

    pub fn set_history(&mut self, history: Box<dyn HistorySink>) {
        self.history = history;
    }

    pub fn set_remote(&mut self, remote: Box<dyn RemoteSink>) {
        self.remote = remote;
    }

    pub fn set_voice(&mut self, on: bool) {
        self.voice_on = on;
    }

    /// Toggling sound mid-session starts or fades the ambient bed.
    pub fn set_sound(&mut self, on: bool) {
        self.sound_on = on;
        if self.state == FlowState::Running {
            if on {
                self.audio.start();
            } else {
                self.audio.stop();
            }
        }
    }

    /// Switch rhythms; effective for the next session. Ignored while
    /// running so an in-flight cycle is never torn.
    pub fn select_rhythm(&mut self, rhythm: Rhythm) {
        if self.state == FlowState::Running {
            log::debug!("rhythm change ignored while a session is running");
            return;
        }
        self.rhythm_timer.set_rhythm(rhythm.clone());
        self.selected_rhythm = rhythm;
    }

    /// Pick a session length in minutes; ignored while running.
    pub fn select_minutes(&mut self, minutes: u32) {
        if self.state == FlowState::Running {
            log::debug!("duration change ignored while a session is running");
            return;
        }
        self.selected_minutes = minutes;
    }

    /// User pressed start. From `Idle` this requests the pre-session mood;
    /// anywhere else the request is an idempotent no-op, not queued.
    pub fn request_start(&mut self) {
        match self.state {
            FlowState::Idle => self.state = FlowState::AwaitingMoodBefore,
            _ => log::debug!("start request ignored in {:?}", self.state),
        }
    }

    /// User dismissed the mood dialog without choosing. Nothing is retained
    /// and no record is produced.
    pub fn cancel_mood(&mut self) {
        match self.state {
            FlowState::AwaitingMoodBefore | FlowState::AwaitingMoodAfter => {
                self.mood_before = None;
                self.state = FlowState::Idle;
            }
            _ => {}
        }
    }

    /// User picked a mood score. Before a session this starts both timers
    /// together; after one it builds the single finished record, hands it to
    /// the history and remote sinks, and returns to `Idle`.
    pub fn select_mood(&mut self, score: MoodScore, now_us: i64) -> Option<SessionRecord> {
        match self.state {
            FlowState::AwaitingMoodBefore => {
                self.mood_before = Some(score);
                self.begin_running(now_us);
                None
            }
            FlowState::AwaitingMoodAfter => {
                let mood_before = self.mood_before.take()?;
                let record = SessionRecord::new(
                    now_us,
                    self.selected_minutes * 60,
                    mood_before,
                    score,
                    &self.selected_rhythm.id,
                );
                if let Err(err) = self.history.append(&record) {
                    log::warn!("history append failed: {}", err);
                }
                let payload = RemotePayload {
                    selected_minutes: self.selected_minutes,
                    completed: true,
                    mood_before,
                    mood_after: score,
                };
                if let Err(err) = self.remote.submit(&payload) {
                    log::warn!("remote session save failed: {}", err);
                }
                self.rhythm_timer.stop();
                self.state = FlowState::Idle;
                Some(record)
            }
            _ => {
                log::debug!("mood selection ignored in {:?}", self.state);
                None
            }
        }
    }

    /// Scheduler tick, nominally once per second. Drives both timers; when
    /// the session countdown completes, both are stopped together and the
    /// post-session mood is requested.
    pub fn tick(&mut self, now_us: i64) {
        if self.state != FlowState::Running {
            return;
        }
        if let Some(change) = self.rhythm_timer.tick(now_us) {
            self.guide(&change);
        }
        if self.session_timer.tick(now_us) {
            self.rhythm_timer.stop();
            self.audio.stop();
            self.haptics.pulse(HapticCue::SessionComplete);
            self.state = FlowState::AwaitingMoodAfter;
        }
    }

    /// Force `Idle` from any state. Clears the captured mood, resets both
    /// timers, and never produces a record.
    pub fn reset(&mut self) {
        self.rhythm_timer.stop();
        self.session_timer.stop();
        self.audio.stop();
        self.mood_before = None;
        self.state = FlowState::Idle;
    }

    fn begin_running(&mut self, now_us: i64) {
        if let Some(change) = self.rhythm_timer.start(self.selected_rhythm.clone(), now_us) {
            self.guide(&change);
        }
        self.session_timer.start(self.selected_minutes * 60, now_us);
        if self.sound_on {
            self.audio.start();
        }
        self.state = FlowState::Running;
    }

    fn guide(&mut self, change: &PhaseChange) {
        self.haptics.pulse(HapticCue::PhaseTick);
        if self.voice_on {
            self.narrator.speak(&change.label);
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn mood_before(&self) -> Option<MoodScore> {
        self.mood_before
    }

    pub fn selected_minutes(&self) -> u32 {
        self.selected_minutes
    }

    pub fn selected_rhythm(&self) -> &Rhythm {
        &self.selected_rhythm
    }

    /// Current breathing step for display, also available while idle
    pub fn current_step(&self) -> Option<&RhythmStep> {
        self.rhythm_timer.current_step()
    }

    pub fn step_seconds_remaining(&self) -> u32 {
        self.rhythm_timer.seconds_remaining()
    }

    pub fn session_elapsed_secs(&self) -> u64 {
        self.session_timer.elapsed_secs()
    }

    pub fn session_remaining_secs(&self) -> u64 {
        self.session_timer.remaining_secs()
    }

    pub fn timers_stopped(&self) -> bool {
        !self.rhythm_timer.is_running() && !self.session_timer.is_running()
    }
}
