//! Wall-clock-derived breathing phase timer.
//!
//! Instead of decrementing a per-phase counter on an interval (which
//! accumulates drift), the timer stores the start instant and on every tick
//! derives the current step and its remaining seconds from elapsed wall time
//! through `Rhythm::step_at`. Multiple ticks within the same second are
//! idempotent.

use crate::domain::{dt_us, dt_whole_secs};
use crate::rhythm::{BreathPhase, Rhythm, RhythmStep};

/// Notification for a transition into a new step, intended for
/// narration/haptic hooks. At most one is reported per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseChange {
    pub phase: BreathPhase,
    pub label: String,
    pub scale: f32,
}

impl PhaseChange {
    fn from_step(step: &RhythmStep) -> Self {
        Self {
            phase: step.phase,
            label: step.label.clone(),
            scale: step.scale,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RhythmTimer {
    rhythm: Option<Rhythm>,
    start_us: i64,
    current_index: usize,
    /// Cycle count at the last observed position, used to detect re-entry
    /// of step 0 in single-step rhythms
    current_cycle: u64,
    remaining_secs: u32,
    running: bool,
}

impl RhythmTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a rhythm without starting. Stops any active run and resets the
    /// display position to step 0 with its full duration.
    pub fn set_rhythm(&mut self, rhythm: Rhythm) {
        self.running = false;
        self.start_us = 0;
        self.current_index = 0;
        self.current_cycle = 0;
        self.remaining_secs = rhythm.steps.first().map(|s| s.duration_secs).unwrap_or(0);
        self.rhythm = Some(rhythm);
    }

    /// Begin cycling from step 0. Returns the entry notification for the
    /// first step. A rhythm with no steps never occurs in valid
    /// configuration; it is tolerated as a silent no-op.
    pub fn start(&mut self, rhythm: Rhythm, now_us: i64) -> Option<PhaseChange> {
        if rhythm.steps.is_empty() {
            log::warn!("rhythm {:?} has no steps, timer stays inert", rhythm.id);
            return None;
        }
        self.set_rhythm(rhythm);
        self.start_us = now_us;
        self.running = true;
        let rhythm = self.rhythm.as_ref()?;
        Some(PhaseChange::from_step(&rhythm.steps[0]))
    }

    /// Advance against the wall clock. Derives the position from elapsed
    /// seconds and reports at most one step entry, even when a late tick
    /// crossed several boundaries. No-op while stopped.
    pub fn tick(&mut self, now_us: i64) -> Option<PhaseChange> {
        if !self.running {
            return None;
        }
        let rhythm = self.rhythm.as_ref()?;
        let cycle_secs = rhythm.cycle_secs();
        if cycle_secs == 0 {
            return None;
        }
        let elapsed = dt_whole_secs(now_us, self.start_us);
        let pos = rhythm.step_at(elapsed)?;
        let cycle = elapsed / cycle_secs;

        let entered = (cycle, pos.index) != (self.current_cycle, self.current_index);
        self.current_index = pos.index;
        self.current_cycle = cycle;
        self.remaining_secs = pos.remaining_secs;

        if entered {
            Some(PhaseChange::from_step(&rhythm.steps[pos.index]))
        } else {
            None
        }
    }

    /// Halt and reset to step 0 with its full duration. Idempotent; takes
    /// effect for the next tick.
    pub fn stop(&mut self) {
        self.running = false;
        self.start_us = 0;
        self.current_index = 0;
        self.current_cycle = 0;
        self.remaining_secs = self
            .rhythm
            .as_ref()
            .and_then(|r| r.steps.first())
            .map(|s| s.duration_secs)
            .unwrap_or(0);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The step currently displayed, also available while stopped
    pub fn current_step(&self) -> Option<&RhythmStep> {
        self.rhythm.as_ref().and_then(|r| r.steps.get(self.current_index))
    }

    /// Integer seconds remaining in the current step
    pub fn seconds_remaining(&self) -> u32 {
        self.remaining_secs
    }

    pub fn rhythm(&self) -> Option<&Rhythm> {
        self.rhythm.as_ref()
    }

    /// Elapsed whole seconds since start, 0 while stopped
    pub fn elapsed_secs(&self, now_us: i64) -> u64 {
        if self.running {
            dt_us(now_us, self.start_us) / 1_000_000
        } else {
            0
        }
    }
}
