//! Whole-flow tests: one session from mood capture to finished record.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::{MoodScore, SessionRecord};
use crate::flow::{FlowState, HistorySink, MoodSessionFlow};
use crate::remote::{RemotePayload, RemoteSink};
use crate::rhythm::get_rhythm;
use crate::sensory::Narrator;

const SEC: i64 = 1_000_000;

fn mood(v: u8) -> MoodScore {
    MoodScore::new(v).unwrap()
}

#[derive(Default)]
struct RecordingHistory(Rc<RefCell<Vec<SessionRecord>>>);

impl HistorySink for RecordingHistory {
    fn append(&mut self, record: &SessionRecord) -> Result<(), String> {
        self.0.borrow_mut().push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingRemote(Rc<RefCell<Vec<RemotePayload>>>);

impl RemoteSink for RecordingRemote {
    fn submit(&mut self, payload: &RemotePayload) -> Result<(), String> {
        self.0.borrow_mut().push(payload.clone());
        Ok(())
    }
}

struct FailingRemote;

impl RemoteSink for FailingRemote {
    fn submit(&mut self, _payload: &RemotePayload) -> Result<(), String> {
        Err("document store unreachable".to_string())
    }
}

#[derive(Default)]
struct RecordingAmbient(Rc<RefCell<Vec<&'static str>>>);

impl crate::sensory::AmbientAudio for RecordingAmbient {
    fn start(&mut self) {
        self.0.borrow_mut().push("start");
    }
    fn stop(&mut self) {
        self.0.borrow_mut().push("stop");
    }
}

#[derive(Default)]
struct RecordingNarrator(Rc<RefCell<Vec<String>>>);

impl Narrator for RecordingNarrator {
    fn speak(&mut self, text: &str) {
        self.0.borrow_mut().push(text.to_string());
    }
}

fn one_minute_flow() -> MoodSessionFlow {
    MoodSessionFlow::new(get_rhythm("3-6").unwrap(), 1)
}

#[test]
fn round_trip_produces_one_record() {
    let records = Rc::new(RefCell::new(Vec::new()));
    let payloads = Rc::new(RefCell::new(Vec::new()));
    let mut flow = one_minute_flow();
    flow.set_history(Box::new(RecordingHistory(records.clone())));
    flow.set_remote(Box::new(RecordingRemote(payloads.clone())));

    assert_eq!(flow.state(), FlowState::Idle);
    flow.request_start();
    assert_eq!(flow.state(), FlowState::AwaitingMoodBefore);

    assert!(flow.select_mood(mood(3), 0).is_none());
    assert_eq!(flow.state(), FlowState::Running);
    assert_eq!(flow.mood_before(), Some(mood(3)));

    for s in 1..60 {
        flow.tick(s * SEC);
        assert_eq!(flow.state(), FlowState::Running, "still running at {}s", s);
    }
    flow.tick(60 * SEC);
    assert_eq!(flow.state(), FlowState::AwaitingMoodAfter);
    assert!(flow.timers_stopped());

    let record = flow.select_mood(mood(5), 61 * SEC).expect("finished record");
    assert_eq!(flow.state(), FlowState::Idle);
    assert_eq!(flow.mood_before(), None);
    assert!(flow.timers_stopped());

    assert_eq!(record.mood_before, mood(3));
    assert_eq!(record.mood_after, mood(5));
    assert_eq!(record.duration_seconds, 60);
    assert_eq!(record.rhythm_id, "3-6");

    assert_eq!(records.borrow().len(), 1);
    let payloads = payloads.borrow();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].selected_minutes, 1);
    assert!(payloads[0].completed);
}

#[test]
fn cancellation_retains_nothing() {
    let records = Rc::new(RefCell::new(Vec::new()));
    let mut flow = one_minute_flow();
    flow.set_history(Box::new(RecordingHistory(records.clone())));

    flow.request_start();
    flow.cancel_mood();
    assert_eq!(flow.state(), FlowState::Idle);
    assert_eq!(flow.mood_before(), None);
    assert!(records.borrow().is_empty());
}

#[test]
fn start_while_running_is_ignored() {
    let mut flow = one_minute_flow();
    flow.request_start();
    flow.select_mood(mood(2), 0);
    assert_eq!(flow.state(), FlowState::Running);

    flow.request_start();
    assert_eq!(flow.state(), FlowState::Running);
    flow.tick(10 * SEC);
    assert_eq!(flow.session_elapsed_secs(), 10);
}

#[test]
fn reset_from_any_state_reaches_idle_without_record() {
    let records = Rc::new(RefCell::new(Vec::new()));

    for stop_at in ["before", "running", "after"] {
        let mut flow = one_minute_flow();
        flow.set_history(Box::new(RecordingHistory(records.clone())));
        flow.request_start();
        if stop_at != "before" {
            flow.select_mood(mood(4), 0);
        }
        if stop_at == "after" {
            for s in 1..=60 {
                flow.tick(s * SEC);
            }
            assert_eq!(flow.state(), FlowState::AwaitingMoodAfter);
        }
        flow.reset();
        assert_eq!(flow.state(), FlowState::Idle);
        assert_eq!(flow.mood_before(), None);
        assert!(flow.timers_stopped());
    }
    assert!(records.borrow().is_empty());
}

#[test]
fn remote_failure_never_reaches_the_flow() {
    let records = Rc::new(RefCell::new(Vec::new()));
    let mut flow = one_minute_flow();
    flow.set_history(Box::new(RecordingHistory(records.clone())));
    flow.set_remote(Box::new(FailingRemote));

    flow.request_start();
    flow.select_mood(mood(1), 0);
    for s in 1..=60 {
        flow.tick(s * SEC);
    }
    let record = flow.select_mood(mood(2), 61 * SEC);
    assert!(record.is_some(), "flow completes despite remote failure");
    assert_eq!(flow.state(), FlowState::Idle);
    assert_eq!(records.borrow().len(), 1, "local history still written");
}

#[test]
fn voice_guidance_narrates_phase_labels() {
    let spoken = Rc::new(RefCell::new(Vec::new()));
    let mut flow = one_minute_flow();
    flow.set_narrator(Box::new(RecordingNarrator(spoken.clone())));
    flow.set_voice(true);

    flow.request_start();
    flow.select_mood(mood(3), 0);
    for s in 1..=9 {
        flow.tick(s * SEC);
    }
    // Start enters inhale, second 3 enters exhale, second 9 wraps to inhale
    let spoken = spoken.borrow();
    assert_eq!(
        spoken.as_slice(),
        &["Breathe in", "Breathe out", "Breathe in"]
    );
}

#[test]
fn voice_off_stays_silent() {
    let spoken = Rc::new(RefCell::new(Vec::new()));
    let mut flow = one_minute_flow();
    flow.set_narrator(Box::new(RecordingNarrator(spoken.clone())));

    flow.request_start();
    flow.select_mood(mood(3), 0);
    for s in 1..=9 {
        flow.tick(s * SEC);
    }
    assert!(spoken.borrow().is_empty());
}

#[test]
fn ambient_audio_follows_session_and_sound_toggle() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut flow = one_minute_flow();
    flow.set_audio(Box::new(RecordingAmbient(calls.clone())));
    flow.set_sound(true);
    assert!(calls.borrow().is_empty(), "toggle while idle does nothing");

    flow.request_start();
    flow.select_mood(mood(3), 0);
    assert_eq!(calls.borrow().as_slice(), &["start"]);

    // toggling off mid-session fades, back on resumes
    flow.set_sound(false);
    flow.set_sound(true);
    assert_eq!(calls.borrow().as_slice(), &["start", "stop", "start"]);

    for s in 1..=60 {
        flow.tick(s * SEC);
    }
    assert_eq!(
        calls.borrow().as_slice(),
        &["start", "stop", "start", "stop"],
        "completion fades the bed"
    );
}

#[test]
fn from_config_resolves_rhythm_and_toggles() {
    use crate::config::BreezeConfig;

    let mut config = BreezeConfig::default();
    config.rhythm.default_rhythm = "box".to_string();
    config.session.default_minutes = 3;
    config.guide.voice_enabled = true;

    let flow = MoodSessionFlow::from_config(&config).unwrap();
    assert_eq!(flow.selected_rhythm().id, "box");
    assert_eq!(flow.selected_minutes(), 3);
    assert_eq!(flow.state(), FlowState::Idle);

    config.rhythm.default_rhythm = "nope".to_string();
    assert!(MoodSessionFlow::from_config(&config).is_err());
}

#[test]
fn completion_after_mood_dismissal_produces_nothing() {
    let records = Rc::new(RefCell::new(Vec::new()));
    let mut flow = one_minute_flow();
    flow.set_history(Box::new(RecordingHistory(records.clone())));

    flow.request_start();
    flow.select_mood(mood(3), 0);
    for s in 1..=60 {
        flow.tick(s * SEC);
    }
    assert_eq!(flow.state(), FlowState::AwaitingMoodAfter);
    flow.cancel_mood();
    assert_eq!(flow.state(), FlowState::Idle);
    assert_eq!(flow.mood_before(), None);
    assert!(records.borrow().is_empty());
}
