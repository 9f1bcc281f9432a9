//! Property-based tests for the timer invariants.

use proptest::prelude::*;

use crate::rhythm::{BreathPhase, Rhythm, RhythmStep};
use crate::rhythm_timer::RhythmTimer;
use crate::session_timer::SessionTimer;

const SEC: i64 = 1_000_000;

fn rhythm_from_durations(durations: &[u32]) -> Rhythm {
    let phases = [BreathPhase::Inhale, BreathPhase::Hold, BreathPhase::Exhale];
    Rhythm {
        id: "generated".to_string(),
        name: "Generated".to_string(),
        description: String::new(),
        steps: durations
            .iter()
            .enumerate()
            .map(|(i, &d)| RhythmStep {
                phase: phases[i % phases.len()],
                duration_secs: d,
                label: format!("step {}", i),
                scale: 1.0,
            })
            .collect(),
    }
}

/// One-second countdown simulation, the reference the wall-clock derivation
/// must agree with.
fn naive_position(durations: &[u32], ticks: u64) -> (usize, u32) {
    let mut index = 0usize;
    let mut remaining = durations[0];
    for _ in 0..ticks {
        if remaining <= 1 {
            index = (index + 1) % durations.len();
            remaining = durations[index];
        } else {
            remaining -= 1;
        }
    }
    (index, remaining)
}

proptest! {
    #[test]
    fn derived_position_matches_per_second_countdown(
        durations in prop::collection::vec(1u32..=12, 1..=5),
        ticks in 0u64..240,
    ) {
        let rhythm = rhythm_from_durations(&durations);
        let pos = rhythm.step_at(ticks).unwrap();
        let (naive_index, naive_remaining) = naive_position(&durations, ticks);
        prop_assert_eq!(pos.index, naive_index);
        prop_assert_eq!(pos.remaining_secs, naive_remaining);
    }

    #[test]
    fn remaining_stays_within_step_bounds(
        durations in prop::collection::vec(1u32..=12, 1..=5),
        ticks in 1u64..240,
    ) {
        let rhythm = rhythm_from_durations(&durations);
        let mut timer = RhythmTimer::new();
        timer.start(rhythm, 0);
        for s in 1..=ticks {
            timer.tick(s as i64 * SEC);
            let step = timer.current_step().unwrap();
            let remaining = timer.seconds_remaining();
            prop_assert!(remaining >= 1);
            prop_assert!(remaining <= step.duration_secs);
        }
    }

    #[test]
    fn session_completion_fires_exactly_once_at_duration(
        duration in 1u32..600,
    ) {
        let mut timer = SessionTimer::new();
        timer.start(duration, 0);
        let mut completions = Vec::new();
        for s in 1..=(duration as i64 + 5) {
            if timer.tick(s * SEC) {
                completions.push(s);
            }
        }
        prop_assert_eq!(completions, vec![duration as i64]);
        prop_assert!(!timer.is_running());
    }

    #[test]
    fn phase_transitions_count_matches_elapsed_cycles(
        durations in prop::collection::vec(1u32..=6, 1..=4),
        ticks in 1u64..120,
    ) {
        // Ticking second by second, every step boundary crossed is reported
        // exactly once.
        let rhythm = rhythm_from_durations(&durations);
        let step_count = durations.len() as u64;
        let cycle = durations.iter().map(|&d| d as u64).sum::<u64>();
        let mut timer = RhythmTimer::new();
        timer.start(rhythm.clone(), 0);

        let mut transitions = 0u64;
        for s in 1..=ticks {
            if timer.tick(s as i64 * SEC).is_some() {
                transitions += 1;
            }
        }

        // Boundaries hit in (0, ticks]: one per completed step
        let mut expected = 0u64;
        let mut acc = 0u64;
        'outer: for _cycle in 0..=(ticks / cycle) {
            for &d in &durations {
                acc += d as u64;
                if acc > ticks {
                    break 'outer;
                }
                expected += 1;
            }
        }
        prop_assert_eq!(transitions, expected, "steps: {}, cycle: {}", step_count, cycle);
    }
}
