//! Ambient noise bed.
//!
//! A brown-noise source (soft, rain-like) run through a low-pass filter and a
//! gain stage with a graceful fade-out on stop. The integrator state is
//! explicit and per-instance; nothing here is shared process-wide.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Gain floor the fade-out ramps toward before the bed goes silent
const FADE_FLOOR: f32 = 0.001;

/// Brown-noise integrator state
#[derive(Debug, Clone, Copy, Default)]
pub struct BrownNoise {
    last_out: f32,
}

impl BrownNoise {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next raw sample, integrating white noise. The recurrence keeps the
    /// accumulator in [-1, 1]; the 3.5 factor compensates for the gain loss
    /// from integration.
    pub fn next_sample<R: Rng>(&mut self, rng: &mut R) -> f32 {
        let white: f32 = rng.gen_range(-1.0..1.0);
        self.last_out = (self.last_out + 0.02 * white) / 1.02;
        self.last_out * 3.5
    }

    pub fn reset(&mut self) {
        self.last_out = 0.0;
    }
}

/// Single-pole low-pass, enough to make the noise sound like distant rain
#[derive(Debug, Clone, Copy)]
pub struct OnePoleLowPass {
    alpha: f32,
    state: f32,
}

impl OnePoleLowPass {
    pub fn new(cutoff_hz: f32, sample_rate_hz: f32) -> Self {
        let rc = 1.0 / (2.0 * std::f32::consts::PI * cutoff_hz.max(1.0));
        let dt = 1.0 / sample_rate_hz.max(1.0);
        Self {
            alpha: dt / (rc + dt),
            state: 0.0,
        }
    }

    pub fn process(&mut self, input: f32) -> f32 {
        self.state += self.alpha * (input - self.state);
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

/// Ambient-audio capability, keyed off session activity and the sound
/// toggle. `stop` means a graceful fade rather than an abrupt cut.
/// Implementations swallow platform failures.
pub trait AmbientAudio {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Used in tests and on platforms without an audio output
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAmbient;

impl AmbientAudio for NullAmbient {
    fn start(&mut self) {}
    fn stop(&mut self) {}
}

/// Offline renderer for the filtered noise bed. A platform integration pulls
/// samples from `render` into its output device.
#[derive(Debug, Clone)]
pub struct BrownNoiseBed {
    noise: BrownNoise,
    filter: OnePoleLowPass,
    rng: StdRng,
    base_gain: f32,
    gain: f32,
    /// Per-sample decay applied while fading out
    fade_decay: f32,
    playing: bool,
    fading: bool,
}

impl BrownNoiseBed {
    pub fn new(cutoff_hz: f32, gain: f32, fade_secs: f32, sample_rate_hz: f32) -> Self {
        let fade_samples = (fade_secs * sample_rate_hz).max(1.0);
        Self {
            noise: BrownNoise::new(),
            filter: OnePoleLowPass::new(cutoff_hz, sample_rate_hz),
            rng: StdRng::from_entropy(),
            base_gain: gain,
            gain: 0.0,
            fade_decay: FADE_FLOOR.powf(1.0 / fade_samples),
            playing: false,
            fading: false,
        }
    }

    /// Fill `out` with the next block of samples. Writes silence while the
    /// bed is stopped; while fading, the gain decays toward the floor and the
    /// bed silences itself on arrival.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            if !self.playing {
                *sample = 0.0;
                continue;
            }
            let raw = self.noise.next_sample(&mut self.rng);
            let filtered = self.filter.process(raw);
            *sample = (filtered * self.gain).clamp(-1.0, 1.0);
            if self.fading {
                self.gain *= self.fade_decay;
                if self.gain <= FADE_FLOOR * self.base_gain {
                    self.playing = false;
                    self.fading = false;
                    self.gain = 0.0;
                }
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl AmbientAudio for BrownNoiseBed {
    fn start(&mut self) {
        self.noise.reset();
        self.filter.reset();
        self.gain = self.base_gain;
        self.playing = true;
        self.fading = false;
    }

    fn stop(&mut self) {
        if self.playing {
            self.fading = true;
        }
    }
}
