//! Software synth for sequence playback
//!
//! Three fixed square-wave voices with velocity-scaled amplitude and a short
//! exponential attack/release, mixed and normalized. Intentionally simple and
//! fully deterministic: the same event stream always renders the same
//! samples, which is what the sequencer tests rely on.

use super::format::NUM_VOICES;

/// Per-sample smoothing factor for amplitude changes; gives a few
/// milliseconds of ramp at 44.1 kHz, enough to avoid clicks on note edges.
const LEVEL_SMOOTHING: f32 = 0.004;

/// Level below which a released voice counts as silent.
const SILENCE_FLOOR: f32 = 1e-4;

/// Convert a MIDI note number to its frequency in Hz (A4 = 440).
pub fn midi_to_frequency(note: u8) -> f32 {
    440.0 * ((note as f32 - 69.0) / 12.0).exp2()
}

#[derive(Clone, Copy)]
struct Voice {
    phase: f32,
    phase_inc: f32,
    level: f32,
    target: f32,
}

impl Voice {
    fn new() -> Self {
        Voice {
            phase: 0.0,
            phase_inc: 0.0,
            level: 0.0,
            target: 0.0,
        }
    }

    fn note_on(&mut self, note: u8, velocity: u8, sample_rate: u32) {
        self.phase_inc = midi_to_frequency(note) / sample_rate as f32;
        self.target = velocity as f32 / 127.0;
        // Phase is not reset: re-triggering mid-cycle stays click-free
    }

    fn note_off(&mut self) {
        self.target = 0.0;
    }

    fn advance(&mut self) -> f32 {
        self.level += (self.target - self.level) * LEVEL_SMOOTHING;
        if self.phase_inc == 0.0 {
            return 0.0;
        }

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        let square = if self.phase < 0.5 { 1.0 } else { -1.0 };
        square * self.level
    }

    fn is_silent(&self) -> bool {
        self.target == 0.0 && self.level < SILENCE_FLOOR
    }
}

/// Fixed-voice square-wave synth driven by sequence events.
pub struct Synth {
    voices: [Voice; NUM_VOICES as usize],
    sample_rate: u32,
}

impl Synth {
    /// Create a synth rendering at the given output sample rate.
    pub fn new(sample_rate: u32) -> Self {
        Synth {
            voices: [Voice::new(); NUM_VOICES as usize],
            sample_rate,
        }
    }

    /// Start a note on a voice. Out-of-range voices are ignored; the
    /// parser guarantees they never occur in well-formed sequences.
    pub fn note_on(&mut self, voice: u8, note: u8, velocity: u8) {
        if let Some(v) = self.voices.get_mut(voice as usize) {
            v.note_on(note, velocity, self.sample_rate);
        }
    }

    /// Release a voice's current note.
    pub fn note_off(&mut self, voice: u8) {
        if let Some(v) = self.voices.get_mut(voice as usize) {
            v.note_off();
        }
    }

    /// Release all voices.
    pub fn all_notes_off(&mut self) {
        for v in &mut self.voices {
            v.note_off();
        }
    }

    /// Advance one sample and return the mixed output in -1.0..1.0.
    pub fn advance(&mut self) -> f32 {
        let mut acc = 0.0;
        for v in &mut self.voices {
            acc += v.advance();
        }
        // Normalize by voice count so three full-velocity voices cannot clip
        (acc / NUM_VOICES as f32).clamp(-1.0, 1.0)
    }

    /// Whether every voice has decayed to silence.
    pub fn is_silent(&self) -> bool {
        self.voices.iter().all(Voice::is_silent)
    }

    /// The output sample rate this synth renders at.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
