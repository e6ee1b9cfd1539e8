//! Frame-stepping sequencer source
//!
//! Steps a [`Sequence`](super::format::Sequence)'s event list on a
//! sample-accurate tick clock and renders through the software synth. The
//! source loops forever: when the clock reaches the end tick it rewinds to
//! the sequence's loop tick, so a sink consuming it plays until it is
//! stopped from outside.
//!
//! The tempo multiplier scales the tick clock at construction time:
//! `samples_per_tick = sample_rate / (tick_rate × tempo)`. Changing tempo on
//! a live source is not supported; sessions are replaced instead.

use super::format::{EventKind, NoteEvent, Sequence};
use super::synth::Synth;
use rodio::Source;
use std::time::Duration;

/// Infinite, looping sample source for one sequence at a fixed tempo.
pub struct SequencerSource {
    events: Vec<NoteEvent>,
    synth: Synth,
    sample_rate: u32,
    samples_per_tick: f64,
    /// Tick whose events fire next.
    tick: u32,
    end_tick: u32,
    loop_tick: u32,
    next_event: usize,
    /// Fractional sample budget remaining in the current tick.
    samples_left_in_tick: f64,
}

impl SequencerSource {
    /// Build a source for `sequence` at the given output sample rate and
    /// tempo multiplier.
    ///
    /// `speed_factor` must be finite and positive; the backend clamps
    /// caller-supplied values before constructing a source.
    pub fn new(sequence: Sequence, sample_rate: u32, speed_factor: f32) -> Self {
        let samples_per_tick =
            sample_rate as f64 / (sequence.tick_rate as f64 * speed_factor as f64);
        let end_tick = sequence.end_tick();

        SequencerSource {
            loop_tick: sequence.loop_tick,
            events: sequence.events,
            synth: Synth::new(sample_rate),
            sample_rate,
            samples_per_tick,
            tick: 0,
            end_tick,
            next_event: 0,
            samples_left_in_tick: 0.0,
        }
    }

    /// Samples rendered per tick at the configured tempo.
    pub fn samples_per_tick(&self) -> f64 {
        self.samples_per_tick
    }

    /// Tick whose events fire next; wraps to the loop tick at the end of
    /// the sequence.
    pub fn current_tick(&self) -> u32 {
        self.tick
    }

    /// Fire the events of the current tick, then advance the tick cursor,
    /// rewinding to the loop tick at the end of the sequence.
    fn enter_tick(&mut self) {
        while let Some(event) = self.events.get(self.next_event) {
            if event.tick != self.tick {
                break;
            }
            match event.kind {
                EventKind::NoteOn => self.synth.note_on(event.voice, event.note, event.velocity),
                EventKind::NoteOff => self.synth.note_off(event.voice),
            }
            self.next_event += 1;
        }

        self.samples_left_in_tick += self.samples_per_tick;

        self.tick += 1;
        if self.tick >= self.end_tick {
            // Loop forever: rewind the clock, keep voice tails ringing
            self.tick = self.loop_tick;
            self.next_event = self.events.partition_point(|e| e.tick < self.loop_tick);
        }
    }
}

impl Iterator for SequencerSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.samples_left_in_tick <= 0.0 {
            self.enter_tick();
        }
        self.samples_left_in_tick -= 1.0;
        Some(self.synth.advance())
    }
}

impl Source for SequencerSource {
    fn current_frame_len(&self) -> Option<usize> {
        // Parameters never change; the source runs until stopped
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        // Looping forever; no finite duration
        None
    }
}
