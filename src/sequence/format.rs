//! Note-sequence format
//!
//! Symbolic music tracks are shipped as `NSEQ` files: a list of timed
//! note-on/note-off events for up to three synth voices, with a tick clock
//! and a loop point. This is the sequencer backend's equivalent of a score:
//! no sampled audio, just what to play and when.
//!
//! Format details (all integers big-endian):
//! - Magic: `NSEQ` (4 bytes)
//! - Version: u16 (currently 1)
//! - Tick rate: u16 (ticks per second at native tempo)
//! - Loop tick: u32 (tick to rewind to at the end of the sequence)
//! - Event count: u32
//! - Events, 8 bytes each, tick-ordered:
//!   tick (u32), voice (u8), kind (u8: 0 = off, 1 = on),
//!   note (u8, MIDI number), velocity (u8, 0-127)

use crate::{MusicError, Result};

const SEQ_MAGIC: &[u8; 4] = b"NSEQ";
const SEQ_VERSION: u16 = 1;
const HEADER_LEN: usize = 16;
const EVENT_LEN: usize = 8;

/// Number of synth voices a sequence can address.
pub const NUM_VOICES: u8 = 3;

/// Maximum reasonable event count (100,000 events is far beyond any
/// arcade loop)
const MAX_REASONABLE_EVENTS: u32 = 100_000;

/// What a timed event does to its voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Stop the voice's current note.
    NoteOff,
    /// Start a note on the voice.
    NoteOn,
}

/// One timed note event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// Tick at which the event fires.
    pub tick: u32,
    /// Target voice (0..NUM_VOICES).
    pub voice: u8,
    /// Note-on or note-off.
    pub kind: EventKind,
    /// MIDI note number (0-127).
    pub note: u8,
    /// Velocity (0-127); ignored for note-off.
    pub velocity: u8,
}

/// A parsed symbolic music track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// Ticks per second at native (1.0×) tempo.
    pub tick_rate: u16,
    /// Tick the sequencer rewinds to when the end is reached.
    pub loop_tick: u32,
    /// Tick-ordered events.
    pub events: Vec<NoteEvent>,
}

impl Sequence {
    /// Parse a sequence from raw bytes, validating structure and ranges.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(MusicError::Parse("Sequence file too small for header".to_string()));
        }

        if &data[0..4] != SEQ_MAGIC {
            return Err(MusicError::Parse("Invalid sequence magic number".to_string()));
        }

        let version = u16::from_be_bytes([data[4], data[5]]);
        if version != SEQ_VERSION {
            return Err(MusicError::Parse(format!(
                "Unsupported sequence version {version} (expected {SEQ_VERSION})"
            )));
        }

        let tick_rate = u16::from_be_bytes([data[6], data[7]]);
        if !(1..=1000).contains(&tick_rate) {
            return Err(MusicError::Parse(format!(
                "Sequence tick rate {tick_rate} outside supported range 1..=1000"
            )));
        }

        let loop_tick = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
        let event_count = u32::from_be_bytes([data[12], data[13], data[14], data[15]]);

        if event_count == 0 {
            return Err(MusicError::Parse("Sequence has no events".to_string()));
        }
        if event_count > MAX_REASONABLE_EVENTS {
            return Err(MusicError::Parse(format!(
                "Sequence event count {event_count} exceeds limit of {MAX_REASONABLE_EVENTS}"
            )));
        }

        let expected = HEADER_LEN + event_count as usize * EVENT_LEN;
        if data.len() < expected {
            return Err(MusicError::Parse(format!(
                "Sequence truncated: {} bytes, expected {}",
                data.len(),
                expected
            )));
        }

        let mut events = Vec::with_capacity(event_count as usize);
        let mut prev_tick = 0u32;
        for i in 0..event_count as usize {
            let p = HEADER_LEN + i * EVENT_LEN;
            let tick = u32::from_be_bytes([data[p], data[p + 1], data[p + 2], data[p + 3]]);
            let voice = data[p + 4];
            let kind = match data[p + 5] {
                0 => EventKind::NoteOff,
                1 => EventKind::NoteOn,
                other => {
                    return Err(MusicError::Parse(format!(
                        "Unknown event kind {other} at event {i}"
                    )))
                }
            };
            let note = data[p + 6];
            let velocity = data[p + 7];

            if tick < prev_tick {
                return Err(MusicError::Parse(format!(
                    "Events out of order at event {i} (tick {tick} after {prev_tick})"
                )));
            }
            prev_tick = tick;

            if voice >= NUM_VOICES {
                return Err(MusicError::Parse(format!(
                    "Voice {voice} out of range at event {i} (max {})",
                    NUM_VOICES - 1
                )));
            }
            if note > 127 || velocity > 127 {
                return Err(MusicError::Parse(format!(
                    "Note or velocity out of MIDI range at event {i}"
                )));
            }

            events.push(NoteEvent {
                tick,
                voice,
                kind,
                note,
                velocity,
            });
        }

        let seq = Sequence {
            tick_rate,
            loop_tick,
            events,
        };
        if loop_tick >= seq.end_tick() {
            return Err(MusicError::Parse(format!(
                "Loop tick {loop_tick} is at or past the end of the sequence ({})",
                seq.end_tick()
            )));
        }

        Ok(seq)
    }

    /// Tick index one past the last event; the sequencer rewinds to the
    /// loop tick when the clock reaches it.
    pub fn end_tick(&self) -> u32 {
        self.events.last().map(|e| e.tick + 1).unwrap_or(0)
    }

    /// Duration of one full pass at native tempo, in seconds.
    pub fn duration_seconds(&self) -> f32 {
        self.end_tick() as f32 / self.tick_rate as f32
    }

    /// Serialize back into the `NSEQ` wire format (tooling-side
    /// counterpart of [`Sequence::parse`]).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.events.len() * EVENT_LEN);
        out.extend_from_slice(SEQ_MAGIC);
        out.extend_from_slice(&SEQ_VERSION.to_be_bytes());
        out.extend_from_slice(&self.tick_rate.to_be_bytes());
        out.extend_from_slice(&self.loop_tick.to_be_bytes());
        out.extend_from_slice(&(self.events.len() as u32).to_be_bytes());
        for e in &self.events {
            out.extend_from_slice(&e.tick.to_be_bytes());
            out.push(e.voice);
            out.push(match e.kind {
                EventKind::NoteOff => 0,
                EventKind::NoteOn => 1,
            });
            out.push(e.note);
            out.push(e.velocity);
        }
        out
    }
}
