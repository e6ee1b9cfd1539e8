//! Offline WAV rendering of sequences
//!
//! Renders a sequence through the same sequencer source the live backend
//! plays, writing 16-bit mono WAV. Lets track authors audition `.seq` files
//! (and lets machines without an audio device hear anything at all).

use crate::sequence::format::Sequence;
use crate::sequence::sequencer::SequencerSource;
use crate::{MusicError, Result};
use std::path::Path;

/// Render `seconds` of a sequence at the given tempo multiplier to a WAV
/// file.
///
/// Unlike live playback this is tooling-side code, so invalid parameters
/// are reported as errors instead of being logged and swallowed.
pub fn render_wav(
    sequence: Sequence,
    sample_rate: u32,
    speed_factor: f32,
    seconds: f32,
    path: impl AsRef<Path>,
) -> Result<()> {
    if !speed_factor.is_finite() || speed_factor <= 0.0 {
        return Err(MusicError::Config(format!(
            "Tempo multiplier {speed_factor} must be positive"
        )));
    }
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(MusicError::Config(format!(
            "Render length {seconds}s must be positive"
        )));
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path.as_ref(), spec)
        .map_err(|e| format!("Failed to create WAV file: {e}"))?;

    let mut source = SequencerSource::new(sequence, sample_rate, speed_factor);
    let total = (seconds * sample_rate as f32) as usize;
    for _ in 0..total {
        let sample = source.next().unwrap_or(0.0);
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|e| format!("Failed to write WAV sample: {e}"))?;
    }

    writer
        .finalize()
        .map_err(|e| format!("Failed to finalize WAV file: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::format::{EventKind, NoteEvent};

    fn short_sequence() -> Sequence {
        Sequence {
            tick_rate: 50,
            loop_tick: 0,
            events: vec![
                NoteEvent {
                    tick: 0,
                    voice: 0,
                    kind: EventKind::NoteOn,
                    note: 69,
                    velocity: 100,
                },
                NoteEvent {
                    tick: 9,
                    voice: 0,
                    kind: EventKind::NoteOff,
                    note: 69,
                    velocity: 0,
                },
            ],
        }
    }

    #[test]
    fn renders_a_playable_wav() {
        let path = std::env::temp_dir().join("fruity_music_render_test.wav");
        render_wav(short_sequence(), 22_050, 1.0, 0.5, &path).unwrap();

        let data = std::fs::read(&path).unwrap();
        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WAVE");
        // header + half a second of 16-bit mono samples
        assert!(data.len() > 22_050 / 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_non_positive_speed() {
        let path = std::env::temp_dir().join("fruity_music_render_invalid.wav");
        assert!(render_wav(short_sequence(), 22_050, 0.0, 0.5, &path).is_err());
    }
}
