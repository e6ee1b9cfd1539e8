//! Audio configuration
//!
//! Host-level knobs shared by both backends. The music volume group gain is
//! applied to every playback sink so background music sits in its own volume
//! category, the way a mobile host routes its output to the OS music stream.

use crate::{MusicError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default output sample rate (44.1 kHz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Configuration for music playback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Output sample rate in Hz used by the sequencer synth.
    pub sample_rate: u32,
    /// Gain for the music volume group (0.0 = muted, 1.0 = full).
    pub music_volume: f32,
}

impl AudioConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            MusicError::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        let config: AudioConfig = serde_json::from_str(&data)
            .map_err(|e| MusicError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check field ranges.
    pub fn validate(&self) -> Result<()> {
        if !(8_000..=192_000).contains(&self.sample_rate) {
            return Err(MusicError::Config(format!(
                "Sample rate {} outside supported range 8000..=192000",
                self.sample_rate
            )));
        }
        if !self.music_volume.is_finite() || !(0.0..=1.0).contains(&self.music_volume) {
            return Err(MusicError::Config(format!(
                "Music volume {} outside range 0.0..=1.0",
                self.music_volume
            )));
        }
        Ok(())
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            sample_rate: DEFAULT_SAMPLE_RATE,
            music_volume: 1.0,
        }
    }
}
