//! Symbolic-sequencer playback backend
//!
//! Plays note-sequence tracks (not sampled audio) through a software synth
//! bound to a native output device, the desktop-style rendition of the
//! [`MusicPlayer`] contract. The device ("the sequencer") is acquired once
//! at backend construction; if none is available the backend logs the
//! failure and stays permanently inert instead of crashing, and every later
//! `play` request is a quiet no-op.
//!
//! A failed load/parse/open never starts playback: the session is only
//! created after every configuration step succeeded, so a half-configured
//! sequencer can never end up audible or leaked.

pub mod format;
pub mod sequencer;
pub mod synth;

use crate::assets::{resolve_track, AssetSource};
use crate::config::AudioConfig;
use crate::player::{sanitize_speed, MusicPlayer, PlayerState};
use crate::{MusicError, Result};
use format::Sequence;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use sequencer::SequencerSource;
use std::sync::Arc;

/// Extension tried when resolving sequence tracks.
const SEQUENCE_EXTENSIONS: &[&str] = &[".seq"];

/// The one native sequencer resource, held for the backend's lifetime.
struct SequencerDevice {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// Live resources of one `play` call.
struct SequenceSession {
    sink: Sink,
    speed_factor: f32,
}

/// Sequencer-backed music player.
pub struct SequencePlayer {
    assets: Arc<dyn AssetSource>,
    sample_rate: u32,
    music_volume: f32,
    device: Option<SequencerDevice>,
    session: Option<SequenceSession>,
    last_track: Option<String>,
    last_speed: f32,
    resume_pending: bool,
}

impl SequencePlayer {
    /// Create a backend over the given asset store, acquiring the output
    /// device now.
    ///
    /// Acquisition failure is logged once and leaves the backend inert;
    /// construction itself never fails.
    pub fn new(assets: Arc<dyn AssetSource>, config: &AudioConfig) -> Self {
        let device = match OutputStream::try_default() {
            Ok((stream, handle)) => Some(SequencerDevice {
                _stream: stream,
                handle,
            }),
            Err(e) => {
                log::error!("No sequencer device available, music stays off: {e}");
                None
            }
        };
        Self::with_device(assets, config, device)
    }

    /// Create a permanently inert backend, as when no output device exists.
    ///
    /// Useful for hosts that must hand the game a real `SequencePlayer`
    /// in environments without audio.
    pub fn inert(assets: Arc<dyn AssetSource>, config: &AudioConfig) -> Self {
        Self::with_device(assets, config, None)
    }

    fn with_device(
        assets: Arc<dyn AssetSource>,
        config: &AudioConfig,
        device: Option<SequencerDevice>,
    ) -> Self {
        SequencePlayer {
            assets,
            sample_rate: config.sample_rate,
            music_volume: config.music_volume,
            device,
            session: None,
            last_track: None,
            last_speed: 1.0,
            resume_pending: false,
        }
    }

    /// Whether the sequencer device was acquired at construction.
    pub fn has_device(&self) -> bool {
        self.device.is_some()
    }

    /// Observable playback state.
    pub fn state(&self) -> PlayerState {
        if self.session.is_some() {
            PlayerState::Playing
        } else {
            PlayerState::Idle
        }
    }

    /// Tempo multiplier of the open session, if one exists.
    pub fn current_speed(&self) -> Option<f32> {
        self.session.as_ref().map(|s| s.speed_factor)
    }

    /// Stop and drop the open session; the device handle stays alive.
    fn release_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.sink.stop();
        }
    }

    /// Start a session for the remembered track and speed.
    ///
    /// Playback begins only after resolve, parse and sink-open all
    /// succeeded; an error on any step leaves the backend idle with every
    /// partial resource dropped.
    fn start(&mut self) -> Result<()> {
        let Some(track) = self.last_track.clone() else {
            return Ok(());
        };
        let Some(device) = self.device.as_ref() else {
            log::debug!("Ignoring play request for '{track}': sequencer unavailable");
            return Ok(());
        };

        let (_name, data) = resolve_track(self.assets.as_ref(), &track, SEQUENCE_EXTENSIONS)?;
        let sequence = Sequence::parse(&data)?;

        let sink = Sink::try_new(&device.handle)
            .map_err(|e| MusicError::AudioDevice(format!("Failed to open sequencer: {e}")))?;
        let source = SequencerSource::new(sequence, self.sample_rate, self.last_speed);
        sink.set_volume(self.music_volume);
        sink.append(source);
        sink.play();

        self.session = Some(SequenceSession {
            sink,
            speed_factor: self.last_speed,
        });
        Ok(())
    }
}

impl MusicPlayer for SequencePlayer {
    fn play(&mut self, track: &str, speed_factor: f32) {
        self.last_track = Some(track.to_string());
        self.last_speed = sanitize_speed(speed_factor);
        self.resume_pending = false;

        // Prior session must be fully gone before the new one allocates
        self.release_session();
        if let Err(e) = self.start() {
            log::warn!("Music track '{track}' failed to start: {e}");
        }
    }

    fn pause(&mut self, paused: bool) {
        if paused {
            self.resume_pending = self.session.is_some();
            self.release_session();
        } else if self.resume_pending && self.session.is_none() {
            self.resume_pending = false;
            if let Err(e) = self.start() {
                log::warn!("Music failed to resume: {e}");
            }
        }
    }

    fn release(&mut self) {
        self.resume_pending = false;
        self.release_session();
    }
}
