//! Streaming-codec playback backend
//!
//! Plays encoded audio tracks (OGG/MP3/FLAC/WAV) through the platform's
//! output device, the mobile-style rendition of the [`MusicPlayer`]
//! contract. Every `play` call resolves the track fresh against the asset
//! store (for packed bundles that is an offset + length region of the
//! application package), builds a fresh decoder and output sink, configures
//! continuous looping and the requested playback-rate multiplier, and
//! starts.
//!
//! The configured music-volume group gain is applied to every sink, keeping
//! background music in its own volume category the way a mobile host routes
//! output to the OS music stream.

use crate::assets::{resolve_track, AssetSource};
use crate::config::AudioConfig;
use crate::player::{sanitize_speed, MusicPlayer, PlayerState};
use crate::{MusicError, Result};
use rodio::{Decoder, OutputStream, Sink, Source};
use std::io::Cursor;
use std::sync::Arc;

/// Extensions tried when resolving encoded audio tracks, in order.
const STREAM_EXTENSIONS: &[&str] = &[".ogg", ".mp3", ".flac", ".wav"];

/// Live native resources of one `play` call: the output stream and the
/// sink with its looping decoded source.
struct StreamSession {
    _stream: OutputStream,
    sink: Sink,
    speed_factor: f32,
}

/// Codec-backed music player.
pub struct StreamPlayer {
    assets: Arc<dyn AssetSource>,
    music_volume: f32,
    session: Option<StreamSession>,
    last_track: Option<String>,
    last_speed: f32,
    resume_pending: bool,
}

impl StreamPlayer {
    /// Create a backend over the given asset store.
    ///
    /// No native resources are held until the first `play`; each session
    /// acquires its own output stream, mirroring a fresh native player per
    /// track.
    pub fn new(assets: Arc<dyn AssetSource>, config: &AudioConfig) -> Self {
        StreamPlayer {
            assets,
            music_volume: config.music_volume,
            session: None,
            last_track: None,
            last_speed: 1.0,
            resume_pending: false,
        }
    }

    /// Observable playback state.
    pub fn state(&self) -> PlayerState {
        if self.session.is_some() {
            PlayerState::Playing
        } else {
            PlayerState::Idle
        }
    }

    /// Playback-rate multiplier of the open session, if one exists.
    pub fn current_speed(&self) -> Option<f32> {
        self.session.as_ref().map(|s| s.speed_factor)
    }

    /// Stop the sink and drop the whole session, releasing decoder and
    /// output stream.
    fn release_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.sink.stop();
        }
    }

    /// Start a session for the remembered track and speed.
    fn start(&mut self) -> Result<()> {
        let Some(track) = self.last_track.clone() else {
            return Ok(());
        };

        let (name, data) = resolve_track(self.assets.as_ref(), &track, STREAM_EXTENSIONS)?;

        let decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| MusicError::Parse(format!("Failed to decode '{name}': {e}")))?;

        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| MusicError::AudioDevice(format!("Failed to open output stream: {e}")))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| MusicError::AudioDevice(format!("Failed to create sink: {e}")))?;

        // Loop forever at the requested rate, in the music volume group
        sink.set_speed(self.last_speed);
        sink.set_volume(self.music_volume);
        sink.append(decoder.repeat_infinite());
        sink.play();

        self.session = Some(StreamSession {
            _stream: stream,
            sink,
            speed_factor: self.last_speed,
        });
        Ok(())
    }
}

impl MusicPlayer for StreamPlayer {
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
