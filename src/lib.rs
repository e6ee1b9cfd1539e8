//! Looping background-music playback for a 2D arcade game
//!
//! Provides a single capability contract, [`MusicPlayer`], with two
//! interchangeable native backends behind it:
//! - a streaming-codec backend that decodes encoded audio assets
//!   (OGG/MP3/FLAC/WAV) and loops them at an arbitrary playback-rate
//!   multiplier, and
//! - a symbolic-sequencer backend that synthesizes note-sequence assets
//!   through a small software synth, looping at a tempo multiplier.
//!
//! Both backends resolve tracks by logical name against an application
//! asset store (a packed bundle or a plain directory), always loop, and
//! guarantee that native playback resources are torn down on `release`
//! and on session replacement. Audio faults never reach the caller; they
//! are reported through the `log` facade only.
//!
//! # Crate feature flags
//! - `stream` (default): streaming-codec backend (`stream`, enables `rodio`)
//! - `sequence` (default): symbolic-sequencer backend (`sequence`, enables `rodio`)
//! - `export-wav` (opt-in): offline WAV rendering of sequences (enables `hound`)
//!
//! # Quick start
//! ```no_run
//! # #[cfg(feature = "stream")]
//! # {
//! use std::sync::Arc;
//! use fruity_music::{AudioConfig, DirAssets, MusicPlayer, StreamPlayer};
//!
//! let assets = Arc::new(DirAssets::new("assets/music"));
//! let mut player = StreamPlayer::new(assets, &AudioConfig::default());
//! player.play("level 1", 1.25);
//! // ... game runs, music loops ...
//! player.release();
//! # }
//! ```

#![warn(missing_docs)]

// Domain modules (feature-gated for modular use)
pub mod assets; // Asset Store (packs and directories)
pub mod config; // Audio Configuration
pub mod host; // Lifecycle Glue & Backend Selection
pub mod player; // MusicPlayer Capability Contract

#[cfg(feature = "export-wav")]
pub mod export; // Offline WAV Rendering
#[cfg(feature = "sequence")]
pub mod sequence; // Symbolic-Sequencer Backend
#[cfg(feature = "stream")]
pub mod stream; // Streaming-Codec Backend

/// Error types for music playback operations
#[derive(thiserror::Error, Debug)]
pub enum MusicError {
    /// Track or asset could not be resolved
    #[error("Asset error: {0}")]
    Asset(String),

    /// Error while parsing a bundled data format
    #[error("Parse error: {0}")]
    Parse(String),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for MusicError {
    /// Converts a String into `MusicError::Other`.
    ///
    /// Convenience conversion for generic string errors. For better error
    /// discrimination, prefer the specific variant constructors:
    /// - `MusicError::Asset(msg)` for track resolution failures
    /// - `MusicError::Parse(msg)` for bundled format parse failures
    /// - `MusicError::AudioDevice(msg)` for device acquisition failures
    /// - `MusicError::Config(msg)` for invalid configuration
    fn from(msg: String) -> Self {
        MusicError::Other(msg)
    }
}

impl From<&str> for MusicError {
    /// Converts a string slice into `MusicError::Other`.
    ///
    /// See [`From<String>`] for guidance on when to use explicit variant
    /// constructors instead.
    fn from(msg: &str) -> Self {
        MusicError::Other(msg.to_string())
    }
}

/// Result type for music playback operations
pub type Result<T> = std::result::Result<T, MusicError>;

// Public API exports
pub use assets::{write_pack, AssetPack, AssetSource, DirAssets};
pub use config::AudioConfig;
pub use host::{create_player, AppLifecycle, BackendChoice};
pub use player::{MusicPlayer, PlayerState, SharedPlayer, SilentPlayer};

#[cfg(feature = "sequence")]
pub use sequence::{format::Sequence, SequencePlayer};
#[cfg(feature = "stream")]
pub use stream::StreamPlayer;
