//! Host-side lifecycle glue
//!
//! The hosting application owns the engine lifecycle: it picks one playback
//! backend per deployment target at startup, hands it to the game as the
//! [`MusicPlayer`] capability, and forces teardown on suspend and shutdown.
//! The game never learns which backend it received.

use crate::assets::AssetSource;
use crate::config::AudioConfig;
use crate::player::{MusicPlayer, SilentPlayer};
use std::sync::Arc;

#[cfg(feature = "sequence")]
use crate::sequence::SequencePlayer;
#[cfg(feature = "stream")]
use crate::stream::StreamPlayer;

/// Which playback backend a deployment target uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    /// Streaming-codec backend (encoded audio assets).
    Stream,
    /// Symbolic-sequencer backend (note-sequence assets).
    Sequence,
    /// No audio at all (headless hosts, tools).
    Silent,
}

impl BackendChoice {
    /// Parse a backend name as used on command lines and in host config.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "stream" => Some(BackendChoice::Stream),
            "sequence" => Some(BackendChoice::Sequence),
            "silent" => Some(BackendChoice::Silent),
            _ => None,
        }
    }
}

/// Construct the playback backend for this deployment target.
///
/// Backends that are not compiled in fall back to [`SilentPlayer`] with a
/// logged warning, so a host misconfiguration degrades to missing music
/// rather than a startup failure.
#[cfg_attr(
    not(any(feature = "stream", feature = "sequence")),
    allow(unused_variables)
)]
pub fn create_player(
    choice: BackendChoice,
    assets: Arc<dyn AssetSource>,
    config: &AudioConfig,
) -> Box<dyn MusicPlayer> {
    match choice {
        BackendChoice::Silent => Box::new(SilentPlayer::new()),
        #[cfg(feature = "stream")]
        BackendChoice::Stream => Box::new(StreamPlayer::new(assets, config)),
        #[cfg(feature = "sequence")]
        BackendChoice::Sequence => Box::new(SequencePlayer::new(assets, config)),
        #[cfg(not(all(feature = "stream", feature = "sequence")))]
        other => {
            log::warn!("Backend {other:?} is not compiled into this build; music disabled");
            Box::new(SilentPlayer::new())
        }
    }
}

/// Owner of the player across application lifecycle events.
///
/// Suspending forces a full release of native playback resources; resuming
/// replays the last requested track. Dropping the lifecycle (application
/// teardown) releases as well, so resources are freed regardless of how
/// playback was interrupted.
pub struct AppLifecycle {
    player: Box<dyn MusicPlayer>,
}

impl AppLifecycle {
    /// Take ownership of the player selected for this host.
    pub fn new(player: Box<dyn MusicPlayer>) -> Self {
        AppLifecycle { player }
    }

    /// The capability handed to the game.
    pub fn player(&mut self) -> &mut dyn MusicPlayer {
        self.player.as_mut()
    }

    /// Application entering background: force release of all native
    /// playback resources.
    pub fn suspend(&mut self) {
        self.player.pause(true);
    }

    /// Application returning to foreground: resume the last track, if any.
    pub fn resume(&mut self) {
        self.player.pause(false);
    }

    /// Application terminating.
    pub fn shutdown(&mut self) {
        self.player.release();
    }
}

impl Drop for AppLifecycle {
    fn drop(&mut self) {
        self.player.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        plays: usize,
        pauses: Vec<bool>,
        releases: usize,
    }

    struct ProbePlayer(Rc<RefCell<Calls>>);

    impl MusicPlayer for ProbePlayer {
        fn play(&mut self, _track: &str, _speed_factor: f32) {
            self.0.borrow_mut().plays += 1;
        }

        fn pause(&mut self, paused: bool) {
            self.0.borrow_mut().pauses.push(paused);
        }

        fn release(&mut self) {
            self.0.borrow_mut().releases += 1;
        }
    }

    #[test]
    fn backend_names_parse() {
        assert_eq!(BackendChoice::from_name("stream"), Some(BackendChoice::Stream));
        assert_eq!(
            BackendChoice::from_name("sequence"),
            Some(BackendChoice::Sequence)
        );
        assert_eq!(BackendChoice::from_name("silent"), Some(BackendChoice::Silent));
        assert_eq!(BackendChoice::from_name("midi"), None);
    }

    #[test]
    fn lifecycle_forwards_events_and_releases_on_drop() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        {
            let mut lifecycle = AppLifecycle::new(Box::new(ProbePlayer(Rc::clone(&calls))));
            lifecycle.player().play("level 1", 1.0);
            lifecycle.suspend();
            lifecycle.resume();
            lifecycle.shutdown();
        }

        let calls = calls.borrow();
        assert_eq!(calls.plays, 1);
        assert_eq!(calls.pauses, vec![true, false]);
        // shutdown + drop both release; release must be idempotent anyway
        assert_eq!(calls.releases, 2);
    }

    #[test]
    fn silent_choice_creates_a_working_player() {
        struct NoAssets;
        impl AssetSource for NoAssets {
            fn read(&self, name: &str) -> crate::Result<Vec<u8>> {
                Err(crate::MusicError::Asset(format!("missing '{name}'")))
            }
            fn contains(&self, _name: &str) -> bool {
                false
            }
        }

        let mut player = create_player(
            BackendChoice::Silent,
            Arc::new(NoAssets),
            &AudioConfig::default(),
        );
        player.play("level 1", 1.0);
        player.release();
    }
}
