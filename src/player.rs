//! MusicPlayer capability contract
//!
//! The one interface the game depends on. Each deployment target supplies
//! exactly one concrete implementation (streaming-codec, symbolic-sequencer,
//! or silent); composition is purely by handing a boxed player down to the
//! game at startup.
//!
//! Playback failures never surface here: `play` and `release` have no error
//! channel, by design. Backends log faults and stay silent.

use parking_lot::Mutex;
use std::sync::Arc;

/// Observable playback state of a backend instance.
///
/// There is no terminal "released" state distinguishable from `Idle`;
/// a backend can be reused indefinitely after `release`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// No native playback session is open.
    #[default]
    Idle,
    /// A looping session is open and audible.
    Playing,
}

/// Capability contract for looping background-music playback.
///
/// Implementations must keep at most one native playback session open at a
/// time: `play` fully tears down any existing session before starting a new
/// one, and `release` is an idempotent no-op when nothing is playing.
pub trait MusicPlayer {
    /// Start a new looping playback session for `track` at the given tempo
    /// multiplier (1.0 = native speed), replacing any existing session.
    ///
    /// Safe to call repeatedly, including with the same track and while
    /// already playing. Failures are logged and swallowed; the call never
    /// panics past its own boundary.
    fn play(&mut self, track: &str, speed_factor: f32);

    /// Suspend (`true`) or resume (`false`) playback around host lifecycle
    /// events.
    ///
    /// Suspending forces a full `release` while remembering the last
    /// requested track; resuming replays that request from the beginning.
    fn pause(&mut self, paused: bool);

    /// Stop playback and free all native playback resources.
    ///
    /// Idempotent; safe to call when nothing is playing.
    fn release(&mut self);
}

/// Clamp a caller-supplied tempo multiplier to the supported domain.
///
/// `play` has no error channel, so non-finite or non-positive factors fall
/// back to native speed with a logged warning instead of being rejected.
#[cfg(any(feature = "stream", feature = "sequence"))]
pub(crate) fn sanitize_speed(speed_factor: f32) -> f32 {
    if speed_factor.is_finite() && speed_factor > 0.0 {
        speed_factor
    } else {
        log::warn!("Ignoring invalid tempo multiplier {speed_factor}, using 1.0");
        1.0
    }
}

/// No-op player for hosts without audio (headless runs, tools).
///
/// Behaves as a player whose `play`/`pause`/`release` are harmless no-ops.
#[derive(Debug, Default)]
pub struct SilentPlayer;

impl SilentPlayer {
    /// Create a new silent player.
    pub fn new() -> Self {
        SilentPlayer
    }
}

impl MusicPlayer for SilentPlayer {
    fn play(&mut self, _track: &str, _speed_factor: f32) {}

    fn pause(&mut self, _paused: bool) {}

    fn release(&mut self) {}
}

/// Mutex-guarded player handle for hosts that touch music from more than
/// one context.
///
/// A backend instance is owned by a single caller; `SharedPlayer` wraps one
/// in `Arc<Mutex<_>>` so the session-replace sequence inside `play` and
/// `release` stays mutually exclusive.
pub struct SharedPlayer<P: MusicPlayer> {
    inner: Arc<Mutex<P>>,
}

impl<P: MusicPlayer> SharedPlayer<P> {
    /// Wrap a player for shared access.
    pub fn new(player: P) -> Self {
        SharedPlayer {
            inner: Arc::new(Mutex::new(player)),
        }
    }

    /// Run a closure against the locked inner player.
    pub fn with<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<P: MusicPlayer> Clone for SharedPlayer<P> {
    fn clone(&self) -> Self {
        SharedPlayer {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: MusicPlayer> MusicPlayer for SharedPlayer<P> {
    fn play(&mut self, track: &str, speed_factor: f32) {
        self.inner.lock().play(track, speed_factor);
    }

    fn pause(&mut self, paused: bool) {
        self.inner.lock().pause(paused);
    }

    fn release(&mut self) {
        self.inner.lock().release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records calls so contract-level plumbing can be asserted.
    #[derive(Default)]
    struct ProbePlayer {
        plays: Vec<(String, f32)>,
        releases: usize,
    }

    impl MusicPlayer for ProbePlayer {
        fn play(&mut self, track: &str, speed_factor: f32) {
            self.plays.push((track.to_string(), speed_factor));
        }

        fn pause(&mut self, paused: bool) {
            if paused {
                self.release();
            }
        }

        fn release(&mut self) {
            self.releases += 1;
        }
    }

    #[test]
    fn silent_player_is_harmless() {
        let mut player = SilentPlayer::new();
        player.play("level 1", 1.0);
        player.pause(true);
        player.pause(false);
        player.release();
        player.release();
    }

    #[test]
    fn shared_player_forwards_calls() {
        let mut shared = SharedPlayer::new(ProbePlayer::default());
        let mut other = shared.clone();

        shared.play("level 1", 1.0);
        other.play("level 2", 2.0);
        shared.release();

        shared.with(|p| {
            assert_eq!(p.plays.len(), 2);
            assert_eq!(p.plays[1], ("level 2".to_string(), 2.0));
            assert_eq!(p.releases, 1);
        });
    }

    #[test]
    fn default_state_is_idle() {
        assert_eq!(PlayerState::default(), PlayerState::Idle);
    }
}
