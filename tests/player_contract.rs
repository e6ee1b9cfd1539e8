//! Contract tests for the music player backends
//!
//! These exercise the full play/release state machine through packed
//! assets, the way a shipped game drives it. Tests that need a real audio
//! device skip themselves when the environment has none.

use std::sync::Arc;

use fruity_music::assets::{pack_bytes, AssetPack};
use fruity_music::{
    create_player, AppLifecycle, AudioConfig, BackendChoice, MusicPlayer, PlayerState,
};

#[cfg(feature = "sequence")]
use fruity_music::sequence::format::{EventKind, NoteEvent, Sequence};

#[cfg(feature = "sequence")]
fn level_sequence_bytes() -> Vec<u8> {
    Sequence {
        tick_rate: 50,
        loop_tick: 0,
        events: vec![
            NoteEvent {
                tick: 0,
                voice: 0,
                kind: EventKind::NoteOn,
                note: 64,
                velocity: 110,
            },
            NoteEvent {
                tick: 20,
                voice: 1,
                kind: EventKind::NoteOn,
                note: 55,
                velocity: 90,
            },
            NoteEvent {
                tick: 48,
                voice: 0,
                kind: EventKind::NoteOff,
                note: 64,
                velocity: 0,
            },
            NoteEvent {
                tick: 49,
                voice: 1,
                kind: EventKind::NoteOff,
                note: 55,
                velocity: 0,
            },
        ],
    }
    .to_bytes()
}

#[cfg(feature = "stream")]
fn level_wav_bytes() -> Vec<u8> {
    let samples: Vec<i16> = (0..256)
        .map(|i| if i % 16 < 8 { 6000 } else { -6000 })
        .collect();
    let data_len = (samples.len() * 2) as u32;

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&8000u32.to_le_bytes());
    out.extend_from_slice(&16000u32.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

/// Pack the test assets the way the pack subcommand would.
fn game_pack() -> Arc<AssetPack> {
    let mut entries = Vec::new();
    #[cfg(feature = "sequence")]
    entries.push(("level 1.seq".to_string(), level_sequence_bytes()));
    #[cfg(feature = "stream")]
    entries.push(("level 1.wav".to_string(), level_wav_bytes()));

    let bytes = pack_bytes(&entries).expect("pack test assets");
    Arc::new(AssetPack::from_bytes(bytes).expect("reopen test pack"))
}

#[cfg(feature = "sequence")]
#[test]
fn sequence_backend_scenario() {
    use fruity_music::SequencePlayer;

    let mut player = SequencePlayer::new(game_pack(), &AudioConfig::default());
    if !player.has_device() {
        eprintln!("Skipping sequence scenario (audio backend unavailable)");
        return;
    }

    player.play("level 1", 1.0);
    assert_eq!(player.state(), PlayerState::Playing);

    // Speed-up power-up: same track, double tempo, still one session
    player.play("level 1", 2.0);
    assert_eq!(player.state(), PlayerState::Playing);
    assert_eq!(player.current_speed(), Some(2.0));

    player.release();
    assert_eq!(player.state(), PlayerState::Idle);
    player.release();
    assert_eq!(player.state(), PlayerState::Idle);
}

#[cfg(feature = "stream")]
#[test]
fn stream_backend_scenario() {
    use fruity_music::StreamPlayer;

    let mut player = StreamPlayer::new(game_pack(), &AudioConfig::default());
    player.play("level 1", 1.0);
    if player.state() != PlayerState::Playing {
        eprintln!("Skipping stream scenario (audio backend unavailable)");
        return;
    }

    player.play("level 1", 2.0);
    assert_eq!(player.state(), PlayerState::Playing);
    assert_eq!(player.current_speed(), Some(2.0));

    player.release();
    assert_eq!(player.state(), PlayerState::Idle);
    player.release();
    assert_eq!(player.state(), PlayerState::Idle);
}

#[cfg(feature = "sequence")]
#[test]
fn inert_backend_survives_the_whole_contract() {
    use fruity_music::SequencePlayer;

    let mut player = SequencePlayer::inert(game_pack(), &AudioConfig::default());

    player.play("level 1", 1.0);
    assert_eq!(player.state(), PlayerState::Idle);
    player.pause(true);
    player.pause(false);
    player.release();
    assert_eq!(player.state(), PlayerState::Idle);
}

#[cfg(feature = "sequence")]
#[test]
fn lifecycle_suspend_releases_and_resume_restarts() {
    use fruity_music::SequencePlayer;

    let backend = SequencePlayer::new(game_pack(), &AudioConfig::default());
    if !backend.has_device() {
        eprintln!("Skipping lifecycle test (audio backend unavailable)");
        return;
    }

    let mut lifecycle = AppLifecycle::new(Box::new(backend));
    lifecycle.player().play("level 1", 1.5);
    lifecycle.suspend();
    lifecycle.resume();
    lifecycle.shutdown();
}

#[test]
fn silent_backend_needs_no_device() {
    let mut player = create_player(BackendChoice::Silent, game_pack(), &AudioConfig::default());
    player.play("level 1", 1.0);
    player.pause(true);
    player.pause(false);
    player.release();
    player.release();
}
