//! Fuzz target for the sequencer state machine
//!
//! Feeds arbitrary event sequences through the transition functions and
//! checks the invariants that must hold after every step.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use eve_core::{Channel, Playlist, PlaylistEntry, Playlists};
use eve_sequencer::{derive_icon, Effect, Sequencer, SequencerConfig, SequencerState, Transition};
use eve_time::TimerKind;

#[derive(Debug, Arbitrary)]
enum Event {
    Advance { primary: bool, index: u8 },
    Next { primary: bool },
    Jump { index: u8 },
    Toggle,
    Switch { primary: bool },
    Start,
    Visible,
    Hidden,
    FireReveal,
    FireRead,
    /// Deliver a timer token the sequencer never issued
    FireStale { generation: u8 },
    CanPlay { primary: bool },
    PlayStarted { primary: bool },
    Rejected { primary: bool },
    Ended { primary: bool },
}

#[derive(Debug, Arbitrary)]
struct Input {
    eva_len: u8,
    eve_len: u8,
    events: Vec<Event>,
}

fn channel(primary: bool) -> Channel {
    if primary {
        Channel::Primary
    } else {
        Channel::Secondary
    }
}

fn playlist(name: &str, len: u8) -> Playlist {
    (0..len % 6)
        .map(|i| PlaylistEntry::new(format!("{name}-{i}.mp4"), format!("{name} {i}"), "sub"))
        .collect()
}

fn apply(seq: &Sequencer, state: &SequencerState, event: &Event) -> Transition {
    match *event {
        Event::Advance { primary, index } => seq.advance_to(state, channel(primary), index as usize),
        Event::Next { primary } => seq.advance_to_next(state, channel(primary)),
        Event::Jump { index } => seq.jump_to(state, index as usize),
        Event::Toggle => seq.toggle_play_pause(state),
        Event::Switch { primary } => seq.switch_channel(state, channel(primary)),
        Event::Start => seq.start_experience(state),
        Event::Visible => seq.on_section_visible(state),
        Event::Hidden => seq.on_section_hidden(state),
        Event::FireReveal => match state.reveal_timer {
            Some(token) => seq.on_timer(state, token),
            None => Transition::unchanged(state),
        },
        Event::FireRead => match state.read_timer {
            Some(token) => seq.on_timer(state, token),
            None => Transition::unchanged(state),
        },
        Event::FireStale { generation } => {
            let token = eve_time::TimerToken {
                kind: TimerKind::Read,
                generation: u64::MAX - generation as u64,
            };
            seq.on_timer(state, token)
        }
        Event::CanPlay { primary } => seq.on_can_play(state, channel(primary)),
        Event::PlayStarted { primary } => seq.on_play_started(state, channel(primary)),
        Event::Rejected { primary } => seq.on_play_rejected(state, channel(primary), "fuzz"),
        Event::Ended { primary } => seq.on_ended(state, channel(primary)),
    }
}

fuzz_target!(|input: Input| {
    let playlists = Playlists::new(playlist("eva", input.eva_len), playlist("eve", input.eve_len));
    let seq = Sequencer::new(SequencerConfig::default(), playlists);
    let mut state = seq.prime(&SequencerState::default()).state;

    for event in &input.events {
        let t = apply(&seq, &state, event);

        if let Event::FireStale { .. } = event {
            assert!(t.is_noop());
        }
        for effect in &t.effects {
            if let Effect::ArmTimer { token, .. } = effect {
                assert_ne!(token.kind, TimerKind::AutoRotate);
            }
        }
        state = t.state;

        for ch in Channel::ALL {
            let len = seq.playlists().get(ch).len();
            assert!(state.cursors[ch] < len.max(1));
        }
        assert!(!(state.reveal_timer.is_some() && state.read_timer.is_some()));
        assert!(state.read_timer.is_none() || state.in_reading_phase);
        assert!(state.media[state.active.other()].muted);
        assert_eq!(state.icon, derive_icon(&state));
        assert_eq!(state.buffer_indicator, state.awaiting_ready.is_some());
    }
});
