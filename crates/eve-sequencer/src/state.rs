//! Sequencer state record

use eve_core::{Channel, ChannelMap};
use eve_time::{TimerIssuer, TimerToken};

use crate::ControlIcon;

/// Viewport visibility of the playback section
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Visibility {
    /// No observation yet
    #[default]
    Unobserved,
    Visible,
    Hidden,
}

/// Phase of the sequence on the active channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has been sequenced yet
    Idle,
    /// Curtain closed, waiting for the reveal timer
    Transitioning,
    /// Caption shown, media not yet started
    Reading,
    /// Active media is playing
    Playing,
    /// Sequence begun but media held
    Paused,
}

/// What the sequencer believes about one media element.
/// Updated only by the sequencer's own commands and media callbacks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaStatus {
    pub source: Option<String>,
    pub paused: bool,
    pub muted: bool,
    /// Enough data buffered to start without stalling
    pub buffered: bool,
    pub looping: bool,
    pub visible: bool,
}

impl MediaStatus {
    /// Page-load placeholder: muted, looping, not yet playing
    fn placeholder(visible: bool) -> Self {
        MediaStatus {
            source: None,
            paused: true,
            muted: true,
            buffered: false,
            looping: true,
            visible,
        }
    }
}

/// Complete sequencer state. Owned by one controller and replaced
/// wholesale by each transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequencerState {
    /// Channel shown to the visitor
    pub active: Channel,
    /// Playlist position per channel
    pub cursors: ChannelMap<usize>,
    /// Channel the in-flight sequence belongs to
    pub sequence_channel: Channel,
    /// At least one sequence has been started
    pub sequence_begun: bool,
    /// Visitor started the experience (sound allowed from then on)
    pub experience_started: bool,
    pub sound_allowed: bool,
    /// Visitor explicitly paused
    pub manual_pause: bool,
    /// Caption is being shown before the media starts
    pub in_reading_phase: bool,
    /// Looping placeholders become one-shot clips once set
    pub lazy_load_triggered: bool,
    pub section: Visibility,
    pub reveal_timer: Option<TimerToken>,
    pub read_timer: Option<TimerToken>,
    /// Channel whose one-shot "can play" wait is outstanding
    pub awaiting_ready: Option<Channel>,
    /// Channel whose play request has not been answered yet
    pub pending_play: Option<Channel>,
    pub curtain_active: bool,
    pub buffer_indicator: bool,
    /// Icon last pushed to the surface
    pub icon: ControlIcon,
    pub media: ChannelMap<MediaStatus>,
    pub timers: TimerIssuer,
}

impl SequencerState {
    /// Fresh state with `active` shown
    pub fn new(active: Channel) -> Self {
        SequencerState {
            active,
            cursors: ChannelMap::default(),
            sequence_channel: active,
            sequence_begun: false,
            experience_started: false,
            sound_allowed: false,
            manual_pause: false,
            in_reading_phase: false,
            lazy_load_triggered: false,
            section: Visibility::Unobserved,
            reveal_timer: None,
            read_timer: None,
            awaiting_ready: None,
            pending_play: None,
            curtain_active: false,
            buffer_indicator: false,
            icon: ControlIcon::Paused,
            media: ChannelMap::from_fn(|ch| MediaStatus::placeholder(ch == active)),
            timers: TimerIssuer::new(),
        }
    }

    /// Cursor of the active channel
    pub fn active_cursor(&self) -> usize {
        self.cursors[self.active]
    }

    pub fn phase(&self) -> Phase {
        if self.reveal_timer.is_some() {
            Phase::Transitioning
        } else if self.in_reading_phase {
            Phase::Reading
        } else if !self.media[self.active].paused {
            Phase::Playing
        } else if self.sequence_begun {
            Phase::Paused
        } else {
            Phase::Idle
        }
    }

    pub fn section_hidden(&self) -> bool {
        self.section == Visibility::Hidden
    }
}

impl Default for SequencerState {
    fn default() -> Self {
        Self::new(Channel::Primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eve_time::TimerKind;

    #[test]
    fn test_initial_state() {
        let state = SequencerState::new(Channel::Secondary);

        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.media[Channel::Secondary].visible);
        assert!(!state.media[Channel::Primary].visible);
        assert!(state.media[Channel::Primary].muted && state.media[Channel::Secondary].muted);
        assert_eq!(state.active_cursor(), 0);
    }

    #[test]
    fn test_phase_precedence() {
        let mut state = SequencerState::default();
        state.sequence_begun = true;
        assert_eq!(state.phase(), Phase::Paused);

        state.media[Channel::Primary].paused = false;
        assert_eq!(state.phase(), Phase::Playing);

        state.in_reading_phase = true;
        assert_eq!(state.phase(), Phase::Reading);

        state.reveal_timer = Some(state.timers.issue(TimerKind::Reveal));
        assert_eq!(state.phase(), Phase::Transitioning);
    }
}
