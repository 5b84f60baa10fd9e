//! Control icon derivation

use crate::{ControlIcon, SequencerState};

/// Icon for a state.
///
/// Shows "paused" when the visitor paused, when the active media is not
/// running, or while the caption is held without an armed read timer.
pub fn derive_icon(state: &SequencerState) -> ControlIcon {
    let timer_held = state.in_reading_phase && state.read_timer.is_none();

    if state.manual_pause || state.media[state.active].paused || timer_held {
        ControlIcon::Paused
    } else {
        ControlIcon::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eve_core::Channel;
    use eve_time::TimerKind;

    fn playing_state() -> SequencerState {
        let mut state = SequencerState::default();
        state.media[Channel::Primary].paused = false;
        state
    }

    #[test]
    fn test_playing_media_shows_playing() {
        assert_eq!(derive_icon(&playing_state()), ControlIcon::Playing);
    }

    #[test]
    fn test_manual_pause_wins() {
        let mut state = playing_state();
        state.manual_pause = true;
        assert_eq!(derive_icon(&state), ControlIcon::Paused);
    }

    #[test]
    fn test_paused_media_shows_paused() {
        assert_eq!(derive_icon(&SequencerState::default()), ControlIcon::Paused);
    }

    #[test]
    fn test_reading_without_timer_shows_paused() {
        let mut state = playing_state();
        state.in_reading_phase = true;
        assert_eq!(derive_icon(&state), ControlIcon::Paused);

        state.read_timer = Some(state.timers.issue(TimerKind::Read));
        assert_eq!(derive_icon(&state), ControlIcon::Playing);
    }

    #[test]
    fn test_only_active_channel_counts() {
        let mut state = playing_state();
        state.media[Channel::Secondary].paused = true;
        assert_eq!(derive_icon(&state), ControlIcon::Playing);

        state.active = Channel::Secondary;
        assert_eq!(derive_icon(&state), ControlIcon::Paused);
    }
}
