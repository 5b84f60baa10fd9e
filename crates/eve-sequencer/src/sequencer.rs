//! Sequencer transitions
//!
//! Each public method takes the current state by reference and returns a
//! `Transition`: the next state plus the effects the caller must apply in
//! order. Timer and readiness discipline is cancel-before-replace: arming a
//! timer of a kind first cancels the outstanding one, and starting a new
//! sequence drops any pending "can play" wait.

use std::time::Duration;

use eve_core::{Channel, Playlists};
use eve_time::{TimerKind, TimerToken};

use crate::{
    derive_icon, CaptionMode, Effect, MediaCommand, SequencerConfig, SequencerState, SurfaceCommand,
    Visibility,
};

/// Next state and the effects that lead to it
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: SequencerState,
    pub effects: Vec<Effect>,
}

impl Transition {
    /// Same state, nothing to do
    pub fn unchanged(state: &SequencerState) -> Self {
        Transition {
            state: state.clone(),
            effects: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Immutable sequencing environment: configuration and the loaded playlists
#[derive(Clone, Debug, Default)]
pub struct Sequencer {
    config: SequencerConfig,
    playlists: Playlists,
}

impl Sequencer {
    pub fn new(config: SequencerConfig, playlists: Playlists) -> Self {
        Sequencer { config, playlists }
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn playlists(&self) -> &Playlists {
        &self.playlists
    }

    /// Point both channels at their first clip and show the active caption.
    /// Called once after the playlists are loaded.
    pub fn prime(&self, state: &SequencerState) -> Transition {
        let mut step = Step::new(self, state);
        for channel in Channel::ALL {
            let visible = step.state.media[channel].visible;
            step.media(channel, MediaCommand::SetVisible(visible));
            if !self.playlists.get(channel).is_empty() {
                step.load_source(channel, 0);
            }
        }
        let active = step.state.active;
        step.show_caption(active, step.state.cursors[active]);
        step.render_nav_dots();
        step.finish()
    }

    /// Start a cinematic transition to `index` on `channel`
    pub fn advance_to(&self, state: &SequencerState, channel: Channel, index: usize) -> Transition {
        let mut step = Step::new(self, state);
        step.advance_to(channel, index);
        step.finish()
    }

    /// Move to the following clip, wrapping at the end of the playlist
    pub fn advance_to_next(&self, state: &SequencerState, channel: Channel) -> Transition {
        let mut step = Step::new(self, state);
        step.advance_to_next(channel);
        step.finish()
    }

    /// Nav dot click on the active channel
    pub fn jump_to(&self, state: &SequencerState, index: usize) -> Transition {
        let active = state.active;
        if state.cursors[active] == index {
            return Transition::unchanged(state);
        }
        if let Err(e) = self.playlists.entry(active, index) {
            tracing::warn!(error = %e, "jump ignored");
            return Transition::unchanged(state);
        }

        let mut step = Step::new(self, state);
        step.state.manual_pause = false;
        step.refresh_icon();
        step.advance_to(active, index);
        step.finish()
    }

    /// Play/pause control
    pub fn toggle_play_pause(&self, state: &SequencerState) -> Transition {
        let mut step = Step::new(self, state);
        let s = &mut step.state;
        let active = s.active;

        if s.reveal_timer.is_some() {
            // Reveal honours the flag when it arms (or skips) the read timer
            s.manual_pause = !s.manual_pause;
            tracing::debug!(manual_pause = s.manual_pause, "toggle during transition");
        } else if s.in_reading_phase {
            if s.read_timer.is_some() {
                step.cancel(TimerKind::Read);
                step.state.manual_pause = true;
                tracing::debug!("reading held");
            } else {
                step.state.manual_pause = false;
                step.state.in_reading_phase = false;
                let channel = step.state.sequence_channel;
                tracing::debug!(%channel, "reading released, committing playback");
                step.commit_playback(channel);
            }
        } else {
            // A readiness wait or play request held by the visitor resumes
            let running = !s.manual_pause
                && (!s.media[active].paused
                    || s.awaiting_ready == Some(active)
                    || s.pending_play == Some(active));
            if running {
                step.state.manual_pause = true;
                step.pause(active);
                tracing::debug!(channel = %active, "paused by visitor");
            } else {
                step.state.manual_pause = false;
                tracing::debug!(channel = %active, "resumed by visitor");
                step.commit_playback(active);
            }
        }
        step.finish()
    }

    /// Make `to` the visible channel
    pub fn switch_channel(&self, state: &SequencerState, to: Channel) -> Transition {
        if state.active == to {
            return Transition::unchanged(state);
        }

        let mut step = Step::new(self, state);
        step.state.active = to;
        step.state.manual_pause = false;
        step.sync_visibility();
        step.render_nav_dots();

        let cursor = step.state.cursors[to];
        if step.state.experience_started || step.state.section == Visibility::Visible {
            tracing::debug!(channel = %to, cursor, "switch re-enters sequence");
            step.advance_to(to, cursor);
        } else {
            tracing::debug!(channel = %to, cursor, "switch refreshes captions only");
            step.cancel(TimerKind::Reveal);
            step.cancel(TimerKind::Read);
            step.drop_ready_wait();
            step.state.in_reading_phase = false;
            step.show_caption(to, cursor);
        }
        step.finish()
    }

    /// Visitor allowed sound; begin the real sequence
    pub fn start_experience(&self, state: &SequencerState) -> Transition {
        if state.experience_started {
            return Transition::unchanged(state);
        }

        let mut step = Step::new(self, state);
        let s = &mut step.state;
        s.experience_started = true;
        s.sound_allowed = true;
        s.lazy_load_triggered = true;
        s.manual_pause = false;
        let active = s.active;
        let cursor = s.cursors[active];

        step.surface(SurfaceCommand::DismissSoundPrompt);
        tracing::info!(channel = %active, cursor, "experience started");
        step.advance_to(active, cursor);
        step.finish()
    }

    pub fn on_section_visible(&self, state: &SequencerState) -> Transition {
        let mut step = Step::new(self, state);
        let s = &mut step.state;
        s.section = Visibility::Visible;
        s.lazy_load_triggered = true;

        let active = s.active;
        let resume = s.experience_started
            && s.sequence_begun
            && !s.manual_pause
            && !s.in_reading_phase
            && s.media[active].paused
            && s.pending_play.is_none();
        if resume {
            tracing::debug!(channel = %active, "section visible, resuming");
            step.commit_playback(active);
        }
        step.finish()
    }

    /// Pause both channels. Timers keep running; a read timer that expires
    /// while hidden ends the reading phase without starting playback.
    pub fn on_section_hidden(&self, state: &SequencerState) -> Transition {
        let mut step = Step::new(self, state);
        step.state.section = Visibility::Hidden;
        step.drop_ready_wait();
        for channel in Channel::ALL {
            step.pause(channel);
        }
        tracing::debug!("section hidden, media paused");
        step.finish()
    }

    /// Timer expiry. Tokens that are no longer armed are ignored.
    pub fn on_timer(&self, state: &SequencerState, token: TimerToken) -> Transition {
        let mut step = Step::new(self, state);
        match token.kind {
            TimerKind::Reveal if state.reveal_timer == Some(token) => step.reveal(),
            TimerKind::Read if state.read_timer == Some(token) => step.read_elapsed(),
            _ => {
                tracing::debug!(?token, "stale timer ignored");
                return Transition::unchanged(state);
            }
        }
        step.finish()
    }

    /// The channel buffered enough to play
    pub fn on_can_play(&self, state: &SequencerState, channel: Channel) -> Transition {
        let mut step = Step::new(self, state);
        step.state.media[channel].buffered = true;

        if step.state.awaiting_ready == Some(channel) {
            step.state.awaiting_ready = None;
            step.set_buffer_indicator(false);
            if step.state.manual_pause {
                tracing::debug!(%channel, "ready after manual pause, not playing");
            } else {
                step.attempt_play(channel);
            }
        }
        step.finish()
    }

    /// Play request resolved; the element is running
    pub fn on_play_started(&self, state: &SequencerState, channel: Channel) -> Transition {
        let mut step = Step::new(self, state);
        let requested = step.state.pending_play == Some(channel);
        if requested {
            step.state.pending_play = None;
        }
        step.state.media[channel].paused = false;

        let s = &step.state;
        if !requested {
            tracing::debug!(%channel, "play resolved for an aborted request, pausing");
            step.pause(channel);
        } else if s.manual_pause || s.section_hidden() {
            tracing::debug!(%channel, "play resolved after hold, pausing again");
            step.pause(channel);
        } else if channel != s.active {
            tracing::debug!(%channel, "play resolved on inactive channel, pausing");
            step.pause(channel);
        } else if channel == s.sequence_channel
            && s.curtain_active
            && !s.in_reading_phase
            && s.reveal_timer.is_none()
        {
            step.set_curtain(false);
            step.surface(SurfaceCommand::SetCaptionMode(CaptionMode::Playing));
        }
        step.finish()
    }

    /// Play request rejected (autoplay policy, superseded request, ...)
    pub fn on_play_rejected(&self, state: &SequencerState, channel: Channel, reason: &str) -> Transition {
        tracing::warn!(%channel, reason, "play interrupted");
        let mut step = Step::new(self, state);
        if step.state.pending_play == Some(channel) {
            step.state.pending_play = None;
        }
        step.state.media[channel].paused = true;
        step.finish()
    }

    /// Natural end of a clip. Only the clip the running sequence committed
    /// advances the playlist; an end reported while a new sequence is
    /// transitioning or reading belongs to the clip it replaced.
    pub fn on_ended(&self, state: &SequencerState, channel: Channel) -> Transition {
        let mut step = Step::new(self, state);
        step.state.media[channel].paused = true;
        let s = &step.state;
        if channel != s.active {
            tracing::debug!(%channel, "ended on inactive channel ignored");
        } else if channel != s.sequence_channel || s.in_reading_phase || s.reveal_timer.is_some() {
            tracing::debug!(%channel, "ended from a replaced clip ignored");
        } else {
            step.advance_to_next(channel);
        }
        step.finish()
    }
}

/// Transition under construction
struct Step<'a> {
    seq: &'a Sequencer,
    state: SequencerState,
    effects: Vec<Effect>,
}

impl<'a> Step<'a> {
    fn new(seq: &'a Sequencer, state: &SequencerState) -> Self {
        Step {
            seq,
            state: state.clone(),
            effects: Vec::new(),
        }
    }

    fn finish(mut self) -> Transition {
        self.refresh_icon();
        Transition {
            state: self.state,
            effects: self.effects,
        }
    }

    fn surface(&mut self, command: SurfaceCommand) {
        self.effects.push(Effect::Surface(command));
    }

    fn media(&mut self, channel: Channel, command: MediaCommand) {
        self.effects.push(Effect::Media { channel, command });
    }

    /// Arm a sequence timer. Auto-rotation belongs to the persona layer.
    fn arm(&mut self, kind: TimerKind, delay: Duration) {
        if kind == TimerKind::AutoRotate {
            return;
        }
        self.cancel(kind);
        let token = self.state.timers.issue(kind);
        if kind == TimerKind::Reveal {
            self.state.reveal_timer = Some(token);
        } else {
            self.state.read_timer = Some(token);
        }
        self.effects.push(Effect::ArmTimer { token, delay });
    }

    fn cancel(&mut self, kind: TimerKind) {
        let taken = match kind {
            TimerKind::Reveal => self.state.reveal_timer.take(),
            TimerKind::Read => self.state.read_timer.take(),
            TimerKind::AutoRotate => None,
        };
        if let Some(token) = taken {
            self.effects.push(Effect::CancelTimer(token));
        }
    }

    fn refresh_icon(&mut self) {
        let icon = derive_icon(&self.state);
        if icon != self.state.icon {
            self.state.icon = icon;
            self.surface(SurfaceCommand::SetControlIcon(icon));
        }
    }

    fn set_curtain(&mut self, active: bool) {
        self.state.curtain_active = active;
        self.surface(SurfaceCommand::SetCurtain(active));
    }

    fn set_buffer_indicator(&mut self, active: bool) {
        if self.state.buffer_indicator != active {
            self.state.buffer_indicator = active;
            self.surface(SurfaceCommand::SetBufferIndicator(active));
        }
    }

    fn drop_ready_wait(&mut self) {
        if self.state.awaiting_ready.take().is_some() {
            self.set_buffer_indicator(false);
        }
    }

    /// Pausing aborts an outstanding play request
    fn pause(&mut self, channel: Channel) {
        if self.state.pending_play == Some(channel) {
            self.state.pending_play = None;
        }
        self.state.media[channel].paused = true;
        self.media(channel, MediaCommand::Pause);
    }

    /// Pause a channel that is playing or has a play request in flight
    fn halt(&mut self, channel: Channel) {
        if !self.state.media[channel].paused || self.state.pending_play == Some(channel) {
            self.pause(channel);
        }
    }

    fn show_caption(&mut self, channel: Channel, index: usize) {
        let seq = self.seq;
        match seq.playlists.entry(channel, index) {
            Ok(entry) => {
                let command = SurfaceCommand::SetCaption {
                    headline: entry.headline.clone(),
                    subtext: entry.subtext.clone(),
                    extra: entry.extra_text().to_string(),
                };
                self.surface(command);
            }
            Err(e) => tracing::debug!(error = %e, "caption left unchanged"),
        }
    }

    fn render_nav_dots(&mut self) {
        let active = self.state.active;
        let count = self.seq.playlists.get(active).len();
        self.surface(SurfaceCommand::RenderNavDots {
            count,
            active_index: self.state.cursors[active],
        });
    }

    fn load_source(&mut self, channel: Channel, index: usize) {
        let seq = self.seq;
        let Ok(entry) = seq.playlists.entry(channel, index) else {
            return;
        };
        let url = seq.config.media_url(entry);
        let media = &mut self.state.media[channel];
        media.source = Some(url.clone());
        media.buffered = false;
        media.paused = true;
        self.media(channel, MediaCommand::Load(url));
    }

    /// Show the active channel, mute and pause the other
    fn sync_visibility(&mut self) {
        let active = self.state.active;
        let inactive = active.other();

        if !self.state.media[active].visible {
            self.state.media[active].visible = true;
            self.media(active, MediaCommand::SetVisible(true));
        }
        if self.state.sound_allowed && self.state.media[active].muted {
            self.state.media[active].muted = false;
            self.media(active, MediaCommand::SetMuted(false));
        }

        if self.state.media[inactive].visible {
            self.state.media[inactive].visible = false;
            self.media(inactive, MediaCommand::SetVisible(false));
        }
        if !self.state.media[inactive].muted {
            self.state.media[inactive].muted = true;
            self.media(inactive, MediaCommand::SetMuted(true));
        }
        self.halt(inactive);
    }

    fn advance_to(&mut self, channel: Channel, index: usize) {
        if let Err(e) = self.seq.playlists.entry(channel, index) {
            tracing::warn!(error = %e, "advance ignored");
            return;
        }

        self.cancel(TimerKind::Read);
        self.cancel(TimerKind::Reveal);
        self.drop_ready_wait();

        // The outgoing clip stops under the curtain
        let outgoing = self.state.sequence_channel;
        self.halt(outgoing);
        if channel != outgoing {
            self.halt(channel);
        }

        let s = &mut self.state;
        s.pending_play = None;
        s.cursors[channel] = index;
        s.sequence_channel = channel;
        s.sequence_begun = true;
        s.in_reading_phase = true;

        tracing::debug!(%channel, index, "sequence transitioning");
        self.set_curtain(true);
        self.surface(SurfaceCommand::SetCaptionMode(CaptionMode::Hidden));
        self.arm(TimerKind::Reveal, self.seq.config.transition_delay);
    }

    fn advance_to_next(&mut self, channel: Channel) {
        let list = self.seq.playlists.get(channel);
        match list.next_index(self.state.cursors[channel]) {
            Some(next) => self.advance_to(channel, next),
            None => tracing::debug!(%channel, "empty playlist, nothing to advance"),
        }
    }

    /// End of the curtain transition
    fn reveal(&mut self) {
        self.state.reveal_timer = None;
        let channel = self.state.sequence_channel;
        let index = self.state.cursors[channel];

        self.sync_visibility();
        self.show_caption(channel, index);
        self.render_nav_dots();
        self.load_source(channel, index);
        self.surface(SurfaceCommand::SetCaptionMode(CaptionMode::Reading));

        if self.state.manual_pause {
            tracing::debug!(%channel, index, "reading held by manual pause");
        } else {
            tracing::debug!(%channel, index, "reading");
            self.arm(TimerKind::Read, self.seq.config.read_delay);
        }
    }

    /// Read timer expired
    fn read_elapsed(&mut self) {
        self.state.read_timer = None;
        self.state.in_reading_phase = false;
        let channel = self.state.sequence_channel;

        if self.state.section_hidden() {
            tracing::debug!(%channel, "section hidden, playback deferred");
        } else {
            self.commit_playback(channel);
        }
    }

    /// Start media, waiting for readiness if the element has not buffered
    fn commit_playback(&mut self, channel: Channel) {
        if self.state.media[channel].source.is_none() {
            tracing::debug!(%channel, "nothing loaded, playback skipped");
            return;
        }
        // One readiness wait at a time
        if self.state.awaiting_ready.is_some_and(|waiting| waiting != channel) {
            self.drop_ready_wait();
        }
        if self.state.lazy_load_triggered && self.state.media[channel].looping {
            self.state.media[channel].looping = false;
            self.media(channel, MediaCommand::SetLoop(false));
        }

        if self.state.manual_pause {
            return;
        }

        if self.state.media[channel].buffered {
            self.attempt_play(channel);
        } else {
            tracing::debug!(%channel, "buffering before play");
            self.set_buffer_indicator(true);
            self.pause(channel);
            self.state.awaiting_ready = Some(channel);
        }
    }

    fn attempt_play(&mut self, channel: Channel) {
        self.set_buffer_indicator(false);
        self.state.pending_play = Some(channel);
        self.media(channel, MediaCommand::Play);

        let media = &self.state.media[channel];
        if self.state.sound_allowed && channel == self.state.active && media.muted {
            self.state.media[channel].muted = false;
            self.media(channel, MediaCommand::SetMuted(false));
        }
    }
}
