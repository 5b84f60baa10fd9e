//! Landing page simulation - the controller on a virtual clock
//!
//! Interleaves two event sources in time order:
//! - Timer expiries from the `TimerQueue` (reveal, read, hero rotation)
//! - Media outcomes queued by `SimulatedMedia` (ready, play resolved or
//!   rejected, clip ended)
//!
//! Timers win ties. Visitor actions are applied at the current instant.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use eve_core::{Channel, Playlist, PlaylistEntry, Playlists, SimTime};
use eve_playlist::{parse_document, PlaylistResult};
use eve_runtime::{
    Controller, MediaCallback, MediaEvent, MediaProfile, MemoryPreferenceStore, PreferenceStore, RuntimeConfig,
    SimulatedMedia,
};
use eve_sequencer::{derive_icon, ControlIcon, Phase};
use eve_time::{Scheduler, TimerKind, TimerQueue};

use crate::surface::RecordingSurface;

/// Controller wired to the simulated collaborators
pub type SimController = Controller<RecordingSurface, SimulatedMedia, TimerQueue>;

/// Playlist document used by scenarios and benches
pub const SAMPLE_DOCUMENT: &str = r#"{
    "eva": [
        ["eva-intro.mp4", "Meet Eva", "Your research companion"],
        ["eva-memory.mp4", "Eva remembers", "Context that carries over", "Beta"],
        ["eva-voice.mp4", "Talk to Eva", "Natural voice, no wake word"]
    ],
    "eve": [
        ["eve-intro.mp4", "Meet Eve", "Your creative partner"],
        ["eve-studio.mp4", "Eve in the studio", "Sketch, compose, iterate"]
    ]
}"#;

/// The playlists described by `SAMPLE_DOCUMENT`
pub fn sample_playlists() -> Playlists {
    Playlists::new(
        Playlist::new(vec![
            PlaylistEntry::new("eva-intro.mp4", "Meet Eva", "Your research companion"),
            PlaylistEntry::new("eva-memory.mp4", "Eva remembers", "Context that carries over").with_extra("Beta"),
            PlaylistEntry::new("eva-voice.mp4", "Talk to Eva", "Natural voice, no wake word"),
        ]),
        Playlist::new(vec![
            PlaylistEntry::new("eve-intro.mp4", "Meet Eve", "Your creative partner"),
            PlaylistEntry::new("eve-studio.mp4", "Eve in the studio", "Sketch, compose, iterate"),
        ]),
    )
}

/// Simulation setup
#[derive(Clone, Debug, Default)]
pub struct SimulationConfig {
    pub runtime: RuntimeConfig,
    pub media: MediaProfile,
    /// Persona stored by a previous visit
    pub stored_persona: Option<Channel>,
}

impl SimulationConfig {
    /// Returning visitor who picked a persona before
    pub fn returning(channel: Channel) -> Self {
        SimulationConfig {
            stored_persona: Some(channel),
            ..Self::default()
        }
    }

    pub fn with_media(mut self, media: MediaProfile) -> Self {
        self.media = media;
        self
    }
}

/// Simulated landing page
pub struct Simulation {
    controller: SimController,
    store: Arc<MemoryPreferenceStore>,
    /// Media outcomes keyed by (due time, arrival order)
    pending: BTreeMap<(SimTime, u64), (Channel, MediaEvent)>,
    seq: u64,
    /// Phase changes as (time, new phase)
    phase_log: Vec<(SimTime, Phase)>,
    /// Callbacks delivered to the controller
    delivered: Vec<(SimTime, Channel, MediaCallback)>,
}

impl Simulation {
    pub fn new(config: SimulationConfig, playlists: Playlists) -> Self {
        let store = Arc::new(match config.stored_persona {
            Some(ch) => MemoryPreferenceStore::with_value(&config.runtime.persona_key, ch.persona_key()),
            None => MemoryPreferenceStore::new(),
        });

        let controller = Controller::new(
            config.runtime,
            playlists,
            store.clone(),
            RecordingSurface::new(),
            SimulatedMedia::new(config.media),
            TimerQueue::new(),
        );

        let phase = controller.phase();
        let mut sim = Simulation {
            controller,
            store,
            pending: BTreeMap::new(),
            seq: 0,
            phase_log: vec![(SimTime::ZERO, phase)],
            delivered: Vec::new(),
        };
        sim.collect_media();
        sim
    }

    /// Simulation over a playlist document
    pub fn from_document(config: SimulationConfig, json: &str) -> PlaylistResult<Self> {
        Ok(Self::new(config, parse_document(json)?))
    }

    /// Default setup over the sample playlists
    pub fn sample() -> Self {
        Self::new(SimulationConfig::default(), sample_playlists())
    }

    // === Accessors ===

    pub fn now(&self) -> SimTime {
        self.controller.scheduler().now()
    }

    pub fn controller(&self) -> &SimController {
        &self.controller
    }

    pub fn surface(&self) -> &RecordingSurface {
        self.controller.surface()
    }

    pub fn media(&self) -> &SimulatedMedia {
        self.controller.media()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn phase_log(&self) -> &[(SimTime, Phase)] {
        &self.phase_log
    }

    pub fn delivered(&self) -> &[(SimTime, Channel, MediaCallback)] {
        &self.delivered
    }

    /// Persona currently persisted for the next visit
    pub fn stored_persona(&self) -> Option<String> {
        let key = &self.controller.config().persona_key;
        self.store.load(key).ok().flatten()
    }

    /// Swap the media profile for subsequent requests
    pub fn set_media_profile(&mut self, profile: MediaProfile) {
        self.controller.media_mut().set_profile(profile);
    }

    // === Visitor actions ===

    /// Apply a visitor action at the current instant
    pub fn act(&mut self, action: impl FnOnce(&mut SimController)) {
        action(&mut self.controller);
        self.after_event();
    }

    pub fn start_experience(&mut self) {
        self.act(|c| c.start_experience());
    }

    pub fn toggle_play_pause(&mut self) {
        self.act(|c| c.toggle_play_pause());
    }

    pub fn jump_to(&mut self, index: usize) {
        self.act(|c| c.jump_to(index));
    }

    pub fn select_persona_from_video(&mut self, channel: Channel) {
        self.act(|c| c.select_persona_from_video(channel));
    }

    pub fn select_persona_from_hero(&mut self, channel: Channel) {
        self.act(|c| c.select_persona_from_hero(channel));
    }

    pub fn section_visible(&mut self) {
        self.act(|c| c.on_section_visible());
    }

    pub fn section_hidden(&mut self) {
        self.act(|c| c.on_section_hidden());
    }

    // === Time ===

    /// Process every event due within `duration`, then move the clock to
    /// the end of the window.
    pub fn advance_by(&mut self, duration: Duration) {
        let until = self.now() + duration;
        while self.step(until) {}
        self.controller.scheduler_mut().set_now(until);
    }

    pub fn advance_ms(&mut self, millis: u64) {
        self.advance_by(Duration::from_millis(millis));
    }

    /// Process events one at a time until `done` holds or `limit` elapses.
    /// Returns whether `done` was reached.
    pub fn run_until(&mut self, limit: Duration, done: impl Fn(&Simulation) -> bool) -> bool {
        let until = self.now() + limit;
        loop {
            if done(self) {
                return true;
            }
            if !self.step(until) {
                self.controller.scheduler_mut().set_now(until);
                return done(self);
            }
        }
    }

    /// Deliver the earliest event due at or before `until`
    fn step(&mut self, until: SimTime) -> bool {
        let next_timer = self.controller.scheduler().next_deadline();
        let next_media = self.pending.keys().next().map(|(at, _)| *at);

        let timer_first = match (next_timer, next_media) {
            (Some(t), Some(m)) => t <= m,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => return false,
        };

        if timer_first {
            let Some((_, token)) = self.controller.scheduler_mut().pop_due(until) else {
                return false;
            };
            self.controller.on_timer(token);
        } else {
            let Some(&key) = self.pending.keys().next() else {
                return false;
            };
            if key.0 > until {
                return false;
            }
            let Some((channel, event)) = self.pending.remove(&key) else {
                return false;
            };
            self.controller.scheduler_mut().set_now(key.0);
            self.deliver(channel, event);
        }

        self.after_event();
        true
    }

    fn deliver(&mut self, channel: Channel, event: MediaEvent) {
        let Some(callback) = self.controller.media_mut().settle(channel, event) else {
            return;
        };
        tracing::trace!(%channel, ?callback, "media callback");
        self.delivered.push((self.now(), channel, callback.clone()));

        match callback {
            MediaCallback::CanPlay => self.controller.on_can_play(channel),
            MediaCallback::PlayStarted => self.controller.on_play_started(channel),
            MediaCallback::PlayRejected(reason) => self.controller.on_play_rejected(channel, &reason),
            MediaCallback::Ended => self.controller.on_ended(channel),
        }
    }

    fn after_event(&mut self) {
        self.collect_media();
        let phase = self.controller.phase();
        if self.phase_log.last().map(|(_, p)| *p) != Some(phase) {
            self.phase_log.push((self.now(), phase));
        }
    }

    fn collect_media(&mut self) {
        let now = self.now();
        for (delay, channel, event) in self.controller.media_mut().take_outbox() {
            self.seq += 1;
            self.pending.insert((now + delay, self.seq), (channel, event));
        }
    }

    // === Invariants ===

    /// Consistency checks between the state record, the timer queue, the
    /// surface and the simulated elements. Returns one line per violation.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let c = &self.controller;
        let state = c.state();
        let playlists = c.sequencer().playlists();
        let queue = c.scheduler();

        if state.reveal_timer.is_some() && state.read_timer.is_some() {
            violations.push("reveal and read timers armed together".to_string());
        }
        if state.read_timer.is_some() && !state.in_reading_phase {
            violations.push("read timer armed outside reading phase".to_string());
        }

        let mut expected: Vec<_> = [state.reveal_timer, state.read_timer, c.persona().rotation]
            .into_iter()
            .flatten()
            .collect();
        let mut armed = queue.armed();
        expected.sort();
        armed.sort();
        if expected != armed {
            violations.push(format!("armed timers {:?} do not match state {:?}", armed, expected));
        }
        if c.persona().rotation.is_some() && !c.persona().rotates() {
            violations.push("hero rotation armed after visitor chose".to_string());
        }
        if armed.iter().filter(|t| t.kind == TimerKind::AutoRotate).count() > 1 {
            violations.push("more than one rotation timer".to_string());
        }

        for channel in Channel::ALL {
            let len = playlists.get(channel).len();
            let cursor = state.cursors[channel];
            if (len == 0 && cursor != 0) || (len > 0 && cursor >= len) {
                violations.push(format!("{channel} cursor {cursor} outside playlist of {len}"));
            }

            let element = self.media().element(channel);
            if element.muted != state.media[channel].muted {
                violations.push(format!("{channel} muted flag diverged from element"));
            }
        }

        let inactive = state.active.other();
        if !self.media().element(inactive).muted {
            violations.push(format!("inactive {inactive} is audible"));
        }
        if state.sequence_channel == state.active && self.media().element(inactive).playing {
            violations.push(format!("inactive {inactive} is playing"));
        }
        let audible = Channel::ALL
            .into_iter()
            .filter(|&ch| self.media().element(ch).playing && !self.media().element(ch).muted)
            .count();
        if audible > 1 {
            violations.push("both channels audible".to_string());
        }

        if state.icon != derive_icon(state) {
            violations.push(format!("icon {:?} is stale", state.icon));
        }
        let shown = self.surface().view.icon.unwrap_or(ControlIcon::Paused);
        if shown != state.icon {
            violations.push(format!("surface shows {:?}, state says {:?}", shown, state.icon));
        }
        if self.surface().view.curtain != state.curtain_active {
            violations.push("curtain diverged from state".to_string());
        }
        if self.surface().view.buffering != state.awaiting_ready.is_some() {
            violations.push("buffer indicator without a readiness wait".to_string());
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_document_matches_playlists() {
        assert_eq!(parse_document(SAMPLE_DOCUMENT).unwrap(), sample_playlists());
    }

    #[test]
    fn test_boot_state() {
        let sim = Simulation::sample();
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.surface().view.headline, "Meet Eva");
        assert_eq!(sim.surface().view.nav_dots, Some((3, 0)));
        assert_eq!(sim.surface().view.persona, Some(Channel::Primary));
        assert!(sim.check_invariants().is_empty());
    }

    #[test]
    fn test_placeholders_become_ready() {
        let mut sim = Simulation::sample();
        sim.advance_ms(200);

        let ready: Vec<_> = sim
            .delivered()
            .iter()
            .filter(|(_, _, cb)| *cb == MediaCallback::CanPlay)
            .map(|(_, ch, _)| *ch)
            .collect();
        assert_eq!(ready, vec![Channel::Primary, Channel::Secondary]);
        assert!(sim.controller().state().media[Channel::Primary].buffered);
    }

    #[test]
    fn test_run_until_reports_timeout() {
        let mut sim = Simulation::sample();
        let reached = sim.run_until(Duration::from_secs(30), |s| s.phase() == Phase::Playing);
        assert!(!reached);
        assert_eq!(sim.now(), SimTime::from_millis(30_000));
    }
}
