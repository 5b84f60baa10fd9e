//! Playback controller
//!
//! The controller is the only owner of the sequencer state and the only
//! caller of play/pause on the media elements. All inputs (visitor actions,
//! timer expiries, media callbacks, viewport changes) enter through its
//! methods, are turned into a `Transition` by the sequencer, and the
//! transition's effects are applied in order.

use std::sync::Arc;

use eve_core::{Channel, Playlists};
use eve_sequencer::{Effect, Phase, Sequencer, SequencerState, Transition};
use eve_time::{Scheduler, TimerKind, TimerToken};

use crate::surface::{apply_media, apply_surface};
use crate::{MediaBackend, PersonaState, PreferenceStore, PresentationSurface, RuntimeConfig};

/// Counters for diagnostics
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub transitions: u64,
    pub noop_transitions: u64,
    pub surface_commands: u64,
    pub media_commands: u64,
    pub timers_armed: u64,
    pub timers_cancelled: u64,
    pub rotations: u64,
}

/// Playback controller
pub struct Controller<P, M, S> {
    sequencer: Sequencer,
    state: SequencerState,
    persona: PersonaState,
    store: Arc<dyn PreferenceStore>,
    config: RuntimeConfig,
    surface: P,
    media: M,
    scheduler: S,
    stats: ControllerStats,
}

impl<P, M, S> Controller<P, M, S>
where
    P: PresentationSurface,
    M: MediaBackend,
    S: Scheduler,
{
    /// Boot the page: restore the persona, show it, start hero rotation if
    /// the visitor never chose, and prime both channels.
    pub fn new(
        config: RuntimeConfig,
        playlists: Playlists,
        store: Arc<dyn PreferenceStore>,
        surface: P,
        media: M,
        scheduler: S,
    ) -> Self {
        let persona = PersonaState::restore(store.as_ref(), &config.persona_key);
        let state = SequencerState::new(persona.hero);

        let mut controller = Controller {
            sequencer: Sequencer::new(config.sequencer(), playlists),
            state,
            persona,
            store,
            config,
            surface,
            media,
            scheduler,
            stats: ControllerStats::default(),
        };

        controller.surface.show_persona(controller.persona.hero);
        if controller.persona.rotates() {
            controller.arm_rotation();
        }
        let t = controller.sequencer.prime(&controller.state);
        controller.apply(t);
        controller
    }

    // === Visitor input ===

    pub fn start_experience(&mut self) {
        let t = self.sequencer.start_experience(&self.state);
        self.apply(t);
    }

    pub fn toggle_play_pause(&mut self) {
        let t = self.sequencer.toggle_play_pause(&self.state);
        self.apply(t);
    }

    /// Nav dot click
    pub fn jump_to(&mut self, index: usize) {
        let t = self.sequencer.jump_to(&self.state, index);
        self.apply(t);
    }

    pub fn advance_to(&mut self, channel: Channel, index: usize) {
        let t = self.sequencer.advance_to(&self.state, channel, index);
        self.apply(t);
    }

    pub fn advance_to_next(&mut self, channel: Channel) {
        let t = self.sequencer.advance_to_next(&self.state, channel);
        self.apply(t);
    }

    pub fn switch_channel(&mut self, channel: Channel) {
        let t = self.sequencer.switch_channel(&self.state, channel);
        self.apply(t);
    }

    /// Persona picked in the hero section
    pub fn select_persona_from_hero(&mut self, channel: Channel) {
        self.choose_persona(channel);
        self.switch_channel(channel);
    }

    /// Persona picked next to the video; ignored if already shown
    pub fn select_persona_from_video(&mut self, channel: Channel) {
        if self.state.active == channel {
            return;
        }
        self.choose_persona(channel);
        self.switch_channel(channel);
    }

    // === Environment input ===

    pub fn on_section_visible(&mut self) {
        let t = self.sequencer.on_section_visible(&self.state);
        self.apply(t);
    }

    pub fn on_section_hidden(&mut self) {
        let t = self.sequencer.on_section_hidden(&self.state);
        self.apply(t);
    }

    pub fn on_timer(&mut self, token: TimerToken) {
        if token.kind == TimerKind::AutoRotate {
            self.rotate_hero(token);
            return;
        }
        let t = self.sequencer.on_timer(&self.state, token);
        self.apply(t);
    }

    pub fn on_can_play(&mut self, channel: Channel) {
        let t = self.sequencer.on_can_play(&self.state, channel);
        self.apply(t);
    }

    pub fn on_play_started(&mut self, channel: Channel) {
        let t = self.sequencer.on_play_started(&self.state, channel);
        self.apply(t);
    }

    pub fn on_play_rejected(&mut self, channel: Channel, reason: &str) {
        let t = self.sequencer.on_play_rejected(&self.state, channel, reason);
        self.apply(t);
    }

    pub fn on_ended(&mut self, channel: Channel) {
        let t = self.sequencer.on_ended(&self.state, channel);
        self.apply(t);
    }

    // === Accessors ===

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn persona(&self) -> &PersonaState {
        &self.persona
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn stats(&self) -> &ControllerStats {
        &self.stats
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// Media backend access for event loops that deliver its callbacks.
    /// Play and pause must still go through the controller.
    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // === Internals ===

    fn apply(&mut self, transition: Transition) {
        self.stats.transitions += 1;
        if transition.is_noop() {
            self.stats.noop_transitions += 1;
        }
        self.state = transition.state;

        for effect in transition.effects {
            match effect {
                Effect::Surface(command) => {
                    self.stats.surface_commands += 1;
                    apply_surface(&mut self.surface, command);
                }
                Effect::Media { channel, command } => {
                    self.stats.media_commands += 1;
                    tracing::trace!(%channel, ?command, "media command");
                    apply_media(&mut self.media, channel, command);
                }
                Effect::ArmTimer { token, delay } => {
                    self.stats.timers_armed += 1;
                    self.scheduler.schedule(token, delay);
                }
                Effect::CancelTimer(token) => {
                    self.stats.timers_cancelled += 1;
                    self.scheduler.cancel(token);
                }
            }
        }
    }

    fn arm_rotation(&mut self) {
        let (token, replaced) = self.persona.arm_rotation();
        if let Some(old) = replaced {
            self.scheduler.cancel(old);
        }
        self.scheduler.schedule(token, self.config.auto_rotate_interval);
        self.stats.timers_armed += 1;
    }

    fn rotate_hero(&mut self, token: TimerToken) {
        if self.persona.rotation != Some(token) || !self.persona.rotates() {
            tracing::debug!(?token, "stale rotation ignored");
            return;
        }
        self.persona.rotation = None;
        self.persona.hero = self.persona.hero.other();
        self.stats.rotations += 1;
        tracing::debug!(hero = %self.persona.hero, "hero rotated");

        self.surface.show_persona(self.persona.hero);
        self.arm_rotation();
    }

    fn choose_persona(&mut self, channel: Channel) {
        if let Some(token) = self.persona.choose(channel) {
            self.scheduler.cancel(token);
            self.stats.timers_cancelled += 1;
        }
        if let Err(e) = self.store.save(&self.config.persona_key, channel.persona_key()) {
            tracing::warn!(error = %e, "persona preference not saved");
        }
        self.surface.show_persona(channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryPreferenceStore;
    use eve_core::{Playlist, PlaylistEntry};
    use eve_sequencer::{CaptionMode, ControlIcon};
    use eve_time::TimerQueue;
    use proptest::prelude::*;
    use std::time::Duration;

    #[derive(Default)]
    struct Surface {
        caption: Option<(String, String, String)>,
        curtain: bool,
        icon: Option<ControlIcon>,
        personas: Vec<Channel>,
        dots: Option<(usize, usize)>,
    }

    impl PresentationSurface for Surface {
        fn set_caption(&mut self, headline: &str, subtext: &str, extra: &str) {
            self.caption = Some((headline.into(), subtext.into(), extra.into()));
        }
        fn set_curtain(&mut self, active: bool) {
            self.curtain = active;
        }
        fn set_caption_mode(&mut self, _mode: CaptionMode) {}
        fn set_control_icon(&mut self, icon: ControlIcon) {
            self.icon = Some(icon);
        }
        fn set_buffer_indicator(&mut self, _active: bool) {}
        fn render_nav_dots(&mut self, count: usize, active_index: usize) {
            self.dots = Some((count, active_index));
        }
        fn dismiss_sound_prompt(&mut self) {}
        fn show_persona(&mut self, channel: Channel) {
            self.personas.push(channel);
        }
    }

    #[derive(Default)]
    struct Media {
        calls: Vec<(Channel, &'static str)>,
    }

    impl MediaBackend for Media {
        fn load(&mut self, channel: Channel, _url: &str) {
            self.calls.push((channel, "load"));
        }
        fn play(&mut self, channel: Channel) {
            self.calls.push((channel, "play"));
        }
        fn pause(&mut self, channel: Channel) {
            self.calls.push((channel, "pause"));
        }
        fn set_muted(&mut self, _channel: Channel, _muted: bool) {}
        fn set_loop(&mut self, _channel: Channel, _looping: bool) {}
        fn set_visible(&mut self, _channel: Channel, _visible: bool) {}
    }

    fn playlists() -> Playlists {
        Playlists::new(
            Playlist::new(vec![
                PlaylistEntry::new("a.mp4", "H1", "S1"),
                PlaylistEntry::new("b.mp4", "H2", "S2"),
            ]),
            Playlist::new(vec![PlaylistEntry::new("c.mp4", "G1", "T1")]),
        )
    }

    fn controller(store: Arc<dyn PreferenceStore>) -> Controller<Surface, Media, TimerQueue> {
        Controller::new(
            RuntimeConfig::default(),
            playlists(),
            store,
            Surface::default(),
            Media::default(),
            TimerQueue::new(),
        )
    }

    /// Fire every timer due up to `ms` after the current time
    fn run_for(c: &mut Controller<Surface, Media, TimerQueue>, ms: u64) {
        let until = c.scheduler().now() + Duration::from_millis(ms);
        while let Some((_, token)) = c.scheduler_mut().pop_due(until) {
            c.on_timer(token);
        }
        c.scheduler_mut().set_now(until);
    }

    #[test]
    fn test_boot_without_preference_rotates_hero() {
        let mut c = controller(Arc::new(MemoryPreferenceStore::new()));
        assert_eq!(c.surface().personas, vec![Channel::Primary]);
        assert_eq!(c.surface().caption.as_ref().unwrap().0, "H1");
        assert_eq!(c.surface().dots, Some((2, 0)));

        run_for(&mut c, 8000);
        assert_eq!(c.persona().hero, Channel::Secondary);
        // Rotation never touches the video channel
        assert_eq!(c.state().active, Channel::Primary);

        run_for(&mut c, 8000);
        assert_eq!(c.surface().personas, vec![Channel::Primary, Channel::Secondary, Channel::Primary]);
        assert_eq!(c.stats().rotations, 2);
    }

    #[test]
    fn test_boot_with_preference() {
        let store = Arc::new(MemoryPreferenceStore::with_value("eve_persona", "eve"));
        let mut c = controller(store);

        assert_eq!(c.state().active, Channel::Secondary);
        assert_eq!(c.surface().caption.as_ref().unwrap().0, "G1");
        assert!(c.persona().rotation.is_none());

        run_for(&mut c, 20_000);
        assert_eq!(c.stats().rotations, 0);
    }

    #[test]
    fn test_video_selection_persists_and_switches() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let mut c = controller(store.clone());

        c.select_persona_from_video(Channel::Secondary);
        assert_eq!(c.state().active, Channel::Secondary);
        assert_eq!(store.load("eve_persona").unwrap().as_deref(), Some("eve"));
        assert!(c.persona().rotation.is_none());
        assert!(c.scheduler().is_empty());

        // Same persona again does nothing
        let before = c.stats().clone();
        c.select_persona_from_video(Channel::Secondary);
        assert_eq!(c.stats(), &before);
    }

    #[test]
    fn test_hero_selection_persists_even_when_active() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let mut c = controller(store.clone());

        c.select_persona_from_hero(Channel::Primary);
        assert_eq!(store.load("eve_persona").unwrap().as_deref(), Some("eva"));
        assert!(!c.persona().rotates());
    }

    #[test]
    fn test_full_cycle_through_controller() {
        let mut c = controller(Arc::new(MemoryPreferenceStore::with_value("eve_persona", "eva")));
        c.start_experience();
        assert_eq!(c.phase(), Phase::Transitioning);
        assert!(c.surface().curtain);

        run_for(&mut c, 1000);
        assert_eq!(c.phase(), Phase::Reading);
        c.on_can_play(Channel::Primary);

        run_for(&mut c, 6000);
        assert_eq!(c.media().calls.last(), Some(&(Channel::Primary, "play")));

        c.on_play_started(Channel::Primary);
        assert_eq!(c.phase(), Phase::Playing);
        assert!(!c.surface().curtain);
        assert_eq!(c.surface().icon, Some(ControlIcon::Playing));

        c.on_ended(Channel::Primary);
        assert_eq!(c.state().cursors[Channel::Primary], 1);
        assert_eq!(c.phase(), Phase::Transitioning);
    }

    #[test]
    fn test_hero_selection_after_start_reenters_sequence() {
        let mut c = controller(Arc::new(MemoryPreferenceStore::with_value("eve_persona", "eva")));
        c.start_experience();
        run_for(&mut c, 1000);
        assert_eq!(c.phase(), Phase::Reading);

        c.select_persona_from_hero(Channel::Secondary);
        assert_eq!(c.state().active, Channel::Secondary);
        assert_eq!(c.state().sequence_channel, Channel::Secondary);
        assert_eq!(c.phase(), Phase::Transitioning);

        run_for(&mut c, 1000);
        assert_eq!(c.surface().caption.as_ref().unwrap().0, "G1");
        assert_eq!(c.surface().dots, Some((1, 0)));
    }

    proptest! {
        #[test]
        fn prop_persona_choice_persists_last_switch(
            picks in proptest::collection::vec((any::<bool>(), any::<bool>(), 0u64..10_000), 1..24)
        ) {
            let store = Arc::new(MemoryPreferenceStore::new());
            let mut c = controller(store.clone());
            let mut chosen: Option<Channel> = None;

            for (from_hero, primary, wait) in picks {
                let channel = if primary { Channel::Primary } else { Channel::Secondary };
                if from_hero {
                    c.select_persona_from_hero(channel);
                    chosen = Some(channel);
                } else {
                    if c.state().active != channel {
                        chosen = Some(channel);
                    }
                    c.select_persona_from_video(channel);
                }
                run_for(&mut c, wait);

                prop_assert_eq!(c.state().active, channel);
                let stored = store.load("eve_persona").unwrap();
                prop_assert_eq!(stored.as_deref(), chosen.map(|ch| ch.persona_key()));
                // Rotation runs only until the first choice
                prop_assert_eq!(c.persona().rotates(), chosen.is_none());
                prop_assert_eq!(c.persona().rotation.is_some(), chosen.is_none());
                if let Some(ch) = chosen {
                    prop_assert_eq!(c.surface().personas.last(), Some(&ch));
                }
            }
        }
    }
}
