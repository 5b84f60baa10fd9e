//! Headless media elements
//!
//! Stands in for the page's video elements where there is no real player
//! (terminal runs, simulations). Models the parts of a browser video element
//! the controller depends on:
//! - Loading takes `ready_latency` before the element can play
//! - `play()` resolves (or is rejected) asynchronously
//! - `pause()` while a play request is pending rejects that request
//! - A clip that is not looping ends after `clip_duration`
//!
//! Outcomes are queued with a delay and handed back to the controller by
//! whichever event loop owns the backend.
//! Every outcome carries the epoch it was issued under, so outcomes made
//! obsolete by a later load or pause are dropped on delivery.

use std::time::Duration;

use eve_core::{Channel, ChannelMap};
use crate::MediaBackend;

/// Timing and failure profile for both elements
#[derive(Clone, Debug)]
pub struct MediaProfile {
    /// Load to ready
    pub ready_latency: Duration,
    /// play() to resolution
    pub play_latency: Duration,
    /// Length of every clip
    pub clip_duration: Duration,
    /// Reject every play request (autoplay blocked)
    pub reject_play: bool,
}

impl Default for MediaProfile {
    fn default() -> Self {
        MediaProfile {
            ready_latency: Duration::from_millis(200),
            play_latency: Duration::from_millis(20),
            clip_duration: Duration::from_secs(12),
            reject_play: false,
        }
    }
}

impl MediaProfile {
    /// Everything cached, clips still take time
    pub fn instant() -> Self {
        MediaProfile {
            ready_latency: Duration::ZERO,
            play_latency: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Slow network: buffering outlasts the read timer
    pub fn slow() -> Self {
        MediaProfile {
            ready_latency: Duration::from_secs(9),
            play_latency: Duration::from_millis(150),
            ..Self::default()
        }
    }

    /// Browser refuses to play
    pub fn blocked() -> Self {
        MediaProfile {
            reject_play: true,
            ..Self::default()
        }
    }
}

/// Raw outcome queued by an element
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaEvent {
    CanPlay { load: u64 },
    PlayResolved { play: u64 },
    PlayRejected { play: u64, reason: String },
    Ended { run: u64 },
}

/// Callback the controller receives after an event survives delivery
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaCallback {
    CanPlay,
    PlayStarted,
    PlayRejected(String),
    Ended,
}

/// Observable state of one element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementModel {
    pub source: Option<String>,
    pub ready: bool,
    pub playing: bool,
    pub muted: bool,
    pub looping: bool,
    pub visible: bool,
    /// Play requests that reached the element
    pub play_requests: u32,
    load_epoch: u64,
    play_epoch: u64,
    run_epoch: u64,
    pending_play: bool,
}

/// Two simulated video elements
#[derive(Debug)]
pub struct SimulatedMedia {
    profile: MediaProfile,
    elements: ChannelMap<ElementModel>,
    outbox: Vec<(Duration, Channel, MediaEvent)>,
}

impl SimulatedMedia {
    pub fn new(profile: MediaProfile) -> Self {
        let element = ElementModel {
            muted: true,
            looping: true,
            ..ElementModel::default()
        };
        SimulatedMedia {
            profile,
            elements: ChannelMap::new(element.clone(), element),
            outbox: Vec::new(),
        }
    }

    pub fn profile(&self) -> &MediaProfile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: MediaProfile) {
        self.profile = profile;
    }

    pub fn element(&self, channel: Channel) -> &ElementModel {
        &self.elements[channel]
    }

    /// Channels currently producing picture or sound
    pub fn playing(&self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|&ch| self.elements[ch].playing)
            .collect()
    }

    /// Drain queued outcomes as (delay, channel, event)
    pub fn take_outbox(&mut self) -> Vec<(Duration, Channel, MediaEvent)> {
        std::mem::take(&mut self.outbox)
    }

    /// Resolve a queued event against the element's current epochs.
    /// Returns the callback to deliver, or None if the event is obsolete.
    pub fn settle(&mut self, channel: Channel, event: MediaEvent) -> Option<MediaCallback> {
        let clip = self.profile.clip_duration;
        let el = &mut self.elements[channel];
        match event {
            MediaEvent::CanPlay { load } if load == el.load_epoch => {
                el.ready = true;
                Some(MediaCallback::CanPlay)
            }
            MediaEvent::PlayResolved { play } if play == el.play_epoch && el.pending_play => {
                el.pending_play = false;
                el.playing = true;
                el.run_epoch += 1;
                if !el.looping {
                    let run = el.run_epoch;
                    self.outbox.push((clip, channel, MediaEvent::Ended { run }));
                }
                Some(MediaCallback::PlayStarted)
            }
            MediaEvent::PlayRejected { play, reason } if play == el.play_epoch && el.pending_play => {
                el.pending_play = false;
                Some(MediaCallback::PlayRejected(reason))
            }
            MediaEvent::Ended { run } if run == el.run_epoch && el.playing => {
                el.playing = false;
                Some(MediaCallback::Ended)
            }
            _ => None,
        }
    }
}

impl MediaBackend for SimulatedMedia {
    fn load(&mut self, channel: Channel, url: &str) {
        let el = &mut self.elements[channel];
        if el.pending_play {
            let play = el.play_epoch;
            self.outbox.push((
                Duration::ZERO,
                channel,
                MediaEvent::PlayRejected {
                    play,
                    reason: "AbortError: interrupted by a new load request".to_string(),
                },
            ));
        }
        el.source = Some(url.to_string());
        el.ready = false;
        el.playing = false;
        el.load_epoch += 1;
        el.run_epoch += 1;
        let load = el.load_epoch;
        self.outbox
            .push((self.profile.ready_latency, channel, MediaEvent::CanPlay { load }));
    }

    fn play(&mut self, channel: Channel) {
        let el = &mut self.elements[channel];
        el.play_requests += 1;
        el.play_epoch += 1;
        el.pending_play = true;
        let play = el.play_epoch;

        let event = if el.source.is_none() {
            MediaEvent::PlayRejected {
                play,
                reason: "NotSupportedError: no source".to_string(),
            }
        } else if self.profile.reject_play {
            MediaEvent::PlayRejected {
                play,
                reason: "NotAllowedError: autoplay blocked".to_string(),
            }
        } else {
            MediaEvent::PlayResolved { play }
        };
        self.outbox.push((self.profile.play_latency, channel, event));
    }

    fn pause(&mut self, channel: Channel) {
        let el = &mut self.elements[channel];
        if el.pending_play {
            // Interrupts the pending request, like a browser AbortError
            let play = el.play_epoch;
            self.outbox.push((
                Duration::ZERO,
                channel,
                MediaEvent::PlayRejected {
                    play,
                    reason: "AbortError: play() interrupted by pause()".to_string(),
                },
            ));
        }
        if el.playing {
            el.playing = false;
            el.run_epoch += 1;
        }
    }

    fn set_muted(&mut self, channel: Channel, muted: bool) {
        self.elements[channel].muted = muted;
    }

    fn set_loop(&mut self, channel: Channel, looping: bool) {
        self.elements[channel].looping = looping;
    }

    fn set_visible(&mut self, channel: Channel, visible: bool) {
        self.elements[channel].visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_then_ready() {
        let mut media = SimulatedMedia::new(MediaProfile::default());
        media.load(Channel::Primary, "a.mp4");

        let out = media.take_outbox();
        assert_eq!(out.len(), 1);
        let (delay, ch, event) = out.into_iter().next().unwrap();
        assert_eq!(delay, Duration::from_millis(200));
        assert_eq!(media.settle(ch, event), Some(MediaCallback::CanPlay));
        assert!(media.element(Channel::Primary).ready);
    }

    #[test]
    fn test_reload_obsoletes_ready() {
        let mut media = SimulatedMedia::new(MediaProfile::default());
        media.load(Channel::Primary, "a.mp4");
        media.load(Channel::Primary, "b.mp4");

        let out = media.take_outbox();
        let (_, ch, first) = out[0].clone();
        let (_, _, second) = out[1].clone();
        assert_eq!(media.settle(ch, first), None);
        assert_eq!(media.settle(ch, second), Some(MediaCallback::CanPlay));
    }

    #[test]
    fn test_pause_rejects_pending_play() {
        let mut media = SimulatedMedia::new(MediaProfile::default());
        media.load(Channel::Secondary, "c.mp4");
        media.take_outbox();

        media.play(Channel::Secondary);
        media.pause(Channel::Secondary);
        let out = media.take_outbox();
        assert_eq!(out.len(), 2);

        // The abort arrives first and wins; the late resolution is dropped
        let (_, ch, abort) = out[1].clone();
        assert!(matches!(media.settle(ch, abort), Some(MediaCallback::PlayRejected(_))));
        let (_, ch, resolved) = out[0].clone();
        assert_eq!(media.settle(ch, resolved), None);
        assert!(media.playing().is_empty());
    }

    #[test]
    fn test_non_looping_clip_ends() {
        let mut media = SimulatedMedia::new(MediaProfile::instant());
        media.load(Channel::Primary, "a.mp4");
        media.set_loop(Channel::Primary, false);
        media.play(Channel::Primary);

        let out = media.take_outbox();
        let (_, ch, resolved) = out[1].clone();
        assert_eq!(media.settle(ch, resolved), Some(MediaCallback::PlayStarted));
        assert_eq!(media.playing(), vec![Channel::Primary]);

        let ended = media.take_outbox();
        assert_eq!(ended[0].0, Duration::from_secs(12));
        let (_, ch, event) = ended[0].clone();
        assert_eq!(media.settle(ch, event), Some(MediaCallback::Ended));
        assert!(media.playing().is_empty());
    }

    #[test]
    fn test_blocked_profile_rejects() {
        let mut media = SimulatedMedia::new(MediaProfile::blocked());
        media.load(Channel::Primary, "a.mp4");
        media.play(Channel::Primary);

        let out = media.take_outbox();
        let (_, ch, event) = out[1].clone();
        assert!(matches!(media.settle(ch, event), Some(MediaCallback::PlayRejected(_))));
        assert_eq!(media.element(Channel::Primary).play_requests, 1);
    }
}
