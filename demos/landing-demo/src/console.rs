//! Terminal stand-ins for the page and its two video elements

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use eve_core::Channel;
use eve_runtime::{MediaBackend, MediaCallback, MediaEvent, MediaProfile, PresentationSurface, SimulatedMedia};
use eve_sequencer::{CaptionMode, ControlIcon};

use crate::PageEvent;

/// Prints every surface change
#[derive(Default)]
pub struct ConsoleSurface {
    curtain: bool,
}

impl PresentationSurface for ConsoleSurface {
    fn set_caption(&mut self, headline: &str, subtext: &str, extra: &str) {
        if extra.is_empty() {
            println!("  ▸ {headline} | {subtext}");
        } else {
            println!("  ▸ {headline} | {subtext} [{extra}]");
        }
    }

    fn set_curtain(&mut self, active: bool) {
        if active != self.curtain {
            println!("  {} curtain", if active { "▼" } else { "▲" });
        }
        self.curtain = active;
    }

    fn set_caption_mode(&mut self, mode: CaptionMode) {
        println!("  caption: {mode:?}");
    }

    fn set_control_icon(&mut self, icon: ControlIcon) {
        let glyph = match icon {
            ControlIcon::Playing => "⏸",
            ControlIcon::Paused => "▶",
        };
        println!("  control: {glyph}");
    }

    fn set_buffer_indicator(&mut self, active: bool) {
        if active {
            println!("  ⏳ buffering...");
        }
    }

    fn render_nav_dots(&mut self, count: usize, active_index: usize) {
        let dots: String = (0..count).map(|i| if i == active_index { '●' } else { '○' }).collect();
        println!("  {dots}");
    }

    fn dismiss_sound_prompt(&mut self) {
        println!("  🔊 sound on");
    }

    fn show_persona(&mut self, channel: Channel) {
        println!("  hero: {}", channel.persona_key().to_uppercase());
    }
}

/// Headless elements whose outcomes arrive on the event loop after their
/// real latency
pub struct ConsoleMedia {
    inner: SimulatedMedia,
    events: UnboundedSender<PageEvent>,
}

impl ConsoleMedia {
    pub fn new(profile: MediaProfile, events: UnboundedSender<PageEvent>) -> Self {
        ConsoleMedia {
            inner: SimulatedMedia::new(profile),
            events,
        }
    }

    /// Post queued outcomes to the event loop after their latency
    pub fn flush(&mut self) {
        for (delay, channel, event) in self.inner.take_outbox() {
            let events = self.events.clone();
            tokio::spawn(async move {
                if delay > Duration::ZERO {
                    tokio::time::sleep(delay).await;
                }
                let _ = events.send(PageEvent::Media(channel, event));
            });
        }
    }

    pub fn settle(&mut self, channel: Channel, event: MediaEvent) -> Option<MediaCallback> {
        self.inner.settle(channel, event)
    }

    pub fn playing(&self) -> Vec<Channel> {
        self.inner.playing()
    }
}

impl MediaBackend for ConsoleMedia {
    fn load(&mut self, channel: Channel, url: &str) {
        tracing::debug!(%channel, url, "load");
        self.inner.load(channel, url);
    }

    fn play(&mut self, channel: Channel) {
        tracing::debug!(%channel, "play");
        self.inner.play(channel);
    }

    fn pause(&mut self, channel: Channel) {
        tracing::debug!(%channel, "pause");
        self.inner.pause(channel);
    }

    fn set_muted(&mut self, channel: Channel, muted: bool) {
        self.inner.set_muted(channel, muted);
    }

    fn set_loop(&mut self, channel: Channel, looping: bool) {
        self.inner.set_loop(channel, looping);
    }

    fn set_visible(&mut self, channel: Channel, visible: bool) {
        self.inner.set_visible(channel, visible);
    }
}
