//! Recording presentation surface

use eve_core::Channel;
use eve_runtime::PresentationSurface;
use eve_sequencer::{CaptionMode, ControlIcon};

/// What a visitor would currently see
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurfaceView {
    pub headline: String,
    pub subtext: String,
    pub extra: String,
    pub curtain: bool,
    pub caption_mode: Option<CaptionMode>,
    pub icon: Option<ControlIcon>,
    pub buffering: bool,
    /// (count, active index)
    pub nav_dots: Option<(usize, usize)>,
    pub persona: Option<Channel>,
    pub sound_prompt_dismissed: bool,
}

/// Surface that keeps the current view plus a few counters
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub view: SurfaceView,
    /// Headlines in the order they were shown
    pub headlines: Vec<String>,
    pub curtain_closes: u32,
    pub icon_changes: u32,
    pub persona_changes: u32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentationSurface for RecordingSurface {
    fn set_caption(&mut self, headline: &str, subtext: &str, extra: &str) {
        self.view.headline = headline.to_string();
        self.view.subtext = subtext.to_string();
        self.view.extra = extra.to_string();
        self.headlines.push(headline.to_string());
    }

    fn set_curtain(&mut self, active: bool) {
        if active && !self.view.curtain {
            self.curtain_closes += 1;
        }
        self.view.curtain = active;
    }

    fn set_caption_mode(&mut self, mode: CaptionMode) {
        self.view.caption_mode = Some(mode);
    }

    fn set_control_icon(&mut self, icon: ControlIcon) {
        self.icon_changes += 1;
        self.view.icon = Some(icon);
    }

    fn set_buffer_indicator(&mut self, active: bool) {
        self.view.buffering = active;
    }

    fn render_nav_dots(&mut self, count: usize, active_index: usize) {
        self.view.nav_dots = Some((count, active_index));
    }

    fn dismiss_sound_prompt(&mut self) {
        self.view.sound_prompt_dismissed = true;
    }

    fn show_persona(&mut self, channel: Channel) {
        if self.view.persona != Some(channel) {
            self.persona_changes += 1;
        }
        self.view.persona = Some(channel);
    }
}
