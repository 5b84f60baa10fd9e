//! Side effects requested by transitions

use std::time::Duration;

use eve_core::Channel;
use eve_time::TimerToken;

/// Caption container display mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaptionMode {
    Hidden,
    Reading,
    Playing,
}

/// Glyph on the play/pause control
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ControlIcon {
    /// Sequence is running; the control offers "pause"
    Playing,
    /// Sequence is held; the control offers "play"
    #[default]
    Paused,
}

/// Commands for the presentation surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceCommand {
    SetCaption {
        headline: String,
        subtext: String,
        extra: String,
    },
    /// Curtain overlay over the video (true = closed)
    SetCurtain(bool),
    SetCaptionMode(CaptionMode),
    SetControlIcon(ControlIcon),
    SetBufferIndicator(bool),
    /// Redraw the playlist dots; clicks come back as `jump_to(index)`
    RenderNavDots { count: usize, active_index: usize },
    /// Fade out the sound permission prompt and show the control button
    DismissSoundPrompt,
}

/// Commands for one media element
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaCommand {
    /// Replace the source and start loading it
    Load(String),
    /// Request playback; the outcome is reported back asynchronously
    Play,
    Pause,
    SetMuted(bool),
    SetLoop(bool),
    /// Show or hide the element (opacity)
    SetVisible(bool),
}

/// One side effect of a transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Surface(SurfaceCommand),
    Media {
        channel: Channel,
        command: MediaCommand,
    },
    ArmTimer {
        token: TimerToken,
        delay: Duration,
    },
    CancelTimer(TimerToken),
}

impl Effect {
    pub fn is_surface(&self) -> bool {
        matches!(self, Effect::Surface(_))
    }

    pub fn is_timer(&self) -> bool {
        matches!(self, Effect::ArmTimer { .. } | Effect::CancelTimer(_))
    }
}
