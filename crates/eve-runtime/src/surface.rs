//! Collaborator seams: the presentation surface and the media elements

use eve_core::Channel;
use eve_sequencer::{CaptionMode, ControlIcon, MediaCommand, SurfaceCommand};

/// Everything visible that is not a video element
pub trait PresentationSurface {
    fn set_caption(&mut self, headline: &str, subtext: &str, extra: &str);
    /// Curtain overlay (true = closed)
    fn set_curtain(&mut self, active: bool);
    fn set_caption_mode(&mut self, mode: CaptionMode);
    fn set_control_icon(&mut self, icon: ControlIcon);
    fn set_buffer_indicator(&mut self, active: bool);
    /// Draw one dot per clip. A click must be fed back as
    /// `Controller::jump_to(index)`.
    fn render_nav_dots(&mut self, count: usize, active_index: usize);
    fn dismiss_sound_prompt(&mut self);
    /// Swap persona-specific static content (hero text, buttons, model)
    fn show_persona(&mut self, channel: Channel);
}

/// The two video elements.
///
/// Play requests complete asynchronously: the owner reports the outcome
/// through `Controller::on_play_started` or `Controller::on_play_rejected`,
/// readiness through `on_can_play`, and natural end through `on_ended`.
pub trait MediaBackend {
    fn load(&mut self, channel: Channel, url: &str);
    fn play(&mut self, channel: Channel);
    fn pause(&mut self, channel: Channel);
    fn set_muted(&mut self, channel: Channel, muted: bool);
    fn set_loop(&mut self, channel: Channel, looping: bool);
    fn set_visible(&mut self, channel: Channel, visible: bool);
}

pub(crate) fn apply_surface<P: PresentationSurface + ?Sized>(surface: &mut P, command: SurfaceCommand) {
    match command {
        SurfaceCommand::SetCaption {
            headline,
            subtext,
            extra,
        } => surface.set_caption(&headline, &subtext, &extra),
        SurfaceCommand::SetCurtain(active) => surface.set_curtain(active),
        SurfaceCommand::SetCaptionMode(mode) => surface.set_caption_mode(mode),
        SurfaceCommand::SetControlIcon(icon) => surface.set_control_icon(icon),
        SurfaceCommand::SetBufferIndicator(active) => surface.set_buffer_indicator(active),
        SurfaceCommand::RenderNavDots { count, active_index } => surface.render_nav_dots(count, active_index),
        SurfaceCommand::DismissSoundPrompt => surface.dismiss_sound_prompt(),
    }
}

pub(crate) fn apply_media<M: MediaBackend + ?Sized>(media: &mut M, channel: Channel, command: MediaCommand) {
    match command {
        MediaCommand::Load(url) => media.load(channel, &url),
        MediaCommand::Play => media.play(channel),
        MediaCommand::Pause => media.pause(channel),
        MediaCommand::SetMuted(muted) => media.set_muted(channel, muted),
        MediaCommand::SetLoop(looping) => media.set_loop(channel, looping),
        MediaCommand::SetVisible(visible) => media.set_visible(channel, visible),
    }
}
