//! End-to-end visitor scenarios
//!
//! Scripts of visitor actions replayed against the `Simulation`:
//! - First visit: hero rotation, sound prompt, full clip cycle
//! - Returning visitor: restored persona, no rotation
//! - Reading holds, section visibility, persona switches
//! - Slow network buffering and blocked autoplay

use std::time::Duration;

use eve_core::Channel;

use crate::simulation::Simulation;

/// One thing a visitor can do on the page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitorAction {
    StartExperience,
    TogglePlayPause,
    /// Nav dot click
    JumpTo(usize),
    SelectFromHero(Channel),
    SelectFromVideo(Channel),
    ScrollIntoView,
    ScrollAway,
}

impl VisitorAction {
    pub fn apply(self, sim: &mut Simulation) {
        match self {
            VisitorAction::StartExperience => sim.start_experience(),
            VisitorAction::TogglePlayPause => sim.toggle_play_pause(),
            VisitorAction::JumpTo(index) => sim.jump_to(index),
            VisitorAction::SelectFromHero(ch) => sim.select_persona_from_hero(ch),
            VisitorAction::SelectFromVideo(ch) => sim.select_persona_from_video(ch),
            VisitorAction::ScrollIntoView => sim.section_visible(),
            VisitorAction::ScrollAway => sim.section_hidden(),
        }
    }
}

/// A timed visitor script: wait, then act
pub type Script = Vec<(Duration, VisitorAction)>;

/// Replay a script, checking invariants after every step.
/// Returns the violations found, tagged with the step that exposed them.
pub fn run_script(sim: &mut Simulation, script: &[(Duration, VisitorAction)]) -> Vec<String> {
    let mut violations = Vec::new();
    for (step, (wait, action)) in script.iter().enumerate() {
        sim.advance_by(*wait);
        action.apply(sim);
        for v in sim.check_invariants() {
            violations.push(format!("step {step} ({action:?}): {v}"));
        }
    }
    violations
}

/// A typical first visit: scroll, allow sound, watch, pause, browse
pub fn first_visit_script() -> Script {
    vec![
        (Duration::from_millis(2500), VisitorAction::ScrollIntoView),
        (Duration::from_millis(800), VisitorAction::StartExperience),
        (Duration::from_millis(9000), VisitorAction::TogglePlayPause),
        (Duration::from_millis(3000), VisitorAction::TogglePlayPause),
        (Duration::from_millis(4000), VisitorAction::JumpTo(2)),
        (Duration::from_millis(1500), VisitorAction::SelectFromVideo(Channel::Secondary)),
        (Duration::from_millis(20_000), VisitorAction::ScrollAway),
        (Duration::from_millis(6000), VisitorAction::ScrollIntoView),
    ]
}
