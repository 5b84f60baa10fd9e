//! Chaos testing for the landing page
//!
//! A seeded random visitor hammers the controller with:
//! - Rapid play/pause toggling and nav dot clicks
//! - Persona switches from the hero and from the video
//! - Scrolling the section in and out of view
//! - Media that changes speed mid-visit or refuses to play
//!
//! Invariants are checked after every action and every wait.

use std::time::Duration;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use eve_core::{Channel, Playlists};
use eve_runtime::{MediaCallback, MediaProfile};
use eve_sequencer::Phase;

use crate::integration::VisitorAction;
use crate::simulation::{sample_playlists, Simulation, SimulationConfig};

/// Chaos visitor configuration
#[derive(Clone, Debug)]
pub struct VisitorChaosConfig {
    pub seed: u64,
    /// Number of visitor actions
    pub actions: usize,
    /// Longest pause between two actions
    pub max_wait: Duration,
    /// Relative weights: toggle, jump, hero select, video select,
    /// scroll in, scroll away, start
    pub weights: [u32; 7],
    /// Probability of swapping the media profile before an action
    pub profile_swap_prob: f64,
    /// Stored persona for a returning visitor
    pub stored_persona: Option<Channel>,
}

impl Default for VisitorChaosConfig {
    fn default() -> Self {
        VisitorChaosConfig {
            seed: 0xE7E,
            actions: 200,
            max_wait: Duration::from_secs(15),
            weights: [6, 3, 1, 2, 2, 2, 1],
            profile_swap_prob: 0.05,
            stored_persona: None,
        }
    }
}

impl VisitorChaosConfig {
    /// Mostly watching, occasionally clicking
    pub fn patient() -> Self {
        VisitorChaosConfig {
            max_wait: Duration::from_secs(40),
            weights: [2, 1, 1, 1, 1, 1, 1],
            ..Self::default()
        }
    }

    /// Clicks everything as fast as possible
    pub fn frantic() -> Self {
        VisitorChaosConfig {
            actions: 1000,
            max_wait: Duration::from_millis(400),
            weights: [10, 6, 2, 4, 3, 3, 1],
            profile_swap_prob: 0.1,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Outcome of a chaos run
#[derive(Clone, Debug, Default)]
pub struct ChaosReport {
    pub actions: usize,
    pub violations: Vec<String>,
    /// Clips that actually started playing
    pub clips_started: usize,
    pub rejected_plays: usize,
    /// Time spent in each phase, in the order of `PHASES`
    pub phase_time: [Duration; 5],
}

impl ChaosReport {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn time_in(&self, phase: Phase) -> Duration {
        self.phase_time[phase_slot(phase)]
    }
}

const PHASES: [Phase; 5] = [
    Phase::Idle,
    Phase::Transitioning,
    Phase::Reading,
    Phase::Playing,
    Phase::Paused,
];

fn phase_slot(phase: Phase) -> usize {
    PHASES.iter().position(|p| *p == phase).unwrap_or(0)
}

/// Seeded random visitor
pub struct VisitorChaos {
    config: VisitorChaosConfig,
    rng: StdRng,
    sim: Simulation,
    jump_range: usize,
}

impl VisitorChaos {
    pub fn new(config: VisitorChaosConfig) -> Self {
        Self::with_playlists(config, sample_playlists())
    }

    pub fn with_playlists(config: VisitorChaosConfig, playlists: Playlists) -> Self {
        let jump_range = Channel::ALL
            .into_iter()
            .map(|ch| playlists.get(ch).len())
            .max()
            .unwrap_or(0)
            + 1;
        let sim_config = SimulationConfig {
            stored_persona: config.stored_persona,
            ..SimulationConfig::default()
        };
        VisitorChaos {
            rng: StdRng::seed_from_u64(config.seed),
            sim: Simulation::new(sim_config, playlists),
            config,
            jump_range,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    fn random_channel(&mut self) -> Channel {
        if self.rng.gen_bool(0.5) {
            Channel::Primary
        } else {
            Channel::Secondary
        }
    }

    fn random_profile(&mut self) -> MediaProfile {
        match self.rng.gen_range(0..4) {
            0 => MediaProfile::instant(),
            1 => MediaProfile::slow(),
            2 => MediaProfile::blocked(),
            _ => MediaProfile {
                ready_latency: Duration::from_millis(self.rng.gen_range(0..3000)),
                play_latency: Duration::from_millis(self.rng.gen_range(0..300)),
                clip_duration: Duration::from_millis(self.rng.gen_range(500..20_000)),
                reject_play: false,
            },
        }
    }

    fn random_action(&mut self, dist: &WeightedIndex<u32>) -> VisitorAction {
        match dist.sample(&mut self.rng) {
            0 => VisitorAction::TogglePlayPause,
            1 => VisitorAction::JumpTo(self.rng.gen_range(0..self.jump_range)),
            2 => VisitorAction::SelectFromHero(self.random_channel()),
            3 => VisitorAction::SelectFromVideo(self.random_channel()),
            4 => VisitorAction::ScrollIntoView,
            5 => VisitorAction::ScrollAway,
            _ => VisitorAction::StartExperience,
        }
    }

    /// Run the configured number of actions
    pub fn run(&mut self) -> ChaosReport {
        let mut report = ChaosReport::default();
        let dist = match WeightedIndex::new(self.config.weights) {
            Ok(dist) => dist,
            Err(e) => {
                report.violations.push(format!("bad action weights: {e}"));
                return report;
            }
        };
        let max_wait = self.config.max_wait.as_millis().max(1) as u64;

        for step in 0..self.config.actions {
            if self.rng.gen_bool(self.config.profile_swap_prob) {
                let profile = self.random_profile();
                self.sim.set_media_profile(profile);
            }

            let wait = Duration::from_millis(self.rng.gen_range(0..max_wait));
            let phase = self.sim.phase();
            self.sim.advance_by(wait);
            // Attributed to the phase at the start of the wait
            report.phase_time[phase_slot(phase)] += wait;
            self.record(&mut report, step, "wait");

            let action = self.random_action(&dist);
            action.apply(&mut self.sim);
            self.record(&mut report, step, &format!("{action:?}"));
            report.actions += 1;
        }

        for (_, _, callback) in self.sim.delivered() {
            match callback {
                MediaCallback::PlayStarted => report.clips_started += 1,
                MediaCallback::PlayRejected(_) => report.rejected_plays += 1,
                _ => {}
            }
        }
        tracing::debug!(
            seed = self.config.seed,
            actions = report.actions,
            violations = report.violations.len(),
            clips = report.clips_started,
            "chaos run finished"
        );
        report
    }

    fn record(&self, report: &mut ChaosReport, step: usize, what: &str) {
        for v in self.sim.check_invariants() {
            report
                .violations
                .push(format!("seed {} step {step} after {what} at {:?}: {v}", self.config.seed, self.sim.now()));
        }
    }
}
