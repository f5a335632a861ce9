use rand::Rng;
use rand_distr::{Bernoulli, Distribution, Uniform};

use crate::config::Config;
use crate::error::ConfigError;

pub const PROGRESS_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevelopState {
    Idle,
    Running,
    Complete,
}

/// What one tick did to a running accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub progress: f64,
    pub bubble: bool,
    pub completed: bool,
}

/// Timed progress towards a developed photo. Advances only through `tick`.
#[derive(Debug, Clone)]
pub struct Accumulator {
    state: DevelopState,
    progress: f64,
    increment: Uniform<f64>,
    bubble: Bernoulli,
}

impl Accumulator {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let bubble = Bernoulli::new(config.bubble_chance).map_err(|_| {
            ConfigError::Probability {
                field: "bubble_chance",
                value: config.bubble_chance,
            }
        })?;
        Ok(Self {
            state: DevelopState::Idle,
            progress: 0.0,
            increment: Uniform::new(config.increment_min, config.increment_max),
            bubble,
        })
    }

    pub fn state(&self) -> DevelopState {
        self.state
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_running(&self) -> bool {
        self.state == DevelopState::Running
    }

    /// Begins a fresh run. Returns `false` if one is already in flight.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = DevelopState::Running;
        self.progress = 0.0;
        true
    }

    pub fn reset(&mut self) {
        self.state = DevelopState::Idle;
        self.progress = 0.0;
    }

    /// Advances a running accumulator by one step. `None` when not running.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TickOutcome> {
        if !self.is_running() {
            return None;
        }

        let bubble = self.bubble.sample(rng);
        self.progress += self.increment.sample(rng);

        let completed = self.progress >= PROGRESS_MAX;
        if completed {
            self.progress = PROGRESS_MAX;
            self.state = DevelopState::Complete;
        }

        Some(TickOutcome {
            progress: self.progress,
            bubble,
            completed,
        })
    }
}
