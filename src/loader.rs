//! Camera-shutter intro played before the darkroom opens.

use std::time::Duration;

use crate::cues::{Cue, CueSink};

const DEVELOP_STEP: Duration = Duration::from_millis(50);
const DEVELOP_INCREMENT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderStage {
    Initial,
    Flash,
    Developing,
    Complete,
}

impl LoaderStage {
    pub const SEQUENCE: [LoaderStage; 4] = [
        LoaderStage::Initial,
        LoaderStage::Flash,
        LoaderStage::Developing,
        LoaderStage::Complete,
    ];

    pub fn duration(self) -> Duration {
        match self {
            LoaderStage::Initial => Duration::from_millis(1000),
            LoaderStage::Flash => Duration::from_millis(800),
            LoaderStage::Developing => DEVELOP_STEP * (100 / DEVELOP_INCREMENT),
            LoaderStage::Complete => Duration::from_millis(500),
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            LoaderStage::Initial => "Winding film...",
            LoaderStage::Flash => "*click*",
            LoaderStage::Developing => "Developing...",
            LoaderStage::Complete => "Ready",
        }
    }
}

/// Walks the stage list with a single clock. `advance` is the only driver.
#[derive(Debug, Clone)]
pub struct LoaderSequence {
    index: usize,
    in_stage: Duration,
    finished: bool,
}

impl Default for LoaderSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderSequence {
    pub fn new() -> Self {
        Self {
            index: 0,
            in_stage: Duration::ZERO,
            finished: false,
        }
    }

    pub fn stage(&self) -> LoaderStage {
        LoaderStage::SEQUENCE[self.index]
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Film progress shown during `Developing`: 0..=100 in steps of two.
    pub fn progress(&self) -> u32 {
        match self.stage() {
            LoaderStage::Initial | LoaderStage::Flash => 0,
            LoaderStage::Developing => {
                let steps = (self.in_stage.as_millis() / DEVELOP_STEP.as_millis()) as u32;
                (steps * DEVELOP_INCREMENT).min(100)
            }
            LoaderStage::Complete => 100,
        }
    }

    pub fn skip(&mut self) {
        self.index = LoaderStage::SEQUENCE.len() - 1;
        self.in_stage = self.stage().duration();
        self.finished = true;
    }

    /// Returns `true` on the call that finishes the sequence.
    pub fn advance(&mut self, dt: Duration, cues: &mut dyn CueSink) -> bool {
        if self.finished {
            return false;
        }
        self.in_stage += dt;
        while self.in_stage >= self.stage().duration() {
            if self.index + 1 == LoaderStage::SEQUENCE.len() {
                self.finished = true;
                return true;
            }
            self.in_stage -= self.stage().duration();
            self.index += 1;
            if self.stage() == LoaderStage::Flash {
                cues.cue(Cue::Shutter);
            }
        }
        false
    }
}
