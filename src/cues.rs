//! Fire-and-forget sound/visual hooks. A sink that fails to play a cue keeps
//! quiet about it; the simulation never waits on or inspects a cue.

use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    AmbienceStart,
    AmbienceStop,
    Bubble,
    Developed,
    Shutter,
}

pub trait CueSink {
    fn cue(&mut self, cue: Cue);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCues;

impl CueSink for SilentCues {
    fn cue(&mut self, _cue: Cue) {}
}

/// Rings the terminal bell for the loud cues.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl CueSink for TerminalBell {
    fn cue(&mut self, cue: Cue) {
        if matches!(cue, Cue::Developed | Cue::Shutter) {
            let mut out = std::io::stdout();
            let _ = out.write_all(b"\x07").and_then(|()| out.flush());
        }
    }
}

/// Keeps every cue it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordedCues(pub Vec<Cue>);

impl CueSink for RecordedCues {
    fn cue(&mut self, cue: Cue) {
        self.0.push(cue);
    }
}
