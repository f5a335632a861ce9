use std::time::Duration;

use chrono::{DateTime, Utc};
use nanoid::nanoid;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::accumulator::{Accumulator, DevelopState};
use crate::catalog::{Catalog, RewardItem};
use crate::config::Config;
use crate::cues::{Cue, CueSink, SilentCues};
use crate::draw::WeightedDraw;
use crate::effects::{Bubble, BubbleStream};
use crate::error::ConfigError;
use crate::history::{HistoryRecord, HistoryStore};
use crate::storage::Storage;

const FRAME_ALPHABET: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J',
    'K', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W', 'X', 'Y', 'Z',
];

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub active: bool,
    pub progress: f64,
    pub last_draw: Option<RewardItem>,
}

#[derive(Debug, Clone)]
pub struct DevelopedFrame {
    pub frame_id: String,
    pub item: RewardItem,
    pub developed_at: DateTime<Utc>,
    pub history: HistoryRecord,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Progress(f64),
    Bubble(Bubble),
    Developed(Box<DevelopedFrame>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunId(u64);

/// A tick continuation waiting on the virtual clock.
#[derive(Debug, Clone, Copy)]
struct ScheduledTick {
    run: RunId,
    due: Duration,
}

/// Drives one developing run at a time and owns the saved history.
pub struct Session<S> {
    draw: WeightedDraw,
    accumulator: Accumulator,
    history: HistoryStore<S>,
    bubbles: BubbleStream,
    cues: Box<dyn CueSink>,
    rng: StdRng,
    tick_interval: Duration,
    now: Duration,
    pending: Option<ScheduledTick>,
    current_run: Option<RunId>,
    next_run: u64,
    last_draw: Option<RewardItem>,
}

impl<S: Storage> Session<S> {
    pub fn new(config: &Config, storage: S, seed: Option<u64>) -> Result<Self, ConfigError> {
        Self::with_catalog(config, Catalog::builtin().clone(), storage, seed)
    }

    pub fn with_catalog(
        config: &Config,
        catalog: Catalog,
        storage: S,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let accumulator = Accumulator::new(config)?;
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut history = HistoryStore::new(storage, config.storage_key.clone(), config.history_limit);
        let loaded = history.load();
        log::info!(
            "darkroom ready: {} photos developed, {} on the line",
            loaded.lifetime_count,
            loaded.recent_draws.len()
        );
        let bubbles = BubbleStream::new(rng.gen_range(0..u64::MAX));

        Ok(Self {
            draw: WeightedDraw::new(catalog, config.thresholds),
            accumulator,
            history,
            bubbles,
            cues: Box::new(SilentCues),
            rng,
            tick_interval: config.tick_interval(),
            now: Duration::ZERO,
            pending: None,
            current_run: None,
            next_run: 0,
            last_draw: None,
        })
    }

    pub fn with_cues(mut self, cues: impl CueSink + 'static) -> Self {
        self.cues = Box::new(cues);
        self
    }

    /// Starts developing. Returns `false` if a run is already in flight.
    pub fn start(&mut self) -> bool {
        if !self.accumulator.start() {
            return false;
        }
        let run = RunId(self.next_run);
        self.next_run += 1;
        self.current_run = Some(run);
        self.last_draw = None;
        self.bubbles = BubbleStream::new(self.rng.gen_range(0..u64::MAX));
        self.pending = Some(ScheduledTick {
            run,
            due: self.now + self.tick_interval,
        });
        log::debug!("run {} started", run.0);
        true
    }

    /// Leaves the darkroom: cancels the pending tick and returns to idle.
    /// Saved history is kept.
    pub fn exit(&mut self) {
        if let Some(run) = self.current_run.take() {
            log::debug!("run {} cancelled", run.0);
        }
        self.pending = None;
        self.accumulator.reset();
    }

    /// Moves the clock forward by `dt`, running every tick that falls due.
    pub fn advance(&mut self, dt: Duration) -> Vec<SessionEvent> {
        let target = self.now + dt;
        let mut events = Vec::new();

        while let Some(tick) = self.pending.filter(|tick| tick.due <= target) {
            self.pending = None;
            self.now = tick.due;
            if self.current_run != Some(tick.run) {
                continue;
            }
            self.run_tick(tick, &mut events);
        }

        self.now = target;
        events
    }

    fn run_tick(&mut self, tick: ScheduledTick, events: &mut Vec<SessionEvent>) {
        let Some(outcome) = self.accumulator.tick(&mut self.rng) else {
            return;
        };

        if outcome.bubble {
            if let Some(bubble) = self.bubbles.next() {
                self.cues.cue(Cue::Bubble);
                events.push(SessionEvent::Bubble(bubble));
            }
        }
        events.push(SessionEvent::Progress(outcome.progress));

        if outcome.completed {
            let frame = self.complete();
            events.push(SessionEvent::Developed(Box::new(frame)));
        } else {
            self.pending = Some(ScheduledTick {
                run: tick.run,
                due: tick.due + self.tick_interval,
            });
        }
    }

    fn complete(&mut self) -> DevelopedFrame {
        let item = self.draw.draw(&mut self.rng);
        let history = self.history.record(item.clone());
        self.last_draw = Some(item.clone());
        self.current_run = None;
        self.cues.cue(Cue::Developed);

        let frame_id = frame_id(&item, history.lifetime_count);
        log::info!(
            "developed {} ({}) as {frame_id}; lifetime {}",
            item.name,
            item.rarity,
            history.lifetime_count
        );
        DevelopedFrame {
            frame_id,
            item,
            developed_at: Utc::now(),
            history,
        }
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            active: self.accumulator.is_running(),
            progress: self.accumulator.progress(),
            last_draw: self.last_draw.clone(),
        }
    }

    pub fn develop_state(&self) -> DevelopState {
        self.accumulator.state()
    }

    pub fn history(&self) -> &HistoryRecord {
        self.history.current()
    }

    pub fn storage(&self) -> &S {
        self.history.storage()
    }

    pub fn catalog(&self) -> &Catalog {
        self.draw.catalog()
    }
}

/// Negative-sleeve style label, e.g. `F7-K3Q9ZD-4`: frame number, random body,
/// one hex checksum digit.
fn frame_id(item: &RewardItem, frame_number: u64) -> String {
    let body = nanoid!(6, FRAME_ALPHABET);
    let core = format!("F{frame_number}-{body}");
    let hash = blake3::hash(format!("{core}:{}", item.id).as_bytes());
    let nibble = u32::from(hash.as_bytes()[0] >> 4);
    let checksum = std::char::from_digit(nibble, 16)
        .unwrap_or('0')
        .to_ascii_uppercase();
    format!("{core}-{checksum}")
}
