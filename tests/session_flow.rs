use std::time::Duration;

use darkroom::catalog::{Catalog, Rarity};
use darkroom::config::{Config, RarityThresholds};
use darkroom::cues::{Cue, CueSink};
use darkroom::session::{Session, SessionEvent};
use darkroom::storage::{FileStorage, MemoryStorage};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const TICK: Duration = Duration::from_millis(100);
// Slowest possible run: 100 ticks at the minimum increment.
const LONGEST_RUN: Duration = Duration::from_secs(11);

fn developed_count(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, SessionEvent::Developed(_)))
        .count()
}

#[derive(Clone, Default)]
struct SharedCues(Arc<Mutex<Vec<Cue>>>);

impl CueSink for SharedCues {
    fn cue(&mut self, cue: Cue) {
        if let Ok(mut cues) = self.0.lock() {
            cues.push(cue);
        }
    }
}

#[test]
fn double_start_yields_one_completion_and_one_draw() {
    let mut session =
        Session::new(&Config::default(), MemoryStorage::default(), Some(0xF11)).unwrap();
    assert!(session.start());
    assert!(!session.start());

    let mut events = Vec::new();
    for _ in 0..150 {
        events.extend(session.advance(TICK));
    }

    assert_eq!(developed_count(&events), 1);
    assert_eq!(session.history().lifetime_count, 1);
    assert_eq!(session.history().recent_draws.len(), 1);
    assert_eq!(session.storage().writes(), 1);
}

#[test]
fn start_mid_run_does_not_reset_progress() {
    let mut session =
        Session::new(&Config::default(), MemoryStorage::default(), Some(8)).unwrap();
    session.start();
    session.advance(TICK * 5);
    let before = session.state().progress;
    assert!(before > 0.0);
    assert!(!session.start());
    assert_eq!(session.state().progress, before);
}

#[test]
fn exit_mid_run_cancels_the_pending_completion() {
    let mut session =
        Session::new(&Config::default(), MemoryStorage::default(), Some(0xC0FFEE)).unwrap();
    session.start();
    let early = session.advance(TICK * 3);
    assert_eq!(developed_count(&early), 0);

    session.exit();
    let late = session.advance(LONGEST_RUN * 2);

    assert!(late.is_empty(), "stale tick fired: {late:?}");
    assert_eq!(session.history().lifetime_count, 0);
    assert_eq!(session.storage().writes(), 0);
    assert!(session.state().last_draw.is_none());
    assert!(!session.state().active);
}

#[test]
fn a_new_run_after_exit_completes_normally() {
    let mut session =
        Session::new(&Config::default(), MemoryStorage::default(), Some(99)).unwrap();
    session.start();
    session.advance(TICK * 10);
    session.exit();

    assert!(session.start());
    assert_eq!(session.state().progress, 0.0);
    let events = session.advance(LONGEST_RUN);
    assert_eq!(developed_count(&events), 1);
    assert_eq!(session.history().lifetime_count, 1);
}

#[test]
fn one_large_advance_runs_ticks_in_order() {
    let mut session =
        Session::new(&Config::default(), MemoryStorage::default(), Some(12)).unwrap();
    session.start();
    let events = session.advance(LONGEST_RUN);

    let progress: Vec<f64> = events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::Progress(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert!(progress.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(progress.last().copied(), Some(100.0));
    assert!(matches!(events.last(), Some(SessionEvent::Developed(_))));
}

#[test]
fn history_carries_over_between_sessions() {
    let dir = TempDir::new().unwrap();
    let config = Config::default();

    for seed in 0..12 {
        let mut session =
            Session::new(&config, FileStorage::new(dir.path()), Some(seed)).unwrap();
        assert_eq!(session.history().lifetime_count, seed);
        session.start();
        session.advance(LONGEST_RUN);
    }

    let session = Session::new(&config, FileStorage::new(dir.path()), None).unwrap();
    assert_eq!(session.history().lifetime_count, 12);
    assert_eq!(session.history().recent_draws.len(), 10);
}

#[test]
fn corrupt_save_file_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    std::fs::write(storage.path_for("darkroom-cat-photos"), "{ count: oops").unwrap();

    let mut session = Session::new(&Config::default(), storage, Some(3)).unwrap();
    assert_eq!(session.history().lifetime_count, 0);
    session.start();
    session.advance(LONGEST_RUN);
    assert_eq!(session.history().lifetime_count, 1);
}

#[test]
fn configured_thresholds_and_limit_are_honoured() {
    let config = Config {
        thresholds: RarityThresholds {
            legendary: 0.0,
            rare: 1.0,
        },
        history_limit: 3,
        ..Config::default()
    };
    let mut session = Session::new(&config, MemoryStorage::default(), Some(4)).unwrap();
    for _ in 0..5 {
        session.start();
        session.advance(LONGEST_RUN);
    }
    let history = session.history();
    assert_eq!(history.lifetime_count, 5);
    assert_eq!(history.recent_draws.len(), 3);
    assert!(history.recent_draws.iter().all(|i| i.rarity == Rarity::Rare));
}

#[test]
fn completion_fires_the_developed_cue_once() {
    let cues = SharedCues::default();
    let mut session = Session::with_catalog(
        &Config::default(),
        Catalog::builtin().clone(),
        MemoryStorage::default(),
        Some(17),
    )
    .unwrap()
    .with_cues(cues.clone());
    session.start();
    session.advance(LONGEST_RUN);

    let seen = cues.0.lock().unwrap();
    assert_eq!(seen.iter().filter(|c| **c == Cue::Developed).count(), 1);
    let bubbles = seen.iter().filter(|c| **c == Cue::Bubble).count();
    assert!(bubbles > 0, "a 25+ tick run should raise a bubble");
}
