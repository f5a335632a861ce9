//! Cosmetic development bubbles. Nothing in the simulation reads these back,
//! so a dropped bubble is never a correctness problem.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const BUBBLE_LIFETIME: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

/// Endless source of bubbles at random positions. Build a fresh one to
/// restart the sequence.
#[derive(Debug, Clone)]
pub struct BubbleStream {
    rng: SmallRng,
    next_id: u64,
}

impl BubbleStream {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            next_id: 0,
        }
    }
}

impl Iterator for BubbleStream {
    type Item = Bubble;

    fn next(&mut self) -> Option<Bubble> {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        Some(Bubble {
            id,
            x: self.rng.gen_range(50.0..350.0),
            y: self.rng.gen_range(100.0..300.0),
        })
    }
}

#[derive(Debug, Clone)]
struct LiveBubble {
    bubble: Bubble,
    age: Duration,
}

/// Bubbles currently on screen.
#[derive(Debug, Default, Clone)]
pub struct BubbleField {
    live: Vec<LiveBubble>,
}

impl BubbleField {
    pub fn spawn(&mut self, bubble: Bubble) {
        self.live.push(LiveBubble {
            bubble,
            age: Duration::ZERO,
        });
    }

    pub fn advance(&mut self, dt: Duration) {
        for live in &mut self.live {
            live.age += dt;
        }
        self.live.retain(|live| live.age < BUBBLE_LIFETIME);
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Bubbles with how far they have risen, `0.0` fresh to `1.0` gone.
    pub fn iter(&self) -> impl Iterator<Item = (&Bubble, f64)> {
        self.live.iter().map(|live| {
            let rise = live.age.as_secs_f64() / BUBBLE_LIFETIME.as_secs_f64();
            (&live.bubble, rise.clamp(0.0, 1.0))
        })
    }
}
