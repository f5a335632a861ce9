pub const FLOOR_WIDTH: usize = 10;
pub const FLOOR_HEIGHT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tray {
    pub id: u8,
    pub at: Position,
    pub developed: bool,
}

/// The darkroom floor Miso walks around on.
#[derive(Debug, Clone)]
pub struct Floor {
    pub cat: Position,
    pub trays: Vec<Tray>,
}

impl Default for Floor {
    fn default() -> Self {
        Self {
            cat: Position { x: 0, y: 0 },
            trays: vec![
                Tray {
                    id: 1,
                    at: Position { x: 3, y: 2 },
                    developed: false,
                },
                Tray {
                    id: 2,
                    at: Position { x: 6, y: 5 },
                    developed: false,
                },
            ],
        }
    }
}

impl Floor {
    pub fn step(&mut self, step: Step) {
        let Position { x, y } = self.cat;
        self.cat = match step {
            Step::Up => Position {
                x,
                y: y.saturating_sub(1),
            },
            Step::Down => Position {
                x,
                y: (y + 1).min(FLOOR_HEIGHT - 1),
            },
            Step::Left => Position {
                x: x.saturating_sub(1),
                y,
            },
            Step::Right => Position {
                x: (x + 1).min(FLOOR_WIDTH - 1),
                y,
            },
        };
    }

    /// True when the cat stands on a tray that still needs developing.
    pub fn near_tray(&self) -> bool {
        self.trays
            .iter()
            .any(|tray| tray.at == self.cat && !tray.developed)
    }

    /// Develops the tray under the cat. Returns its id if anything changed.
    pub fn develop_here(&mut self) -> Option<u8> {
        let cat = self.cat;
        let tray = self
            .trays
            .iter_mut()
            .find(|tray| tray.at == cat && !tray.developed)?;
        tray.developed = true;
        Some(tray.id)
    }

    pub fn tray_at(&self, at: Position) -> Option<&Tray> {
        self.trays.iter().find(|tray| tray.at == at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cat_stays_on_the_floor() {
        let mut floor = Floor::default();
        floor.step(Step::Up);
        floor.step(Step::Left);
        assert_eq!(floor.cat, Position { x: 0, y: 0 });

        for _ in 0..20 {
            floor.step(Step::Right);
            floor.step(Step::Down);
        }
        assert_eq!(
            floor.cat,
            Position {
                x: FLOOR_WIDTH - 1,
                y: FLOOR_HEIGHT - 1
            }
        );
    }

    #[test]
    fn developing_a_tray_only_works_once() {
        let mut floor = Floor::default();
        assert_eq!(floor.develop_here(), None);

        for _ in 0..3 {
            floor.step(Step::Right);
        }
        floor.step(Step::Down);
        floor.step(Step::Down);
        assert!(floor.near_tray());
        assert_eq!(floor.develop_here(), Some(1));
        assert!(!floor.near_tray());
        assert_eq!(floor.develop_here(), None);
        assert!(floor.tray_at(Position { x: 3, y: 2 }).unwrap().developed);
    }
}
