use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};

use darkroom::config::Config;
use darkroom::cues::{Cue, CueSink};
use darkroom::effects::BubbleField;
use darkroom::floor::{Floor, Step};
use darkroom::loader::LoaderSequence;
use darkroom::session::{DevelopedFrame, Session, SessionEvent};
use darkroom::storage::Storage;
use darkroom::theme::Theme;

const MAX_MESSAGES: usize = 5;
const HAPPY_FOR: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneFocus {
    Station,
    Floor,
    Line,
}

impl PaneFocus {
    fn next(self) -> Self {
        match self {
            PaneFocus::Station => PaneFocus::Floor,
            PaneFocus::Floor => PaneFocus::Line,
            PaneFocus::Line => PaneFocus::Station,
        }
    }

    fn prev(self) -> Self {
        match self {
            PaneFocus::Station => PaneFocus::Line,
            PaneFocus::Floor => PaneFocus::Station,
            PaneFocus::Line => PaneFocus::Floor,
        }
    }
}

pub enum Screen {
    Loading(LoaderSequence),
    Lobby,
    Darkroom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatMood {
    Idle,
    Working,
    Happy { left: Duration },
}

impl CatMood {
    pub fn caption(self) -> &'static str {
        match self {
            CatMood::Idle => "Miso is ready to help",
            CatMood::Working => "Miso is developing...",
            CatMood::Happy { .. } => "Miso found something special!",
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub focus: PaneFocus,
    pub should_quit: bool,
    pub session: Session<Box<dyn Storage>>,
    pub floor: Floor,
    pub bubbles: BubbleField,
    pub mood: CatMood,
    pub theme: Theme,
    pub latest: Option<DevelopedFrame>,
    pub line_selected: usize,
    pub messages: VecDeque<String>,
    cues: Box<dyn CueSink>,
}

impl App {
    pub fn new(
        config: &Config,
        storage: Box<dyn Storage>,
        seed: Option<u64>,
        cues: impl CueSink + Clone + 'static,
        skip_intro: bool,
    ) -> Result<Self> {
        let session = Session::new(config, storage, seed)?.with_cues(cues.clone());
        let mut loader = LoaderSequence::new();
        if skip_intro {
            loader.skip();
        }
        let screen = if loader.is_finished() {
            Screen::Lobby
        } else {
            Screen::Loading(loader)
        };

        Ok(Self {
            screen,
            focus: PaneFocus::Station,
            should_quit: false,
            session,
            floor: Floor::default(),
            bubbles: BubbleField::default(),
            mood: CatMood::Idle,
            theme: Theme::default(),
            latest: None,
            line_selected: 0,
            messages: VecDeque::new(),
            cues: Box::new(cues),
        })
    }

    pub fn on_tick(&mut self, dt: Duration) {
        if let Screen::Loading(loader) = &mut self.screen {
            if loader.advance(dt, self.cues.as_mut()) {
                self.screen = Screen::Lobby;
            }
            return;
        }
        if !matches!(self.screen, Screen::Darkroom) {
            return;
        }

        self.bubbles.advance(dt);
        if let CatMood::Happy { left } = self.mood {
            self.mood = match left.checked_sub(dt) {
                Some(left) if !left.is_zero() => CatMood::Happy { left },
                _ => CatMood::Idle,
            };
        }
        for event in self.session.advance(dt) {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Progress(_) => {}
            SessionEvent::Bubble(bubble) => self.bubbles.spawn(bubble),
            SessionEvent::Developed(frame) => {
                let timestamp = frame.developed_at.with_timezone(&Local).format("%H:%M:%S");
                self.push_message(format!(
                    "{timestamp} {} developed: {} ({})",
                    frame.frame_id, frame.item.name, frame.item.rarity
                ));
                self.mood = CatMood::Happy { left: HAPPY_FOR };
                self.line_selected = frame.history.recent_draws.len().saturating_sub(1);
                self.latest = Some(*frame);
            }
        }
    }

    fn push_message(&mut self, msg: impl Into<String>) {
        self.messages.push_front(msg.into());
        while self.messages.len() > MAX_MESSAGES {
            self.messages.pop_back();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q' | 'Q') => {
                self.leave_darkroom();
                self.should_quit = true;
                return;
            }
            KeyCode::Char('d' | 'D') => {
                self.theme = self.theme.toggled();
                return;
            }
            _ => {}
        }

        match self.screen {
            Screen::Loading(_) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.screen = Screen::Lobby;
                }
            }
            Screen::Lobby => {
                if key.code == KeyCode::Enter {
                    self.enter_darkroom();
                }
            }
            Screen::Darkroom => self.handle_darkroom_input(key),
        }
    }

    fn enter_darkroom(&mut self) {
        self.screen = Screen::Darkroom;
        self.focus = PaneFocus::Station;
        self.cues.cue(Cue::AmbienceStart);
        self.push_message("Entered the darkroom");
    }

    fn leave_darkroom(&mut self) {
        if !matches!(self.screen, Screen::Darkroom) {
            return;
        }
        self.session.exit();
        self.bubbles.clear();
        self.mood = CatMood::Idle;
        self.latest = None;
        self.cues.cue(Cue::AmbienceStop);
        self.screen = Screen::Lobby;
    }

    fn handle_darkroom_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('x' | 'X') => self.leave_darkroom(),
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            _ => match self.focus {
                PaneFocus::Station => self.handle_station_input(key),
                PaneFocus::Floor => self.handle_floor_input(key),
                PaneFocus::Line => self.handle_line_input(key),
            },
        }
    }

    fn handle_station_input(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ' | 'p' | 'P')) {
            self.start_developing();
        }
    }

    fn start_developing(&mut self) {
        if self.session.start() {
            self.mood = CatMood::Working;
            self.latest = None;
            self.push_message("Developing a new frame...");
        }
    }

    fn handle_floor_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.floor.step(Step::Up),
            KeyCode::Down => self.floor.step(Step::Down),
            KeyCode::Left => self.floor.step(Step::Left),
            KeyCode::Right => self.floor.step(Step::Right),
            KeyCode::Char(' ') => {
                if let Some(id) = self.floor.develop_here() {
                    self.push_message(format!("Tray {id} rinsed and hung to dry"));
                }
            }
            _ => {}
        }
    }

    fn handle_line_input(&mut self, key: KeyEvent) {
        let len = self.session.history().recent_draws.len();
        if len == 0 {
            return;
        }
        match key.code {
            KeyCode::Left | KeyCode::Up => {
                self.line_selected = self.line_selected.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Down => {
                self.line_selected = (self.line_selected + 1).min(len - 1);
            }
            _ => {}
        }
    }
}

pub fn format_progress(progress: f64) -> String {
    format!("{:.0}%", progress.floor().clamp(0.0, 100.0))
}
