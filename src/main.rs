mod app;
mod ui;

use std::fs::{self, OpenOptions};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use darkroom::config::Config;
use darkroom::contact::{ContactClient, ContactForm};
use darkroom::cues::{SilentCues, TerminalBell};
use darkroom::history::HistoryStore;
use darkroom::storage::{DisabledStorage, FileStorage, Storage};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::ui::draw;

#[derive(Parser)]
#[command(name = "darkroom")]
#[command(about = "Develop mysterious photos with Miso in the darkroom", long_about = None)]
struct Cli {
    /// TOML file overriding the default tuning
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding saved photos (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Log file for the interactive game
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Enter the darkroom (default)
    Play {
        /// Seed for reproducible development runs
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the camera intro
        #[arg(long)]
        no_intro: bool,
        /// Stay silent instead of ringing the terminal bell
        #[arg(long)]
        quiet: bool,
    },
    /// Print the saved photo history
    History,
    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

enum Event<I> {
    Input(I),
    Tick,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let storage = FileStorage::default_location();
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| storage.as_ref().map(|s| s.root().to_path_buf()));

    match cli.command.unwrap_or(Commands::Play {
        seed: None,
        no_intro: false,
        quiet: false,
    }) {
        Commands::Play {
            seed,
            no_intro,
            quiet,
        } => {
            match play_log_file(cli.log_file, data_dir.as_deref()) {
                Some(path) => init_file_logging(&path)?,
                // No data dir: log to stderr while the screen is still ordinary.
                None => init_stderr_logging(),
            }
            let storage = open_storage(data_dir);
            let mut app = if quiet {
                App::new(&config, storage, seed, SilentCues, no_intro)?
            } else {
                App::new(&config, storage, seed, TerminalBell, no_intro)?
            };
            let mut terminal = setup_terminal()?;
            let res = run_app(&mut terminal, &mut app, config.tick_interval());
            restore_terminal(&mut terminal)?;
            res
        }
        Commands::History => {
            init_stderr_logging();
            print_history(&config, open_storage(data_dir));
            Ok(())
        }
        Commands::Contact {
            name,
            email,
            message,
        } => {
            init_stderr_logging();
            let form = ContactForm {
                name,
                email,
                message,
            };
            ContactClient::new(config.contact_endpoint.as_str())?
                .submit(&form)
                .context("Submission failed")?;
            println!("Message sent. Thanks for reaching out!");
            Ok(())
        }
    }
}

fn play_log_file(log_file: Option<PathBuf>, data_dir: Option<&Path>) -> Option<PathBuf> {
    log_file.or_else(|| data_dir.map(|dir| dir.join("darkroom.log")))
}

fn open_storage(data_dir: Option<PathBuf>) -> Box<dyn Storage> {
    match data_dir {
        Some(dir) => Box::new(FileStorage::new(dir)),
        None => {
            log::warn!("no data directory available; photos will not be saved");
            Box::new(DisabledStorage)
        }
    }
}

fn print_history(config: &Config, storage: Box<dyn Storage>) {
    let mut store = HistoryStore::new(storage, config.storage_key.clone(), config.history_limit);
    let record = store.load();
    println!("Photos developed: {}", record.lifetime_count);
    if record.recent_draws.is_empty() {
        println!("The drying line is empty.");
        return;
    }
    for (idx, item) in record.recent_draws.iter().enumerate().rev() {
        println!(
            "{:>2}. {} {:<16} {:<10} {}",
            idx + 1,
            item.rarity.icon(),
            item.name,
            item.rarity,
            item.description
        );
    }
}

fn init_file_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn init_stderr_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let (tx, rx) = mpsc::channel();

    let input_tx = tx.clone();
    thread::spawn(move || {
        loop {
            if !event::poll(Duration::from_millis(250)).unwrap_or(false) {
                continue;
            }
            match event::read() {
                Ok(CEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if input_tx.send(Event::Input(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => {}
            }
        }
    });

    thread::spawn(move || {
        loop {
            if tx.send(Event::Tick).is_err() {
                break;
            }
            thread::sleep(tick_rate);
        }
    });

    loop {
        terminal.draw(|f| draw(f, app))?;

        match rx.recv()? {
            Event::Input(key) => {
                app.on_key(key);
            }
            Event::Tick => {
                app.on_tick(tick_rate);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
