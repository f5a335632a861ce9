pub mod accumulator;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod cues;
pub mod draw;
pub mod effects;
pub mod error;
pub mod floor;
pub mod history;
pub mod loader;
pub mod session;
pub mod storage;
pub mod theme;

pub use catalog::{Catalog, Rarity, RewardItem};
pub use config::Config;
pub use history::{HistoryRecord, HistoryStore};
pub use session::{Session, SessionEvent, SessionState};
