pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod render;
pub mod scorer;
pub mod storage;

pub use app::{App, AppState, Notice, PendingCheck};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::VeracityConfig;
pub use error::VeracityError;
pub use history::HistoryStore;
pub use models::{CheckResult, Confidence, HistoryItem, Status};
pub use scorer::Scorer;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
