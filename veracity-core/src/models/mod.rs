pub mod history;
pub mod result;

pub use history::HistoryItem;
pub use result::{CheckResult, Confidence, Status};
