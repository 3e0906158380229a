use serde::{Deserialize, Serialize};

use super::CheckResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Milliseconds since the epoch at creation, unique within a history.
    pub id: i64,
    pub snippet: String,
    pub result: CheckResult,
    /// Human-readable local time of the check.
    pub date: String,
}
