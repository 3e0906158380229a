use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict for a checked article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Fake,
    Suspicious,
    Reliable,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Fake => "FAKE",
            Status::Suspicious => "SUSPICIOUS",
            Status::Reliable => "RELIABLE",
        }
    }

    /// Badge colour used by the HTML view.
    pub fn color(&self) -> &'static str {
        match self {
            Status::Fake => "#ef4444",
            Status::Suspicious => "#f59e0b",
            Status::Reliable => "#10b981",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Low` is part of the vocabulary but the scorer never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub status: Status,
    pub confidence: Confidence,
    pub fake_percentage: u8,
    pub reliable_percentage: u8,
    pub reasons: Vec<String>,
    /// ISO-8601, UTC.
    pub timestamp: String,
}
