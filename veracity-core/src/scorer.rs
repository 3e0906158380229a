//! Keyword credibility scorer
//!
//! Two fixed marker lists are matched as raw lowercase substrings against the
//! input. Each phrase counts at most once, however often it occurs, and
//! matches inside longer words count too ("secretary" hits "secret").
//!
//!   fake%     = round(100 × fake / (fake + reliable)), or 50 with no hits
//!   reliable% = 100 − fake%
//!
//! Classification on the reported (rounded) fake%:
//!   > 70        → FAKE, High
//!   41 ..= 70   → SUSPICIOUS, Medium
//!   <= 40       → RELIABLE, High

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::models::{CheckResult, Confidence, Status};

pub const FAKE_MARKERS: &[&str] = &[
    "urgent",
    "breaking",
    "shocking",
    "unbelievable",
    "miracle",
    "secret",
    "they don't want you to know",
];

pub const RELIABLE_MARKERS: &[&str] = &[
    "according to study",
    "research shows",
    "official report",
    "verified",
    "peer-reviewed",
];

/// Fake share reported when no marker matched at all.
pub const NEUTRAL_PERCENTAGE: u8 = 50;

const FAKE_THRESHOLD: u8 = 70;
const RELIABLE_THRESHOLD: u8 = 40;

const FAKE_REASONS: [&str; 3] = [
    "Contains sensationalist language",
    "Missing credible sources",
    "Uses emotional trigger words",
];

const RELIABLE_REASONS: [&str; 3] = [
    "Includes references to research/studies",
    "Uses measured language",
    "Mentions verifiable sources",
];

const MIXED_REASONS: [&str; 2] = ["Mixed indicators detected", "Requires further verification"];

// ============================================================================
// Pure scoring
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerCounts {
    pub fake: usize,
    pub reliable: usize,
}

impl MarkerCounts {
    pub fn total(&self) -> usize {
        self.fake + self.reliable
    }
}

/// Which phrases matched, for diagnostics. Does not affect the verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerMatches {
    pub fake: Vec<&'static str>,
    pub reliable: Vec<&'static str>,
}

impl MarkerMatches {
    pub fn counts(&self) -> MarkerCounts {
        MarkerCounts {
            fake: self.fake.len(),
            reliable: self.reliable.len(),
        }
    }
}

pub fn find_markers(text: &str) -> MarkerMatches {
    let lower = text.to_lowercase();
    let hits = |markers: &[&'static str]| -> Vec<&'static str> {
        markers
            .iter()
            .copied()
            .filter(|phrase| lower.contains(phrase))
            .collect()
    };
    MarkerMatches {
        fake: hits(FAKE_MARKERS),
        reliable: hits(RELIABLE_MARKERS),
    }
}

/// Rounded fake share, half rounding up, computed in integers.
pub fn fake_percentage(counts: MarkerCounts) -> u8 {
    let total = counts.total();
    if total == 0 {
        return NEUTRAL_PERCENTAGE;
    }
    let pct = (200 * counts.fake + total) / (2 * total);
    pct.min(100) as u8
}

pub fn classify(fake_percentage: u8) -> (Status, Confidence) {
    if fake_percentage > FAKE_THRESHOLD {
        (Status::Fake, Confidence::High)
    } else if fake_percentage > RELIABLE_THRESHOLD {
        (Status::Suspicious, Confidence::Medium)
    } else {
        (Status::Reliable, Confidence::High)
    }
}

/// Templated findings; they depend only on which side has more hits.
pub fn reasons(counts: MarkerCounts) -> Vec<String> {
    let template: &[&str] = if counts.fake > counts.reliable {
        &FAKE_REASONS
    } else if counts.reliable > counts.fake {
        &RELIABLE_REASONS
    } else {
        &MIXED_REASONS
    };
    template.iter().map(|r| r.to_string()).collect()
}

/// Score `text` as of `at`. Never fails.
pub fn evaluate(text: &str, at: DateTime<Utc>) -> CheckResult {
    let matches = find_markers(text);
    let counts = matches.counts();
    let fake = fake_percentage(counts);
    let (status, confidence) = classify(fake);

    tracing::debug!(
        "Scored {} chars: fake markers {:?}, reliable markers {:?} -> {}% fake ({})",
        text.chars().count(),
        matches.fake,
        matches.reliable,
        fake,
        status
    );

    CheckResult {
        status,
        confidence,
        fake_percentage: fake,
        reliable_percentage: 100 - fake,
        reasons: reasons(counts),
        timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

// ============================================================================
// Scorer service
// ============================================================================

/// Wraps [`evaluate`] with the artificial "remote call" latency.
#[derive(Clone)]
pub struct Scorer {
    clock: Arc<dyn Clock>,
    delay: Duration,
}

impl Scorer {
    pub fn new(clock: Arc<dyn Clock>, delay: Duration) -> Self {
        Self { clock, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub async fn check(&self, text: &str) -> CheckResult {
        self.clock.sleep(self.delay).await;
        evaluate(text, self.clock.now())
    }
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer").field("delay", &self.delay).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
