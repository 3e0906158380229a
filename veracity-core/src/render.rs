//! Plain-text rendering of results and history, plus the static copy shared
//! with the HTML page.

use std::fmt::Write as _;

use crate::models::{CheckResult, HistoryItem};

pub const TIPS: [&str; 5] = [
    "Check the source credibility",
    "Look for supporting evidence",
    "Verify with fact-checking websites",
    "Be wary of emotional language",
    "Check the publication date",
];

pub const DISCLAIMER: &str = "This tool uses AI for preliminary analysis. \
Always verify information through multiple credible sources.";

/// Width of the text percentage bar in cells.
pub const BAR_WIDTH: usize = 40;

/// Two-segment bar: `#` cells for the fake share, `-` for the reliable share.
pub fn percentage_bar(fake_percentage: u8, width: usize) -> String {
    let fake = fake_percentage.min(100) as usize;
    let fake_cells = (fake * width + 50) / 100;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    bar.extend(std::iter::repeat('#').take(fake_cells));
    bar.extend(std::iter::repeat('-').take(width - fake_cells));
    bar.push(']');
    bar
}

pub fn result_report(result: &CheckResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Status: {}", result.status);
    let _ = writeln!(out, "Confidence: {}", result.confidence);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Fake {:>3}% {} {:>3}% Reliable",
        result.fake_percentage,
        percentage_bar(result.fake_percentage, BAR_WIDTH),
        result.reliable_percentage
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Key Findings:");
    for reason in &result.reasons {
        let _ = writeln!(out, "  - {}", reason);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Tips for Spotting Fake News:");
    for tip in TIPS {
        let _ = writeln!(out, "  - {}", tip);
    }
    out
}

pub fn history_report(items: &[HistoryItem]) -> String {
    if items.is_empty() {
        return "No recent checks.\n".to_string();
    }
    let mut out = String::from("Recent Checks:\n");
    for item in items {
        let _ = writeln!(
            out,
            "[{:<10}] {}  {}",
            item.result.status.as_str(),
            item.date,
            item.snippet
        );
    }
    out
}
