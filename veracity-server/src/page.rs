//! Server-rendered single page: input form, result card and history list.
//!
//! No client-side script. The form posts back and the server redirects to
//! `/`, so reloads never resubmit a check.

use std::fmt::Write as _;

use veracity_core::render::{DISCLAIMER, TIPS};
use veracity_core::{AppState, CheckResult, HistoryItem, Notice};

pub struct PageView<'a> {
    pub state: &'a AppState,
    pub history: &'a [HistoryItem],
    pub notice: Option<Notice>,
}

/// Query-string code for a notice carried across the post/redirect.
pub fn notice_code(notice: Notice) -> &'static str {
    match notice {
        Notice::EmptyInput => "empty_input",
        Notice::Busy => "busy",
        Notice::CheckFailed => "check_failed",
    }
}

pub fn notice_from_code(code: &str) -> Option<Notice> {
    match code {
        "empty_input" => Some(Notice::EmptyInput),
        "busy" => Some(Notice::Busy),
        "check_failed" => Some(Notice::CheckFailed),
        _ => None,
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:860px;margin:0 auto;padding:1rem;color:#111827}\
header{text-align:center}textarea{width:100%;box-sizing:border-box}\
.char-count{text-align:right;color:#6b7280;font-size:.85rem}\
.notice{background:#fef3c7;border:1px solid #f59e0b;padding:.5rem 1rem;border-radius:6px}\
.status-header{color:#fff;padding:.75rem 1rem;border-radius:6px 6px 0 0;display:flex;justify-content:space-between}\
.bar-container{display:flex;height:28px;border-radius:4px;overflow:hidden;color:#fff;font-size:.85rem}\
.fake-bar{background:#ef4444;text-align:center}.reliable-bar{background:#10b981;text-align:center}\
.score-labels{display:flex;justify-content:space-between}\
.history-item{border-bottom:1px solid #e5e7eb;padding:.5rem 0}\
.status-badge{color:#fff;padding:.1rem .5rem;border-radius:4px;font-size:.8rem;margin-right:.5rem}\
.history-date{color:#6b7280;font-size:.8rem}footer{margin-top:2rem;color:#6b7280;font-size:.85rem;text-align:center}";

pub fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>Fake News Detector</title><style>{}</style>{}</head><body>",
        STYLE,
        if view.state.loading {
            "<meta http-equiv=\"refresh\" content=\"1\">"
        } else {
            ""
        }
    );
    html.push_str(
        "<header><h1>Fake News Detector</h1>\
<p>Check the credibility of news articles using AI analysis</p></header><main>",
    );

    if let Some(notice) = view.notice {
        let _ = write!(html, "<p class=\"notice\" role=\"alert\">{}</p>", escape_html(notice.message()));
    }

    render_input(&mut html, view.state);

    if let Some(result) = &view.state.result {
        render_result(&mut html, result);
    }

    if !view.history.is_empty() {
        render_history(&mut html, view.history);
    }

    let _ = write!(
        html,
        "</main><footer><p>Disclaimer: {}</p></footer></body></html>",
        escape_html(DISCLAIMER)
    );
    html
}

fn render_input(html: &mut String, state: &AppState) {
    let _ = write!(
        html,
        "<section class=\"input-section\"><h2>Enter Article Text</h2>\
<form method=\"post\" action=\"/check\">\
<textarea name=\"article\" rows=\"10\" placeholder=\"Paste the article text here to check for fake news...\">{}</textarea>\
<div class=\"char-count\">{} characters</div>\
<button type=\"submit\" class=\"check-button\"{}>{}</button>\
<button type=\"submit\" class=\"clear-button\" formaction=\"/clear\">Clear</button>\
</form></section>",
        escape_html(&state.input),
        state.char_count(),
        if state.loading { " disabled" } else { "" },
        if state.loading { "Analyzing..." } else { "Check Article" },
    );
}

fn render_result(html: &mut String, result: &CheckResult) {
    let _ = write!(
        html,
        "<section class=\"result-section\"><h2>Analysis Results</h2>\
<div class=\"status-header\" style=\"background-color:{}\">\
<h3>Status: {}</h3><span class=\"confidence\">Confidence: {}</span></div>\
<div class=\"score-labels\"><span>Fake</span><span>Reliable</span></div>\
<div class=\"bar-container\">\
<div class=\"fake-bar\" style=\"width:{}%\">{}%</div>\
<div class=\"reliable-bar\" style=\"width:{}%\">{}%</div></div>\
<h4>Key Findings:</h4><ul>",
        result.status.color(),
        result.status,
        result.confidence,
        result.fake_percentage,
        result.fake_percentage,
        result.reliable_percentage,
        result.reliable_percentage,
    );
    for reason in &result.reasons {
        let _ = write!(html, "<li>{}</li>", escape_html(reason));
    }
    html.push_str("</ul><h4>Tips for Spotting Fake News:</h4><ul>");
    for tip in TIPS {
        let _ = write!(html, "<li>{}</li>", tip);
    }
    html.push_str("</ul></section>");
}

fn render_history(html: &mut String, history: &[HistoryItem]) {
    html.push_str(
        "<section class=\"history-section\"><h2>Recent Checks</h2>\
<form method=\"post\" action=\"/history/clear\">\
<button type=\"submit\" class=\"clear-history-button\">Clear History</button></form>\
<div class=\"history-list\">",
    );
    for item in history {
        let _ = write!(
            html,
            "<div class=\"history-item\" id=\"check-{}\">\
<div class=\"history-snippet\">{}</div>\
<div class=\"history-result\"><span class=\"status-badge\" style=\"background-color:{}\">{}</span>\
<span class=\"history-date\">{}</span></div></div>",
            item.id,
            escape_html(&item.snippet),
            item.result.status.color(),
            item.result.status,
            escape_html(&item.date),
        );
    }
    html.push_str("</div></section>");
}
