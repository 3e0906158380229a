//! Application state and its update cycle.
//!
//! [`AppState::apply`] is a pure transition: it never touches storage or
//! time and reports side effects as a [`Command`]. [`App`] owns the state
//! together with the scorer and the history store and executes those commands.
//!
//! At most one check is in flight. That is guaranteed by the `loading` flag,
//! not by a lock, so callers may release any outer mutex while a
//! [`PendingCheck`] runs.

use std::sync::Arc;

use crate::clock::Clock;
use crate::config::VeracityConfig;
use crate::error::{Result, VeracityError};
use crate::history::HistoryStore;
use crate::models::{CheckResult, HistoryItem};
use crate::scorer::Scorer;
use crate::storage::KeyValueStore;

// ============================================================================
// State machine
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetInput(String),
    /// Clears the input and the displayed result. History is kept.
    ClearInput,
    Submit,
    /// Submit the given text. The input is replaced only when the check is
    /// admitted.
    SubmitText(String),
    CheckSucceeded(CheckResult),
    CheckFailed(String),
    ClearHistory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RunCheck(String),
    RecordHistory { text: String, result: CheckResult },
    ClearHistory,
}

/// User-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    EmptyInput,
    Busy,
    CheckFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::EmptyInput => "Please enter an article to check",
            Notice::Busy => "A check is already in progress",
            Notice::CheckFailed => "An error occurred. Please try again.",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<Notice> for VeracityError {
    fn from(notice: Notice) -> Self {
        match notice {
            Notice::EmptyInput => VeracityError::EmptyInput,
            Notice::Busy => VeracityError::Busy,
            Notice::CheckFailed => VeracityError::CheckFailed,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transition {
    pub command: Option<Command>,
    pub notice: Option<Notice>,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }

    fn command(command: Command) -> Self {
        Self {
            command: Some(command),
            notice: None,
        }
    }

    fn notice(notice: Notice) -> Self {
        Self {
            command: None,
            notice: Some(notice),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AppState {
    pub input: String,
    pub result: Option<CheckResult>,
    pub loading: bool,
    /// Text of the check in flight; history records this, not later edits.
    in_flight: Option<String>,
}

impl AppState {
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    pub fn apply(&mut self, action: Action) -> Transition {
        match action {
            Action::SetInput(text) => {
                self.input = text;
                Transition::none()
            }
            Action::ClearInput => {
                self.input.clear();
                self.result = None;
                Transition::none()
            }
            Action::Submit => {
                let text = self.input.clone();
                self.admit(text)
            }
            Action::SubmitText(text) => self.admit(text),
            Action::CheckSucceeded(result) => {
                let Some(text) = self.in_flight.take() else {
                    return Transition::none();
                };
                self.loading = false;
                self.result = Some(result.clone());
                Transition::command(Command::RecordHistory { text, result })
            }
            Action::CheckFailed(_) => {
                self.loading = false;
                self.in_flight = None;
                Transition::notice(Notice::CheckFailed)
            }
            Action::ClearHistory => Transition::command(Command::ClearHistory),
        }
    }

    fn admit(&mut self, text: String) -> Transition {
        if text.trim().is_empty() {
            return Transition::notice(Notice::EmptyInput);
        }
        if self.loading {
            return Transition::notice(Notice::Busy);
        }
        self.loading = true;
        self.input = text.clone();
        self.in_flight = Some(text.clone());
        Transition::command(Command::RunCheck(text))
    }
}

// ============================================================================
// Controller
// ============================================================================

/// A check that has been admitted and can run without borrowing the [`App`].
#[derive(Debug, Clone)]
pub struct PendingCheck {
    text: String,
    scorer: Scorer,
}

impl PendingCheck {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Run on its own task so a panic becomes an `Err` rather than leaving
    /// the app stuck in `loading`.
    pub async fn run(self) -> std::result::Result<CheckResult, String> {
        let scorer = self.scorer;
        let text = self.text;
        tokio::spawn(async move { scorer.check(&text).await })
            .await
            .map_err(|e| e.to_string())
    }
}

pub struct App {
    state: AppState,
    history: HistoryStore,
    scorer: Scorer,
}

impl App {
    pub fn new(scorer: Scorer, history: HistoryStore) -> Self {
        Self {
            state: AppState::default(),
            history,
            scorer,
        }
    }

    /// Build from config: scorer delay, history slot and capacity. The
    /// history is loaded immediately.
    pub fn from_config(
        config: &VeracityConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let history = HistoryStore::load(
            store,
            config.storage.history_key.clone(),
            config.history.capacity,
        )?;
        let scorer = Scorer::new(clock, config.scorer.delay());
        Ok(Self::new(scorer, history))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn history(&self) -> &[HistoryItem] {
        self.history.items()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.apply(Action::SetInput(text.into()));
    }

    pub fn clear_input(&mut self) {
        self.state.apply(Action::ClearInput);
    }

    /// Admit a check for the current input.
    pub fn begin_check(&mut self) -> std::result::Result<PendingCheck, Notice> {
        self.start_check(Action::Submit)
    }

    /// Admit a check for `text`. A rejected submit leaves the input as it was.
    pub fn begin_check_with(
        &mut self,
        text: impl Into<String>,
    ) -> std::result::Result<PendingCheck, Notice> {
        self.start_check(Action::SubmitText(text.into()))
    }

    fn start_check(&mut self, submit: Action) -> std::result::Result<PendingCheck, Notice> {
        let transition = self.state.apply(submit);
        match (transition.command, transition.notice) {
            (Some(Command::RunCheck(text)), _) => {
                tracing::info!("Check started ({} chars)", text.chars().count());
                Ok(PendingCheck {
                    text,
                    scorer: self.scorer.clone(),
                })
            }
            (_, Some(notice)) => Err(notice),
            _ => Err(Notice::CheckFailed),
        }
    }

    /// Complete the check admitted by [`App::begin_check`]. Loading is
    /// cleared on every path.
    pub fn finish_check(
        &mut self,
        outcome: std::result::Result<CheckResult, String>,
    ) -> std::result::Result<CheckResult, Notice> {
        match outcome {
            Ok(result) => {
                let transition = self.state.apply(Action::CheckSucceeded(result.clone()));
                if let Some(command) = transition.command {
                    // The in-memory history already has the item.
                    if let Err(e) = self.execute(command) {
                        tracing::error!("Failed to persist history: {}", e);
                    }
                }
                tracing::info!(
                    "Check finished: {} ({}% fake, confidence {})",
                    result.status,
                    result.fake_percentage,
                    result.confidence
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!("Error detecting fake news: {}", e);
                let transition = self.state.apply(Action::CheckFailed(e));
                Err(transition.notice.unwrap_or(Notice::CheckFailed))
            }
        }
    }

    /// Admit, run and finish a check in one call.
    pub async fn submit(&mut self) -> std::result::Result<CheckResult, Notice> {
        let pending = self.begin_check()?;
        let outcome = pending.run().await;
        self.finish_check(outcome)
    }

    /// Empty the history and remove its storage slot.
    pub fn clear_history(&mut self) -> Result<()> {
        let transition = self.state.apply(Action::ClearHistory);
        match transition.command {
            Some(command) => self.execute(command),
            None => Ok(()),
        }
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::RecordHistory { text, result } => {
                let clock = self.scorer.clock().clone();
                self.history.append(&text, result, clock.as_ref())
            }
            Command::ClearHistory => {
                self.history.clear()?;
                tracing::info!("History cleared");
                Ok(())
            }
            Command::RunCheck(_) => Ok(()),
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("scorer", &self.scorer)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
