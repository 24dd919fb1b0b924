//! Per-session mode state.
//!
//! DESIGN
//! ======
//! "An option was selected" and "which option" are one field,
//! `mode: Option<Mode>`, so the two can never disagree. The follow-up timer
//! handle lives next to the answered latch because the controller arms and
//! clears them together.

use std::fmt;
use std::str::FromStr;

use super::timer::TimerHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Ask,
    Survey,
    Report,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::Survey => "survey",
            Self::Report => "report",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown option '{0}'")]
pub struct ModeParseError(pub String);

impl FromStr for Mode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ask" => Ok(Self::Ask),
            "survey" => Ok(Self::Survey),
            "report" => Ok(Self::Report),
            _ => Err(ModeParseError(s.to_string())),
        }
    }
}

/// Mutable session state owned by the controller.
#[derive(Debug, Default)]
pub struct SessionState {
    mode: Option<Mode>,
    survey_followup_answered: bool,
    pending_followup: Option<TimerHandle>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    #[must_use]
    pub fn option_selected(&self) -> bool {
        self.mode.is_some()
    }

    #[must_use]
    pub fn survey_followup_answered(&self) -> bool {
        self.survey_followup_answered
    }

    #[must_use]
    pub fn pending_followup(&self) -> Option<&TimerHandle> {
        self.pending_followup.as_ref()
    }

    /// Record the first selection. Returns `false` if a mode was already set.
    pub fn select(&mut self, mode: Mode) -> bool {
        if self.mode.is_some() {
            return false;
        }
        self.mode = Some(mode);
        true
    }

    /// Arm the follow-up timer, cancelling any previous one.
    pub fn arm_followup(&mut self, handle: TimerHandle) {
        if let Some(old) = self.pending_followup.replace(handle) {
            old.cancel();
        }
    }

    /// Drop the follow-up handle after its event was delivered.
    ///
    /// Returns `true` only if `token` matches the armed handle.
    pub fn take_followup(&mut self, token: super::timer::TimerToken) -> bool {
        if self.pending_followup.as_ref().map(TimerHandle::token) == Some(token) {
            self.pending_followup = None;
            true
        } else {
            false
        }
    }

    /// Latch the follow-up as answered and cancel its timer.
    ///
    /// Returns `false` if it was already answered.
    pub fn answer_followup(&mut self) -> bool {
        if self.survey_followup_answered {
            return false;
        }
        self.survey_followup_answered = true;
        if let Some(handle) = self.pending_followup.take() {
            handle.cancel();
        }
        true
    }

    /// True while Survey mode still waits for a yes/no.
    #[must_use]
    pub fn awaiting_followup(&self) -> bool {
        self.mode == Some(Mode::Survey) && !self.survey_followup_answered
    }

    /// Return to the initial state, cancelling any pending timer.
    pub fn reset(&mut self) {
        if let Some(handle) = self.pending_followup.take() {
            handle.cancel();
        }
        self.mode = None;
        self.survey_followup_answered = false;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
