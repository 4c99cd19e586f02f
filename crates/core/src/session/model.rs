use crate::anxiety::AnxietyLevel;
use crate::catalog::Mode;
use crate::channels::ChannelStates;
use crate::evaluator::EvaluationResult;
use crate::timer::CountdownTimer;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The live session aggregate. Only the engine mutates it.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    /// The mode the user picked at start.
    pub mode: Mode,
    pub industry: String,
    pub questions: Vec<String>,
    /// Mode each slot in `questions` was resolved under.
    pub question_modes: Vec<Mode>,
    pub current_index: usize,
    pub answers: Vec<String>,
    pub draft: String,
    pub feedback: Option<EvaluationResult>,
    pub paused: bool,
    pub retry_count: u32,
    pub timer: CountdownTimer,
    pub anxiety: AnxietyLevel,
    pub started_at: DateTime<Utc>,
    pub paused_at: Option<DateTime<Utc>>,
}

impl InterviewSession {
    pub fn current_question(&self) -> &str {
        self.questions
            .get(self.current_index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn current_mode(&self) -> &Mode {
        self.question_modes
            .get(self.current_index)
            .unwrap_or(&self.mode)
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    pub fn feedback_shown(&self) -> bool {
        self.feedback.is_some()
    }

    /// Answering, unpaused, no feedback showing: the only phase in which
    /// channels may run and the timer may tick.
    pub fn is_live(&self) -> bool {
        !self.paused && !self.feedback_shown()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.paused {
            SessionPhase::Paused
        } else if self.feedback_shown() {
            SessionPhase::ShowingFeedback
        } else {
            SessionPhase::Answering
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Answering,
    Paused,
    ShowingFeedback,
}

/// Read model handed to renderers after every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub effective_mode: Mode,
    pub industry: String,
    pub question: String,
    pub index: usize,
    pub total: usize,
    pub remaining_secs: u32,
    pub timer_secs: u32,
    pub paused: bool,
    pub phase: SessionPhase,
    pub draft: String,
    pub interim_transcript: String,
    pub feedback: Option<EvaluationResult>,
    pub retry_count: u32,
    pub answers_submitted: usize,
    pub anxiety: AnxietyLevel,
    pub channels: ChannelStates,
    /// Show the sign-language avatar and captions.
    pub sign_language_avatar: bool,
    pub simplified_language: bool,
}

/// What `next_question` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOutcome {
    /// Paused or no session.
    Ignored,
    Advanced(usize),
    Completed,
}
