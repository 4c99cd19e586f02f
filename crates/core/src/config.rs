//! Session tunables.
//!
//! Runtimes may override these (the terminal service reads the question
//! count from its environment), but the defaults are what every adaptive
//! policy in the engine is calibrated against.

use crate::history::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};

/// Phrase spoken before the first question for anxious users.
pub const CALMING_PREFIX: &str = "Take a deep breath. There's no rush.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Questions drawn per session.
    pub question_count: usize,
    pub standard_timer_secs: u32,
    /// Per-question countdown for users with a declared anxiety need.
    pub anxious_timer_secs: u32,
    pub standard_speech_rate: f32,
    pub neurodivergent_speech_rate: f32,
    pub history_limit: usize,
    pub calming_prefix: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            question_count: 5,
            standard_timer_secs: 120,
            anxious_timer_secs: 300,
            standard_speech_rate: 0.9,
            neurodivergent_speech_rate: 0.8,
            history_limit: DEFAULT_HISTORY_LIMIT,
            calming_prefix: CALMING_PREFIX.to_string(),
        }
    }
}

impl SessionSettings {
    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count.max(1);
        self
    }

    pub fn timer_secs(&self, has_anxiety: bool) -> u32 {
        if has_anxiety {
            self.anxious_timer_secs
        } else {
            self.standard_timer_secs
        }
    }

    pub fn speech_rate(&self, has_neurodivergent: bool) -> f32 {
        if has_neurodivergent {
            self.neurodivergent_speech_rate
        } else {
            self.standard_speech_rate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults() {
        let settings = SessionSettings::default();
        assert_eq!(settings.question_count, 5);
        assert_eq!(settings.timer_secs(true), 300);
        assert_eq!(settings.timer_secs(false), 120);
        assert_eq!(settings.speech_rate(true), 0.8);
        assert_eq!(settings.speech_rate(false), 0.9);
    }

    #[test]
    fn test_question_count_is_at_least_one() {
        assert_eq!(SessionSettings::default().with_question_count(0).question_count, 1);
    }

    #[test]
    fn test_partial_settings_fill_from_defaults() {
        let settings: SessionSettings =
            serde_json::from_str(r#"{"question_count": 3}"#).unwrap();
        assert_eq!(settings.question_count, 3);
        assert_eq!(settings.anxious_timer_secs, 300);
    }
}
