use crate::profile::CapabilityFlags;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// How anxious the user appears during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnxietyLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl AnxietyLevel {
    /// Starting level for a session. A declared anxiety need pins it high.
    pub fn baseline(flags: &CapabilityFlags) -> Self {
        if flags.has_anxiety {
            AnxietyLevel::High
        } else {
            AnxietyLevel::Low
        }
    }

    /// Raises the level if `observed` is higher. Levels never drop within a
    /// session.
    pub fn escalate(self, observed: AnxietyLevel) -> Self {
        self.max(observed)
    }
}

static MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:nervous|anxious|scared|panic(?:king)?|stressed|overwhelmed|sorry|i don'?t know|i'?m not sure|i guess|um+|uh+|er+m?)\b",
    )
    .expect("anxiety marker pattern is valid")
});

/// Counts hesitation and distress markers in an answer.
pub fn detect(answer: &str) -> AnxietyLevel {
    match MARKERS.find_iter(answer).count() {
        0 => AnxietyLevel::Low,
        1 => AnxietyLevel::Medium,
        _ => AnxietyLevel::High,
    }
}
