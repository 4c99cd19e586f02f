//! Heuristic answer scoring and feedback composition.
//!
//! Scoring is additive over the signals found in the answer and does not
//! depend on the user's flags, with one carve-out: emotional language earns
//! nothing for speech-impaired users. Feedback wording does depend on the
//! flags.

use crate::profile::CapabilityFlags;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const BASE_SCORE: i32 = 50;
pub const STAR_WEIGHT: i32 = 15;
pub const QUANTIFIED_WEIGHT: i32 = 15;
pub const SPECIFIC_EXAMPLE_WEIGHT: i32 = 10;
pub const FOCUSED_LENGTH_WEIGHT: i32 = 10;
pub const COMPREHENSIVE_LENGTH_WEIGHT: i32 = 5;
pub const EMOTIONAL_WEIGHT: i32 = 5;
pub const VERY_SHORT_PENALTY: i32 = -10;

// Past tense only: "-eed" present forms (need, proceed, succeed) don't count.
static STAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:i|we)\s+(?:\w+[^e\W]ed|agreed|led|built|made|took|ran|was|were|had|did|wrote|drove|chose|found|gave|got|taught|spoke|brought|set|began|won|met|became|kept|held|sold|grew|thought|knew|told|went|stepped)\b|\bwhen i\b|\bin my (?:last|previous) (?:job|role|position)\b",
    )
    .expect("STAR pattern is valid")
});

static QUANTIFIED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d|\bpercent\b|\b(?:increased|reduced|decreased|saved|improved|grew|doubled|tripled|cut|boosted|raised|lowered|halved)\b",
    )
    .expect("quantification pattern is valid")
});

static SPECIFIC_EXAMPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:projects?|teams?|customers?|clients?|stakeholders?|users?|products?|systems?)\b")
        .expect("specific example pattern is valid")
});

static EMOTIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:feel|feels|felt|feeling|proud|passionate|excited|enjoy|enjoyed|love|loved|motivated|grateful|inspired)\b",
    )
    .expect("emotional language pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthBand {
    VeryShort,
    Short,
    Focused,
    Comprehensive,
}

impl LengthBand {
    pub fn of(text: &str) -> Self {
        match text.trim().chars().count() {
            0..30 => LengthBand::VeryShort,
            30..50 => LengthBand::Short,
            50..200 => LengthBand::Focused,
            _ => LengthBand::Comprehensive,
        }
    }

    fn weight(&self) -> i32 {
        match self {
            LengthBand::VeryShort => VERY_SHORT_PENALTY,
            LengthBand::Short => 0,
            LengthBand::Focused => FOCUSED_LENGTH_WEIGHT,
            LengthBand::Comprehensive => COMPREHENSIVE_LENGTH_WEIGHT,
        }
    }
}

/// What the evaluator found in an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signals {
    pub star: bool,
    pub quantified: bool,
    pub specific_example: bool,
    pub emotional: bool,
    pub length: LengthBand,
}

impl Signals {
    pub fn detect(answer: &str) -> Self {
        Self {
            star: STAR.is_match(answer),
            quantified: QUANTIFIED.is_match(answer),
            specific_example: SPECIFIC_EXAMPLE.is_match(answer),
            emotional: EMOTIONAL.is_match(answer),
            length: LengthBand::of(answer),
        }
    }

    pub fn score(&self, flags: &CapabilityFlags) -> u8 {
        let mut score = BASE_SCORE + self.length.weight();
        if self.star {
            score += STAR_WEIGHT;
        }
        if self.quantified {
            score += QUANTIFIED_WEIGHT;
        }
        if self.specific_example {
            score += SPECIFIC_EXAMPLE_WEIGHT;
        }
        if self.emotional && !flags.has_speech_impairment {
            score += EMOTIONAL_WEIGHT;
        }
        score.clamp(0, 100) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub score: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

pub const STRENGTH_STAR: &str = "Good use of the STAR method to structure your answer.";
pub const STRENGTH_QUANTIFIED: &str = "Great job quantifying your impact with concrete results.";
pub const STRENGTH_SPECIFIC: &str = "You grounded your answer in a specific, real example.";
pub const STRENGTH_FOCUSED: &str = "Your answer was clear and focused.";
pub const STRENGTH_COMPREHENSIVE: &str = "Your answer was thorough and comprehensive.";
pub const STRENGTH_EMOTIONAL: &str = "You showed genuine motivation and enthusiasm.";

pub const IMPROVE_STAR: &str =
    "Try structuring your answer with the STAR method: Situation, Task, Action, Result.";
pub const IMPROVE_QUANTIFIED: &str = "Add numbers or measurable results to show your impact.";
pub const IMPROVE_SPECIFIC: &str = "Mention a specific project, team, or situation you were part of.";
pub const IMPROVE_DETAIL: &str = "Add a little more detail about what you did and why it mattered.";
pub const IMPROVE_EMOTIONAL: &str = "Share how the experience felt or why it mattered to you.";

const GENTLE_OPENING: &str = "Thank you for sharing your answer.";
const GENTLE_ENCOURAGEMENT: &str = "You're doing well, and every practice answer builds confidence.";
const GENTLE_SUGGESTION: &str = "If you'd like, one thing to try next time:";
const NEUTRAL_ACKNOWLEDGEMENT: &str = "Thanks for your answer.";

fn strengths(signals: &Signals, flags: &CapabilityFlags) -> Vec<String> {
    let candidates = [
        (signals.star, STRENGTH_STAR),
        (signals.quantified, STRENGTH_QUANTIFIED),
        (signals.specific_example, STRENGTH_SPECIFIC),
        (signals.length == LengthBand::Focused, STRENGTH_FOCUSED),
        (signals.length == LengthBand::Comprehensive, STRENGTH_COMPREHENSIVE),
        (signals.emotional && !flags.has_speech_impairment, STRENGTH_EMOTIONAL),
    ];
    candidates
        .into_iter()
        .filter(|(present, _)| *present)
        .map(|(_, text)| text.to_string())
        .collect()
}

fn improvements(signals: &Signals, flags: &CapabilityFlags) -> Vec<String> {
    let too_short = matches!(signals.length, LengthBand::VeryShort | LengthBand::Short);
    let candidates = [
        (!signals.star && !flags.has_cognitive_disability, IMPROVE_STAR),
        (!signals.quantified, IMPROVE_QUANTIFIED),
        (!signals.specific_example, IMPROVE_SPECIFIC),
        (too_short && !flags.has_speech_impairment, IMPROVE_DETAIL),
        (!signals.emotional && !flags.has_speech_impairment, IMPROVE_EMOTIONAL),
    ];
    candidates
        .into_iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, text)| text.to_string())
        .collect()
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn compose_feedback(strengths: &[String], improvements: &[String], flags: &CapabilityFlags) -> String {
    if flags.prefers_gentle_feedback() {
        let lead = strengths
            .first()
            .map(String::as_str)
            .unwrap_or(GENTLE_ENCOURAGEMENT);
        let mut feedback = format!("{GENTLE_OPENING} {lead}");
        if let Some(improvement) = improvements.first() {
            feedback.push(' ');
            feedback.push_str(GENTLE_SUGGESTION);
            feedback.push(' ');
            feedback.push_str(&lowercase_first(improvement));
        }
        return feedback;
    }

    let lead = strengths.first().or(improvements.first());
    let follow_up = if strengths.is_empty() {
        None
    } else {
        improvements.first()
    };
    match (lead, follow_up) {
        (Some(lead), Some(next)) => format!("{lead} {next}"),
        (Some(lead), None) => lead.clone(),
        (None, _) => NEUTRAL_ACKNOWLEDGEMENT.to_string(),
    }
}

/// Scores an answer and builds its feedback. Pure and deterministic.
pub fn evaluate(answer: &str, flags: &CapabilityFlags) -> EvaluationResult {
    let signals = Signals::detect(answer);
    let strengths = strengths(&signals, flags);
    let improvements = improvements(&signals, flags);
    EvaluationResult {
        score: signals.score(flags),
        feedback: compose_feedback(&strengths, &improvements, flags),
        strengths,
        improvements,
    }
}
