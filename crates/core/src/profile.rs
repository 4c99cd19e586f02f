use crate::store::ProfileStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Accessibility needs a user can declare during profile setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisabilityTag {
    Hearing,
    Visual,
    Speech,
    Verbal,
    Motor,
    Adhd,
    Autism,
    Dyslexia,
    Anxiety,
    Cognitive,
    Neurodivergent,
}

impl DisabilityTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisabilityTag::Hearing => "hearing",
            DisabilityTag::Visual => "visual",
            DisabilityTag::Speech => "speech",
            DisabilityTag::Verbal => "verbal",
            DisabilityTag::Motor => "motor",
            DisabilityTag::Adhd => "adhd",
            DisabilityTag::Autism => "autism",
            DisabilityTag::Dyslexia => "dyslexia",
            DisabilityTag::Anxiety => "anxiety",
            DisabilityTag::Cognitive => "cognitive",
            DisabilityTag::Neurodivergent => "neurodivergent",
        }
    }
}

impl FromStr for DisabilityTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hearing" => Ok(DisabilityTag::Hearing),
            "visual" => Ok(DisabilityTag::Visual),
            "speech" => Ok(DisabilityTag::Speech),
            "verbal" => Ok(DisabilityTag::Verbal),
            "motor" => Ok(DisabilityTag::Motor),
            "adhd" => Ok(DisabilityTag::Adhd),
            "autism" => Ok(DisabilityTag::Autism),
            "dyslexia" => Ok(DisabilityTag::Dyslexia),
            "anxiety" => Ok(DisabilityTag::Anxiety),
            "cognitive" => Ok(DisabilityTag::Cognitive),
            "neurodivergent" => Ok(DisabilityTag::Neurodivergent),
            other => Err(format!("unknown disability tag '{other}'")),
        }
    }
}

impl fmt::Display for DisabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the user prefers to answer questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMethod {
    #[default]
    Text,
    Voice,
    Video,
    Hybrid,
}

impl FromStr for InteractionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(InteractionMethod::Text),
            "voice" => Ok(InteractionMethod::Voice),
            "video" => Ok(InteractionMethod::Video),
            "hybrid" => Ok(InteractionMethod::Hybrid),
            other => Err(format!("unknown interaction method '{other}'")),
        }
    }
}

/// The profile as it is persisted: plain strings, so that a store written
/// by an older or newer client still loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredProfile {
    #[serde(default)]
    pub disabilities: Vec<String>,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessibilityProfile {
    pub disabilities: BTreeSet<DisabilityTag>,
    pub method: InteractionMethod,
    pub role: String,
}

impl AccessibilityProfile {
    pub fn has(&self, tag: DisabilityTag) -> bool {
        self.disabilities.contains(&tag)
    }
}

impl From<StoredProfile> for AccessibilityProfile {
    fn from(stored: StoredProfile) -> Self {
        let disabilities = stored
            .disabilities
            .iter()
            .filter_map(|raw| match raw.parse::<DisabilityTag>() {
                Ok(tag) => Some(tag),
                Err(e) => {
                    tracing::warn!("Skipping stored profile tag: {}", e);
                    None
                }
            })
            .collect();
        // An empty or unknown method falls back to plain text entry.
        let method = stored.method.parse().unwrap_or_default();
        Self {
            disabilities,
            method,
            role: stored.role,
        }
    }
}

impl From<&AccessibilityProfile> for StoredProfile {
    fn from(profile: &AccessibilityProfile) -> Self {
        Self {
            disabilities: profile
                .disabilities
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            method: match profile.method {
                InteractionMethod::Text => "text",
                InteractionMethod::Voice => "voice",
                InteractionMethod::Video => "video",
                InteractionMethod::Hybrid => "hybrid",
            }
            .to_string(),
            role: profile.role.clone(),
        }
    }
}

/// Boolean projection of a profile, computed once per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityFlags {
    pub has_anxiety: bool,
    pub has_speech_impairment: bool,
    pub has_cognitive_disability: bool,
    pub has_neurodivergent: bool,
    pub has_visual_impairment: bool,
    pub has_hearing_impairment: bool,
    pub has_motor_impairment: bool,
    pub has_dyslexia: bool,
}

impl CapabilityFlags {
    pub fn derive(profile: &AccessibilityProfile) -> Self {
        use DisabilityTag::*;
        Self {
            has_anxiety: profile.has(Anxiety),
            has_speech_impairment: profile.has(Speech) || profile.has(Verbal),
            has_cognitive_disability: profile.has(Cognitive),
            has_neurodivergent: profile.has(Neurodivergent)
                || profile.has(Adhd)
                || profile.has(Autism),
            has_visual_impairment: profile.has(Visual),
            has_hearing_impairment: profile.has(Hearing),
            has_motor_impairment: profile.has(Motor),
            has_dyslexia: profile.has(Dyslexia),
        }
    }

    /// Whether feedback should use the gentle framing.
    pub fn prefers_gentle_feedback(&self) -> bool {
        self.has_anxiety || self.has_speech_impairment
    }
}

/// Read-only access to the stored profile.
pub struct ProfileAccessor {
    store: Arc<dyn ProfileStore>,
}

impl ProfileAccessor {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Loads the stored profile. Missing or unreadable data yields the
    /// default profile; this never fails.
    pub fn load(&self) -> AccessibilityProfile {
        match self.store.load_profile() {
            Ok(Some(stored)) => stored.into(),
            Ok(None) => AccessibilityProfile::default(),
            Err(e) => {
                tracing::warn!("Could not read stored profile, using defaults: {}", e);
                AccessibilityProfile::default()
            }
        }
    }

    pub fn derive_flags(profile: &AccessibilityProfile) -> CapabilityFlags {
        CapabilityFlags::derive(profile)
    }
}
