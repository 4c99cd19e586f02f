//! Static question lookup: mode → industry → questions.

use crate::error::CatalogError;
use rand::RngCore;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const DEFAULT_INDUSTRY: &str = "default";

/// Interview style. Anything not known to the catalog lands in `Custom` and
/// resolves through the supportive fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mode {
    Supportive,
    Behavioral,
    Technical,
    Situational,
    Custom(String),
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Supportive => "supportive",
            Mode::Behavioral => "behavioral",
            Mode::Technical => "technical",
            Mode::Situational => "situational",
            Mode::Custom(name) => name,
        }
    }
}

impl From<&str> for Mode {
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "supportive" => Mode::Supportive,
            "behavioral" | "behavioural" => Mode::Behavioral,
            "technical" => Mode::Technical,
            "situational" => Mode::Situational,
            other => Mode::Custom(other.to_string()),
        }
    }
}

impl From<String> for Mode {
    fn from(raw: String) -> Self {
        Mode::from(raw.as_str())
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type IndustryPools = HashMap<String, Vec<String>>;

#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    modes: HashMap<String, IndustryPools>,
}

impl QuestionCatalog {
    /// Builds a catalog, checking the shape that makes [`select`] total:
    /// a non-empty `supportive/default` pool, a non-empty `default` pool in
    /// every mode, and no empty pools anywhere. Mode and industry keys are
    /// matched case-insensitively; keys differing only in case are merged.
    ///
    /// [`select`]: QuestionCatalog::select
    pub fn new(raw: HashMap<String, IndustryPools>) -> Result<Self, CatalogError> {
        let mut modes: HashMap<String, IndustryPools> = HashMap::new();
        for (mode, pools) in raw {
            let entry = modes.entry(mode.trim().to_lowercase()).or_default();
            for (industry, questions) in pools {
                entry
                    .entry(industry.trim().to_lowercase())
                    .or_default()
                    .extend(questions);
            }
        }

        let supportive = Mode::Supportive.as_str();
        if !modes.contains_key(supportive) {
            return Err(CatalogError::MissingMode(supportive.to_string()));
        }
        for (mode, pools) in &modes {
            if !pools.contains_key(DEFAULT_INDUSTRY) {
                return Err(CatalogError::MissingDefaultPool(mode.clone()));
            }
            if let Some((industry, _)) = pools.iter().find(|(_, pool)| pool.is_empty()) {
                return Err(CatalogError::EmptyPool {
                    mode: mode.clone(),
                    industry: industry.clone(),
                });
            }
        }
        Ok(Self { modes })
    }

    /// The catalog shipped with the engine.
    pub fn builtin() -> Self {
        let modes = BUILTIN
            .iter()
            .map(|(mode, industries)| {
                let pools = industries
                    .iter()
                    .map(|(industry, questions)| {
                        (
                            industry.to_string(),
                            questions.iter().map(|q| q.to_string()).collect(),
                        )
                    })
                    .collect();
                (mode.to_string(), pools)
            })
            .collect();
        Self { modes }
    }

    /// Resolves the pool for a mode/industry pair, falling back to the mode's
    /// default pool and then to the supportive default pool.
    pub fn pool(&self, mode: &Mode, industry: &str) -> &[String] {
        let industry = industry.trim().to_lowercase();
        let resolved = self.modes.get(mode.as_str()).and_then(|pools| {
            pools
                .get(industry.as_str())
                .or_else(|| pools.get(DEFAULT_INDUSTRY))
        });
        match resolved {
            Some(pool) => pool.as_slice(),
            None => {
                tracing::debug!("Unknown mode '{}', using supportive questions", mode);
                self.modes
                    .get(Mode::Supportive.as_str())
                    .and_then(|pools| pools.get(DEFAULT_INDUSTRY))
                    .map(Vec::as_slice)
                    .unwrap_or(&[])
            }
        }
    }

    /// Draws `count` questions as a uniform random permutation of the
    /// resolved pool. Never repeats a question within one draw.
    pub fn select(
        &self,
        mode: &Mode,
        industry: &str,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<String> {
        let mut pool = self.pool(mode, industry).to_vec();
        pool.shuffle(rng);
        pool.truncate(count);
        pool
    }

    /// Draws a single question, preferring ones not already in `exclude`.
    /// Falls back to the whole pool once every question has been used.
    pub fn draw_one(
        &self,
        mode: &Mode,
        industry: &str,
        exclude: &[String],
        rng: &mut dyn RngCore,
    ) -> Option<String> {
        let pool = self.pool(mode, industry);
        let fresh: Vec<&String> = pool.iter().filter(|q| !exclude.contains(q)).collect();
        match fresh.choose(rng) {
            Some(question) => Some((*question).clone()),
            None => pool.choose(rng).cloned(),
        }
    }

    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

type Table = &'static [(&'static str, &'static [(&'static str, &'static [&'static str])])];

static BUILTIN: Table = &[
    (
        "supportive",
        &[(
            "default",
            &[
                "Tell me a little about yourself and what brings you here today.",
                "What is something you are proud of from your recent work or studies?",
                "Describe a task you enjoy doing and why you like it.",
                "What kind of work environment helps you do your best?",
                "Tell me about a time someone helped you learn something new.",
                "What strengths would your friends or colleagues say you have?",
                "What is one goal you are working toward right now?",
            ],
        )],
    ),
    (
        "behavioral",
        &[
            (
                "default",
                &[
                    "Tell me about a time you worked through a difficult problem.",
                    "Describe a situation where you had to meet a tight deadline.",
                    "Tell me about a time you disagreed with a teammate and how you handled it.",
                    "Describe a time you took initiative without being asked.",
                    "Tell me about a mistake you made and what you learned from it.",
                    "Describe a time you had to adapt to a big change at work.",
                ],
            ),
            (
                "it",
                &[
                    "Tell me about a time you resolved a critical production issue.",
                    "Describe a project where you had to learn a new technology quickly.",
                    "Tell me about a time you explained a technical concept to a non-technical stakeholder.",
                    "Describe a situation where you improved a process or system your team relied on.",
                    "Tell me about a time you had to balance code quality against a deadline.",
                ],
            ),
            (
                "healthcare",
                &[
                    "Tell me about a time you handled a stressful situation with a patient.",
                    "Describe a time you worked closely with a multidisciplinary team.",
                    "Tell me about a time you noticed an error and how you addressed it.",
                    "Describe a situation where you advocated for someone in your care.",
                    "Tell me about a time you managed several urgent priorities at once.",
                ],
            ),
            (
                "finance",
                &[
                    "Tell me about a time you found a discrepancy in financial data.",
                    "Describe a situation where you explained numbers to a non-finance audience.",
                    "Tell me about a time you improved the accuracy of a report.",
                    "Describe a time you had to deliver difficult news to a client.",
                    "Tell me about a time you met a regulatory or audit deadline.",
                ],
            ),
        ],
    ),
    (
        "technical",
        &[
            (
                "default",
                &[
                    "Walk me through how you approach learning a new tool.",
                    "How do you check that your work is accurate before handing it off?",
                    "Describe how you would break a large task into smaller steps.",
                    "What tools do you use to stay organized, and why?",
                    "How do you troubleshoot something that is not working as expected?",
                ],
            ),
            (
                "it",
                &[
                    "Explain how you would debug a slow web application.",
                    "How would you design a simple system to store user preferences?",
                    "What is the difference between a process and a thread?",
                    "How do you make sure your code is accessible to all users?",
                    "Describe how you would review a teammate's pull request.",
                    "How would you roll back a failed deployment?",
                ],
            ),
        ],
    ),
    (
        "situational",
        &[(
            "default",
            &[
                "What would you do if you realized you could not finish a task on time?",
                "How would you handle receiving unclear instructions from a manager?",
                "What would you do if a customer was upset with your team?",
                "How would you respond if a colleague took credit for your work?",
                "What would you do if you needed an accommodation to complete a task?",
            ],
        )],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_builtin_catalog_passes_validation() {
        let catalog = QuestionCatalog::builtin();
        assert!(QuestionCatalog::new(catalog.modes.clone()).is_ok());
    }

    #[test]
    fn test_draw_one_prefers_unused_questions() {
        let catalog = QuestionCatalog::builtin();
        let pool = catalog.pool(&Mode::Behavioral, "it").to_vec();
        let (last, used) = pool.split_last().unwrap();

        let drawn = catalog.draw_one(&Mode::Behavioral, "it", used, &mut rng());
        assert_eq!(drawn.as_ref(), Some(last));

        let drawn = catalog.draw_one(&Mode::Behavioral, "it", &pool, &mut rng()).unwrap();
        assert!(pool.contains(&drawn));
    }

    #[test]
    fn test_select_is_total_for_unknown_inputs() {
        let catalog = QuestionCatalog::builtin();
        let modes = [
            Mode::Supportive,
            Mode::Behavioral,
            Mode::Technical,
            Mode::Situational,
            Mode::from("interpretive-dance"),
        ];
        let industries = ["it", "healthcare", "finance", "default", "underwater-welding", ""];

        for mode in &modes {
            for industry in industries {
                let pool = catalog.pool(mode, industry);
                assert!(!pool.is_empty(), "pool for {mode}/{industry} is empty");
                for count in [0, 1, 5, 50] {
                    let drawn = catalog.select(mode, industry, count, &mut rng());
                    assert_eq!(drawn.len(), count.min(pool.len()));
                    assert!(drawn.iter().all(|q| pool.contains(q)));
                }
            }
        }
    }

    #[test]
    fn test_select_never_repeats_within_a_draw() {
        let catalog = QuestionCatalog::builtin();
        let mut rng = rng();
        for _ in 0..50 {
            let drawn = catalog.select(&Mode::Behavioral, "it", 5, &mut rng);
            let unique: HashSet<_> = drawn.iter().collect();
            assert_eq!(unique.len(), drawn.len());
        }
    }

    #[test]
    fn test_unknown_industry_uses_mode_default() {
        let catalog = QuestionCatalog::builtin();
        assert_eq!(
            catalog.pool(&Mode::Situational, "aerospace"),
            catalog.pool(&Mode::Situational, DEFAULT_INDUSTRY)
        );
    }

    #[test]
    fn test_unknown_mode_uses_supportive_default() {
        let catalog = QuestionCatalog::builtin();
        assert_eq!(
            catalog.pool(&Mode::from("stress"), "it"),
            catalog.pool(&Mode::Supportive, DEFAULT_INDUSTRY)
        );
    }

    #[test]
    fn test_new_rejects_catalog_without_supportive_mode() {
        let mut modes = HashMap::new();
        modes.insert(
            "behavioral".to_string(),
            HashMap::from([(DEFAULT_INDUSTRY.to_string(), vec!["Q".to_string()])]),
        );
        assert_eq!(
            QuestionCatalog::new(modes).unwrap_err(),
            CatalogError::MissingMode("supportive".into())
        );
    }

    #[test]
    fn test_new_rejects_empty_pool() {
        let mut modes = HashMap::new();
        modes.insert(
            "supportive".to_string(),
            HashMap::from([
                (DEFAULT_INDUSTRY.to_string(), vec!["Q".to_string()]),
                ("it".to_string(), vec![]),
            ]),
        );
        assert!(matches!(
            QuestionCatalog::new(modes),
            Err(CatalogError::EmptyPool { .. })
        ));
    }

    #[test]
    fn test_new_matches_keys_case_insensitively() {
        let mut modes = HashMap::new();
        modes.insert(
            "Supportive".to_string(),
            HashMap::from([
                ("Default".to_string(), vec!["What do you enjoy?".to_string()]),
                ("IT".to_string(), vec!["What is DNS?".to_string()]),
                ("it".to_string(), vec!["What is a mutex?".to_string()]),
            ]),
        );
        let catalog = QuestionCatalog::new(modes).unwrap();

        let mut pool = catalog.pool(&Mode::Supportive, "it").to_vec();
        pool.sort();
        assert_eq!(pool, ["What is DNS?", "What is a mutex?"]);
        assert_eq!(catalog.pool(&Mode::Supportive, "IT").len(), 2);
        assert_eq!(catalog.pool(&Mode::Supportive, "finance"), ["What do you enjoy?"]);
    }

    #[test]
    fn test_mode_parsing_is_case_insensitive() {
        assert_eq!(Mode::from("Behavioral"), Mode::Behavioral);
        assert_eq!(Mode::from(" TECHNICAL "), Mode::Technical);
        assert_eq!(Mode::from("panel").as_str(), "panel");
    }
}
