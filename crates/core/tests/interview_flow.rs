use anyhow::Result;
use interview_core::catalog::Mode;
use interview_core::channels::capability::{SpeechSynthesizer, Unavailable};
use interview_core::error::ChannelError;
use interview_core::history::Trend;
use interview_core::profile::{AccessibilityProfile, DisabilityTag, InteractionMethod, StoredProfile};
use interview_core::store::{JsonFileStore, ProfileStore};
use interview_core::{
    DeviceChannelManager, Devices, HistoryRecorder, InterviewEngine, NextOutcome,
    ProfileAccessor, ProgressSummary, QuestionCatalog, SessionSettings,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Default)]
struct TranscriptSpeaker {
    lines: Mutex<Vec<String>>,
}

impl SpeechSynthesizer for TranscriptSpeaker {
    fn is_supported(&self) -> bool {
        true
    }

    fn speak(&self, text: &str, _rate: f32, _pitch: f32) -> Result<(), ChannelError> {
        self.lines.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn cancel(&self) {}

    fn is_speaking(&self) -> bool {
        false
    }
}

fn build_engine(store: Arc<JsonFileStore>, speaker: Arc<TranscriptSpeaker>) -> InterviewEngine {
    let (tx, _rx) = mpsc::unbounded_channel();
    let devices = Devices {
        synthesizer: speaker,
        recognizer: Arc::new(Unavailable),
        camera: Arc::new(Unavailable),
    };
    InterviewEngine::new(
        SessionSettings::default(),
        Arc::new(QuestionCatalog::builtin()),
        DeviceChannelManager::new(devices, tx),
        HistoryRecorder::new(store, 20),
        Box::new(StdRng::seed_from_u64(2026)),
    )
}

#[test]
fn test_full_session_against_file_store() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = Arc::new(JsonFileStore::open(dir.path())?);
    let profile = AccessibilityProfile {
        disabilities: [DisabilityTag::Visual].into_iter().collect(),
        method: InteractionMethod::Text,
        role: "Support Engineer".into(),
    };
    store.save_profile(&StoredProfile::from(&profile))?;

    let loaded = ProfileAccessor::new(store.clone()).load();
    assert_eq!(loaded, profile);

    let speaker = Arc::new(TranscriptSpeaker::default());
    let mut engine = build_engine(store.clone(), speaker.clone());
    let flags = engine.apply_profile(&loaded);
    engine.start_interview(Mode::Behavioral, "it", flags);

    let answers = [
        "I fixed it.",
        "I led a project where I increased deployment speed by 40% for my team.",
        "We had an outage and I coordinated the team until the system was back up.",
        "I felt proud when our customers told us the product finally worked for them.",
        "I reduced our support backlog by 30% after I rewrote the triage process.",
    ];
    for (i, answer) in answers.iter().enumerate() {
        assert!(engine.submit_answer(answer).is_some(), "answer {i} was not taken");
        let outcome = engine.next_question();
        if i + 1 < answers.len() {
            assert_eq!(outcome, NextOutcome::Advanced(i + 1));
        } else {
            assert_eq!(outcome, NextOutcome::Completed);
        }
    }
    assert!(engine.session().is_none());
    assert!(!engine.channels().any_active());

    // Visual impairment turns on speech output, so every question was read.
    assert_eq!(speaker.lines.lock().unwrap().len(), answers.len());

    let records = engine.history().records()?;
    assert_eq!(records.len(), answers.len());
    assert!(records.iter().all(|r| r.role == "Support Engineer" && r.mode == "behavioral"));

    let summary = ProgressSummary::from_records(&records).expect("history is not empty");
    assert_eq!(summary.sessions, 5);
    assert_eq!(summary.best_score, 100);
    assert_ne!(summary.trend, Trend::Declining);

    // A new engine over the same directory sees the persisted history.
    let reopened = build_engine(store, Arc::new(TranscriptSpeaker::default()));
    assert_eq!(reopened.history().records()?.len(), answers.len());
    Ok(())
}

#[test]
fn test_unavailable_devices_never_block_a_session() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut engine = InterviewEngine::new(
        SessionSettings::default().with_question_count(2),
        Arc::new(QuestionCatalog::builtin()),
        DeviceChannelManager::new(Devices::default(), tx),
        HistoryRecorder::new(Arc::new(interview_core::store::MemoryStore::new()), 20),
        Box::new(StdRng::seed_from_u64(1)),
    );

    assert!(!engine.set_voice_enabled(true));
    assert!(!engine.set_video_enabled(true));
    engine.start_interview(Mode::from("unknown-mode"), "nowhere", Default::default());

    let snapshot = engine.snapshot().expect("session is running");
    assert_eq!(snapshot.total, 2);
    assert_eq!(
        snapshot.channels.video_input.error,
        Some(ChannelError::Unsupported("Camera".into()))
    );
    assert!(engine.submit_answer("An answer typed without any devices.").is_some());
    assert_eq!(engine.next_question(), NextOutcome::Advanced(1));
}
