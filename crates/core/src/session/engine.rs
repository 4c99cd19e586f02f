use super::model::{InterviewSession, NextOutcome, SessionSnapshot};
use crate::anxiety::{self, AnxietyLevel};
use crate::catalog::{Mode, QuestionCatalog};
use crate::channels::{ChannelEvent, DeviceChannelManager};
use crate::config::SessionSettings;
use crate::evaluator::{self, EvaluationResult};
use crate::history::HistoryRecorder;
use crate::keys::Shortcut;
use crate::profile::{AccessibilityProfile, CapabilityFlags, InteractionMethod, ProfileAccessor};
use crate::timer::{CountdownTimer, TimerTick};
use chrono::Utc;
use rand::RngCore;
use std::sync::Arc;

/// The mode a question slot is resolved under. High anxiety pins every
/// slot to supportive material; medium anxiety moves later slots onto
/// behavioral questions.
pub fn effective_mode(
    chosen: &Mode,
    flags: &CapabilityFlags,
    anxiety: AnxietyLevel,
    index: usize,
) -> Mode {
    if flags.has_anxiety || anxiety == AnxietyLevel::High {
        Mode::Supportive
    } else if anxiety == AnxietyLevel::Medium && index > 2 {
        Mode::Behavioral
    } else {
        chosen.clone()
    }
}

/// Orchestrates one practice session at a time: question sequencing,
/// pacing, evaluation and the device channels that follow the session's
/// phase.
///
/// Device completions arrive on the channel the [`DeviceChannelManager`]
/// was built with; the runtime feeds them back through
/// [`InterviewEngine::handle_event`].
pub struct InterviewEngine {
    settings: SessionSettings,
    catalog: Arc<QuestionCatalog>,
    channels: DeviceChannelManager,
    history: HistoryRecorder,
    rng: Box<dyn RngCore + Send>,
    flags: CapabilityFlags,
    role: String,
    session: Option<InterviewSession>,
}

impl InterviewEngine {
    pub fn new(
        settings: SessionSettings,
        catalog: Arc<QuestionCatalog>,
        channels: DeviceChannelManager,
        history: HistoryRecorder,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        Self {
            settings,
            catalog,
            channels,
            history,
            rng,
            flags: CapabilityFlags::default(),
            role: String::new(),
            session: None,
        }
    }

    pub fn session(&self) -> Option<&InterviewSession> {
        self.session.as_ref()
    }

    pub fn channels(&self) -> &DeviceChannelManager {
        &self.channels
    }

    pub fn history(&self) -> &HistoryRecorder {
        &self.history
    }

    /// Configures channel defaults and the role from a stored profile.
    /// Returns the derived flags for the caller to start a session with.
    pub fn apply_profile(&mut self, profile: &AccessibilityProfile) -> CapabilityFlags {
        let flags = ProfileAccessor::derive_flags(profile);
        self.flags = flags;
        self.role = profile.role.clone();

        let wants_voice = matches!(
            profile.method,
            InteractionMethod::Voice | InteractionMethod::Hybrid
        );
        if wants_voice && !flags.has_speech_impairment {
            self.channels.voice.enable_on_activation();
        }
        if matches!(
            profile.method,
            InteractionMethod::Video | InteractionMethod::Hybrid
        ) {
            self.channels.video.enable_on_activation();
        }
        if flags.has_visual_impairment {
            self.channels.audio.enable();
        }
        tracing::debug!("Applied profile: {:?} via {:?}", flags, profile.method);
        flags
    }

    /// Starts a fresh session, replacing any session in progress.
    pub fn start_interview(&mut self, mode: Mode, industry: &str, flags: CapabilityFlags) {
        if self.session.is_some() {
            tracing::info!("Restarting interview; tearing down previous session");
            self.teardown();
        }
        self.flags = flags;

        let anxiety = AnxietyLevel::baseline(&flags);
        let first_mode = effective_mode(&mode, &flags, anxiety, 0);
        let questions = self.catalog.select(
            &first_mode,
            industry,
            self.settings.question_count,
            &mut *self.rng,
        );
        let question_modes = vec![first_mode.clone(); questions.len()];

        self.channels
            .audio
            .set_rate(self.settings.speech_rate(flags.has_neurodivergent));
        if (flags.has_visual_impairment || flags.has_anxiety) && !self.channels.audio.state().enabled
        {
            self.channels.audio.enable();
        }

        tracing::info!(
            "Starting {} interview ({} questions, {} mode, industry '{}')",
            mode,
            questions.len(),
            first_mode,
            industry
        );
        self.session = Some(InterviewSession {
            mode,
            industry: industry.to_string(),
            questions,
            question_modes,
            current_index: 0,
            answers: Vec::new(),
            draft: String::new(),
            feedback: None,
            paused: false,
            retry_count: 0,
            timer: CountdownTimer::new(self.settings.timer_secs(flags.has_anxiety)),
            anxiety,
            started_at: Utc::now(),
            paused_at: None,
        });
        self.activate_question(true);
    }

    /// Brings channels up for the current question: speaks it, starts
    /// listening and resumes the camera preview, each if enabled.
    fn activate_question(&mut self, first: bool) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if !session.is_live() {
            return;
        }

        if self.channels.audio.state().enabled {
            let question = session.current_question();
            let text = if first && self.flags.has_anxiety {
                format!("{} {}", self.settings.calming_prefix, question)
            } else {
                question.to_string()
            };
            self.channels.audio.speak(&text);
        }
        self.resume_inputs();
    }

    fn resume_inputs(&mut self) {
        if self.channels.voice.state().enabled {
            self.channels.voice.start();
        }
        self.channels.video.resume();
    }

    /// Evaluates `text` as the answer to the current question.
    ///
    /// Blank text, no session, or feedback already showing make this a
    /// silent no-op.
    pub fn submit_answer(&mut self, text: &str) -> Option<EvaluationResult> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let session = self.session.as_mut()?;
        if session.feedback_shown() {
            tracing::debug!("Ignoring submission while feedback is shown");
            return None;
        }

        // Nothing recognized from here on may reach this answer.
        self.channels.voice.stop();

        session.answers.push(text.to_string());
        let result = evaluator::evaluate(text, &self.flags);
        session.anxiety = session.anxiety.escalate(anxiety::detect(text));
        session.feedback = Some(result.clone());
        let level = session.anxiety;
        let mode = session.mode.clone();

        self.channels.suspend_all();

        tracing::info!(
            "Question {} answered: score {} (anxiety {:?})",
            session.current_index + 1,
            result.score,
            level
        );
        if let Err(e) = self.history.record(result.score, &self.role, &mode, level) {
            tracing::warn!("Could not record interview history: {}", e);
        }
        Some(result)
    }

    /// Submits whatever has been typed or dictated so far.
    pub fn submit_draft(&mut self) -> Option<EvaluationResult> {
        let draft = self.session.as_ref()?.draft.clone();
        self.submit_answer(&draft)
    }

    /// Replaces the draft for the current question.
    pub fn set_draft(&mut self, text: &str) {
        if let Some(session) = self.session.as_mut() {
            session.draft = text.to_string();
        }
    }

    /// Clears the draft and feedback for another attempt at the same
    /// question. Answers already submitted stay recorded.
    pub fn retry_answer(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        self.channels.voice.stop();
        session.draft.clear();
        session.feedback = None;
        session.retry_count += 1;
        session.timer.reset();
        if session.is_live() {
            self.channels.video.resume();
        }
        true
    }

    /// Moves to the next question, or completes the session on the last.
    pub fn next_question(&mut self) -> NextOutcome {
        let Some(session) = self.session.as_mut() else {
            return NextOutcome::Ignored;
        };
        if session.paused {
            return NextOutcome::Ignored;
        }

        self.channels.voice.stop();
        self.channels.audio.stop();

        if session.is_last() {
            tracing::info!(
                "Interview complete: {} answers over {} questions",
                session.answers.len(),
                session.questions.len()
            );
            self.teardown();
            return NextOutcome::Completed;
        }

        session.current_index += 1;
        session.draft.clear();
        session.feedback = None;
        session.retry_count = 0;
        session.timer.reset();

        let index = session.current_index;
        let mode = effective_mode(&session.mode, &self.flags, session.anxiety, index);
        if session.question_modes[index] != mode {
            tracing::debug!(
                "Re-resolving question {} under {} (was {})",
                index + 1,
                mode,
                session.question_modes[index]
            );
            if let Some(question) =
                self.catalog
                    .draw_one(&mode, &session.industry, &session.questions, &mut *self.rng)
            {
                session.questions[index] = question;
            }
            session.question_modes[index] = mode;
        }

        self.activate_question(false);
        NextOutcome::Advanced(index)
    }

    /// Flips the pause state. Returns the new state, or `None` without a
    /// session.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        let session = self.session.as_mut()?;
        session.paused = !session.paused;
        let paused = session.paused;
        if paused {
            session.paused_at = Some(Utc::now());
            tracing::info!("Interview paused at {}s remaining", session.timer.remaining());
            self.channels.suspend_all();
        } else {
            session.paused_at = None;
            let live = session.is_live();
            tracing::info!("Interview resumed");
            if live {
                self.resume_inputs();
            }
        }
        Some(paused)
    }

    /// Advances the countdown by one second while answering.
    pub fn tick(&mut self) -> Option<TimerTick> {
        let session = self.session.as_mut()?;
        if !session.is_live() {
            return None;
        }
        let tick = session.timer.tick();
        if tick == TimerTick::Wrapped {
            tracing::debug!("Question timer wrapped");
        }
        Some(tick)
    }

    /// Reads the current question aloud, turning speech output on first
    /// if the host supports it.
    pub fn repeat_question(&mut self) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        if !session.is_live() {
            return false;
        }
        let question = session.current_question().to_string();
        if !self.channels.audio.state().enabled && !self.channels.audio.enable() {
            return false;
        }
        self.channels.audio.speak(&question)
    }

    /// Feeds a self-reported or externally detected anxiety level.
    pub fn report_anxiety(&mut self, level: AnxietyLevel) {
        if let Some(session) = self.session.as_mut() {
            session.anxiety = session.anxiety.escalate(level);
            tracing::debug!("Anxiety level now {:?}", session.anxiety);
        }
    }

    fn is_live(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_live())
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) -> bool {
        if enabled {
            self.channels.audio.enable()
        } else {
            self.channels.audio.disable();
            true
        }
    }

    /// Enabling while answering starts listening right away; otherwise the
    /// next question picks it up.
    pub fn set_voice_enabled(&mut self, enabled: bool) -> bool {
        if !enabled {
            self.channels.voice.disable();
            return true;
        }
        if self.is_live() {
            self.channels.voice.enable()
        } else {
            self.channels.voice.enable_on_activation()
        }
    }

    pub fn set_video_enabled(&mut self, enabled: bool) -> bool {
        if !enabled {
            self.channels.video.disable();
            return true;
        }
        if self.is_live() {
            self.channels.video.enable()
        } else {
            self.channels.video.enable_on_activation()
        }
    }

    pub fn start_listening(&mut self) -> bool {
        self.is_live() && self.channels.voice.start()
    }

    pub fn stop_listening(&mut self) {
        self.channels.voice.stop();
    }

    /// Applies a device completion. Returns `true` when recognized speech
    /// was appended to the draft.
    pub fn handle_event(&mut self, event: ChannelEvent) -> bool {
        let Some(fragment) = self.channels.handle(event) else {
            return false;
        };
        match self.session.as_mut() {
            Some(session) if session.is_live() => {
                if !session.draft.is_empty() && !session.draft.ends_with(' ') {
                    session.draft.push(' ');
                }
                session.draft.push_str(&fragment);
                true
            }
            _ => {
                tracing::debug!("Dropping recognized speech outside an answer");
                false
            }
        }
    }

    /// Routes a global shortcut. Shortcuts are inert while the user is
    /// typing or no session is running.
    pub fn handle_shortcut(&mut self, shortcut: Shortcut, focus_in_text_input: bool) -> bool {
        if focus_in_text_input {
            return false;
        }
        let Some(feedback_shown) = self.session.as_ref().map(|s| s.feedback_shown()) else {
            return false;
        };
        match shortcut {
            Shortcut::SubmitOrAdvance if feedback_shown => {
                self.next_question() != NextOutcome::Ignored
            }
            Shortcut::SubmitOrAdvance => self.submit_draft().is_some(),
            Shortcut::RepeatQuestion => self.repeat_question(),
            Shortcut::TogglePause => self.toggle_pause().is_some(),
        }
    }

    /// Ends the session unconditionally and releases every device, even
    /// with a camera request still pending.
    pub fn exit(&mut self) -> bool {
        let had_session = self.session.is_some();
        self.teardown();
        if had_session {
            tracing::info!("Interview exited");
        }
        had_session
    }

    fn teardown(&mut self) {
        self.channels.suspend_all();
        self.session = None;
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let session = self.session.as_ref()?;
        Some(SessionSnapshot {
            mode: session.mode.clone(),
            effective_mode: session.current_mode().clone(),
            industry: session.industry.clone(),
            question: session.current_question().to_string(),
            index: session.current_index,
            total: session.questions.len(),
            remaining_secs: session.timer.remaining(),
            timer_secs: session.timer.duration(),
            paused: session.paused,
            phase: session.phase(),
            draft: session.draft.clone(),
            interim_transcript: self.channels.voice.interim().to_string(),
            feedback: session.feedback.clone(),
            retry_count: session.retry_count,
            answers_submitted: session.answers.len(),
            anxiety: session.anxiety,
            channels: self.channels.states(),
            sign_language_avatar: self.flags.has_hearing_impairment,
            simplified_language: self.flags.has_cognitive_disability || self.flags.has_dyslexia,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::Devices;
    use crate::channels::capability::{
        RecognitionEvent, RecognitionSink, SpeechRecognizer, SpeechSynthesizer,
    };
    use crate::channels::video::tests::FakeCamera;
    use crate::error::ChannelError;
    use crate::evaluator::{STRENGTH_QUANTIFIED, STRENGTH_STAR};
    use crate::profile::DisabilityTag;
    use crate::store::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    #[derive(Default)]
    struct RecordingSpeaker {
        spoken: Mutex<Vec<(String, f32)>>,
    }

    impl SpeechSynthesizer for RecordingSpeaker {
        fn is_supported(&self) -> bool {
            true
        }

        fn speak(&self, text: &str, rate: f32, _pitch: f32) -> Result<(), ChannelError> {
            self.spoken.lock().unwrap().push((text.to_string(), rate));
            Ok(())
        }

        fn cancel(&self) {}

        fn is_speaking(&self) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct CapturingRecognizer {
        sinks: Mutex<Vec<RecognitionSink>>,
    }

    impl CapturingRecognizer {
        fn say(&self, text: &str) {
            let sinks = self.sinks.lock().unwrap();
            sinks.last().unwrap().send(RecognitionEvent::Transcript {
                text: text.to_string(),
                is_final: true,
            });
        }
    }

    impl SpeechRecognizer for CapturingRecognizer {
        fn is_supported(&self) -> bool {
            true
        }

        fn start(&self, sink: RecognitionSink) -> Result<(), ChannelError> {
            self.sinks.lock().unwrap().push(sink);
            Ok(())
        }

        fn stop(&self) {}
    }

    struct Harness {
        engine: InterviewEngine,
        events: UnboundedReceiver<ChannelEvent>,
        speaker: Arc<RecordingSpeaker>,
        recognizer: Arc<CapturingRecognizer>,
        camera: Arc<FakeCamera>,
        store: Arc<MemoryStore>,
    }

    impl Harness {
        fn new() -> Self {
            let speaker = Arc::new(RecordingSpeaker::default());
            let recognizer = Arc::new(CapturingRecognizer::default());
            let camera = Arc::new(FakeCamera::default());
            let store = Arc::new(MemoryStore::new());
            let (tx, events) = mpsc::unbounded_channel();
            let devices = Devices {
                synthesizer: speaker.clone(),
                recognizer: recognizer.clone(),
                camera: camera.clone(),
            };
            let engine = InterviewEngine::new(
                SessionSettings::default(),
                Arc::new(QuestionCatalog::builtin()),
                DeviceChannelManager::new(devices, tx),
                HistoryRecorder::new(store.clone(), 20),
                Box::new(StdRng::seed_from_u64(42)),
            );
            Self {
                engine,
                events,
                speaker,
                recognizer,
                camera,
                store,
            }
        }

        fn pump(&mut self) {
            while let Ok(event) = self.events.try_recv() {
                self.engine.handle_event(event);
            }
        }

        async fn pump_one(&mut self) {
            if let Some(event) = self.events.recv().await {
                self.engine.handle_event(event);
            }
        }

        fn session(&self) -> &InterviewSession {
            self.engine.session().unwrap()
        }
    }

    fn anxious() -> CapabilityFlags {
        CapabilityFlags {
            has_anxiety: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_start_draws_five_unique_questions_from_pool() {
        let mut h = Harness::new();
        h.engine
            .start_interview(Mode::Behavioral, "it", CapabilityFlags::default());

        let catalog = QuestionCatalog::builtin();
        let pool = catalog.pool(&Mode::Behavioral, "it");
        let session = h.session();
        assert_eq!(session.questions.len(), 5);
        assert_eq!(session.questions.iter().collect::<HashSet<_>>().len(), 5);
        assert!(session.questions.iter().all(|q| pool.contains(q)));
        assert_eq!(session.timer.duration(), 120);
        assert_eq!(session.current_index, 0);
    }

    #[test]
    fn test_strong_answer_is_scored_and_recorded() {
        use crate::store::HistoryStore;

        let mut h = Harness::new();
        h.engine
            .start_interview(Mode::Behavioral, "it", CapabilityFlags::default());
        let result = h
            .engine
            .submit_answer(
                "I led a project where I increased deployment speed by 40% for my team.",
            )
            .unwrap();

        assert_eq!(result.score, 100);
        assert!(result.strengths.iter().any(|s| s == STRENGTH_STAR));
        assert!(result.strengths.iter().any(|s| s == STRENGTH_QUANTIFIED));

        let history = h.store.load_history().unwrap();
        assert_eq!(history.len(), 1);
        let record = &history[0];
        assert_eq!(
            (record.score, record.communication, record.reasoning, record.readiness),
            (100, 90, 85, 90)
        );
        assert!(!record.anxiety_detected);
    }

    #[test]
    fn test_blank_submission_is_a_no_op() {
        let mut h = Harness::new();
        h.engine
            .start_interview(Mode::Technical, "it", CapabilityFlags::default());

        assert!(h.engine.submit_answer("   ").is_none());
        let session = h.session();
        assert!(session.answers.is_empty());
        assert_eq!(session.current_index, 0);
        assert!(session.feedback.is_none());
    }

    #[test]
    fn test_resubmission_is_guarded_while_feedback_shown() {
        let mut h = Harness::new();
        h.engine
            .start_interview(Mode::Behavioral, "default", CapabilityFlags::default());
        assert!(h.engine.submit_answer("First attempt at an answer.").is_some());
        assert!(h.engine.submit_answer("Second attempt.").is_none());
        assert_eq!(h.session().answers.len(), 1);
    }

    #[test]
    fn test_pause_freezes_timer() {
        let mut h = Harness::new();
        h.engine
            .start_interview(Mode::Behavioral, "it", CapabilityFlags::default());
        for _ in 0..3 {
            h.engine.tick();
        }
        assert_eq!(h.session().timer.remaining(), 117);

        assert_eq!(h.engine.toggle_pause(), Some(true));
        for _ in 0..10 {
            assert!(h.engine.tick().is_none());
        }
        assert_eq!(h.session().timer.remaining(), 117);
        assert!(h.session().paused_at.is_some());

        assert_eq!(h.engine.toggle_pause(), Some(false));
        assert_eq!(h.engine.tick(), Some(TimerTick::Counting(116)));
        assert!(h.session().paused_at.is_none());
    }

    #[test]
    fn test_anxious_user_only_sees_supportive_questions() {
        let mut h = Harness::new();
        h.engine.start_interview(Mode::Technical, "it", anxious());

        let catalog = QuestionCatalog::builtin();
        let supportive = catalog.pool(&Mode::Supportive, "it");
        assert_eq!(h.session().timer.duration(), 300);
        loop {
            let session = h.session();
            assert!(supportive.contains(&session.current_question().to_string()));
            assert_eq!(session.current_mode(), &Mode::Supportive);
            if h.engine.next_question() == NextOutcome::Completed {
                break;
            }
        }
        assert!(h.engine.session().is_none());
    }

    #[test]
    fn test_medium_anxiety_escalates_later_questions_to_behavioral() {
        let mut h = Harness::new();
        h.engine
            .start_interview(Mode::Technical, "it", CapabilityFlags::default());
        h.engine.report_anxiety(AnxietyLevel::Medium);

        let catalog = QuestionCatalog::builtin();
        let behavioral = catalog.pool(&Mode::Behavioral, "it");
        for expected in [1, 2, 3, 4] {
            assert_eq!(h.engine.next_question(), NextOutcome::Advanced(expected));
        }
        let session = h.session();
        assert_eq!(session.question_modes[1], Mode::Technical);
        assert_eq!(session.question_modes[2], Mode::Technical);
        assert_eq!(session.question_modes[3], Mode::Behavioral);
        assert_eq!(session.question_modes[4], Mode::Behavioral);
        assert!(behavioral.contains(&session.questions[3]));
        assert!(behavioral.contains(&session.questions[4]));
        assert_ne!(session.questions[3], session.questions[4]);
    }

    #[test]
    fn test_anxious_start_speaks_calming_prefix() {
        let mut flags = anxious();
        flags.has_neurodivergent = true;
        let mut h = Harness::new();
        h.engine.start_interview(Mode::Supportive, "default", flags);

        let spoken = h.speaker.spoken.lock().unwrap();
        let (text, rate) = &spoken[0];
        assert!(text.starts_with("Take a deep breath. There's no rush. "));
        assert!(text.ends_with(h.session().current_question()));
        assert_eq!(*rate, 0.8);
    }

    #[test]
    fn test_dictation_appends_until_submission() {
        let mut h = Harness::new();
        h.engine.set_voice_enabled(true);
        h.engine
            .start_interview(Mode::Behavioral, "it", CapabilityFlags::default());
        h.engine.set_draft("I led");

        h.recognizer.say("a team of five");
        h.pump();
        assert_eq!(h.session().draft, "I led a team of five");
        assert!(h.engine.channels().voice.state().active);

        h.engine.submit_draft().unwrap();
        assert!(!h.engine.channels().voice.state().active);

        // A fragment from the stopped recognizer must not leak in.
        h.recognizer.say("and then some");
        h.pump();
        assert_eq!(h.session().answers, vec!["I led a team of five".to_string()]);
        assert_eq!(h.session().draft, "I led a team of five");
    }

    #[test]
    fn test_retry_keeps_submitted_answers() {
        let mut h = Harness::new();
        h.engine
            .start_interview(Mode::Behavioral, "it", CapabilityFlags::default());
        h.engine.tick();
        h.engine.submit_answer("My first take on this question.");

        assert!(h.engine.retry_answer());
        let session = h.session();
        assert_eq!(session.answers.len(), 1);
        assert_eq!(session.retry_count, 1);
        assert!(session.feedback.is_none());
        assert!(session.draft.is_empty());
        assert_eq!(session.timer.remaining(), session.timer.duration());

        h.engine.next_question();
        assert_eq!(h.session().retry_count, 0);
    }

    #[test]
    fn test_next_question_is_ignored_while_paused() {
        let mut h = Harness::new();
        h.engine
            .start_interview(Mode::Behavioral, "it", CapabilityFlags::default());
        h.engine.toggle_pause();
        assert_eq!(h.engine.next_question(), NextOutcome::Ignored);
        assert_eq!(h.session().current_index, 0);
    }

    #[test]
    fn test_shortcuts_ignored_while_typing() {
        let mut h = Harness::new();
        h.engine
            .start_interview(Mode::Behavioral, "it", CapabilityFlags::default());
        h.engine.set_draft("Something I typed with care and detail.");

        assert!(!h.engine.handle_shortcut(Shortcut::TogglePause, true));
        assert!(!h.session().paused);

        assert!(h.engine.handle_shortcut(Shortcut::SubmitOrAdvance, false));
        assert!(h.session().feedback_shown());
        assert!(h.engine.handle_shortcut(Shortcut::SubmitOrAdvance, false));
        assert_eq!(h.session().current_index, 1);
    }

    #[test]
    fn test_repeat_enables_speech_output() {
        let mut h = Harness::new();
        h.engine
            .start_interview(Mode::Behavioral, "it", CapabilityFlags::default());
        assert!(h.speaker.spoken.lock().unwrap().is_empty());

        assert!(h.engine.handle_shortcut(Shortcut::RepeatQuestion, false));
        let spoken = h.speaker.spoken.lock().unwrap();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].0, h.session().current_question());
    }

    #[tokio::test]
    async fn test_feedback_and_pause_stop_every_channel() {
        let mut h = Harness::new();
        h.engine.set_voice_enabled(true);
        h.engine.set_video_enabled(true);
        h.engine.set_audio_enabled(true);
        h.engine
            .start_interview(Mode::Behavioral, "it", CapabilityFlags::default());
        h.pump_one().await;
        assert!(h.engine.channels().video.state().active);
        assert!(h.engine.channels().voice.state().active);

        h.engine.toggle_pause();
        assert!(!h.engine.channels().any_active());
        assert_eq!(h.camera.live_streams(), 0);

        h.engine.toggle_pause();
        h.pump_one().await;
        assert!(h.engine.channels().video.state().active);

        h.engine.submit_answer("An answer given while the camera was on.");
        assert!(!h.engine.channels().any_active());
        assert_eq!(h.camera.live_streams(), 0);
    }

    #[tokio::test]
    async fn test_exit_with_pending_camera_request_releases_late_grant() {
        let mut h = Harness::new();
        h.engine.set_video_enabled(true);
        h.engine
            .start_interview(Mode::Behavioral, "it", CapabilityFlags::default());
        assert!(h.engine.channels().video.is_pending());

        assert!(h.engine.exit());
        h.pump_one().await;

        assert!(h.engine.session().is_none());
        assert!(!h.engine.channels().video.state().active);
        assert_eq!(h.camera.live_streams(), 0);
    }

    #[test]
    fn test_profile_sets_channel_defaults() {
        let mut h = Harness::new();
        let profile = AccessibilityProfile {
            disabilities: [DisabilityTag::Visual, DisabilityTag::Speech]
                .into_iter()
                .collect(),
            method: InteractionMethod::Hybrid,
            role: "Data Analyst".into(),
        };
        let flags = h.engine.apply_profile(&profile);

        let channels = h.engine.channels();
        assert!(flags.has_visual_impairment && flags.has_speech_impairment);
        assert!(channels.audio.state().enabled);
        assert!(channels.video.state().enabled);
        assert!(!channels.voice.state().enabled);
    }

    #[test]
    fn test_video_without_runtime_does_not_block_session() {
        let mut h = Harness::new();
        assert!(h.engine.set_video_enabled(true));
        h.engine
            .start_interview(Mode::Behavioral, "it", CapabilityFlags::default());

        let video = h.engine.channels().video.state().clone();
        assert!(!video.enabled && !video.active);
        assert!(matches!(video.error, Some(ChannelError::Failed(_))));
        assert!(h.engine.submit_answer("I shipped the release on time.").is_some());
        h.engine.retry_answer();
        assert_eq!(h.camera.requests.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn test_snapshot_reflects_session() {
        let mut h = Harness::new();
        assert!(h.engine.snapshot().is_none());
        let flags = CapabilityFlags {
            has_hearing_impairment: true,
            ..Default::default()
        };
        h.engine.start_interview(Mode::Situational, "default", flags);

        let snapshot = h.engine.snapshot().unwrap();
        assert_eq!(snapshot.index, 0);
        assert_eq!(snapshot.total, h.session().questions.len());
        assert_eq!(snapshot.phase, crate::session::SessionPhase::Answering);
        assert!(snapshot.sign_language_avatar);
        assert!(!snapshot.simplified_language);
    }
}
