use interview_core::channels::ChannelState;
use interview_core::history::{HistoryRecord, ProgressSummary, Trend};
use interview_core::session::SessionPhase;
use interview_core::{EvaluationResult, SessionSnapshot};

fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn channel_label(name: &str, state: &ChannelState) -> String {
    let status = match (state.enabled, state.active) {
        (_, true) => "on",
        (true, false) => "ready",
        (false, false) => "off",
    };
    match &state.error {
        Some(e) => format!("{name}: {status} ({e})"),
        None => format!("{name}: {status}"),
    }
}

/// Header and text of the current question.
pub fn question(snapshot: &SessionSnapshot) -> String {
    let mut out = format!(
        "Question {}/{} [{}] {} remaining\n{}",
        snapshot.index + 1,
        snapshot.total,
        snapshot.effective_mode,
        format_clock(snapshot.remaining_secs),
        snapshot.question
    );
    if snapshot.simplified_language {
        out.push_str("\n(Answer in your own words. Short answers are fine.)");
    }
    if snapshot.sign_language_avatar {
        out.push_str("\n[captions on]");
    }
    out
}

pub fn status(snapshot: &SessionSnapshot) -> String {
    let phase = match snapshot.phase {
        SessionPhase::Answering => "answering",
        SessionPhase::Paused => "paused",
        SessionPhase::ShowingFeedback => "feedback",
    };
    let channels = &snapshot.channels;
    format!(
        "{} | {} | {} | {} | {} remaining",
        phase,
        channel_label("audio", &channels.audio_output),
        channel_label("voice", &channels.voice_input),
        channel_label("video", &channels.video_input),
        format_clock(snapshot.remaining_secs),
    )
}

pub fn feedback(result: &EvaluationResult) -> String {
    let mut out = format!("Score: {}/100\n{}", result.score, result.feedback);
    for strength in &result.strengths {
        out.push_str(&format!("\n  + {strength}"));
    }
    for improvement in &result.improvements {
        out.push_str(&format!("\n  - {improvement}"));
    }
    out
}

pub fn progress(records: &[HistoryRecord]) -> String {
    let Some(summary) = ProgressSummary::from_records(records) else {
        return "No practice sessions recorded yet.".to_string();
    };
    let trend = match summary.trend {
        Trend::Improving => "improving",
        Trend::Steady => "steady",
        Trend::Declining => "declining",
    };
    let mut out = format!(
        "{} answers recorded, average {:.1}, best {}, latest {} ({})",
        summary.sessions, summary.average_score, summary.best_score, summary.latest_score, trend
    );
    for record in records.iter().rev().take(5) {
        out.push_str(&format!(
            "\n  {} {:<12} {:>3}  communication {} reasoning {} readiness {}{}",
            record.date.format("%Y-%m-%d %H:%M"),
            record.mode,
            record.score,
            record.communication,
            record.reasoning,
            record.readiness,
            if record.anxiety_detected { "  (anxiety noted)" } else { "" }
        ));
    }
    out
}

pub const HELP: &str = "\
Type your answer and press Enter to submit it.
  <Enter>          submit the draft, or go on once feedback is shown
  > words          dictate (voice input must be on)
  :r               repeat the question aloud
  :p               pause or resume
  :retry           try the current question again
  :next            skip to the next question
  :anxiety LEVEL   report how you feel (low, medium, high)
  :audio|:voice|:video on|off
  :status          show channel status
  :q               end the interview";
