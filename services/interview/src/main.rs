use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use interview_core::anxiety::AnxietyLevel;
use interview_core::channels::capability::Unavailable;
use interview_core::keys::Shortcut;
use interview_core::profile::{AccessibilityProfile, DisabilityTag, InteractionMethod, StoredProfile};
use interview_core::store::{JsonFileStore, ProfileStore};
use interview_core::timer::TimerTick;
use interview_core::{
    DeviceChannelManager, Devices, HistoryRecorder, InterviewEngine, Mode, NextOutcome,
    ProfileAccessor, QuestionCatalog,
};
use interview_native_utils::device::{self, Direction};
use interview_service::config::{Config, TICK_INTERVAL_MS};
use interview_service::console_adapter::{ConsoleRecognizer, ConsoleSpeaker};
use interview_service::{catalog_loader, render};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::fmt::time::ChronoLocal;

#[derive(Parser)]
#[command(version, about = "Accessible mock interview practice in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save the accessibility profile used to adapt practice sessions
    Profile {
        /// Comma separated needs, e.g. "anxiety,visual"
        #[arg(long, value_delimiter = ',')]
        disabilities: Vec<String>,
        /// text, voice, video or hybrid
        #[arg(long, default_value = "text")]
        method: String,
        /// The role you are practicing for
        #[arg(long, default_value = "")]
        role: String,
    },
    /// Run a practice interview
    Practice {
        #[arg(long, default_value = "behavioral")]
        mode: String,
        #[arg(long, default_value = "default")]
        industry: String,
    },
    /// Show recorded results and progress
    History {
        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the audio devices speech input and output would use
    Devices,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    // --- 3. Parse Command-Line Arguments ---
    let cli = Cli::parse();

    let store = Arc::new(JsonFileStore::open(&config.data_dir).with_context(|| {
        format!("Failed to open data directory {}", config.data_dir.display())
    })?);

    match cli.command {
        Command::Profile {
            disabilities,
            method,
            role,
        } => save_profile(&store, &disabilities, &method, role),
        Command::Practice { mode, industry } => {
            practice(&config, store, Mode::from(mode.as_str()), &industry).await
        }
        Command::History { json } => show_history(store, json),
        Command::Devices => show_devices(),
    }
}

fn save_profile(store: &JsonFileStore, disabilities: &[String], method: &str, role: String) -> Result<()> {
    let disabilities: BTreeSet<DisabilityTag> = disabilities
        .iter()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| raw.parse::<DisabilityTag>().map_err(anyhow::Error::msg))
        .collect::<Result<_>>()?;
    let method: InteractionMethod = method.parse().map_err(anyhow::Error::msg)?;
    let profile = AccessibilityProfile {
        disabilities,
        method,
        role,
    };
    store
        .save_profile(&StoredProfile::from(&profile))
        .context("Failed to save profile")?;
    tracing::info!("Profile saved");
    println!("Saved profile: {:?}", StoredProfile::from(&profile));
    Ok(())
}

fn show_history(store: Arc<JsonFileStore>, json: bool) -> Result<()> {
    let recorder = HistoryRecorder::new(store, interview_core::history::DEFAULT_HISTORY_LIMIT);
    let records = recorder.records().context("Failed to read history")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{}", render::progress(&records));
    }
    Ok(())
}

fn show_devices() -> Result<()> {
    for (label, direction) in [("Inputs", Direction::Input), ("Outputs", Direction::Output)] {
        let devices = device::list_devices(direction)
            .with_context(|| format!("Failed to list audio {}", label.to_lowercase()))?;
        println!("{label}:\n{}", device::describe(&devices));
    }
    Ok(())
}

async fn practice(config: &Config, store: Arc<JsonFileStore>, mode: Mode, industry: &str) -> Result<()> {
    let catalog = match &config.catalog_dir {
        Some(dir) => catalog_loader::load_catalog(dir).context("Failed to load question catalog")?,
        None => QuestionCatalog::builtin(),
    };
    tracing::info!("Question catalog ready with {} modes", catalog.modes().count());

    let recognizer = Arc::new(ConsoleRecognizer::default());
    let devices = Devices {
        synthesizer: Arc::new(ConsoleSpeaker::detect()),
        recognizer: recognizer.clone(),
        camera: Arc::new(Unavailable),
    };
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let settings = config.session_settings();
    let history = HistoryRecorder::new(store.clone(), settings.history_limit);
    let mut engine = InterviewEngine::new(
        settings,
        Arc::new(catalog),
        DeviceChannelManager::new(devices, event_tx),
        history,
        Box::new(StdRng::from_entropy()),
    );

    let profile = ProfileAccessor::new(store).load();
    let flags = engine.apply_profile(&profile);
    engine.start_interview(mode, industry, flags);
    println!("{}\n", render::HELP);
    print_question(&engine);

    // Stdin is read on its own task so the countdown keeps running.
    let (line_tx, mut line_rx) = mpsc::channel::<String>(32);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                engine.exit();
                break;
            }
            line = line_rx.recv() => {
                let Some(line) = line else {
                    engine.exit();
                    break;
                };
                if handle_line(&mut engine, &recognizer, &line) == Flow::Exit {
                    engine.exit();
                    break;
                }
                if engine.session().is_none() {
                    println!("Interview complete. Well done.");
                    break;
                }
            }
            _ = ticker.tick() => {
                if engine.tick() == Some(TimerTick::Wrapped) {
                    println!("(Time check: there is no cutoff, take the time you need.)");
                }
            }
            Some(event) = event_rx.recv() => {
                if engine.handle_event(event) {
                    if let Some(snapshot) = engine.snapshot() {
                        println!("Draft: {}", snapshot.draft);
                    }
                }
            }
        }
    }

    let records = engine.history().records().context("Failed to read history")?;
    println!("{}", render::progress(&records));
    Ok(())
}

fn print_question(engine: &InterviewEngine) {
    if let Some(snapshot) = engine.snapshot() {
        println!("{}", render::question(&snapshot));
    }
}

fn set_channel(engine: &mut InterviewEngine, name: &str, arg: Option<&str>) -> Result<()> {
    let enabled = match arg {
        Some("on") => true,
        Some("off") => false,
        _ => bail!("Usage: :{name} on|off"),
    };
    let applied = match name {
        "audio" => engine.set_audio_enabled(enabled),
        "voice" => engine.set_voice_enabled(enabled),
        _ => engine.set_video_enabled(enabled),
    };
    if !applied {
        let states = engine.channels().states();
        let state = match name {
            "audio" => states.audio_output,
            "voice" => states.voice_input,
            _ => states.video_input,
        };
        match state.error {
            Some(e) => bail!("{e}"),
            None => bail!("Could not turn {name} {}", if enabled { "on" } else { "off" }),
        }
    }
    Ok(())
}

fn handle_line(engine: &mut InterviewEngine, recognizer: &ConsoleRecognizer, line: &str) -> Flow {
    let line = line.trim();

    if let Some(spoken) = line.strip_prefix('>') {
        if !recognizer.dictate(spoken.trim()) {
            println!("Voice input is not listening. Try :voice on");
        }
        return Flow::Continue;
    }

    let Some(command) = line.strip_prefix(':') else {
        if line.is_empty() {
            let had_feedback = engine.session().is_some_and(|s| s.feedback_shown());
            if !engine.handle_shortcut(Shortcut::SubmitOrAdvance, false) {
                println!("Nothing to submit yet. Type an answer, or :help");
            } else if had_feedback {
                print_question(engine);
            } else {
                print_feedback(engine);
            }
            return Flow::Continue;
        }
        // A typed line is an answer; shortcuts don't apply while typing.
        if engine.session().is_some_and(|s| s.feedback_shown()) {
            println!("Feedback is showing. Press Enter to continue or :retry");
            return Flow::Continue;
        }
        engine.set_draft(line);
        if engine.submit_draft().is_some() {
            print_feedback(engine);
        }
        return Flow::Continue;
    };

    let mut parts = command.split_whitespace();
    let result = match (parts.next().unwrap_or_default(), parts.next()) {
        ("q" | "quit", _) => return Flow::Exit,
        ("help" | "h", _) => {
            println!("{}", render::HELP);
            Ok(())
        }
        ("r", _) => {
            if !engine.handle_shortcut(Shortcut::RepeatQuestion, false) {
                println!("Speech output is unavailable right now");
            }
            Ok(())
        }
        ("p", _) => {
            match engine.toggle_pause() {
                Some(true) => println!("Paused. :p to resume"),
                Some(false) => print_question(engine),
                None => {}
            }
            Ok(())
        }
        ("retry", _) => {
            engine.retry_answer();
            print_question(engine);
            Ok(())
        }
        ("next" | "n", _) => {
            match engine.next_question() {
                NextOutcome::Advanced(_) => print_question(engine),
                NextOutcome::Completed => {}
                NextOutcome::Ignored => println!("Resume with :p first"),
            }
            Ok(())
        }
        ("anxiety", level) => match level {
            Some("low") => Ok(()),
            Some("medium") => {
                engine.report_anxiety(AnxietyLevel::Medium);
                Ok(())
            }
            Some("high") => {
                engine.report_anxiety(AnxietyLevel::High);
                println!("Thanks for telling us. The next questions will be gentler.");
                Ok(())
            }
            _ => Err(anyhow::anyhow!("Usage: :anxiety low|medium|high")),
        },
        (name @ ("audio" | "voice" | "video"), arg) => set_channel(engine, name, arg),
        ("status", _) => {
            if let Some(snapshot) = engine.snapshot() {
                println!("{}", render::status(&snapshot));
            }
            Ok(())
        }
        (other, _) => Err(anyhow::anyhow!("Unknown command ':{other}'. Try :help")),
    };
    if let Err(e) = result {
        println!("{e}");
    }
    Flow::Continue
}

fn print_feedback(engine: &InterviewEngine) {
    if let Some(result) = engine.session().and_then(|s| s.feedback.as_ref()) {
        println!("{}", render::feedback(result));
        println!("Press Enter for the next question, or :retry");
    }
}
