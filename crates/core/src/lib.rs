pub mod anxiety;
pub mod catalog;
pub mod channels;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod keys;
pub mod profile;
pub mod session;
pub mod store;
pub mod timer;

pub use catalog::{Mode, QuestionCatalog};
pub use channels::{ChannelEvent, DeviceChannelManager, Devices};
pub use config::SessionSettings;
pub use evaluator::{EvaluationResult, evaluate};
pub use history::{HistoryRecorder, ProgressSummary};
pub use profile::{AccessibilityProfile, CapabilityFlags, ProfileAccessor};
pub use session::{InterviewEngine, NextOutcome, SessionSnapshot};
