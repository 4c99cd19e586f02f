//! The interview session state machine.

pub mod engine;
pub mod model;

pub use engine::{InterviewEngine, effective_mode};
pub use model::{InterviewSession, NextOutcome, SessionPhase, SessionSnapshot};
