//! Core types and turn logic for the GM adventure runtime.
//!
//! This crate holds everything that is deterministic about a game: the
//! [`GameState`] and [`Rules`] data model, decoding of the game master's
//! state-change atoms, the state mutator, end-condition evaluation, tolerant
//! parsing of backend replies, and prompt construction. It performs no I/O
//! beyond reading the rules and preamble files on request.

/// Applying state-change batches to a game state.
pub mod apply;
/// Declarative state-change atoms emitted by the game master.
pub mod change;
/// End-condition evaluation.
pub mod end;
/// Error types used throughout the crate.
pub mod error;
/// History entries exchanged with the game master.
pub mod history;
/// Prompt construction for the backend.
pub mod prompt;
/// Tolerant parsing of backend replies.
pub mod reply;
/// Static game rules.
pub mod rules;
/// The mutable game state.
pub mod state;

/// Re-export the mutator entry point and its report.
pub use apply::{ApplyReport, AtomOutcome, apply_changes};
/// Re-export the decoded atom type.
pub use change::StateChange;
/// Re-export end-condition types.
pub use end::{Outcome, evaluate};
/// Re-export error types.
pub use error::{GmError, GmResult};
/// Re-export history types.
pub use history::{HistoryEntry, TranscriptEntry};
/// Re-export prompt construction.
pub use prompt::{PromptBuilder, read_preamble};
/// Re-export reply types.
pub use reply::{GmReply, Narration, ReplySource, parse_reply};
/// Re-export rules types.
pub use rules::{EndConditions, Quest, Rules};
/// Re-export the game state.
pub use state::GameState;
