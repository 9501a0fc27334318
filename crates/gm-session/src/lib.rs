//! Interactive session engine for the GM adventure runtime.
//!
//! A [`Session`] owns the single game state and runs one player command at a
//! time through prompt construction, the [`Backend`], reply parsing, state
//! mutation, and end-condition evaluation. It also keeps the bounded prompt
//! history, the append-only transcript, and the save file.

pub mod backend;
pub mod config;
pub mod error;
pub mod journal;
pub mod session;
pub mod store;

pub use backend::{Backend, CommandBackend, HttpBackend};
pub use config::{BackendConfig, SessionConfig};
pub use error::{BackendError, BackendResult, SessionError, SessionResult};
pub use journal::{History, Transcript};
pub use session::{Phase, Session, Turn};
pub use store::SaveStore;
