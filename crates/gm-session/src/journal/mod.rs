//! Records of play: the bounded prompt history and the on-disk transcript.

pub mod history;
pub mod transcript;

pub use history::History;
pub use transcript::Transcript;
