use serde::{Deserialize, Serialize};

use crate::reply::GmReply;
use crate::state::GameState;

/// One resolved exchange between the player and the game master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The command as the player typed it.
    pub player: String,
    /// The game master's decoded reply.
    pub gm: GmReply,
}

impl HistoryEntry {
    /// Create an entry.
    pub fn new(player: impl Into<String>, gm: GmReply) -> Self {
        Self {
            player: player.into(),
            gm,
        }
    }
}

/// One transcript line: an exchange plus the state it produced.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry<'a> {
    /// The command as the player typed it.
    pub player: &'a str,
    /// The game master's decoded reply.
    pub gm: &'a GmReply,
    /// State after the reply was applied.
    pub state: &'a GameState,
}

impl<'a> TranscriptEntry<'a> {
    /// Pair a history entry with the state it produced.
    pub fn new(entry: &'a HistoryEntry, state: &'a GameState) -> Self {
        Self {
            player: &entry.player,
            gm: &entry.gm,
            state,
        }
    }
}
