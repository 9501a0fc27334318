use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{GmError, GmResult};
use crate::history::HistoryEntry;
use crate::rules::Rules;
use crate::state::GameState;

/// Closing instruction appended to every prompt.
pub const REPLY_INSTRUCTIONS: &str =
    "INSTRUCTIONS: Reply strictly as JSON with keys 'narration' and 'state_change'";

/// Builds the text sent to the backend for one player command.
///
/// Only formats text: no networking, no parsing, no validation of the
/// command, which is forwarded verbatim.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder<'a> {
    preamble: &'a str,
    rules: &'a Rules,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder over the fixed preamble and the game rules.
    pub fn new(preamble: &'a str, rules: &'a Rules) -> Self {
        Self { preamble, rules }
    }

    /// Render the prompt.
    ///
    /// `recent` is the history window to show, oldest first. Rules and state
    /// are serialized compactly; history is pretty-printed.
    pub fn build(
        &self,
        state: &GameState,
        recent: &[HistoryEntry],
        command: &str,
    ) -> GmResult<String> {
        let rules = compact(self.rules, "rules")?;
        let state = compact(state, "game state")?;
        let history = serde_json::to_string_pretty(recent).map_err(|source| GmError::Json {
            what: "history".to_string(),
            source,
        })?;

        let mut prompt = String::with_capacity(
            self.preamble.len() + rules.len() + state.len() + history.len() + command.len() + 128,
        );
        prompt.push_str(self.preamble.trim_end());
        prompt.push_str("\n\n");
        push_line(&mut prompt, "RULES_JSON", &rules);
        push_line(&mut prompt, "CURRENT_STATE", &state);
        push_line(&mut prompt, "RECENT_HISTORY", &history);
        push_line(&mut prompt, "PLAYER_COMMAND", command);
        prompt.push('\n');
        prompt.push_str(REPLY_INSTRUCTIONS);

        Ok(prompt)
    }
}

/// Read the fixed instruction preamble.
pub fn read_preamble(path: &Path) -> GmResult<String> {
    fs::read_to_string(path).map_err(|source| GmError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn compact<T: Serialize + ?Sized>(value: &T, what: &str) -> GmResult<String> {
    serde_json::to_string(value).map_err(|source| GmError::Json {
        what: what.to_string(),
        source,
    })
}

fn push_line(prompt: &mut String, label: &str, body: &str) {
    prompt.push_str(label);
    prompt.push(':');
    prompt.push_str(body);
    prompt.push('\n');
}
