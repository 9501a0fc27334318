use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GmError, GmResult};
use crate::state::GameState;

/// Intro shown when the rules carry no quest text.
pub const DEFAULT_INTRO: &str = "Welcome to AI Dungeon!";

/// Static configuration of a game, loaded once and never mutated.
///
/// Field names follow the upper-case keys of the rules file. Sections the
/// runtime does not interpret are kept in [`Rules::extra`] so the game master
/// still sees them in the prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Starting state for a new game.
    #[serde(rename = "START", default)]
    pub start: GameState,
    /// Terminal conditions checked after every turn.
    #[serde(rename = "END_CONDITIONS", default)]
    pub end_conditions: EndConditions,
    /// Commands advertised to the player by `help`.
    #[serde(rename = "COMMANDS", default)]
    pub commands: Vec<String>,
    /// Quest presentation.
    #[serde(rename = "QUEST", default)]
    pub quest: Quest,
    /// Other top-level sections.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Win, lose, and turn-limit conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndConditions {
    /// Flags that must all be raised to win. An empty list wins immediately.
    #[serde(rename = "WIN_ALL_FLAGS", default)]
    pub win_all_flags: Vec<String>,
    /// Flags of which any one loses the game.
    #[serde(rename = "LOSE_ANY_FLAGS", default)]
    pub lose_any_flags: Vec<String>,
    /// Turn budget. `None` means unbounded.
    #[serde(rename = "MAX_TURNS", default, skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<u64>,
}

/// Quest text shown at session start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    /// Opening narration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    /// Other quest keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Rules {
    /// Parse rules from a JSON document.
    pub fn from_json(text: &str) -> GmResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|source| GmError::Json {
            what: "rules file".to_string(),
            source,
        })?;
        if !value.is_object() {
            return Err(GmError::Rules(
                "expected a JSON object at the top level".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|source| GmError::Json {
            what: "rules file".to_string(),
            source,
        })
    }

    /// Read and parse a rules file.
    pub fn load(path: &Path) -> GmResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| GmError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// A fresh game state built from `START`.
    pub fn initial_state(&self) -> GameState {
        self.start.clone()
    }

    /// The quest intro, or [`DEFAULT_INTRO`].
    pub fn intro(&self) -> &str {
        self.quest.intro.as_deref().unwrap_or(DEFAULT_INTRO)
    }
}
