use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Flag raised by the mutator once hit points drop to zero or below.
pub const HP_ZERO_FLAG: &str = "hp_zero";

/// The mutable state of one game.
///
/// The recognized keys are typed fields; anything else found in the rules'
/// starting state or in a save file is kept in [`GameState::extra`] and
/// written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Where the player currently is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Carried items in the order they were first picked up.
    #[serde(default, deserialize_with = "unique_items")]
    pub inventory: Vec<String>,
    /// Named story flags.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    /// Hit points. May go negative.
    #[serde(default)]
    pub hp: i64,
    /// Number of commands the game master has resolved.
    #[serde(default)]
    pub turns: u64,
    /// Keys this runtime does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameState {
    /// Whether the inventory holds `item`.
    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|i| i == item)
    }

    /// Add an item unless it is already carried. Returns whether it was added.
    pub fn add_item(&mut self, item: impl Into<String>) -> bool {
        let item = item.into();
        if self.has_item(&item) {
            return false;
        }
        self.inventory.push(item);
        true
    }

    /// Remove the first occurrence of an item. Returns whether it was found.
    pub fn remove_item(&mut self, item: &str) -> bool {
        if let Some(pos) = self.inventory.iter().position(|i| i == item) {
            self.inventory.remove(pos);
            true
        } else {
            false
        }
    }

    /// Whether a flag is present and true.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Raise a flag.
    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.flags.insert(name.into(), true);
    }

    /// Inventory as a comma-separated list, or `"empty"`.
    pub fn inventory_summary(&self) -> String {
        if self.inventory.is_empty() {
            "empty".to_string()
        } else {
            self.inventory.join(", ")
        }
    }
}

fn unique_items<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    let mut items: Vec<String> = Vec::with_capacity(raw.len());
    for item in raw {
        if !items.contains(&item) {
            items.push(item);
        }
    }
    Ok(items)
}
