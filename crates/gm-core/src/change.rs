//! Decoding of `kind:payload` state-change atoms.
//!
//! The game master describes every state change as a short string. Only a
//! closed set of kinds is understood; anything else is rejected here and
//! skipped by the mutator.

use std::fmt;

/// A decoded state-change atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// Move the player to a location.
    MoveTo(String),
    /// Add an item to the inventory.
    AddItem(String),
    /// Remove an item from the inventory.
    RemoveItem(String),
    /// Raise a flag.
    SetFlag(String),
    /// Adjust hit points.
    HpDelta(i64),
}

/// Why an atom could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtomRejection {
    /// No `:` separator.
    #[error("missing ':' separator")]
    Malformed,
    /// The kind is not one of the known kinds.
    #[error("unknown kind '{0}'")]
    UnknownKind(String),
    /// The payload is blank where a name is required.
    #[error("empty payload for '{0}'")]
    EmptyPayload(&'static str),
}

const MOVE_TO: &str = "move_to";
const ADD_ITEM: &str = "add_item";
const REMOVE_ITEM: &str = "remove_item";
const SET_FLAG: &str = "set_flag";
const HP_DELTA: &str = "hp_delta";

impl StateChange {
    /// Decode an atom.
    ///
    /// Kinds are matched exactly. Name payloads are trimmed and must not be
    /// blank. An `hp_delta` whose amount does not parse decodes to a delta
    /// of zero rather than being rejected.
    pub fn parse(atom: &str) -> Result<Self, AtomRejection> {
        let (kind, payload) = atom.split_once(':').ok_or(AtomRejection::Malformed)?;

        let name = |kind: &'static str| {
            let trimmed = payload.trim();
            if trimmed.is_empty() {
                Err(AtomRejection::EmptyPayload(kind))
            } else {
                Ok(trimmed.to_string())
            }
        };

        match kind {
            MOVE_TO => name(MOVE_TO).map(Self::MoveTo),
            ADD_ITEM => name(ADD_ITEM).map(Self::AddItem),
            REMOVE_ITEM => name(REMOVE_ITEM).map(Self::RemoveItem),
            SET_FLAG => name(SET_FLAG).map(Self::SetFlag),
            HP_DELTA => Ok(Self::HpDelta(payload.trim().parse().unwrap_or(0))),
            other => Err(AtomRejection::UnknownKind(other.to_string())),
        }
    }

    /// The atom kind as written by the game master.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MoveTo(_) => MOVE_TO,
            Self::AddItem(_) => ADD_ITEM,
            Self::RemoveItem(_) => REMOVE_ITEM,
            Self::SetFlag(_) => SET_FLAG,
            Self::HpDelta(_) => HP_DELTA,
        }
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveTo(s) | Self::AddItem(s) | Self::RemoveItem(s) | Self::SetFlag(s) => {
                write!(f, "{}:{s}", self.kind())
            }
            Self::HpDelta(n) => write!(f, "{}:{n}", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_kinds() {
        assert_eq!(
            StateChange::parse("move_to: cave "),
            Ok(StateChange::MoveTo("cave".to_string()))
        );
        assert_eq!(
            StateChange::parse("add_item:sword"),
            Ok(StateChange::AddItem("sword".to_string()))
        );
        assert_eq!(
            StateChange::parse("remove_item:sword"),
            Ok(StateChange::RemoveItem("sword".to_string()))
        );
        assert_eq!(
            StateChange::parse("set_flag:gate_open"),
            Ok(StateChange::SetFlag("gate_open".to_string()))
        );
        assert_eq!(StateChange::parse("hp_delta:-15"), Ok(StateChange::HpDelta(-15)));
        assert_eq!(StateChange::parse("hp_delta: +3"), Ok(StateChange::HpDelta(3)));
    }

    #[test]
    fn payload_may_contain_colons() {
        assert_eq!(
            StateChange::parse("move_to:tower: top floor"),
            Ok(StateChange::MoveTo("tower: top floor".to_string()))
        );
    }

    #[test]
    fn bad_hp_amount_is_zero() {
        assert_eq!(StateChange::parse("hp_delta:lots"), Ok(StateChange::HpDelta(0)));
        assert_eq!(StateChange::parse("hp_delta:"), Ok(StateChange::HpDelta(0)));
    }

    #[test]
    fn rejections() {
        assert_eq!(StateChange::parse("teleport"), Err(AtomRejection::Malformed));
        assert_eq!(
            StateChange::parse("teleport:moon"),
            Err(AtomRejection::UnknownKind("teleport".to_string()))
        );
        assert_eq!(
            StateChange::parse("MOVE_TO:cave"),
            Err(AtomRejection::UnknownKind("MOVE_TO".to_string()))
        );
        assert_eq!(
            StateChange::parse("add_item:   "),
            Err(AtomRejection::EmptyPayload("add_item"))
        );
    }

    #[test]
    fn display_uses_atom_syntax() {
        assert_eq!(StateChange::MoveTo("cave".to_string()).to_string(), "move_to:cave");
        assert_eq!(StateChange::HpDelta(-2).to_string(), "hp_delta:-2");
    }
}
