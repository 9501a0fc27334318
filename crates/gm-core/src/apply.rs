//! The state mutator.
//!
//! Applies one batch of atoms from the game master to the game state. The
//! batch never fails: atoms that do not decode are skipped and recorded in
//! the [`ApplyReport`].

use crate::change::{AtomRejection, StateChange};
use crate::state::{GameState, HP_ZERO_FLAG};

/// What happened to a single atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomOutcome {
    /// The atom decoded and was applied.
    Applied(StateChange),
    /// The atom was skipped.
    Ignored {
        /// The atom as received.
        atom: String,
        /// Why it was skipped.
        reason: AtomRejection,
    },
}

/// Per-atom outcomes of one batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// One entry per input atom.
    pub outcomes: Vec<AtomOutcome>,
}

impl ApplyReport {
    /// Number of atoms applied.
    pub fn applied(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, AtomOutcome::Applied(_)))
            .count()
    }

    /// Number of atoms skipped.
    pub fn ignored(&self) -> usize {
        self.outcomes.len() - self.applied()
    }
}

/// Apply a batch of atoms in order, then count the turn.
///
/// Later atoms see the effect of earlier ones, so `remove_item:x` followed by
/// `add_item:x` leaves `x` carried while the reverse order drops it. `turns`
/// grows by exactly one per call, whatever the batch holds.
pub fn apply_changes<S: AsRef<str>>(state: &mut GameState, atoms: &[S]) -> ApplyReport {
    let mut report = ApplyReport::default();

    for atom in atoms {
        let atom = atom.as_ref();
        match StateChange::parse(atom) {
            Ok(change) => {
                tracing::debug!(%change, "applying state change");
                apply_one(state, &change);
                report.outcomes.push(AtomOutcome::Applied(change));
            }
            Err(reason) => {
                tracing::debug!(atom, %reason, "ignoring state change");
                report.outcomes.push(AtomOutcome::Ignored {
                    atom: atom.to_string(),
                    reason,
                });
            }
        }
    }

    state.turns = state.turns.saturating_add(1);
    report
}

fn apply_one(state: &mut GameState, change: &StateChange) {
    match change {
        StateChange::MoveTo(location) => state.location = Some(location.clone()),
        StateChange::AddItem(item) => {
            state.add_item(item.as_str());
        }
        StateChange::RemoveItem(item) => {
            state.remove_item(item);
        }
        StateChange::SetFlag(flag) => state.set_flag(flag.as_str()),
        StateChange::HpDelta(delta) => {
            state.hp = state.hp.saturating_add(*delta);
            if state.hp <= 0 {
                state.set_flag(HP_ZERO_FLAG);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state_with_hp(hp: i64) -> GameState {
        GameState {
            hp,
            ..GameState::default()
        }
    }

    #[test]
    fn move_to_sets_trimmed_location() {
        let mut state = GameState::default();
        apply_changes(&mut state, &["move_to:  cave mouth "]);
        assert_eq!(state.location.as_deref(), Some("cave mouth"));
    }

    #[test]
    fn later_atoms_override_earlier_ones() {
        let mut state = GameState::default();
        apply_changes(&mut state, &["move_to:cave", "move_to:river"]);
        assert_eq!(state.location.as_deref(), Some("river"));
    }

    #[test]
    fn add_item_is_idempotent() {
        let mut state = GameState::default();
        apply_changes(&mut state, &["add_item:sword", "add_item:sword"]);
        apply_changes(&mut state, &["add_item:sword"]);
        assert_eq!(state.inventory, vec!["sword"]);
    }

    #[test]
    fn remove_before_add_keeps_item() {
        let mut state = GameState::default();
        apply_changes(&mut state, &["remove_item:sword", "add_item:sword"]);
        assert_eq!(state.inventory, vec!["sword"]);
    }

    #[test]
    fn add_before_remove_drops_item() {
        let mut state = GameState::default();
        apply_changes(&mut state, &["add_item:sword", "remove_item:sword"]);
        assert!(state.inventory.is_empty());
    }

    #[test]
    fn remove_missing_item_is_noop() {
        let mut state = GameState::default();
        state.add_item("rope");
        let report = apply_changes(&mut state, &["remove_item:sword"]);
        assert_eq!(state.inventory, vec!["rope"]);
        assert_eq!(report.applied(), 1);
    }

    #[test]
    fn set_flag_raises_flag() {
        let mut state = GameState::default();
        apply_changes(&mut state, &["set_flag:bridge_down"]);
        assert!(state.flag("bridge_down"));
    }

    #[test]
    fn hp_delta_to_zero_raises_hp_zero() {
        let mut state = state_with_hp(10);
        apply_changes(&mut state, &["hp_delta:-15"]);
        assert_eq!(state.hp, -5);
        assert!(state.flag(HP_ZERO_FLAG));
    }

    #[test]
    fn hp_zero_is_sticky() {
        let mut state = state_with_hp(3);
        apply_changes(&mut state, &["hp_delta:-3", "hp_delta:+10"]);
        assert_eq!(state.hp, 10);
        assert!(state.flag(HP_ZERO_FLAG));

        apply_changes(&mut state, &["hp_delta:5"]);
        assert!(state.flag(HP_ZERO_FLAG));
    }

    #[test]
    fn unparsable_hp_delta_counts_as_zero() {
        let mut state = state_with_hp(4);
        let report = apply_changes(&mut state, &["hp_delta:ouch", "add_item:bandage"]);
        assert_eq!(state.hp, 4);
        assert_eq!(state.inventory, vec!["bandage"]);
        assert_eq!(report.applied(), 2);
    }

    #[test]
    fn unparsable_hp_delta_still_checks_hp() {
        let mut state = state_with_hp(0);
        apply_changes(&mut state, &["hp_delta:??"]);
        assert!(state.flag(HP_ZERO_FLAG));
    }

    #[test]
    fn unknown_atoms_are_ignored() {
        let mut state = state_with_hp(5);
        let before = state.clone();
        let report = apply_changes(&mut state, &["summon:dragon", "nonsense", "set_flag:"]);

        assert_eq!(report.applied(), 0);
        assert_eq!(report.ignored(), 3);
        assert_eq!(state.turns, before.turns + 1);
        assert_eq!(
            GameState {
                turns: before.turns,
                ..state
            },
            before
        );
    }

    #[test]
    fn empty_batch_counts_a_turn() {
        let mut state = GameState::default();
        let none: [&str; 0] = [];
        apply_changes(&mut state, &none);
        apply_changes(&mut state, &none);
        assert_eq!(state.turns, 2);
    }

    #[test]
    fn report_preserves_order() {
        let mut state = GameState::default();
        let report = apply_changes(&mut state, &["bogus", "add_item:key"]);
        assert!(matches!(report.outcomes[0], AtomOutcome::Ignored { .. }));
        assert_eq!(
            report.outcomes[1],
            AtomOutcome::Applied(StateChange::AddItem("key".to_string()))
        );
    }

    fn atom() -> impl Strategy<Value = String> {
        prop_oneof![
            "(cave|river|tower)".prop_map(|s| format!("move_to:{s}")),
            "(sword|rope|key)".prop_map(|s| format!("add_item:{s}")),
            "(sword|rope|key)".prop_map(|s| format!("remove_item:{s}")),
            "(lit|open|won)".prop_map(|s| format!("set_flag:{s}")),
            (-20i64..20).prop_map(|n| format!("hp_delta:{n}")),
            ".*",
        ]
    }

    proptest! {
        #[test]
        fn every_batch_counts_exactly_one_turn(
            turns in 0u64..1000,
            atoms in proptest::collection::vec(atom(), 0..12),
        ) {
            let mut state = GameState { turns, ..GameState::default() };
            apply_changes(&mut state, &atoms);
            prop_assert_eq!(state.turns, turns + 1);
        }

        #[test]
        fn inventory_never_holds_duplicates(
            batches in proptest::collection::vec(proptest::collection::vec(atom(), 0..8), 1..5),
        ) {
            let mut state = GameState::default();
            for batch in &batches {
                apply_changes(&mut state, batch);
            }
            let mut seen = state.inventory.clone();
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), state.inventory.len());
        }

        #[test]
        fn hp_zero_set_iff_hp_ever_reached_zero(
            start in 1i64..30,
            deltas in proptest::collection::vec(-15i64..15, 0..10),
        ) {
            let mut state = state_with_hp(start);
            let atoms: Vec<String> = deltas.iter().map(|d| format!("hp_delta:{d}")).collect();
            apply_changes(&mut state, &atoms);

            let mut hp = start;
            let mut reached_zero = false;
            for d in &deltas {
                hp += d;
                reached_zero |= hp <= 0;
            }
            prop_assert_eq!(state.hp, hp);
            prop_assert_eq!(state.flag(HP_ZERO_FLAG), reached_zero);
        }
    }
}
