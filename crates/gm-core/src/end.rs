use std::fmt;

use crate::rules::EndConditions;
use crate::state::GameState;

/// A terminal game outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every win flag is raised.
    Win,
    /// A lose flag is raised.
    Lose,
    /// The turn budget is spent.
    TurnLimit,
}

impl Outcome {
    /// Message shown to the player when the game ends.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Win => "You won!",
            Self::Lose => "You lost!",
            Self::TurnLimit => "Max turns exceeded!",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Check the end conditions, first match wins: win, lose, turn limit.
///
/// An empty `WIN_ALL_FLAGS` list is satisfied vacuously, so such a game is won
/// on the first check. Rules files that want no win condition must list a
/// flag the game master never raises.
pub fn evaluate(state: &GameState, end: &EndConditions) -> Option<Outcome> {
    if end.win_all_flags.iter().all(|f| state.flag(f)) {
        return Some(Outcome::Win);
    }
    if end.lose_any_flags.iter().any(|f| state.flag(f)) {
        return Some(Outcome::Lose);
    }
    if end.max_turns.is_some_and(|max| state.turns >= max) {
        return Some(Outcome::TurnLimit);
    }
    None
}
