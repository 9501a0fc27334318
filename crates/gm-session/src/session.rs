//! The interactive game session.
//!
//! `Session` owns the only [`GameState`] and is the only thing that mutates
//! it. Built-in commands are answered locally; everything else is one round
//! trip to the [`Backend`] followed by deterministic rule enforcement.

use gm_core::{
    GameState, HistoryEntry, Outcome, PromptBuilder, Rules, TranscriptEntry, apply_changes,
    evaluate, parse_reply, read_preamble,
};

use crate::backend::{self, Backend};
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::journal::{History, Transcript};
use crate::store::SaveStore;

/// Commands answered without the backend.
pub const BUILTINS: [&str; 5] = ["help", "inventory", "save", "load", "quit"];

/// Where the session is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for player input.
    Idle,
    /// A prompt has been sent and no reply has arrived yet.
    AwaitingBackend,
    /// A reply is being applied to the state.
    Applying,
    /// The game is over; no further input is accepted.
    Terminated,
}

/// The result of one line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Blank input; nothing happened.
    Ignored,
    /// A built-in command answered locally.
    Info(String),
    /// The game master's narration, and the outcome if the game just ended.
    Narration {
        /// Text for the player.
        text: String,
        /// Terminal outcome reached by this turn.
        outcome: Option<Outcome>,
    },
    /// The player asked to leave.
    Quit,
}

/// An interactive game session.
pub struct Session {
    rules: Rules,
    preamble: String,
    state: GameState,
    history: History,
    transcript: Transcript,
    store: SaveStore,
    backend: Box<dyn Backend>,
    phase: Phase,
    outcome: Option<Outcome>,
}

impl Session {
    /// Load the rules and preamble named by `config` and connect its backend.
    pub fn start(config: &SessionConfig) -> SessionResult<Self> {
        let backend = backend::connect(&config.backend)?;
        Self::with_backend(config, backend)
    }

    /// Load the rules and preamble named by `config`, using `backend`.
    pub fn with_backend(config: &SessionConfig, backend: Box<dyn Backend>) -> SessionResult<Self> {
        let rules = Rules::load(&config.rules_path)?;
        let preamble = read_preamble(&config.preamble_path)?;
        Ok(Self::new(rules, preamble, backend, config))
    }

    /// Create a session from already loaded parts.
    pub fn new(
        rules: Rules,
        preamble: String,
        backend: Box<dyn Backend>,
        config: &SessionConfig,
    ) -> Self {
        let history = History::new(config.history_window);
        tracing::info!(
            backend = backend.name(),
            window = history.window(),
            "session started"
        );
        Self {
            state: rules.initial_state(),
            rules,
            preamble,
            history,
            transcript: Transcript::new(&config.transcript_path),
            store: SaveStore::new(&config.save_path),
            backend,
            phase: Phase::Idle,
            outcome: None,
        }
    }

    /// The current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The game rules.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The recent exchanges sent along with each prompt.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// How the game ended, if it has.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Description of the connected backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// The transcript file.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The prompt the backend would receive for `command` right now.
    pub fn preview(&self, command: &str) -> SessionResult<String> {
        let prompt = PromptBuilder::new(&self.preamble, &self.rules).build(
            &self.state,
            self.history.recent(),
            command.trim(),
        )?;
        Ok(prompt)
    }

    /// Process a line of player input.
    pub fn process(&mut self, input: &str) -> SessionResult<Turn> {
        if self.phase == Phase::Terminated {
            return Err(SessionError::Terminated);
        }

        let command = input.trim();
        if command.is_empty() {
            return Ok(Turn::Ignored);
        }

        match command.to_lowercase().as_str() {
            "help" => Ok(Turn::Info(self.help())),
            "inventory" => Ok(Turn::Info(format!(
                "Inventory: {}",
                self.state.inventory_summary()
            ))),
            "save" => self.save(),
            "load" => self.load(),
            "quit" => {
                self.phase = Phase::Terminated;
                Ok(Turn::Quit)
            }
            _ => self.play(command),
        }
    }

    fn help(&self) -> String {
        format!(
            "Commands: {}\nBuilt-ins: {}",
            self.rules.commands.join(", "),
            BUILTINS.join(", ")
        )
    }

    fn save(&self) -> SessionResult<Turn> {
        self.store.save(&self.state)?;
        tracing::info!(path = %self.store.path().display(), turns = self.state.turns, "saved");
        Ok(Turn::Info(format!(
            "Saved game → {}",
            self.store.path().display()
        )))
    }

    fn load(&mut self) -> SessionResult<Turn> {
        if !self.store.exists() {
            return Ok(Turn::Info("No save file found.".to_string()));
        }
        match self.store.load()? {
            Some(state) => {
                self.state = state;
                tracing::info!(turns = self.state.turns, "save loaded");
                Ok(Turn::Info("Loaded save.".to_string()))
            }
            None => Ok(Turn::Info("No save file found.".to_string())),
        }
    }

    fn play(&mut self, command: &str) -> SessionResult<Turn> {
        let prompt = self.preview(command)?;

        self.phase = Phase::AwaitingBackend;
        let raw = match self.backend.complete(&prompt) {
            Ok(raw) => raw,
            Err(e) => {
                self.phase = Phase::Terminated;
                return Err(e.into());
            }
        };

        self.phase = Phase::Applying;
        let (reply, source) = parse_reply(&raw);
        let report = apply_changes(&mut self.state, reply.state_change.as_slice());
        let outcome = evaluate(&self.state, &self.rules.end_conditions);

        let text = reply.narration.render();
        let entry = HistoryEntry::new(command, reply);
        if let Err(e) = self.transcript.append(&TranscriptEntry::new(&entry, &self.state)) {
            tracing::warn!(error = %e, "transcript not written");
        }
        self.history.push(entry);

        tracing::info!(
            turn = self.state.turns,
            reply = ?source,
            applied = report.applied(),
            ignored = report.ignored(),
            outcome = ?outcome,
            "turn resolved"
        );

        self.outcome = outcome;
        self.phase = if outcome.is_some() {
            Phase::Terminated
        } else {
            Phase::Idle
        };
        Ok(Turn::Narration { text, outcome })
    }
}
