//! The rolling window of recent exchanges shown to the backend.

use gm_core::HistoryEntry;

/// Recent exchanges, oldest first, never longer than the window.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    window: usize,
}

impl History {
    /// Create an empty history keeping at most `window` entries.
    pub fn new(window: usize) -> Self {
        Self {
            entries: Vec::with_capacity(window),
            window,
        }
    }

    /// Append an entry, dropping the oldest ones beyond the window.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        if self.entries.len() > self.window {
            let excess = self.entries.len() - self.window;
            self.entries.drain(..excess);
        }
    }

    /// The retained entries, oldest first.
    pub fn recent(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    pub fn window(&self) -> usize {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::GmReply;

    fn entry(cmd: &str) -> HistoryEntry {
        HistoryEntry::new(cmd, GmReply::fallback())
    }

    #[test]
    fn keeps_the_newest_entries() {
        let mut h = History::new(2);
        for cmd in ["a", "b", "c"] {
            h.push(entry(cmd));
        }
        let players: Vec<&str> = h.recent().iter().map(|e| e.player.as_str()).collect();
        assert_eq!(players, ["b", "c"]);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn zero_window_keeps_nothing() {
        let mut h = History::new(0);
        h.push(entry("look"));
        assert!(h.is_empty());
        assert!(h.recent().is_empty());
    }

    #[test]
    fn under_the_window() {
        let mut h = History::new(6);
        h.push(entry("look"));
        assert_eq!(h.len(), 1);
        assert_eq!(h.window(), 6);
        assert_eq!(h.recent()[0].player, "look");
    }
}
