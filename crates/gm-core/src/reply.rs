//! Tolerant parsing of backend replies.
//!
//! The backend is asked for a JSON object but routinely wraps it in prose or
//! code fences, or returns nothing usable at all. Decoding is layered: the
//! whole text, then the outermost `{...}` span, then a fixed fallback. It
//! never fails.

use serde::{Deserialize, Serialize};

/// Narration used when no reply object can be recovered.
pub const FALLBACK_NARRATION: &str = "Invalid GM response.";

/// Narration text, either one block or a list of paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Narration {
    /// A single block of text.
    Text(String),
    /// Paragraphs to be shown on separate lines.
    Lines(Vec<String>),
}

impl Narration {
    /// Text for display: paragraphs trimmed and joined by newlines.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Lines(lines) => lines
                .iter()
                .map(|l| l.trim())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// The game master's answer to one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmReply {
    /// What the player is told.
    pub narration: Narration,
    /// State-change atoms, applied in order.
    pub state_change: Vec<String>,
}

impl GmReply {
    /// The reply used when the backend output cannot be decoded.
    pub fn fallback() -> Self {
        Self {
            narration: Narration::Text(FALLBACK_NARRATION.to_string()),
            state_change: Vec::new(),
        }
    }

    /// Parse backend output, discarding which layer succeeded.
    pub fn parse(raw: &str) -> Self {
        parse_reply(raw).0
    }
}

/// Which decoding layer produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// The whole output was a reply object.
    Direct,
    /// A reply object was found inside surrounding text.
    Embedded,
    /// Nothing decoded; the fallback reply was used.
    Fallback,
}

/// Recover a reply from arbitrary backend output.
///
/// A candidate only counts if it is an object carrying both `narration`
/// (string or list of strings) and `state_change` (list of strings). Extra
/// keys are ignored.
pub fn parse_reply(raw: &str) -> (GmReply, ReplySource) {
    if let Ok(reply) = serde_json::from_str::<GmReply>(raw) {
        return (reply, ReplySource::Direct);
    }

    if let Some(span) = outer_object(raw) {
        match serde_json::from_str::<GmReply>(span) {
            Ok(reply) => return (reply, ReplySource::Embedded),
            Err(e) => tracing::debug!(error = %e, "embedded reply did not decode"),
        }
    }

    tracing::warn!(len = raw.len(), "backend reply not understood, using fallback");
    (GmReply::fallback(), ReplySource::Fallback)
}

/// The span from the first `{` to the last `}`, inclusive.
fn outer_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}
