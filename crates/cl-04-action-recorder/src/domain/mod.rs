//! Domain layer for the action recorder.

pub mod pending;

pub use pending::{InFlight, PendingVote, PendingVotes};

use shared_types::VoteOption;

/// Result of a like or comment-like.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Marker created and counter incremented.
    Recorded,
    /// A marker already existed. Nothing was written.
    AlreadyRecorded,
}

/// Result of a vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Ledger confirmed the vote and the marker was written.
    Recorded {
        option: VoteOption,
        tx_hash: String,
        block_number: u64,
    },
    /// The user already holds a vote marker. Nothing was submitted.
    AlreadyRecorded { option: Option<VoteOption> },
}

impl VoteOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, VoteOutcome::Recorded { .. })
    }
}

/// Upper bound on comment length, in characters.
pub const DEFAULT_MAX_COMMENT_CHARS: usize = 2_000;

/// Validate comment text. Returned text is the input verbatim.
pub fn validate_comment(text: &str, max_chars: usize) -> Result<&str, String> {
    if text.trim().is_empty() {
        return Err("comment text must not be empty".to_string());
    }
    let chars = text.chars().count();
    if chars > max_chars {
        return Err(format!("comment is {chars} characters, limit is {max_chars}"));
    }
    Ok(text)
}
