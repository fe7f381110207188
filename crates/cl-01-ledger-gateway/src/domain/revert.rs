//! # Revert Classification
//!
//! Chain clients surface failures as free-form messages. This module maps
//! them onto `LedgerError` kinds so callers can decide between invalidation,
//! retry-later, and surfacing a reason to the user.
//!
//! | Message fragment | Kind |
//! |------------------|------|
//! | `Invalid campaign ID` | `NotFound` |
//! | `User rejected the request` | `UserCancelled` |
//! | `insufficient funds`, `Insufficient balance`, `Voting power` | `InsufficientWeight` |
//! | `timeout`, `timed out`, `network`, `connection` | `Transient` |
//! | anything else | `Rejected` (verbatim) |

use shared_types::{LedgerError, LedgerId};

/// Revert reasons emitted by the governance contract.
pub mod revert_reasons {
    pub const INVALID_CAMPAIGN: &str = "Invalid campaign ID";
    pub const ONLY_ADMIN: &str = "Only admin can access";
    pub const NOT_LIVE: &str = "Campaign is not live";
    pub const PERIOD_ENDED: &str = "Voting period has ended";
    pub const ALREADY_VOTED: &str = "User already voted";
    pub const ABSTAIN_NOT_ALLOWED: &str = "Abstain not allowed";
    pub const ZERO_POWER: &str = "Voting power must be greater than zero";
    pub const CAMPAIGN_DELETED: &str = "Campaign deleted";
    pub const EMPTY_TITLE: &str = "Title required";
    pub const ZERO_DURATION: &str = "Duration must be greater than zero";
    pub const TALLY_OVERFLOW: &str = "Vote tally overflow";
    pub const USER_REJECTED: &str = "User rejected the request";
}

const TRANSIENT_MARKERS: [&str; 5] = [
    "timeout",
    "timed out",
    "network",
    "connection",
    "temporarily unavailable",
];

const WEIGHT_MARKERS: [&str; 3] = ["insufficient funds", "insufficient balance", "voting power"];

/// Classify a raw ledger failure message.
///
/// `ledger_id` is the campaign the call targeted, if any; without it an
/// "invalid id" message cannot name the missing campaign and is reported
/// as a plain rejection.
pub fn classify_revert(ledger_id: Option<LedgerId>, message: &str) -> LedgerError {
    let lower = message.to_ascii_lowercase();

    if lower.contains(&revert_reasons::INVALID_CAMPAIGN.to_ascii_lowercase()) {
        if let Some(ledger_id) = ledger_id {
            return LedgerError::NotFound { ledger_id };
        }
    }
    if lower.contains(&revert_reasons::USER_REJECTED.to_ascii_lowercase()) {
        return LedgerError::UserCancelled;
    }
    if WEIGHT_MARKERS.iter().any(|m| lower.contains(m)) {
        return LedgerError::InsufficientWeight {
            reason: message.to_string(),
        };
    }
    if TRANSIENT_MARKERS.iter().any(|m| lower.contains(m)) {
        return LedgerError::Transient {
            reason: message.to_string(),
        };
    }
    LedgerError::Rejected {
        reason: message.to_string(),
    }
}
