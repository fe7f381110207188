//! # Pending Votes
//!
//! Transient, in-process record of vote submissions awaiting confirmation.
//! Never persisted: a crash forgets it, which leaves the vote retryable.

use parking_lot::Mutex;
use shared_types::{Address, TxHandle, UnixSeconds, VoteOption};
use std::collections::HashMap;

type PendingKey = (String, Address);

/// A vote between submission and confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingVote {
    pub option: VoteOption,
    /// Set once the ledger accepted the submission.
    pub tx: Option<TxHandle>,
    pub started_at: UnixSeconds,
}

#[derive(Default)]
pub struct PendingVotes {
    inner: Mutex<HashMap<PendingKey, PendingVote>>,
}

impl PendingVotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the `(campaign, user)` slot. `None` if already claimed.
    pub fn try_begin(
        &self,
        campaign_id: &str,
        user: &Address,
        option: VoteOption,
        now: UnixSeconds,
    ) -> Option<InFlight<'_>> {
        let key = (campaign_id.to_string(), user.clone());
        let mut inner = self.inner.lock();
        if inner.contains_key(&key) {
            return None;
        }
        inner.insert(
            key.clone(),
            PendingVote {
                option,
                tx: None,
                started_at: now,
            },
        );
        Some(InFlight { owner: self, key })
    }

    pub fn get(&self, campaign_id: &str, user: &Address) -> Option<PendingVote> {
        self.inner
            .lock()
            .get(&(campaign_id.to_string(), user.clone()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// Releases the slot on drop, including when the submitting future is
/// cancelled.
pub struct InFlight<'a> {
    owner: &'a PendingVotes,
    key: PendingKey,
}

impl InFlight<'_> {
    pub fn attach(&self, tx: TxHandle) {
        if let Some(p) = self.owner.inner.lock().get_mut(&self.key) {
            p.tx = Some(tx);
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.owner.inner.lock().remove(&self.key);
    }
}
