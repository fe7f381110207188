//! In-Memory Ledger Adapter
//!
//! A simulated governance chain implementing both `LedgerReader` and
//! `LedgerWriter`. Submissions are pre-flight checked (like gas estimation)
//! and queued; `await_confirmation` includes them in submission order and
//! re-checks against the state at inclusion, so two racing votes from the
//! same account are both accepted for submission but only one confirms.

use crate::domain::revert::{classify_revert, revert_reasons};
use crate::ports::outbound::{LedgerReader, LedgerWriter};
use async_trait::async_trait;
use parking_lot::RwLock;
use sha3::{Digest, Keccak256};
use shared_types::{
    Address, CampaignLedgerView, CampaignStatus, LedgerError, LedgerId, LedgerResult,
    TimeSource, TxConfirmation, TxHandle, TxReceipt, VoteOption,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// A queued ledger call.
#[derive(Clone, Debug)]
enum LedgerCall {
    Vote {
        ledger_id: LedgerId,
        option: VoteOption,
        weight: u64,
    },
    Create {
        title: String,
        duration_secs: u64,
        allow_abstain: bool,
    },
    UpdateStatus {
        ledger_id: LedgerId,
        status: CampaignStatus,
    },
}

impl LedgerCall {
    fn target(&self) -> Option<LedgerId> {
        match self {
            LedgerCall::Vote { ledger_id, .. } | LedgerCall::UpdateStatus { ledger_id, .. } => {
                Some(*ledger_id)
            }
            LedgerCall::Create { .. } => None,
        }
    }
}

#[derive(Clone, Debug)]
struct PendingTx {
    sender: Address,
    call: LedgerCall,
}

struct LedgerState {
    admin: Address,
    campaigns: Vec<CampaignLedgerView>,
    voters: HashSet<(LedgerId, Address)>,
    /// Submission order is inclusion order.
    pending: BTreeMap<u64, (String, PendingTx)>,
    confirmed: HashMap<String, TxConfirmation>,
    nonce: u64,
    block_number: u64,
    cancel_next_submission: bool,
    failing_reads: u32,
}

/// Simulated chain.
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
    time: Arc<dyn TimeSource>,
}

impl InMemoryLedger {
    /// Create an empty ledger administered by `admin`.
    pub fn new(admin: Address, time: Arc<dyn TimeSource>) -> Self {
        Self {
            state: RwLock::new(LedgerState {
                admin,
                campaigns: Vec::new(),
                voters: HashSet::new(),
                pending: BTreeMap::new(),
                confirmed: HashMap::new(),
                nonce: 0,
                block_number: 0,
                cancel_next_submission: false,
                failing_reads: 0,
            }),
            time,
        }
    }

    /// Insert a campaign directly, bypassing transactions. Returns its id.
    pub fn seed_campaign(
        &self,
        title: &str,
        status: CampaignStatus,
        end_time: u64,
        allow_abstain: bool,
    ) -> LedgerId {
        let mut state = self.state.write();
        let id = state.campaigns.len() as LedgerId;
        state.campaigns.push(CampaignLedgerView {
            id,
            title: title.to_string(),
            status_raw: status.ledger_index(),
            yes_votes: 0,
            no_votes: 0,
            abstain_votes: 0,
            start_time: self.time.now(),
            end_time,
            allow_abstain,
            is_deleted: false,
        });
        id
    }

    /// Overwrite the raw status index of a campaign (test hook).
    pub fn set_status_raw(&self, ledger_id: LedgerId, status_raw: u8) {
        if let Some(c) = self.state.write().campaigns.get_mut(ledger_id as usize) {
            c.status_raw = status_raw;
        }
    }

    /// Overwrite the end time of a campaign (test hook).
    pub fn set_end_time(&self, ledger_id: LedgerId, end_time: u64) {
        if let Some(c) = self.state.write().campaigns.get_mut(ledger_id as usize) {
            c.end_time = end_time;
        }
    }

    /// Overwrite the tallies of a campaign (test hook).
    pub fn set_tallies(&self, ledger_id: LedgerId, yes: u64, no: u64, abstain: u64) {
        if let Some(c) = self.state.write().campaigns.get_mut(ledger_id as usize) {
            c.yes_votes = yes;
            c.no_votes = no;
            c.abstain_votes = abstain;
        }
    }

    /// The next submission is rejected as if the wallet declined to sign.
    pub fn cancel_next_submission(&self) {
        self.state.write().cancel_next_submission = true;
    }

    /// The next `count` campaign reads fail with a transient error.
    pub fn fail_next_reads(&self, count: u32) {
        self.state.write().failing_reads = count;
    }

    /// Number of submitted but unconfirmed transactions.
    pub fn pending_count(&self) -> usize {
        self.state.read().pending.len()
    }

    /// Number of transactions accepted so far (pending or confirmed).
    pub fn submitted_count(&self) -> u64 {
        self.state.read().nonce
    }

    fn tx_hash(nonce: u64, sender: &Address, call: &LedgerCall) -> String {
        let mut hasher = Keccak256::new();
        hasher.update(nonce.to_be_bytes());
        hasher.update(sender.as_str().as_bytes());
        hasher.update(format!("{call:?}").as_bytes());
        format!("0x{}", hex::encode(hasher.finalize()))
    }

    /// Contract checks. `Err` carries the revert reason.
    fn check(state: &LedgerState, sender: &Address, call: &LedgerCall, now: u64) -> Result<(), String> {
        match call {
            LedgerCall::Create {
                title,
                duration_secs,
                ..
            } => {
                if sender != &state.admin {
                    return Err(revert_reasons::ONLY_ADMIN.to_string());
                }
                if title.trim().is_empty() {
                    return Err(revert_reasons::EMPTY_TITLE.to_string());
                }
                if *duration_secs == 0 {
                    return Err(revert_reasons::ZERO_DURATION.to_string());
                }
                Ok(())
            }
            LedgerCall::UpdateStatus { ledger_id, .. } => {
                if sender != &state.admin {
                    return Err(revert_reasons::ONLY_ADMIN.to_string());
                }
                if state.campaigns.get(*ledger_id as usize).is_none() {
                    return Err(revert_reasons::INVALID_CAMPAIGN.to_string());
                }
                Ok(())
            }
            LedgerCall::Vote {
                ledger_id,
                option,
                weight,
            } => {
                let campaign = state
                    .campaigns
                    .get(*ledger_id as usize)
                    .ok_or_else(|| revert_reasons::INVALID_CAMPAIGN.to_string())?;
                if campaign.is_deleted {
                    return Err(revert_reasons::CAMPAIGN_DELETED.to_string());
                }
                if campaign.status_raw != CampaignStatus::Live.ledger_index() {
                    return Err(revert_reasons::NOT_LIVE.to_string());
                }
                if campaign.end_time > 0 && now > campaign.end_time {
                    return Err(revert_reasons::PERIOD_ENDED.to_string());
                }
                if state.voters.contains(&(*ledger_id, sender.clone())) {
                    return Err(revert_reasons::ALREADY_VOTED.to_string());
                }
                if *option == VoteOption::Abstain && !campaign.allow_abstain {
                    return Err(revert_reasons::ABSTAIN_NOT_ALLOWED.to_string());
                }
                if *weight == 0 {
                    return Err(revert_reasons::ZERO_POWER.to_string());
                }
                let tally = match option {
                    VoteOption::Yes => campaign.yes_votes,
                    VoteOption::No => campaign.no_votes,
                    VoteOption::Abstain => campaign.abstain_votes,
                };
                if tally.checked_add(*weight).is_none() {
                    return Err(revert_reasons::TALLY_OVERFLOW.to_string());
                }
                Ok(())
            }
        }
    }

    /// Apply an already-checked call. Returns the created campaign id, if any.
    fn apply(state: &mut LedgerState, sender: &Address, call: &LedgerCall, now: u64) -> Option<LedgerId> {
        match call {
            LedgerCall::Create {
                title,
                duration_secs,
                allow_abstain,
            } => {
                let id = state.campaigns.len() as LedgerId;
                state.campaigns.push(CampaignLedgerView {
                    id,
                    title: title.clone(),
                    status_raw: CampaignStatus::Live.ledger_index(),
                    yes_votes: 0,
                    no_votes: 0,
                    abstain_votes: 0,
                    start_time: now,
                    end_time: now.saturating_add(*duration_secs),
                    allow_abstain: *allow_abstain,
                    is_deleted: false,
                });
                Some(id)
            }
            LedgerCall::UpdateStatus { ledger_id, status } => {
                if let Some(c) = state.campaigns.get_mut(*ledger_id as usize) {
                    c.status_raw = status.ledger_index();
                }
                None
            }
            LedgerCall::Vote {
                ledger_id,
                option,
                weight,
            } => {
                if let Some(c) = state.campaigns.get_mut(*ledger_id as usize) {
                    match option {
                        VoteOption::Yes => c.yes_votes = c.yes_votes.saturating_add(*weight),
                        VoteOption::No => c.no_votes = c.no_votes.saturating_add(*weight),
                        VoteOption::Abstain => {
                            c.abstain_votes = c.abstain_votes.saturating_add(*weight)
                        }
                    }
                }
                state.voters.insert((*ledger_id, sender.clone()));
                None
            }
        }
    }

    fn submit(&self, sender: &Address, call: LedgerCall) -> LedgerResult<TxHandle> {
        let now = self.time.now();
        let mut state = self.state.write();

        if state.cancel_next_submission {
            state.cancel_next_submission = false;
            return Err(classify_revert(call.target(), revert_reasons::USER_REJECTED));
        }

        Self::check(&state, sender, &call, now)
            .map_err(|reason| classify_revert(call.target(), &reason))?;

        let nonce = state.nonce;
        state.nonce += 1;
        let tx_hash = Self::tx_hash(nonce, sender, &call);
        debug!(tx_hash = %tx_hash, ?call, "[cl-01] transaction accepted for inclusion");
        state.pending.insert(
            nonce,
            (
                tx_hash.clone(),
                PendingTx {
                    sender: sender.clone(),
                    call,
                },
            ),
        );
        Ok(TxHandle::new(tx_hash))
    }

    /// Include every pending transaction up to and including `tx_hash`.
    fn include_through(&self, tx_hash: &str) -> LedgerResult<TxConfirmation> {
        let now = self.time.now();
        let mut state = self.state.write();

        if let Some(done) = state.confirmed.get(tx_hash) {
            return Ok(done.clone());
        }
        let target_nonce = state
            .pending
            .iter()
            .find(|(_, (hash, _))| hash == tx_hash)
            .map(|(nonce, _)| *nonce)
            .ok_or_else(|| LedgerError::UnknownTransaction {
                tx_hash: tx_hash.to_string(),
            })?;

        let ready: Vec<u64> = state.pending.range(..=target_nonce).map(|(n, _)| *n).collect();
        for nonce in ready {
            let Some((hash, tx)) = state.pending.remove(&nonce) else {
                continue;
            };
            let outcome = match Self::check(&state, &tx.sender, &tx.call, now) {
                Ok(()) => {
                    let created = Self::apply(&mut state, &tx.sender, &tx.call, now);
                    state.block_number += 1;
                    TxConfirmation::Confirmed(TxReceipt {
                        tx_hash: hash.clone(),
                        block_number: state.block_number,
                        created_campaign: created,
                    })
                }
                Err(reason) => TxConfirmation::Failed { reason },
            };
            state.confirmed.insert(hash, outcome);
        }

        state
            .confirmed
            .get(tx_hash)
            .cloned()
            .ok_or_else(|| LedgerError::UnknownTransaction {
                tx_hash: tx_hash.to_string(),
            })
    }
}

#[async_trait]
impl LedgerReader for InMemoryLedger {
    async fn read_campaign(&self, ledger_id: LedgerId) -> LedgerResult<CampaignLedgerView> {
        {
            let mut state = self.state.write();
            if state.failing_reads > 0 {
                state.failing_reads -= 1;
                return Err(LedgerError::Transient {
                    reason: "rpc request timed out".to_string(),
                });
            }
        }
        self.state
            .read()
            .campaigns
            .get(ledger_id as usize)
            .cloned()
            .ok_or_else(|| classify_revert(Some(ledger_id), revert_reasons::INVALID_CAMPAIGN))
    }

    async fn read_campaign_count(&self) -> LedgerResult<u64> {
        Ok(self.state.read().campaigns.len() as u64)
    }

    async fn read_admin(&self) -> LedgerResult<Address> {
        Ok(self.state.read().admin.clone())
    }

    async fn has_voted(&self, ledger_id: LedgerId, voter: &Address) -> LedgerResult<bool> {
        Ok(self
            .state
            .read()
            .voters
            .contains(&(ledger_id, voter.clone())))
    }
}

#[async_trait]
impl LedgerWriter for InMemoryLedger {
    async fn submit_vote(
        &self,
        sender: &Address,
        ledger_id: LedgerId,
        option: VoteOption,
        weight: u64,
    ) -> LedgerResult<TxHandle> {
        self.submit(
            sender,
            LedgerCall::Vote {
                ledger_id,
                option,
                weight,
            },
        )
    }

    async fn submit_create(
        &self,
        sender: &Address,
        title: &str,
        duration_secs: u64,
        allow_abstain: bool,
    ) -> LedgerResult<TxHandle> {
        self.submit(
            sender,
            LedgerCall::Create {
                title: title.to_string(),
                duration_secs,
                allow_abstain,
            },
        )
    }

    async fn submit_status_update(
        &self,
        sender: &Address,
        ledger_id: LedgerId,
        status: CampaignStatus,
    ) -> LedgerResult<TxHandle> {
        self.submit(sender, LedgerCall::UpdateStatus { ledger_id, status })
    }

    async fn await_confirmation(&self, tx: &TxHandle) -> LedgerResult<TxConfirmation> {
        let outcome = self.include_through(&tx.tx_hash)?;
        if let TxConfirmation::Confirmed(receipt) = &outcome {
            info!(
                tx_hash = %receipt.tx_hash,
                block = receipt.block_number,
                "[cl-01] transaction confirmed"
            );
        }
        Ok(outcome)
    }
}
