//! Driven Ports (SPI - Outbound Dependencies)
//!
//! These are the interfaces the host application implements against a real
//! chain client. `InMemoryLedger` implements both for tests and demos.

use async_trait::async_trait;
use shared_types::{
    Address, CampaignLedgerView, CampaignStatus, LedgerId, LedgerResult, TxConfirmation,
    TxHandle, VoteOption,
};

/// Read-only accessor to authoritative chain state.
///
/// Reads are idempotent and may be issued concurrently.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Read one campaign. Unknown ids fail with `LedgerError::NotFound`.
    async fn read_campaign(&self, ledger_id: LedgerId) -> LedgerResult<CampaignLedgerView>;

    /// Read one campaign bypassing any read cache.
    ///
    /// Used wherever a decision must not rest on a stale view
    /// (administrative re-validation).
    async fn read_campaign_fresh(&self, ledger_id: LedgerId) -> LedgerResult<CampaignLedgerView> {
        self.read_campaign(ledger_id).await
    }

    /// Total number of campaigns ever created. Valid ids are `0..count`.
    async fn read_campaign_count(&self) -> LedgerResult<u64>;

    /// Campaign count bypassing any read cache.
    async fn read_campaign_count_fresh(&self) -> LedgerResult<u64> {
        self.read_campaign_count().await
    }

    /// Ledger admin identity.
    async fn read_admin(&self) -> LedgerResult<Address>;

    /// Whether `voter` already has a vote recorded on the ledger.
    async fn has_voted(&self, ledger_id: LedgerId, voter: &Address) -> LedgerResult<bool>;

    /// Drop any cached view of `ledger_id`. No-op for uncached readers.
    fn invalidate(&self, _ledger_id: LedgerId) {}
}

/// Submits ledger-mutating intents.
///
/// Submission returning `Ok` means the network accepted the transaction,
/// not that it is final; call `await_confirmation` for the outcome.
/// Implementations must never retry a submission on their own.
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    /// Cast a weighted vote on behalf of `sender`.
    async fn submit_vote(
        &self,
        sender: &Address,
        ledger_id: LedgerId,
        option: VoteOption,
        weight: u64,
    ) -> LedgerResult<TxHandle>;

    /// Create a campaign open for `duration_secs` from inclusion.
    async fn submit_create(
        &self,
        sender: &Address,
        title: &str,
        duration_secs: u64,
        allow_abstain: bool,
    ) -> LedgerResult<TxHandle>;

    /// Move a campaign to a new lifecycle stage.
    async fn submit_status_update(
        &self,
        sender: &Address,
        ledger_id: LedgerId,
        status: CampaignStatus,
    ) -> LedgerResult<TxHandle>;

    /// Wait until the transaction is included or has failed.
    async fn await_confirmation(&self, tx: &TxHandle) -> LedgerResult<TxConfirmation>;
}
