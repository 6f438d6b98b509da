//! Transaction composer
//!
//! Builds and submits signed instruction batches against the deployed swap
//! program. The component modules, leaf first:
//!
//! - **errors**: composition error taxonomy
//! - **ledger**: the cluster collaborator seam ([`LedgerRpc`])
//! - **accounts**: fixed account reference templates per operation kind
//! - **derive**: seed-derived address computation
//! - **provision**: idempotent account creation
//! - **preflight**: fee and balance checks (with optional faucet funding)
//! - **submit**: instruction planning, signing, submission, confirmation
//! - **readback**: post-confirmation account state decoding
//!
//! All state a flow needs lives in a [`Composer`] created at flow start and
//! dropped at flow end; there is no process-wide connection or payer. A
//! single `Composer` drives one logical flow at a time — concurrent flows
//! sharing a signer compete for sequencing at the cluster and are not
//! arbitrated here.

pub mod accounts;
pub mod derive;
pub mod errors;
pub mod ledger;
mod preflight;
mod provision;
mod readback;
mod submit;

pub use accounts::{build, OperationKind, Role, RoleMap};
pub use derive::derive_address;
pub use errors::ComposerError;
pub use ledger::{LedgerRpc, RpcLedger, SignatureStatus};
pub use provision::Provisioned;
pub use submit::{plan_instructions, SubmitOutcome};

use std::sync::Arc;
use std::time::Duration;

use solana_sdk::pubkey::Pubkey;

use crate::wallet::WalletManager;

/// Default bound on confirmation waiting.
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);

/// Default pause between confirmation polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Context object for one composition flow.
///
/// Owns the ledger handle, the fee-paying/authority wallet and the timing
/// knobs for confirmation waits. All network calls are blocking round-trips
/// from the caller's perspective; the composer performs no internal retries
/// on submission failures.
pub struct Composer {
    pub(crate) ledger: Arc<dyn LedgerRpc>,
    pub(crate) wallet: WalletManager,
    pub(crate) confirm_timeout: Duration,
    pub(crate) poll_interval: Duration,
}

impl Composer {
    pub fn new(ledger: Arc<dyn LedgerRpc>, wallet: WalletManager) -> Self {
        Self {
            ledger,
            wallet,
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override confirmation timing.
    pub fn with_timing(mut self, confirm_timeout: Duration, poll_interval: Duration) -> Self {
        self.confirm_timeout = confirm_timeout;
        self.poll_interval = poll_interval;
        self
    }

    /// Address of the fee payer / swap authority.
    pub fn payer(&self) -> Pubkey {
        self.wallet.pubkey()
    }

    /// Handle to the ledger collaborator.
    pub fn ledger(&self) -> &Arc<dyn LedgerRpc> {
        &self.ledger
    }

    /// Check that the target program is deployed and executable.
    ///
    /// Mirrors the deploy check the flow runs before composing anything:
    /// a missing account means the program was never deployed, a
    /// non-executable one means the address points at ordinary storage.
    pub async fn verify_program(&self, program_id: &Pubkey) -> Result<(), ComposerError> {
        let account = self
            .ledger
            .get_account(program_id)
            .await?
            .ok_or(ComposerError::ProgramMissing(*program_id))?;
        if !account.executable {
            return Err(ComposerError::ProgramNotExecutable(*program_id));
        }
        Ok(())
    }
}
