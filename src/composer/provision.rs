//! Idempotent account provisioning
//!
//! Creating the seed-derived state account is a separate transaction from
//! the main operation, so a crash between the two must be safe to retry:
//! `ensure` is a no-op whenever the account already exists, whoever created
//! it.

use solana_sdk::{pubkey::Pubkey, signature::Signature, system_instruction};
use tracing::{debug, info};

use crate::composer::errors::ComposerError;
use crate::composer::submit::SubmitOutcome;
use crate::composer::Composer;

/// What `ensure` observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioned {
    /// The account was already on the ledger; nothing was submitted
    AlreadyExists,
    /// This call created the account
    Created(Signature),
}

impl Composer {
    /// Make sure the account at `address` exists, creating it if needed.
    ///
    /// `address` must be the seed derivation of (`payer`, `seed`,
    /// `owner_program`); the payer funds the creation and signs as the
    /// derivation base. The new account is sized to `space` bytes and funded
    /// to the rent-exemption minimum for that size.
    ///
    /// A rejected or timed-out creation re-queries the address before
    /// failing: if the account is present by then (e.g. a concurrent actor
    /// provisioned the same derivation), that is success. Only a still-absent
    /// account yields [`ComposerError::CreationFailed`].
    pub async fn ensure_account(
        &self,
        address: &Pubkey,
        seed: &str,
        space: usize,
        owner_program: &Pubkey,
    ) -> Result<Provisioned, ComposerError> {
        if self.ledger.get_account(address).await?.is_some() {
            debug!(%address, "state account already provisioned");
            return Ok(Provisioned::AlreadyExists);
        }

        let lamports = self
            .ledger
            .minimum_balance_for_rent_exemption(space)
            .await?;
        info!(%address, space, lamports, "creating state account");

        let payer = self.payer();
        let create_ix = system_instruction::create_account_with_seed(
            &payer,
            address,
            &payer,
            seed,
            lamports,
            space as u64,
            owner_program,
        );

        let outcome = self
            .compose_and_submit(vec![create_ix], &[self.wallet.keypair()])
            .await?;

        match outcome {
            SubmitOutcome::Confirmed(signature) => Ok(Provisioned::Created(signature)),
            SubmitOutcome::Rejected { signature, error } => {
                // The address may have been claimed concurrently; the state
                // of the ledger decides, not the rejection.
                if self.ledger.get_account(address).await?.is_some() {
                    debug!(%address, "creation rejected but account exists; treating as provisioned");
                    return Ok(Provisioned::AlreadyExists);
                }
                Err(ComposerError::CreationFailed {
                    address: *address,
                    reason: format!("rejected ({signature}): {error}"),
                })
            }
            SubmitOutcome::Indeterminate(signature) => {
                if self.ledger.get_account(address).await?.is_some() {
                    return Ok(Provisioned::Created(signature));
                }
                Err(ComposerError::CreationFailed {
                    address: *address,
                    reason: format!("confirmation timed out ({signature}); account still absent"),
                })
            }
        }
    }
}
