//! Fee and balance preflight
//!
//! Advisory check-then-act: the balance can still change between this check
//! and the real submissions, so the estimate carries a deliberately generous
//! signature-fee multiplier.

use solana_sdk::{message::Message, system_instruction};
use tracing::{debug, info};

use crate::composer::errors::ComposerError;
use crate::composer::submit::SubmitOutcome;
use crate::composer::Composer;

/// Safety multiplier on the per-signature fee estimate.
const FEE_SAFETY_MULTIPLIER: u64 = 100;

impl Composer {
    /// Make sure the payer can cover the upcoming flow.
    ///
    /// Required = rent-exemption minimum for `space_to_create` bytes of new
    /// account storage + per-signature fee x `signature_count` x a fixed
    /// safety multiplier. If the balance falls short and `faucet` is set
    /// (test clusters), the shortfall is requested as an airdrop and the
    /// funding transaction is awaited before re-reading the balance;
    /// otherwise the call fails with [`ComposerError::InsufficientFunds`]
    /// without submitting anything.
    ///
    /// Returns the payer balance after any funding.
    pub async fn ensure_funded(
        &self,
        space_to_create: usize,
        signature_count: u64,
        faucet: bool,
    ) -> Result<u64, ComposerError> {
        let payer = self.payer();

        let rent = self
            .ledger
            .minimum_balance_for_rent_exemption(space_to_create)
            .await?;
        let fee = self.per_signature_fee().await?;
        let required = rent + fee * signature_count * FEE_SAFETY_MULTIPLIER;

        let balance = self.ledger.get_balance(&payer).await?;
        debug!(%payer, balance, required, rent, fee, "preflight balance check");
        if balance >= required {
            return Ok(balance);
        }

        if !faucet {
            return Err(ComposerError::InsufficientFunds { balance, required });
        }

        let shortfall = required - balance;
        info!(%payer, shortfall, "requesting faucet funding");
        let signature = self.ledger.request_airdrop(&payer, shortfall).await?;
        match self.await_signature(&signature).await? {
            SubmitOutcome::Confirmed(_) => {}
            SubmitOutcome::Rejected { error, .. } => {
                return Err(ComposerError::rpc("request_airdrop", error));
            }
            SubmitOutcome::Indeterminate(sig) => {
                return Err(ComposerError::rpc(
                    "request_airdrop",
                    format!("funding confirmation timed out ({sig})"),
                ));
            }
        }

        let balance = self.ledger.get_balance(&payer).await?;
        if balance < required {
            return Err(ComposerError::InsufficientFunds { balance, required });
        }
        Ok(balance)
    }

    /// Price one signature by asking the cluster to fee a minimal
    /// single-signer message.
    async fn per_signature_fee(&self) -> Result<u64, ComposerError> {
        let payer = self.payer();
        let blockhash = self.ledger.latest_blockhash().await?;
        let probe = Message::new_with_blockhash(
            &[system_instruction::transfer(&payer, &payer, 0)],
            Some(&payer),
            &blockhash,
        );
        self.ledger.fee_for_message(&probe).await
    }
}
