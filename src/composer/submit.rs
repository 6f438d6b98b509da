//! Instruction planning, signing, submission and confirmation
//!
//! Instruction order inside a transaction is execution order on the
//! cluster: the compute-unit-limit directive is prepended when the default
//! budget is insufficient, and the program instruction(s) follow in caller
//! order. The whole transaction applies atomically or not at all.
//!
//! Submission is attempted exactly once. A confirmation wait that exceeds
//! its bound yields [`SubmitOutcome::Indeterminate`] — the transaction may
//! or may not have landed, which is distinct from both confirmation and
//! rejection, and the caller must re-query state before any retry decision.

use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    instruction::Instruction,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::composer::errors::ComposerError;
use crate::composer::ledger::SignatureStatus;
use crate::composer::Composer;

/// Terminal observation of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The cluster confirmed the transaction
    Confirmed(Signature),
    /// The cluster executed and rejected the transaction
    Rejected {
        signature: Signature,
        /// Cluster-reported error, verbatim (program error codes included)
        error: String,
    },
    /// The confirmation wait timed out; the outcome is unknown
    Indeterminate(Signature),
}

impl SubmitOutcome {
    /// The submitted signature, whatever the outcome.
    pub fn signature(&self) -> &Signature {
        match self {
            Self::Confirmed(sig) | Self::Indeterminate(sig) => sig,
            Self::Rejected { signature, .. } => signature,
        }
    }
}

/// Order the instructions for one transaction.
///
/// The compute-unit-limit directive goes first (skipped when `cu_limit` is
/// 0, leaving the cluster default), then the program instructions in the
/// given order.
pub fn plan_instructions(cu_limit: u32, program_ixs: Vec<Instruction>) -> Vec<Instruction> {
    let mut instructions = Vec::with_capacity(program_ixs.len() + 1);
    if cu_limit > 0 {
        instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(cu_limit));
    }
    instructions.extend(program_ixs);
    instructions
}

impl Composer {
    /// Build, sign, submit and await one transaction.
    ///
    /// Signs with all supplied keypairs over a fresh blockhash, submits
    /// once, then polls until the cluster reports confirmation or
    /// rejection, or the configured timeout elapses. No automatic retry is
    /// performed on any outcome.
    pub async fn compose_and_submit(
        &self,
        instructions: Vec<Instruction>,
        signers: &[&Keypair],
    ) -> Result<SubmitOutcome, ComposerError> {
        let blockhash = self.ledger.latest_blockhash().await?;

        let mut tx = Transaction::new_with_payer(&instructions, Some(&self.payer()));
        tx.try_sign(signers, blockhash)
            .map_err(|e| ComposerError::Signing(e.to_string()))?;

        let signature = self.ledger.send_transaction(&tx).await?;
        debug!(%signature, instructions = instructions.len(), "transaction submitted");

        self.await_signature(&signature).await
    }

    /// Poll a signature until it is terminal or the timeout elapses.
    pub(crate) async fn await_signature(
        &self,
        signature: &Signature,
    ) -> Result<SubmitOutcome, ComposerError> {
        let deadline = Instant::now() + self.confirm_timeout;
        loop {
            match self.ledger.signature_status(signature).await? {
                SignatureStatus::Confirmed => {
                    return Ok(SubmitOutcome::Confirmed(*signature));
                }
                SignatureStatus::Failed(error) => {
                    return Ok(SubmitOutcome::Rejected {
                        signature: *signature,
                        error,
                    });
                }
                SignatureStatus::Pending => {}
            }

            if Instant::now() >= deadline {
                warn!(%signature, timeout = ?self.confirm_timeout, "confirmation wait timed out; outcome unknown");
                return Ok(SubmitOutcome::Indeterminate(*signature));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{compute_budget, instruction::AccountMeta, pubkey::Pubkey};

    fn program_ix() -> Instruction {
        Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[1, 2, 3],
            vec![AccountMeta::new(Pubkey::new_unique(), false)],
        )
    }

    #[test]
    fn test_plan_prepends_compute_limit() {
        let ix = program_ix();
        let program_id = ix.program_id;

        let plan = plan_instructions(400_000, vec![ix]);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].program_id, compute_budget::id());
        assert_eq!(plan[1].program_id, program_id);
    }

    #[test]
    fn test_plan_skips_zero_limit() {
        let ix = program_ix();
        let program_id = ix.program_id;

        let plan = plan_instructions(0, vec![ix]);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].program_id, program_id);
    }

    #[test]
    fn test_plan_preserves_program_instruction_order() {
        let first = program_ix();
        let second = program_ix();
        let ids = (first.program_id, second.program_id);

        let plan = plan_instructions(200_000, vec![first, second]);
        assert_eq!(plan[1].program_id, ids.0);
        assert_eq!(plan[2].program_id, ids.1);
    }

    #[test]
    fn test_outcome_signature_accessor() {
        let sig = Signature::default();
        assert_eq!(*SubmitOutcome::Confirmed(sig).signature(), sig);
        assert_eq!(*SubmitOutcome::Indeterminate(sig).signature(), sig);
        let rejected = SubmitOutcome::Rejected {
            signature: sig,
            error: "custom program error: 0x12e".into(),
        };
        assert_eq!(*rejected.signature(), sig);
    }
}
