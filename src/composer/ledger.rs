//! Ledger network collaborator seam
//!
//! All cluster round-trips the composer performs go through the [`LedgerRpc`]
//! trait: account snapshots, balance and rent queries, fee estimation, faucet
//! funding, blockhash fetch, submission and confirmation polling. The
//! production implementation wraps the nonblocking [`RpcClient`]; tests
//! substitute an in-memory ledger.
//!
//! Every method is a suspension point; ledger state may change between any
//! two calls due to external actors.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use solana_transaction_status::TransactionStatus;

use crate::composer::errors::ComposerError;

/// Point-in-time status of a submitted signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureStatus {
    /// Not yet visible, or not yet at the target commitment
    Pending,
    /// Reached the target commitment and executed successfully
    Confirmed,
    /// Landed and was rejected; carries the cluster error verbatim
    Failed(String),
}

/// Call contracts consumed from the ledger network.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Snapshot of the account at `address`, or `None` if it does not exist.
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, ComposerError>;

    /// Current balance of `address` in lamports.
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, ComposerError>;

    /// Minimum balance for an account of `size` bytes to be rent exempt.
    async fn minimum_balance_for_rent_exemption(&self, size: usize)
        -> Result<u64, ComposerError>;

    /// Fee the cluster would charge for `message`.
    async fn fee_for_message(&self, message: &Message) -> Result<u64, ComposerError>;

    /// Request faucet funding for `address`. Only available on test clusters.
    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, ComposerError>;

    /// A recent blockhash for transaction construction.
    async fn latest_blockhash(&self) -> Result<Hash, ComposerError>;

    /// Submit a signed transaction. Submission is attempted exactly once.
    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, ComposerError>;

    /// Current status of a previously submitted signature.
    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<SignatureStatus, ComposerError>;
}

/// [`LedgerRpc`] backed by a Solana JSON-RPC node.
pub struct RpcLedger {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcLedger {
    pub fn new(client: RpcClient, commitment: CommitmentConfig) -> Self {
        Self { client, commitment }
    }
}

#[async_trait]
impl LedgerRpc for RpcLedger {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, ComposerError> {
        self.client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map(|response| response.value)
            .map_err(|e| ComposerError::rpc("get_account", e))
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, ComposerError> {
        self.client
            .get_balance(address)
            .await
            .map_err(|e| ComposerError::rpc("get_balance", e))
    }

    async fn minimum_balance_for_rent_exemption(
        &self,
        size: usize,
    ) -> Result<u64, ComposerError> {
        self.client
            .get_minimum_balance_for_rent_exemption(size)
            .await
            .map_err(|e| ComposerError::rpc("rent_exemption", e))
    }

    async fn fee_for_message(&self, message: &Message) -> Result<u64, ComposerError> {
        self.client
            .get_fee_for_message(message)
            .await
            .map_err(|e| ComposerError::rpc("fee_for_message", e))
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, ComposerError> {
        self.client
            .request_airdrop(address, lamports)
            .await
            .map_err(|e| ComposerError::rpc("request_airdrop", e))
    }

    async fn latest_blockhash(&self) -> Result<Hash, ComposerError> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(|e| ComposerError::rpc("latest_blockhash", e))
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, ComposerError> {
        self.client
            .send_transaction(tx)
            .await
            .map_err(|e| ComposerError::rpc("send_transaction", e))
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<SignatureStatus, ComposerError> {
        let response = self
            .client
            .get_signature_statuses(&[*signature])
            .await
            .map_err(|e| ComposerError::rpc("signature_status", e))?;

        let status = match response.value.into_iter().next().flatten() {
            None => SignatureStatus::Pending,
            Some(status) => map_transaction_status(status, self.commitment),
        };
        Ok(status)
    }
}

/// Collapse a node-reported [`TransactionStatus`] into the composer's view.
///
/// A present error means the transaction landed and was rejected; otherwise
/// the status only counts as confirmed once it satisfies the configured
/// commitment, so a processed-but-not-yet-confirmed signature stays pending.
fn map_transaction_status(
    status: TransactionStatus,
    commitment: CommitmentConfig,
) -> SignatureStatus {
    if let Some(err) = status.err {
        SignatureStatus::Failed(err.to_string())
    } else if status.satisfies_commitment(commitment) {
        SignatureStatus::Confirmed
    } else {
        SignatureStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{
        instruction::InstructionError,
        transaction::TransactionError,
    };
    use solana_transaction_status::TransactionConfirmationStatus;

    fn node_status(
        err: Option<TransactionError>,
        confirmation_status: Option<TransactionConfirmationStatus>,
    ) -> TransactionStatus {
        TransactionStatus {
            slot: 1,
            confirmations: None,
            status: match &err {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            },
            err,
            confirmation_status,
        }
    }

    #[test]
    fn test_status_error_maps_to_failed() {
        let err = TransactionError::InstructionError(0, InstructionError::Custom(302));
        let mapped = map_transaction_status(
            node_status(Some(err), Some(TransactionConfirmationStatus::Confirmed)),
            CommitmentConfig::confirmed(),
        );
        match mapped {
            SignatureStatus::Failed(message) => assert!(message.contains("0x12e")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_status_below_commitment_stays_pending() {
        let mapped = map_transaction_status(
            node_status(None, Some(TransactionConfirmationStatus::Processed)),
            CommitmentConfig::confirmed(),
        );
        assert_eq!(mapped, SignatureStatus::Pending);
    }

    #[test]
    fn test_status_at_or_above_commitment_is_confirmed() {
        for level in [
            TransactionConfirmationStatus::Confirmed,
            TransactionConfirmationStatus::Finalized,
        ] {
            let mapped = map_transaction_status(
                node_status(None, Some(level)),
                CommitmentConfig::confirmed(),
            );
            assert_eq!(mapped, SignatureStatus::Confirmed);
        }
    }
}
