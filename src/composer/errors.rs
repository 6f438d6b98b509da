//! Error types for the transaction composer
//!
//! The taxonomy separates failures by which step of the composition flow
//! produced them, so callers can decide between correcting configuration,
//! funding and retrying the whole flow, or re-querying ledger state before
//! retrying at all.

use crate::codec::CodecError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Error type for all transaction composition operations
#[derive(Error, Debug)]
pub enum ComposerError {
    /// A required role has no supplied address
    ///
    /// Detected before any network call. The account reference template for
    /// the operation kind names a role the caller did not provide.
    #[error("missing role '{role}' for operation '{operation}'")]
    MissingRole {
        /// Operation kind whose template was being filled
        operation: &'static str,
        /// The absent role
        role: &'static str,
    },

    /// Payload encode/decode failure
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Seed-derived address computation failed (e.g. seed too long)
    #[error("address derivation failed: {0}")]
    Derivation(String),

    /// The payer's balance cannot cover the upcoming transaction(s)
    ///
    /// Recoverable by funding the payer and retrying the flow from the top.
    #[error("insufficient funds: balance {balance} lamports, required {required}")]
    InsufficientFunds {
        /// Current payer balance in lamports
        balance: u64,
        /// Estimated requirement in lamports
        required: u64,
    },

    /// Account creation was submitted but did not take effect
    ///
    /// Emitted only after re-querying the address: if another actor created
    /// the account concurrently the provisioner treats that as success, so
    /// this variant means the address is still absent.
    #[error("failed to create account {address}: {reason}")]
    CreationFailed {
        /// The derived address that was being provisioned
        address: Pubkey,
        /// Rejection or timeout context, including the signature if known
        reason: String,
    },

    /// The target program is not deployed at the configured address
    #[error("program {0} is not deployed")]
    ProgramMissing(Pubkey),

    /// An account exists at the program address but is not executable
    #[error("account {0} is not an executable program")]
    ProgramNotExecutable(Pubkey),

    /// State readback found no account at the queried address
    #[error("account {0} not found")]
    AccountNotFound(Pubkey),

    /// Transaction signing failed
    #[error("signing failed: {0}")]
    Signing(String),

    /// RPC round-trip failure (transport or node-side)
    #[error("rpc error during {step}: {source_msg}")]
    Rpc {
        /// Which composition step was talking to the cluster
        step: &'static str,
        /// Underlying client error, verbatim
        source_msg: String,
    },
}

impl ComposerError {
    /// Whether retrying the flow might succeed without caller correction.
    ///
    /// Note that a retry after [`ComposerError::CreationFailed`] is safe
    /// because provisioning is idempotent; retries of the main operation
    /// after an indeterminate outcome are the caller's policy decision.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InsufficientFunds { .. } => true,
            Self::CreationFailed { .. } => true,
            Self::Rpc { .. } => true,

            Self::MissingRole { .. } => false,
            Self::Codec(_) => false,
            Self::Derivation(_) => false,
            Self::ProgramMissing(_) => false,
            Self::ProgramNotExecutable(_) => false,
            Self::AccountNotFound(_) => false,
            Self::Signing(_) => false,
        }
    }

    /// Error category for logging and metrics labels.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingRole { .. } => "config",
            Self::Codec(_) => "codec",
            Self::Derivation(_) => "derivation",
            Self::InsufficientFunds { .. } => "preflight",
            Self::CreationFailed { .. } => "provisioning",
            Self::ProgramMissing(_) | Self::ProgramNotExecutable(_) => "program",
            Self::AccountNotFound(_) => "readback",
            Self::Signing(_) => "signing",
            Self::Rpc { .. } => "rpc",
        }
    }

    /// Create an RPC error tagged with the composition step that failed.
    pub fn rpc(step: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Rpc {
            step,
            source_msg: err.to_string(),
        }
    }
}
