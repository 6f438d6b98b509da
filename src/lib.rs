//! Hopper - transaction composer for a deployed two-market swap program
//!
//! This library exposes the composition pipeline for testing and
//! integration purposes: payload codec, account reference templates,
//! seed-derived addressing, idempotent provisioning, fee preflight,
//! submission with bounded confirmation, and state readback.

pub mod codec;
pub mod composer;
pub mod config;
pub mod wallet;

// Re-export commonly used types
pub use solana_sdk::{pubkey::Pubkey, signature::Signature};
