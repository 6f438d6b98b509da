//! Configuration module
//!
//! All invocation data lives here: RPC endpoint, keypair path, program
//! addresses and the per-role market addresses for the swap legs. The
//! address sets for different trading pairs are plain TOML data validated
//! against the operation templates before use — they are configuration,
//! not code paths.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey::Pubkey, sysvar};
use std::str::FromStr;

use crate::composer::{OperationKind, Role, RoleMap};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint configuration
    pub rpc: RpcConfig,

    /// Wallet configuration
    pub wallet: WalletConfig,

    /// Target program addresses
    pub program: ProgramConfig,

    /// Swap operation parameters and market addresses
    pub swap: SwapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint URL
    pub endpoint: String,

    /// Commitment level for queries and confirmation
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,

    /// Bound on confirmation waiting, in seconds
    #[serde(default = "default_confirm_timeout")]
    pub confirm_timeout_secs: u64,

    /// Pause between confirmation polls, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Whether the cluster exposes a funding faucet (test clusters only)
    #[serde(default)]
    pub faucet: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to keypair file
    pub keypair_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Address of the deployed swap-relay program
    pub program_id: String,

    /// Address of the swap program the relay invokes
    pub swap_program: String,

    /// Address of the underlying DEX program
    pub dex_program: String,

    /// SPL token program address
    #[serde(default = "default_token_program")]
    pub token_program: String,

    /// Seed for the derived state account
    #[serde(default = "default_state_seed")]
    pub state_seed: String,
}

/// Addresses for one market leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    pub market: String,
    pub request_queue: String,
    pub event_queue: String,
    pub bids: String,
    pub asks: String,
    pub coin_vault: String,
    pub pc_vault: String,
    pub vault_signer: String,
    pub open_orders: String,
    pub coin_wallet: String,
    /// Quote-currency wallet; required for leg A, ignored for leg B (the
    /// program reuses leg A's pc wallet as the intermediate)
    pub pc_wallet: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Amount to deposit, in the source token's base units
    pub amount: u64,

    /// Decimals of the source token
    pub from_decimals: u8,

    /// Decimals of the quote token
    pub quote_decimals: u8,

    /// Compute unit limit for the swap transaction (0 = cluster default)
    #[serde(default = "default_compute_unit_limit")]
    pub compute_unit_limit: u32,

    /// Source market leg
    pub market_a: MarketConfig,

    /// Destination market leg; absent for a single-market swap
    pub market_b: Option<MarketConfig>,
}

// Default value functions
fn default_commitment() -> String { "confirmed".to_string() }
fn default_rpc_timeout() -> u64 { 30 }
fn default_confirm_timeout() -> u64 { 30 }
fn default_poll_interval() -> u64 { 500 }
fn default_token_program() -> String {
    "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA".to_string()
}
fn default_state_seed() -> String { "hop".to_string() }
fn default_compute_unit_limit() -> u32 { 400_000 }

fn parse_pubkey(value: &str, what: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).with_context(|| format!("invalid {} address: {}", what, value))
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        Ok(config)
    }
}

impl ProgramConfig {
    pub fn program_id(&self) -> Result<Pubkey> {
        parse_pubkey(&self.program_id, "program")
    }

    pub fn swap_program(&self) -> Result<Pubkey> {
        parse_pubkey(&self.swap_program, "swap program")
    }

    pub fn dex_program(&self) -> Result<Pubkey> {
        parse_pubkey(&self.dex_program, "dex program")
    }

    pub fn token_program(&self) -> Result<Pubkey> {
        parse_pubkey(&self.token_program, "token program")
    }
}

impl MarketConfig {
    /// Insert this leg's addresses under the leg-A or leg-B roles.
    fn fill_roles(&self, roles: &mut RoleMap, leg_a: bool) -> Result<()> {
        let pairs: [(&str, &str, Role, Role); 10] = [
            ("market", &self.market, Role::MarketA, Role::MarketB),
            ("request_queue", &self.request_queue, Role::RequestQueueA, Role::RequestQueueB),
            ("event_queue", &self.event_queue, Role::EventQueueA, Role::EventQueueB),
            ("bids", &self.bids, Role::BidsA, Role::BidsB),
            ("asks", &self.asks, Role::AsksA, Role::AsksB),
            ("coin_vault", &self.coin_vault, Role::CoinVaultA, Role::CoinVaultB),
            ("pc_vault", &self.pc_vault, Role::PcVaultA, Role::PcVaultB),
            ("vault_signer", &self.vault_signer, Role::VaultSignerA, Role::VaultSignerB),
            ("open_orders", &self.open_orders, Role::OpenOrdersA, Role::OpenOrdersB),
            ("coin_wallet", &self.coin_wallet, Role::CoinWalletA, Role::CoinWalletB),
        ];
        for (what, value, role_a, role_b) in pairs {
            let role = if leg_a { role_a } else { role_b };
            roles.insert(role, parse_pubkey(value, what)?);
        }
        // Only leg A carries a pc wallet role; the program routes the
        // intermediate token through it, so a leg-B pc_wallet is ignored.
        if leg_a {
            if let Some(pc_wallet) = &self.pc_wallet {
                roles.insert(Role::PcWalletA, parse_pubkey(pc_wallet, "pc_wallet")?);
            }
        }
        Ok(())
    }
}

impl SwapConfig {
    /// Which operation the configured legs describe.
    pub fn operation_kind(&self) -> OperationKind {
        if self.market_b.is_some() {
            OperationKind::TransitiveSwap
        } else {
            OperationKind::Swap
        }
    }

    /// Materialize the role map for the account reference builder.
    ///
    /// `authority` is the signing wallet's address. Missing roles are left
    /// out; the builder reports them against the operation template.
    pub fn role_addresses(
        &self,
        program: &ProgramConfig,
        authority: Pubkey,
    ) -> Result<RoleMap> {
        let mut roles = RoleMap::new();
        self.market_a.fill_roles(&mut roles, true)?;
        if let Some(market_b) = &self.market_b {
            market_b.fill_roles(&mut roles, false)?;
        }
        roles.insert(Role::Authority, authority);
        roles.insert(Role::DexProgram, program.dex_program()?);
        roles.insert(Role::TokenProgram, program.token_program()?);
        roles.insert(Role::SwapProgram, program.swap_program()?);
        roles.insert(Role::RentSysvar, sysvar::rent::id());
        Ok(roles)
    }
}
