//! Hopper - swap transaction composer CLI
//!
//! Drives one full composition flow against a deployed swap-relay program:
//! verify the program, preflight the payer balance, provision the
//! seed-derived counter account, compose and submit the swap, then read the
//! counter back.

#![deny(unused_imports)]
#![deny(unused_mut)]
#![warn(unused_must_use)]

use anyhow::{Context, Result};
use clap::Parser;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, instruction::Instruction};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hopper::codec::{CounterState, SwapArgs};
use hopper::composer::{
    self, derive_address, Composer, RpcLedger, SubmitOutcome,
};
use hopper::config::Config;
use hopper::wallet::WalletManager;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    info!("🚀 Starting hopper swap composer");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    info!("📋 Loading configuration from: {}", args.config);
    let config = Config::from_file(&args.config)?;

    info!("🔑 Initializing wallet from: {}", config.wallet.keypair_path);
    let wallet =
        WalletManager::from_file(&config.wallet.keypair_path).context("Failed to load wallet")?;
    info!("💼 Payer address: {}", wallet.pubkey());

    let commitment = CommitmentConfig::from_str(&config.rpc.commitment)
        .with_context(|| format!("invalid commitment level: {}", config.rpc.commitment))?;
    info!("🌐 Connecting to cluster: {}", config.rpc.endpoint);
    let client = RpcClient::new_with_timeout_and_commitment(
        config.rpc.endpoint.clone(),
        Duration::from_secs(config.rpc.timeout_secs),
        commitment,
    );
    let ledger = Arc::new(RpcLedger::new(client, commitment));

    let composer = Composer::new(ledger, wallet.clone()).with_timing(
        Duration::from_secs(config.rpc.confirm_timeout_secs),
        Duration::from_millis(config.rpc.poll_interval_ms),
    );

    let program_id = config.program.program_id()?;
    composer
        .verify_program(&program_id)
        .await
        .context("program check failed; deploy the swap-relay program first")?;
    info!("Using program {}", program_id);

    // Balance preflight: one provisioning signature + one swap signature
    let balance = composer
        .ensure_funded(CounterState::space(), 2, config.rpc.faucet)
        .await?;
    info!(balance, "payer funded");

    // Provision the seed-derived counter account (idempotent across runs)
    let state_address = derive_address(
        &composer.payer(),
        &config.program.state_seed,
        &program_id,
    )?;
    match composer
        .ensure_account(
            &state_address,
            &config.program.state_seed,
            CounterState::space(),
            &program_id,
        )
        .await?
    {
        composer::Provisioned::AlreadyExists => {
            info!("State account {} already exists", state_address)
        }
        composer::Provisioned::Created(sig) => {
            info!("Created state account {} ({})", state_address, sig)
        }
    }

    // Compose the swap instruction from the configured addresses
    let kind = config.swap.operation_kind();
    let roles = config
        .swap
        .role_addresses(&config.program, composer.payer())?;
    let metas = composer::build(kind, &roles)?;
    let payload = SwapArgs {
        amount: config.swap.amount,
        from_decimals: config.swap.from_decimals,
        quote_decimals: config.swap.quote_decimals,
    }
    .to_bytes()?;
    let swap_ix = Instruction::new_with_bytes(program_id, &payload, metas);

    info!(
        operation = kind.name(),
        amount = config.swap.amount,
        accounts = kind.template().len(),
        "submitting swap"
    );
    let instructions = composer::plan_instructions(config.swap.compute_unit_limit, vec![swap_ix]);
    let outcome = composer
        .compose_and_submit(instructions, &[wallet.keypair()])
        .await?;

    match outcome {
        SubmitOutcome::Confirmed(signature) => {
            info!(%signature, "✅ swap confirmed");
            let counter = composer.read_counter(&state_address).await?;
            info!(
                "{} has relayed {} swap(s)",
                state_address, counter
            );
        }
        SubmitOutcome::Rejected { signature, error } => {
            error!(%signature, %error, "swap rejected by the cluster");
            anyhow::bail!("swap rejected: {error}");
        }
        SubmitOutcome::Indeterminate(signature) => {
            // The transaction may still land; only the ledger can say.
            warn!(%signature, "confirmation timed out; outcome unknown");
            let counter = composer.read_counter(&state_address).await?;
            warn!(
                "re-queried state: {} shows {} swap(s); verify {} before retrying",
                state_address, counter, signature
            );
        }
    }

    Ok(())
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        "hopper=debug,info"
    } else {
        "hopper=info,warn,error"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    Ok(())
}
