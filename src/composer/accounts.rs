//! Account reference templates
//!
//! Every operation kind the swap program supports has a fixed calling
//! convention: a list of accounts in a program-defined order, each annotated
//! with signer and writability flags. Order and flags are an invariant
//! contract — a mismatch is rejected (or worse, misapplied) at execution
//! time with no client-side signal, so the templates here are the single
//! source of truth and output order is never derived from map iteration.

use std::collections::HashMap;

use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey};

use crate::composer::errors::ComposerError;

/// Logical role of one account in a swap invocation.
///
/// Leg A is the source market, leg B the destination market of a transitive
/// swap; the single-market `Swap` kind uses leg A only. Leg B has no pc
/// wallet role: the program routes the intermediate token through leg A's
/// pc wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    MarketA,
    RequestQueueA,
    EventQueueA,
    BidsA,
    AsksA,
    CoinVaultA,
    PcVaultA,
    VaultSignerA,
    OpenOrdersA,
    CoinWalletA,
    PcWalletA,
    MarketB,
    RequestQueueB,
    EventQueueB,
    BidsB,
    AsksB,
    CoinVaultB,
    PcVaultB,
    VaultSignerB,
    OpenOrdersB,
    CoinWalletB,
    /// The swap authority; the only signer in the reference list
    Authority,
    DexProgram,
    TokenProgram,
    SwapProgram,
    RentSysvar,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MarketA => "market_a",
            Self::RequestQueueA => "request_queue_a",
            Self::EventQueueA => "event_queue_a",
            Self::BidsA => "bids_a",
            Self::AsksA => "asks_a",
            Self::CoinVaultA => "coin_vault_a",
            Self::PcVaultA => "pc_vault_a",
            Self::VaultSignerA => "vault_signer_a",
            Self::OpenOrdersA => "open_orders_a",
            Self::CoinWalletA => "coin_wallet_a",
            Self::PcWalletA => "pc_wallet_a",
            Self::MarketB => "market_b",
            Self::RequestQueueB => "request_queue_b",
            Self::EventQueueB => "event_queue_b",
            Self::BidsB => "bids_b",
            Self::AsksB => "asks_b",
            Self::CoinVaultB => "coin_vault_b",
            Self::PcVaultB => "pc_vault_b",
            Self::VaultSignerB => "vault_signer_b",
            Self::OpenOrdersB => "open_orders_b",
            Self::CoinWalletB => "coin_wallet_b",
            Self::Authority => "authority",
            Self::DexProgram => "dex_program",
            Self::TokenProgram => "token_program",
            Self::SwapProgram => "swap_program",
            Self::RentSysvar => "rent_sysvar",
        }
    }
}

/// One slot in an operation's account reference template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateEntry {
    pub role: Role,
    pub is_signer: bool,
    pub is_writable: bool,
}

const fn writable(role: Role) -> TemplateEntry {
    TemplateEntry { role, is_signer: false, is_writable: true }
}

const fn readonly(role: Role) -> TemplateEntry {
    TemplateEntry { role, is_signer: false, is_writable: false }
}

const fn signer(role: Role) -> TemplateEntry {
    TemplateEntry { role, is_signer: true, is_writable: true }
}

/// Two-market transfer: source leg (11), destination leg (10 — the program
/// reuses leg A's pc wallet as the intermediate), then authority and the
/// four program/sysvar accounts. 26 entries, in the program's exact
/// deserialization order.
const TRANSITIVE_SWAP_TEMPLATE: &[TemplateEntry] = &[
    writable(Role::MarketA),
    writable(Role::RequestQueueA),
    writable(Role::EventQueueA),
    writable(Role::BidsA),
    writable(Role::AsksA),
    writable(Role::CoinVaultA),
    writable(Role::PcVaultA),
    writable(Role::VaultSignerA),
    writable(Role::OpenOrdersA),
    writable(Role::CoinWalletA),
    writable(Role::PcWalletA),
    writable(Role::MarketB),
    writable(Role::RequestQueueB),
    writable(Role::EventQueueB),
    writable(Role::BidsB),
    writable(Role::AsksB),
    writable(Role::CoinVaultB),
    writable(Role::PcVaultB),
    writable(Role::VaultSignerB),
    writable(Role::OpenOrdersB),
    writable(Role::CoinWalletB),
    signer(Role::Authority),
    readonly(Role::DexProgram),
    readonly(Role::TokenProgram),
    readonly(Role::SwapProgram),
    readonly(Role::RentSysvar),
];

/// Single-market swap: leg A followed by the same tail. 16 entries.
const SWAP_TEMPLATE: &[TemplateEntry] = &[
    writable(Role::MarketA),
    writable(Role::RequestQueueA),
    writable(Role::EventQueueA),
    writable(Role::BidsA),
    writable(Role::AsksA),
    writable(Role::CoinVaultA),
    writable(Role::PcVaultA),
    writable(Role::VaultSignerA),
    writable(Role::OpenOrdersA),
    writable(Role::CoinWalletA),
    writable(Role::PcWalletA),
    signer(Role::Authority),
    readonly(Role::DexProgram),
    readonly(Role::TokenProgram),
    readonly(Role::SwapProgram),
    readonly(Role::RentSysvar),
];

/// A logical operation the swap program supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Swap within one market
    Swap,
    /// Swap across two markets through an intermediate token
    TransitiveSwap,
}

impl OperationKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::TransitiveSwap => "transitive_swap",
        }
    }

    /// The fixed account reference template for this kind.
    pub fn template(self) -> &'static [TemplateEntry] {
        match self {
            Self::Swap => SWAP_TEMPLATE,
            Self::TransitiveSwap => TRANSITIVE_SWAP_TEMPLATE,
        }
    }
}

/// Mapping from logical role to supplied address.
pub type RoleMap = HashMap<Role, Pubkey>;

/// Build the ordered account reference list for `kind` from `roles`.
///
/// Output order and flags come from the kind's template; extra entries in
/// `roles` are ignored. Fails with [`ComposerError::MissingRole`] on the
/// first template role without an address.
pub fn build(kind: OperationKind, roles: &RoleMap) -> Result<Vec<AccountMeta>, ComposerError> {
    let template = kind.template();
    let mut metas = Vec::with_capacity(template.len());
    for entry in template {
        let pubkey = roles.get(&entry.role).ok_or(ComposerError::MissingRole {
            operation: kind.name(),
            role: entry.role.as_str(),
        })?;
        metas.push(if entry.is_writable {
            AccountMeta::new(*pubkey, entry.is_signer)
        } else {
            AccountMeta::new_readonly(*pubkey, entry.is_signer)
        });
    }
    Ok(metas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_role_map() -> RoleMap {
        TRANSITIVE_SWAP_TEMPLATE
            .iter()
            .map(|entry| (entry.role, Pubkey::new_unique()))
            .collect()
    }

    #[test]
    fn test_transitive_template_length_is_fixed() {
        let metas = build(OperationKind::TransitiveSwap, &full_role_map()).unwrap();
        assert_eq!(metas.len(), 26);
        assert_eq!(metas.len(), OperationKind::TransitiveSwap.template().len());
    }

    #[test]
    fn test_swap_template_length_is_fixed() {
        let metas = build(OperationKind::Swap, &full_role_map()).unwrap();
        assert_eq!(metas.len(), 16);
    }

    #[test]
    fn test_output_order_ignores_map_insertion_order() {
        let roles = full_role_map();

        // Insert the same pairs in reverse template order into a fresh map
        let mut reversed = RoleMap::new();
        for entry in TRANSITIVE_SWAP_TEMPLATE.iter().rev() {
            reversed.insert(entry.role, roles[&entry.role]);
        }

        let a = build(OperationKind::TransitiveSwap, &roles).unwrap();
        let b = build(OperationKind::TransitiveSwap, &reversed).unwrap();
        assert_eq!(a, b);

        // And the order is the template's, not anything map-derived
        for (meta, entry) in a.iter().zip(TRANSITIVE_SWAP_TEMPLATE) {
            assert_eq!(meta.pubkey, roles[&entry.role]);
        }
    }

    #[test]
    fn test_flags_follow_template() {
        let roles = full_role_map();
        let metas = build(OperationKind::TransitiveSwap, &roles).unwrap();

        // Authority is the single signer and is writable
        let signers: Vec<_> = metas.iter().filter(|m| m.is_signer).collect();
        assert_eq!(signers.len(), 1);
        assert_eq!(signers[0].pubkey, roles[&Role::Authority]);
        assert!(signers[0].is_writable);

        // The four trailing program/sysvar accounts are read-only
        for meta in &metas[22..] {
            assert!(!meta.is_writable);
            assert!(!meta.is_signer);
        }
    }

    #[test]
    fn test_missing_role_is_reported_by_name() {
        let mut roles = full_role_map();
        roles.remove(&Role::VaultSignerB);

        let err = build(OperationKind::TransitiveSwap, &roles).unwrap_err();
        match err {
            ComposerError::MissingRole { operation, role } => {
                assert_eq!(operation, "transitive_swap");
                assert_eq!(role, "vault_signer_b");
            }
            other => panic!("expected MissingRole, got {other}"),
        }

        // The single-market kind never touches leg B, so it still builds
        assert!(build(OperationKind::Swap, &roles).is_ok());
    }
}
