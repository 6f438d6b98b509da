//! Deterministic seed-derived addresses

use solana_sdk::pubkey::Pubkey;

use crate::composer::errors::ComposerError;

/// Derive the address of the account at (`base`, `seed`, `owner`).
///
/// This is the network's own derivation rule, so the same inputs always
/// yield the same address; the composer uses it both to compute an address
/// before the account exists and to relocate it on later runs without
/// persisting anything.
pub fn derive_address(
    base: &Pubkey,
    seed: &str,
    owner: &Pubkey,
) -> Result<Pubkey, ComposerError> {
    Pubkey::create_with_seed(base, seed, owner)
        .map_err(|e| ComposerError::Derivation(format!("seed {seed:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let base = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let first = derive_address(&base, "hop", &owner).unwrap();
        let second = derive_address(&base, "hop", &owner).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_inputs_are_significant() {
        let base = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let derived = derive_address(&base, "hop", &owner).unwrap();

        assert_ne!(derived, derive_address(&base, "hops", &owner).unwrap());
        assert_ne!(
            derived,
            derive_address(&base, "hop", &Pubkey::new_unique()).unwrap()
        );
        assert_ne!(
            derived,
            derive_address(&Pubkey::new_unique(), "hop", &owner).unwrap()
        );
    }

    #[test]
    fn test_overlong_seed_is_rejected() {
        let base = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let seed = "x".repeat(33); // MAX_SEED_LEN is 32

        let err = derive_address(&base, &seed, &owner).unwrap_err();
        assert!(matches!(err, ComposerError::Derivation(_)));
    }
}
