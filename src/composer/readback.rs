//! Post-confirmation state readback

use solana_sdk::pubkey::Pubkey;

use crate::codec::{CounterState, Schema};
use crate::composer::errors::ComposerError;
use crate::composer::Composer;

impl Composer {
    /// Read and decode the account at `address` with `schema`.
    ///
    /// The returned values reflect ledger state at query time only.
    pub async fn read_state(
        &self,
        address: &Pubkey,
        schema: &Schema,
    ) -> Result<Vec<u64>, ComposerError> {
        let account = self
            .ledger
            .get_account(address)
            .await?
            .ok_or(ComposerError::AccountNotFound(*address))?;
        Ok(schema.decode(&account.data)?)
    }

    /// Read the swap counter stored in the state account.
    pub async fn read_counter(&self, address: &Pubkey) -> Result<u32, ComposerError> {
        let values = self.read_state(address, &CounterState::SCHEMA).await?;
        Ok(values[0] as u32)
    }
}
