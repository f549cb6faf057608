//! Account store adapter: JSON encoding plus keyed load/save over a
//! [`KeyValueStore`].

use crate::account::Account;
use crate::error::{LedgerError, Result};
use crate::persistence::KeyValueStore;

pub fn encode(account: &Account) -> Result<Vec<u8>> {
    serde_json::to_vec(account)
        .map_err(|e| LedgerError::StoreError(format!("Failed to serialize account: {}", e)))
}

pub fn decode(bytes: &[u8]) -> Result<Account> {
    serde_json::from_slice(bytes)
        .map_err(|e| LedgerError::DecodeError(format!("Failed to deserialize account: {}", e)))
}

pub struct AccountStore<'a, S: KeyValueStore + ?Sized> {
    state: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> AccountStore<'a, S> {
    pub fn new(state: &'a S) -> Self {
        Self { state }
    }

    /// Raw bytes under `key`, `None` when absent. An empty value counts as absent.
    pub fn load_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.state.get_state(key)?.filter(|bytes| !bytes.is_empty()))
    }

    pub fn load(&self, key: &str) -> Result<Account> {
        match self.load_raw(key)? {
            Some(bytes) => decode(&bytes),
            None => Err(LedgerError::NotFound(key.to_string())),
        }
    }

    /// Encodes and writes `account` under `key`, returning the written bytes.
    pub fn save(&self, key: &str, account: &Account) -> Result<Vec<u8>> {
        let bytes = encode(account)?;
        self.state.put_state(key, &bytes)?;
        Ok(bytes)
    }
}
