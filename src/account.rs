//! The account record kept in the world state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an account. Only the active state exists; the legacy
/// `ATIVO` / `ATIVA` spellings decode to the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    #[default]
    #[serde(rename = "ACTIVE", alias = "ATIVO", alias = "ATIVA")]
    Active,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "ACTIVE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Storage key of the record. Never changes after creation.
    pub id: String,
    pub number: String,
    #[serde(rename = "taxID", alias = "cpf")]
    pub tax_id: String,
    #[serde(alias = "amount")]
    pub balance: f64,
    pub status: AccountStatus,
}

impl Account {
    /// A freshly opened account: number mirrors the id, zero balance, active.
    pub fn open(id: impl Into<String>, tax_id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            number: id.clone(),
            id,
            tax_id: tax_id.into(),
            balance: 0.0,
            status: AccountStatus::Active,
        }
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    pub fn credit(&mut self, amount: f64) {
        self.balance += amount;
    }

    /// No overdraft protection: the balance may go negative.
    pub fn debit(&mut self, amount: f64) {
        self.balance -= amount;
    }
}
