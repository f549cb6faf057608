//! Account ledger core: argument validation and the balance state transitions.
//!
//! Every invocation follows the same shape: check the argument count, read the
//! current record through [`AccountStore`] when needed, compute the new state,
//! and write it back as the final step. A failed invocation never writes.

use crate::account::Account;
use crate::error::{LedgerError, Result};
use crate::persistence::KeyValueStore;
use crate::store::{encode, AccountStore};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Demonstration accounts written by [`Operation::Init`]: id, tax id, balance.
pub const SEED_ACCOUNTS: [(&str, &str, f64); 4] = [
    ("1111", "303.424.538-66", 230.10),
    ("2222", "202.303.505-11", 453.20),
    ("3333", "111.111.111-11", 1203.34),
    ("4444", "222.333.444-55", 120.30),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Init,
    Create,
    Query,
    Credit,
    Debit,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Init,
        Operation::Create,
        Operation::Query,
        Operation::Credit,
        Operation::Debit,
    ];

    /// Function name used by the chaincode invocation contract.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Init => "Init",
            Operation::Create => "createAccount",
            Operation::Query => "queryAccount",
            Operation::Credit => "creditAccount",
            Operation::Debit => "debitAccount",
        }
    }

    /// Number of string arguments the operation takes, `None` when any count is accepted.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Operation::Init => None,
            Operation::Create => Some(2),
            Operation::Query => Some(1),
            Operation::Credit | Operation::Debit => Some(2),
        }
    }

    fn check_args(&self, args: &[String]) -> Result<()> {
        match self.arity() {
            Some(expected) if args.len() != expected => Err(LedgerError::ArgumentError {
                operation: self.name(),
                expected,
                got: args.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Init" | "init" => Ok(Operation::Init),
            "createAccount" | "create" => Ok(Operation::Create),
            "queryAccount" | "query" => Ok(Operation::Query),
            "creditAccount" | "credit" => Ok(Operation::Credit),
            "debitAccount" | "debit" => Ok(Operation::Debit),
            other => Err(LedgerError::UnknownOperation(other.to_string())),
        }
    }
}

/// Parses a credit/debit amount. Only finite decimals are accepted.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let amount: f64 = raw
        .parse()
        .map_err(|e| LedgerError::ParseError(format!("invalid amount {:?}: {}", raw, e)))?;
    if !amount.is_finite() {
        return Err(LedgerError::ParseError(format!(
            "amount {:?} is not a finite number",
            raw
        )));
    }
    Ok(amount)
}

/// Stateless ledger service. All per-call state travels through the arguments,
/// so one value can serve any number of invocations.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountLedger;

impl AccountLedger {
    pub fn new() -> Self {
        AccountLedger
    }

    /// Routes an operation name plus string arguments to its handler. The
    /// success payload is the encoded account for query/credit/debit and empty
    /// for init/create.
    pub fn invoke<S: KeyValueStore + ?Sized>(
        &self,
        state: &S,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>> {
        let result = function
            .parse::<Operation>()
            .and_then(|op| self.execute(state, op, args));
        if let Err(e) = &result {
            warn!(function, error = %e, "ledger invocation rejected");
        }
        result
    }

    pub fn execute<S: KeyValueStore + ?Sized>(
        &self,
        state: &S,
        op: Operation,
        args: &[String],
    ) -> Result<Vec<u8>> {
        op.check_args(args)?;
        match op {
            Operation::Init => {
                self.init(state)?;
                Ok(Vec::new())
            }
            Operation::Create => {
                self.create(state, &args[0], &args[1])?;
                Ok(Vec::new())
            }
            Operation::Query => encode(&self.query(state, &args[0])?),
            Operation::Credit => encode(&self.credit(state, &args[0], &args[1])?),
            Operation::Debit => encode(&self.debit(state, &args[0], &args[1])?),
        }
    }

    /// Writes the demonstration accounts, overwriting whatever is stored under their ids.
    pub fn init<S: KeyValueStore + ?Sized>(&self, state: &S) -> Result<()> {
        let store = AccountStore::new(state);
        for (id, tax_id, balance) in SEED_ACCOUNTS {
            let account = Account::open(id, tax_id).with_balance(balance);
            store.save(&account.id, &account)?;
            info!(id, balance, "seeded account");
        }
        Ok(())
    }

    /// Opens an account with a zero balance. An existing record under `id` is replaced.
    pub fn create<S: KeyValueStore + ?Sized>(
        &self,
        state: &S,
        id: &str,
        tax_id: &str,
    ) -> Result<Account> {
        let account = Account::open(id, tax_id);
        AccountStore::new(state).save(id, &account)?;
        info!(id, "account created");
        Ok(account)
    }

    pub fn query<S: KeyValueStore + ?Sized>(&self, state: &S, id: &str) -> Result<Account> {
        let account = AccountStore::new(state).load(id)?;
        debug!(id, balance = account.balance, "account queried");
        Ok(account)
    }

    pub fn credit<S: KeyValueStore + ?Sized>(
        &self,
        state: &S,
        id: &str,
        amount: &str,
    ) -> Result<Account> {
        let amount = parse_amount(amount)?;
        self.apply(state, id, |account| account.credit(amount))
    }

    /// Subtracts `amount` without any sufficiency check.
    pub fn debit<S: KeyValueStore + ?Sized>(
        &self,
        state: &S,
        id: &str,
        amount: &str,
    ) -> Result<Account> {
        let amount = parse_amount(amount)?;
        self.apply(state, id, |account| account.debit(amount))
    }

    fn apply<S, F>(&self, state: &S, id: &str, mutate: F) -> Result<Account>
    where
        S: KeyValueStore + ?Sized,
        F: FnOnce(&mut Account),
    {
        let store = AccountStore::new(state);
        let mut account = store.load(id)?;
        let previous = account.balance;
        mutate(&mut account);
        if !account.balance.is_finite() {
            return Err(LedgerError::ParseError(format!(
                "balance of account {} would overflow",
                id
            )));
        }
        store.save(id, &account)?;
        info!(id, previous, balance = account.balance, "balance updated");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountStatus;
    use crate::persistence::InMemoryStore;
    use crate::store::decode;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn seeded() -> InMemoryStore {
        let state = InMemoryStore::new();
        AccountLedger::new().init(&state).unwrap();
        state
    }

    #[test]
    fn test_operation_names_roundtrip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
        assert_eq!("credit".parse::<Operation>().unwrap(), Operation::Credit);
    }

    #[test]
    fn test_unknown_operation() {
        let state = InMemoryStore::new();
        let err = AccountLedger::new()
            .invoke(&state, "transferAccount", &args(&["1", "2"]))
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::UnknownOperation("transferAccount".to_string())
        );
        assert!(state.is_empty());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("19.90").unwrap(), 19.90);
        assert_eq!(parse_amount("-3").unwrap(), -3.0);
        for bad in ["abc", "", " 1.0", "NaN", "inf", "-infinity", "1,5"] {
            assert!(
                matches!(parse_amount(bad), Err(LedgerError::ParseError(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_init_seeds_four_accounts() {
        let state = seeded();
        assert_eq!(state.len(), 4);
        let ledger = AccountLedger::new();
        for (id, tax_id, balance) in SEED_ACCOUNTS {
            let account = ledger.query(&state, id).unwrap();
            assert_eq!(account.number, id);
            assert_eq!(account.tax_id, tax_id);
            assert_eq!(account.balance, balance);
            assert_eq!(account.status, AccountStatus::Active);
        }
    }

    #[test]
    fn test_create_overwrites_existing_record() {
        let state = seeded();
        let ledger = AccountLedger::new();
        ledger.credit(&state, "1111", "500").unwrap();
        for _ in 0..3 {
            ledger.create(&state, "1111", "999.999.999-99").unwrap();
            let account = ledger.query(&state, "1111").unwrap();
            assert_eq!(account.balance, 0.0);
            assert_eq!(account.status, AccountStatus::Active);
            assert_eq!(account.tax_id, "999.999.999-99");
        }
    }

    #[test]
    fn test_credit_then_debit_restores_balance() {
        let state = seeded();
        let ledger = AccountLedger::new();
        let start = ledger.query(&state, "2222").unwrap().balance;
        ledger.credit(&state, "2222", "87.65").unwrap();
        let after = ledger.debit(&state, "2222", "87.65").unwrap();
        assert!((after.balance - start).abs() < 1e-9);
    }

    #[test]
    fn test_credits_accumulate() {
        let state = seeded();
        let ledger = AccountLedger::new();
        ledger.credit(&state, "4444", "10.5").unwrap();
        let account = ledger.credit(&state, "4444", "0.25").unwrap();
        assert!((account.balance - (120.30 + 10.5 + 0.25)).abs() < 1e-9);
    }

    #[test]
    fn test_debit_allows_negative_balance() {
        let state = seeded();
        let account = AccountLedger::new()
            .debit(&state, "4444", "1000")
            .unwrap();
        assert!((account.balance - (120.30 - 1000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_mutating_missing_account_fails_without_write() {
        let state = InMemoryStore::new();
        let ledger = AccountLedger::new();
        for result in [
            ledger.credit(&state, "9999", "1"),
            ledger.debit(&state, "9999", "1"),
        ] {
            assert_eq!(result.unwrap_err(), LedgerError::NotFound("9999".to_string()));
        }
        assert!(state.is_empty());
    }

    #[test]
    fn test_corrupt_record_surfaces_decode_error() {
        let state = InMemoryStore::new();
        state.put_state("5555", b"not an account").unwrap();
        let err = AccountLedger::new()
            .credit(&state, "5555", "1")
            .unwrap_err();
        assert!(matches!(err, LedgerError::DecodeError(_)));
        assert_eq!(
            state.get_state("5555").unwrap(),
            Some(b"not an account".to_vec())
        );
    }

    #[test]
    fn test_overflowing_balance_rejected() {
        let state = InMemoryStore::new();
        let ledger = AccountLedger::new();
        ledger.create(&state, "big", "t").unwrap();
        ledger.credit(&state, "big", "1.7e308").unwrap();
        let err = ledger.credit(&state, "big", "1.7e308").unwrap_err();
        assert!(matches!(err, LedgerError::ParseError(_)));
        assert_eq!(ledger.query(&state, "big").unwrap().balance, 1.7e308);
    }

    #[test]
    fn test_invoke_returns_encoded_account() {
        let state = seeded();
        let payload = AccountLedger::new()
            .invoke(&state, "creditAccount", &args(&["3333", "6.66"]))
            .unwrap();
        let account = decode(&payload).unwrap();
        assert!((account.balance - 1210.0).abs() < 1e-9);
        assert_eq!(state.get_state("3333").unwrap(), Some(payload));
    }

    #[test]
    fn test_invoke_create_has_empty_payload() {
        let state = InMemoryStore::new();
        let payload = AccountLedger::new()
            .invoke(&state, "createAccount", &args(&["7777", "123.45.678-90"]))
            .unwrap();
        assert!(payload.is_empty());
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_wrong_argument_counts() {
        let state = InMemoryStore::new();
        let ledger = AccountLedger::new();
        let cases = [
            ("createAccount", args(&["7777"]), 2),
            ("queryAccount", args(&[]), 1),
            ("queryAccount", args(&["1", "2"]), 1),
            ("creditAccount", args(&["1111"]), 2),
            ("debitAccount", args(&["1111", "1", "2"]), 2),
        ];
        for (function, call_args, expected) in cases {
            match ledger.invoke(&state, function, &call_args) {
                Err(LedgerError::ArgumentError {
                    expected: e, got, ..
                }) => {
                    assert_eq!(e, expected);
                    assert_eq!(got, call_args.len());
                }
                other => panic!("{} returned {:?}", function, other),
            }
        }
        assert!(state.is_empty());
    }
}
