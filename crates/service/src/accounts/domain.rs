use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ServiceError;

/// A persisted account record. The account number is the map key, not a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub balance: f64,
}

/// Account number -> record, as stored on disk.
pub type Accounts = BTreeMap<String, Account>;

/// A validated, strictly positive, finite amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(f64);

impl Amount {
    /// Parse the raw `amount` field of a request.
    ///
    /// JSON numbers and numeric strings (surrounding whitespace allowed) are
    /// accepted. Everything else, including NaN and infinities, is rejected
    /// as an invalid amount; a value `<= 0` is rejected separately.
    pub fn parse(raw: Option<&Value>) -> Result<Self, ServiceError> {
        let value = match raw {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite())
        .ok_or_else(ServiceError::invalid_amount)?;

        if value <= 0.0 {
            return Err(ServiceError::non_positive_amount());
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Account {
    /// Take `amount` out of the balance; the whole balance may be withdrawn.
    pub fn withdraw(&mut self, amount: Amount) -> Result<f64, ServiceError> {
        if amount.value() > self.balance {
            return Err(ServiceError::InsufficientFunds);
        }
        self.balance -= amount.value();
        Ok(self.balance)
    }

    pub fn deposit(&mut self, amount: Amount) -> f64 {
        self.balance += amount.value();
        self.balance
    }
}
