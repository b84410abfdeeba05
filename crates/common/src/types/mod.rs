//! Request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};

/// Body of `POST /accounts`. The account number is kept untyped so a
/// non-string value can be reported as an unknown account.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct LookupRequest {
    #[serde(default)]
    pub account_number: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LookupResponse {
    pub message: String,
    pub redirect_url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccountResponse {
    pub account_number: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BalanceResponse {
    pub account_number: String,
    pub balance: f64,
}

/// Body of withdraw/deposit requests. `amount` may be a number or a numeric
/// string; validation happens in the service layer.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AmountRequest {
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TransactionResponse {
    pub message: String,
    pub new_balance: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}
