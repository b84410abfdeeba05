//! Service layer for the ATM account operations.
//! - `storage` holds the generic JSON file map store.
//! - `accounts` holds the account domain, its repository and the four operations.
//! - Errors are reported through `errors::ServiceError`.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod accounts;
#[cfg(test)]
pub mod test_support;
