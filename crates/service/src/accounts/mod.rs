//! ATM accounts: domain types, persistence seam and the account operations.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{Account, Accounts, Amount};
pub use repository::{AccountRepository, FileAccountRepository};
pub use service::AccountService;
