use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::accounts::domain::{Account, Accounts, Amount};
use crate::accounts::repository::AccountRepository;
use crate::errors::ServiceError;

/// The four ATM operations on top of an [`AccountRepository`].
///
/// Every call reloads the account map; mutations write it back in full.
/// Within one process, load-mutate-save sequences hold the write side of a
/// lock and queries hold the read side, so no update is dropped and no query
/// sees a half-written file. Writers in other processes are not coordinated
/// with.
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
    lock: RwLock<()>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo, lock: RwLock::new(()) }
    }

    // Callers hold `lock`.
    async fn find(&self, account_number: &str) -> Result<(Accounts, Account), ServiceError> {
        let accounts = self.repo.load_accounts().await?;
        let account = accounts.get(account_number).copied().ok_or(ServiceError::NotFound)?;
        Ok((accounts, account))
    }

    /// Succeeds when the account exists.
    pub async fn lookup(&self, account_number: &str) -> Result<(), ServiceError> {
        let _guard = self.lock.read().await;
        self.find(account_number).await.map(|_| ())
    }

    pub async fn balance(&self, account_number: &str) -> Result<f64, ServiceError> {
        let _guard = self.lock.read().await;
        let (_, account) = self.find(account_number).await?;
        Ok(account.balance)
    }

    /// Withdraw `raw_amount` and return the new balance.
    ///
    /// Check order: account exists, amount parses, amount is positive,
    /// amount does not exceed the balance.
    pub async fn withdraw(&self, account_number: &str, raw_amount: Option<&Value>) -> Result<f64, ServiceError> {
        self.mutate(account_number, raw_amount, "withdraw", |account, amount| account.withdraw(amount))
            .await
    }

    /// Deposit `raw_amount` and return the new balance.
    pub async fn deposit(&self, account_number: &str, raw_amount: Option<&Value>) -> Result<f64, ServiceError> {
        self.mutate(account_number, raw_amount, "deposit", |account, amount| Ok(account.deposit(amount)))
            .await
    }

    async fn mutate<F>(
        &self,
        account_number: &str,
        raw_amount: Option<&Value>,
        op: &'static str,
        apply: F,
    ) -> Result<f64, ServiceError>
    where
        F: FnOnce(&mut Account, Amount) -> Result<f64, ServiceError>,
    {
        let _guard = self.lock.write().await;

        let (mut accounts, mut account) = self.find(account_number).await?;
        let amount = Amount::parse(raw_amount).map_err(|e| {
            info!(op, account = %account_number, error = %e, "rejected amount");
            e
        })?;
        let new_balance = apply(&mut account, amount).map_err(|e| {
            info!(op, account = %account_number, amount = amount.value(), error = %e, "rejected operation");
            e
        })?;

        accounts.insert(account_number.to_string(), account);
        self.repo.save_accounts(&accounts).await?;
        info!(op, account = %account_number, amount = amount.value(), new_balance, "balance updated");
        Ok(new_balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::repository::FileAccountRepository;
    use crate::test_support::{seed_accounts, temp_json_path};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts saves so tests can assert that rejected requests never write.
    #[derive(Default)]
    struct MemoryRepo {
        accounts: std::sync::Mutex<Accounts>,
        saves: AtomicUsize,
    }

    impl MemoryRepo {
        fn with(entries: &[(&str, f64)]) -> Arc<Self> {
            let accounts = entries
                .iter()
                .map(|(k, b)| (k.to_string(), Account { balance: *b }))
                .collect();
            Arc::new(Self { accounts: std::sync::Mutex::new(accounts), saves: AtomicUsize::new(0) })
        }

        fn balance(&self, id: &str) -> f64 {
            self.accounts.lock().unwrap()[id].balance
        }
    }

    #[async_trait]
    impl AccountRepository for MemoryRepo {
        async fn load_accounts(&self) -> Result<Accounts, ServiceError> {
            Ok(self.accounts.lock().unwrap().clone())
        }

        async fn save_accounts(&self, accounts: &Accounts) -> Result<(), ServiceError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            *self.accounts.lock().unwrap() = accounts.clone();
            Ok(())
        }
    }

    fn service(repo: &Arc<MemoryRepo>) -> AccountService {
        AccountService::new(repo.clone())
    }

    #[tokio::test]
    async fn balance_returns_stored_value() {
        let repo = MemoryRepo::with(&[("12345", 100.0), ("555", 0.25)]);
        let svc = service(&repo);
        assert_eq!(svc.balance("12345").await, Ok(100.0));
        assert_eq!(svc.balance("555").await, Ok(0.25));
        assert_eq!(svc.lookup("12345").await, Ok(()));
    }

    #[tokio::test]
    async fn unknown_account_is_not_found_everywhere() {
        let repo = MemoryRepo::with(&[("12345", 100.0)]);
        let svc = service(&repo);
        let amount = json!(10);
        assert_eq!(svc.lookup("999").await, Err(ServiceError::NotFound));
        assert_eq!(svc.balance("999").await, Err(ServiceError::NotFound));
        assert_eq!(svc.withdraw("999", Some(&amount)).await, Err(ServiceError::NotFound));
        assert_eq!(svc.deposit("999", Some(&amount)).await, Err(ServiceError::NotFound));
    }

    #[tokio::test]
    async fn existence_checked_before_amount() {
        let repo = MemoryRepo::with(&[]);
        let svc = service(&repo);
        let bad = json!("abc");
        assert_eq!(svc.withdraw("999", Some(&bad)).await, Err(ServiceError::NotFound));
        assert_eq!(svc.deposit("999", None).await, Err(ServiceError::NotFound));
    }

    #[tokio::test]
    async fn rejected_withdrawals_leave_balance_alone() {
        let repo = MemoryRepo::with(&[("12345", 50.0)]);
        let svc = service(&repo);
        for amount in [json!(0), json!(-5), json!("x")] {
            assert!(matches!(svc.withdraw("12345", Some(&amount)).await, Err(ServiceError::InvalidAmount(_))));
        }
        assert_eq!(svc.withdraw("12345", Some(&json!(1000))).await, Err(ServiceError::InsufficientFunds));
        assert_eq!(repo.balance("12345"), 50.0);
        assert_eq!(repo.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejected_deposits_leave_balance_alone() {
        let repo = MemoryRepo::with(&[("12345", 50.0)]);
        let svc = service(&repo);
        assert_eq!(svc.deposit("12345", Some(&json!(0))).await, Err(ServiceError::non_positive_amount()));
        assert_eq!(svc.deposit("12345", Some(&json!(null))).await, Err(ServiceError::invalid_amount()));
        assert_eq!(repo.balance("12345"), 50.0);
        assert_eq!(repo.saves.load(Ordering::SeqCst), 0);
    }

    struct LogSink(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn rejections_are_logged_at_info() {
        let buf = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || LogSink(Arc::clone(&sink)))
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let repo = MemoryRepo::with(&[("12345", 50.0)]);
        let svc = service(&repo);
        assert!(svc.deposit("12345", Some(&json!("x"))).await.is_err());
        assert!(svc.withdraw("12345", Some(&json!(1000))).await.is_err());

        let out = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
        assert!(out.contains("rejected amount"), "{out}");
        assert!(out.contains("rejected operation"), "{out}");
        assert!(out.contains("Low balance for this withdrawal"), "{out}");
    }

    #[tokio::test]
    async fn withdraw_then_deposit_sequence() {
        let repo = MemoryRepo::with(&[("12345", 100.0)]);
        let svc = service(&repo);
        assert_eq!(svc.withdraw("12345", Some(&json!(50))).await, Ok(50.0));
        assert_eq!(svc.withdraw("12345", Some(&json!(1000))).await, Err(ServiceError::InsufficientFunds));
        assert_eq!(svc.deposit("12345", Some(&json!(200))).await, Ok(250.0));
        assert_eq!(svc.withdraw("12345", Some(&json!("250"))).await, Ok(0.0));
        assert_eq!(repo.saves.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn mutations_persist_to_file() -> Result<(), anyhow::Error> {
        let path = seed_accounts("svc_accounts", json!({"12345": {"balance": 100.0}, "777": {"balance": 5}})).await?;
        let svc = AccountService::new(Arc::new(FileAccountRepository::new(&path)));

        assert_eq!(svc.withdraw("12345", Some(&json!(50))).await?, 50.0);
        assert_eq!(svc.deposit("12345", Some(&json!(200))).await?, 250.0);

        let reloaded = FileAccountRepository::new(&path).load_accounts().await?;
        assert_eq!(reloaded["12345"].balance, 250.0);
        assert_eq!(reloaded["777"].balance, 5.0);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_means_no_accounts() {
        let svc = AccountService::new(Arc::new(FileAccountRepository::new(temp_json_path("svc_none"))));
        assert_eq!(svc.balance("12345").await, Err(ServiceError::NotFound));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn balance_reads_during_deposits_always_see_a_whole_file() -> Result<(), anyhow::Error> {
        let path = seed_accounts("svc_read_write", json!({"1": {"balance": 0}})).await?;
        let svc = Arc::new(AccountService::new(Arc::new(FileAccountRepository::new(&path))));

        let writer = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move {
                for _ in 0..200 {
                    svc.deposit("1", Some(&json!(1))).await?;
                }
                Ok::<_, ServiceError>(())
            })
        };
        let reader = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move {
                let mut last = 0.0;
                for _ in 0..1000 {
                    let balance = svc.balance("1").await?;
                    assert!(balance >= last, "balance went backwards: {balance} < {last}");
                    last = balance;
                }
                Ok::<_, ServiceError>(())
            })
        };
        writer.await??;
        reader.await??;
        assert_eq!(svc.balance("1").await?, 200.0);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_deposits_are_not_lost() -> Result<(), anyhow::Error> {
        let path = seed_accounts("svc_concurrent", json!({"1": {"balance": 0}})).await?;
        let svc = Arc::new(AccountService::new(Arc::new(FileAccountRepository::new(&path))));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move { svc.deposit("1", Some(&json!(1))).await }));
        }
        for h in handles {
            h.await??;
        }
        assert_eq!(svc.balance("1").await?, 20.0);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
