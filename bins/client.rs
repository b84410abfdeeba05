//! Demo client: checks a balance, withdraws 50 and deposits 200.
//!
//! Usage: `client [account_number]`; the server URL comes from `ATM_BASE_URL`
//! (default `http://localhost:5000`).

use common::types::ErrorBody;
use dotenvy::dotenv;
use serde_json::{json, Value};
use tracing::{error, info};

const DEFAULT_BASE_URL: &str = "http://localhost:5000";

async fn report(label: &str, res: reqwest::Response) -> anyhow::Result<()> {
    let status = res.status();
    if status.is_success() {
        let body: Value = res.json().await?;
        info!(%status, %body, "{label}");
    } else {
        let body: ErrorBody = res.json().await?;
        error!(%status, error = %body.error, "{label} failed");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    let base_url = std::env::var("ATM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let account = std::env::args().nth(1).unwrap_or_else(|| "12345".to_string());
    let client = reqwest::Client::new();

    let res = client.get(format!("{base_url}/accounts/{account}/balance")).send().await?;
    report("balance", res).await?;

    let res = client
        .post(format!("{base_url}/accounts/{account}/withdraw"))
        .json(&json!({"amount": 50}))
        .send()
        .await?;
    report("withdraw", res).await?;

    let res = client
        .post(format!("{base_url}/accounts/{account}/deposit"))
        .json(&json!({"amount": 200}))
        .send()
        .await?;
    report("deposit", res).await?;

    Ok(())
}
