use futures::future::{self, FutureExt, TryFutureExt};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::io::{self, Write};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Causes are carried in `source()`; [`report`] prints the whole chain.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error")]
    Network(#[from] reqwest::Error),
    #[error("Parse error")]
    Parse(#[from] serde_json::Error),
}

/// The user segment is interpolated as-is, without validation or escaping.
pub fn user_url(api_base: &str, user: &str) -> String {
    format!("{}/users/{}", api_base.trim_end_matches('/'), user)
}

/// Request, read body, parse, composed as a chain of continuations.
pub fn fetch_user_chained(
    client: &Client,
    api_base: &str,
    user: &str,
) -> impl Future<Output = Result<Value, FetchError>> + Send + use<> {
    let url = user_url(api_base, user);
    debug!(%url, "requesting user (chained)");

    client
        .get(url)
        .send()
        .and_then(|response| response.bytes())
        .map_err(FetchError::from)
        .and_then(|body| {
            future::ready(serde_json::from_slice::<Value>(&body).map_err(FetchError::from))
        })
}

/// Same steps as [`fetch_user_chained`], awaited one after the other.
pub async fn fetch_user_sequential(
    client: &Client,
    api_base: &str,
    user: &str,
) -> Result<Value, FetchError> {
    let url = user_url(api_base, user);
    debug!(%url, "requesting user (sequential)");

    // Status is not inspected; any JSON body is a result.
    let response = client.get(url).send().await?;
    let body = response.bytes().await?;
    let data = serde_json::from_slice(&body)?;

    Ok(data)
}

/// Writes a fetched value to `out`, or the failure to `err`. Never both.
pub fn report<O: Write, E: Write>(
    outcome: Result<Value, FetchError>,
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    match outcome {
        Ok(data) => {
            serde_json::to_writer_pretty(&mut *out, &data)?;
            writeln!(out)
        }
        Err(e) => {
            let message = format!("{:#}", anyhow::Error::from(e));
            debug!(error = %message, "failed to fetch user");
            writeln!(err, "{}", message)
        }
    }
}

fn report_to_console(outcome: Result<Value, FetchError>) {
    if let Err(e) = report(outcome, &mut io::stdout().lock(), &mut io::stderr().lock()) {
        warn!(error = %e, "could not write fetch result");
    }
}

pub fn get_user_chained(client: &Client, api_base: &str, user: &str) -> JoinHandle<()> {
    tokio::spawn(fetch_user_chained(client, api_base, user).map(report_to_console))
}

pub fn get_user_sequential(client: &Client, api_base: &str, user: &str) -> JoinHandle<()> {
    let client = client.clone();
    let api_base = api_base.to_string();
    let user = user.to_string();

    tokio::spawn(async move {
        let outcome = fetch_user_sequential(&client, &api_base, &user).await;
        report_to_console(outcome);
    })
}

/// Waits for spawned fetches and returns how many of them panicked.
pub async fn wait_for_fetches(tasks: Vec<(&'static str, JoinHandle<()>)>) -> usize {
    let mut failed = 0;
    for (style, handle) in tasks {
        if let Err(e) = handle.await {
            warn!(style, error = %e, "fetch task did not complete");
            failed += 1;
        }
    }
    failed
}
