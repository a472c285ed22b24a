//! Clients for the read-only backend endpoints.
//!
//! Every client has a `try_*` method that surfaces errors and a plain one
//! that substitutes built-in mock data, so callers never see a failure.

pub mod analysis;
pub mod chat;
pub mod dashboard;
pub mod documents;
pub mod home;

use crate::config::EndpointConfig;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

const USER_AGENT: &str = concat!("nfe-uploader/", env!("CARGO_PKG_VERSION"));

pub fn build_http_client(endpoints: &EndpointConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(endpoints.timeout_seconds))
        .build()?;
    Ok(client)
}

/// Send a request and decode a JSON body, treating non-2xx as an error.
pub(crate) async fn fetch_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status(status.as_u16()));
    }
    Ok(response.json::<T>().await?)
}

/// Run `fetch` immediately and then every `interval`, delivering each
/// result on the returned channel. Stops when the receiver is dropped.
pub fn spawn_poller<T, F, Fut>(
    runtime: &Handle,
    interval: Duration,
    fetch: F,
) -> (Receiver<T>, JoinHandle<()>)
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let handle = runtime.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let value = fetch().await;
            if sender.send(value).is_err() {
                break;
            }
        }
    });
    (receiver, handle)
}
