use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::error::{NotifyError, Result};
use crate::payload::Webhook;

/// Statuses at or above this value are treated as failed deliveries.
const FIRST_FAILURE_STATUS: u16 = 299;

/// Build the HTTP client for a single delivery. `None` leaves the request unbounded.
pub fn http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    builder.build().map_err(NotifyError::Transport)
}

/// POST the document to the webhook endpoint and interpret the status.
pub async fn post_webhook(client: &Client, endpoint: &str, hook: &Webhook) -> Result<StatusCode> {
    let body = hook.to_json()?;
    debug!(bytes = body.len(), "posting notification");

    let resp = client
        .post(endpoint)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(|e| NotifyError::Transport(e.without_url()))?;

    let status = resp.status();
    if status.as_u16() >= FIRST_FAILURE_STATUS {
        return Err(NotifyError::Delivery(status));
    }
    info!(%status, "notification delivered");
    Ok(status)
}
