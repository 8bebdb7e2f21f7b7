//! Delivery of validated bookings.

use crate::draft::Booking;
use crate::error::SubmissionError;
use crate::retry::{with_retry_if, RetryConfig};
use crate::validation::{sanitize_email, sanitize_phone, sanitize_text};
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info};

/// Acknowledgement from whoever accepted the booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmissionReceipt {
    /// Booking reference, when the receiver issues one.
    #[serde(default)]
    pub reference: Option<String>,
}

/// Something that accepts a booking.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, booking: &Booking) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Accepts every booking after a fixed delay without sending it anywhere.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait]
impl Submitter for SimulatedSubmitter {
    async fn submit(&self, booking: &Booking) -> Result<SubmissionReceipt, SubmissionError> {
        debug!("Simulating submission for {} on {}", booking.service, booking.date);
        sleep(self.delay).await;
        Ok(SubmissionReceipt::default())
    }
}

/// Wire shape of a booking; free text is HTML-escaped.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookingPayload<'a> {
    service: &'a str,
    name: String,
    email: String,
    phone: String,
    experience_level: &'a str,
    group_size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    special_requests: Option<String>,
    date: String,
    time: String,
}

impl<'a> From<&'a Booking> for BookingPayload<'a> {
    fn from(booking: &'a Booking) -> Self {
        Self {
            service: booking.service.as_str(),
            name: sanitize_text(&booking.name),
            email: sanitize_email(&booking.email),
            phone: sanitize_phone(&booking.phone),
            experience_level: booking.experience_level.as_str(),
            group_size: booking.group_size,
            special_requests: booking.special_requests.as_deref().map(sanitize_text),
            date: booking.date.format("%Y-%m-%d").to_string(),
            time: booking.time.format("%H:%M").to_string(),
        }
    }
}

/// POSTs bookings as JSON to a remote endpoint.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(&self, booking: &Booking) -> Result<SubmissionReceipt, SubmissionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&BookingPayload::from(booking))
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read body: {}>", e));

        if !status.is_success() {
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // Any 2xx is an acceptance; the reference is optional.
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}

/// Timeout and retry schedule applied to each submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPolicy {
    /// Limit for a single attempt.
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retry: RetryConfig::booking_submission(),
        }
    }
}

/// Submit with a per-attempt timeout, retrying transient failures.
pub async fn submit_with_retry(
    submitter: &dyn Submitter,
    booking: &Booking,
    policy: &SubmissionPolicy,
) -> Result<SubmissionReceipt, SubmissionError> {
    let receipt = with_retry_if(
        &policy.retry,
        "Booking submission",
        || async {
            match timeout(policy.timeout, submitter.submit(booking)).await {
                Ok(result) => result,
                Err(_) => Err(SubmissionError::Timeout(policy.timeout)),
            }
        },
        SubmissionError::is_retryable,
    )
    .await?;

    info!(
        "Booking for {} on {} {} accepted",
        booking.service,
        booking.date,
        booking.time.format("%H:%M")
    );
    Ok(receipt)
}

/// Owned version of [`submit_with_retry`] for running detached from the caller.
pub fn submission_task(
    submitter: Arc<dyn Submitter>,
    booking: Booking,
    policy: SubmissionPolicy,
) -> BoxFuture<'static, Result<SubmissionReceipt, SubmissionError>> {
    async move { submit_with_retry(submitter.as_ref(), &booking, &policy).await }.boxed()
}
