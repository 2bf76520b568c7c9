//! Driver spawns the regulatory update task

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::engine::Engine;
use crate::provider::RuleSource;
use crate::types::{Alpha2, RegulatoryInfo};
use crate::{RegulatoryError, Result};

/// Pending requests buffered before senders wait.
const REQUEST_QUEUE_DEPTH: usize = 16;
/// Lookup attempts per request when the source reports a retryable error.
const MAX_LOOKUP_ATTEMPTS: u32 = 3;

/// Ask the driver to switch radio `phy_id` to `country`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct UpdateRequest {
    pub phy_id: u8,
    pub country: Alpha2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum UpdateStatus {
    Applied,
    /// The source has no rules for the country
    NotFound,
    /// The engine refused the rule set; the previous master list stays
    Rejected { reason: String },
    /// The source failed after every retry
    SourceFailed { reason: String },
}

/// Result of one processed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct UpdateOutcome {
    /// Number of requests processed so far, including this one
    pub seq: u64,
    pub request: UpdateRequest,
    pub status: UpdateStatus,
}

/// Handles returned by [`UpdateDriver::spawn`]
pub struct DriverChannels {
    /// Sender for country change requests
    pub requests: mpsc::Sender<UpdateRequest>,
    /// Receiver for the outcome of the latest request
    pub outcomes: watch::Receiver<Option<Arc<UpdateOutcome>>>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Runs regulatory lookups off the caller's thread.
///
/// The spawned task owns the [`RuleSource`], applies each answer to the
/// engine and publishes the outcome. It ends when cancelled or when every
/// request sender is dropped.
pub struct UpdateDriver;

impl UpdateDriver {
    pub fn spawn<S>(engine: Arc<Engine>, source: S) -> DriverChannels
    where
        S: RuleSource,
    {
        let (request_tx, request_rx) = mpsc::channel(REQUEST_QUEUE_DEPTH);
        let (outcome_tx, outcome_rx) = watch::channel(None);
        let cancel = CancellationToken::new();

        let cancel_task = cancel.clone();
        tokio::spawn(async move {
            Self::update_task(engine, source, request_rx, outcome_tx, cancel_task).await;
        });

        DriverChannels { requests: request_tx, outcomes: outcome_rx, cancel }
    }

    async fn update_task<S>(
        engine: Arc<Engine>,
        mut source: S,
        mut requests: mpsc::Receiver<UpdateRequest>,
        outcomes: watch::Sender<Option<Arc<UpdateOutcome>>>,
        cancel: CancellationToken,
    ) where
        S: RuleSource,
    {
        info!("Regulatory update task started");
        let mut seq = 0u64;

        loop {
            let request = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Regulatory update task cancelled");
                    break;
                }
                request = requests.recv() => match request {
                    Some(request) => request,
                    None => {
                        debug!("All request senders dropped");
                        break;
                    }
                },
            };

            let status = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Regulatory update task cancelled during lookup");
                    break;
                }
                status = Self::process(&engine, &mut source, request) => status,
            };

            seq += 1;
            outcomes.send_replace(Some(Arc::new(UpdateOutcome { seq, request, status })));
        }

        info!("Regulatory update task ended (processed {} requests)", seq);
    }

    async fn process<S>(engine: &Engine, source: &mut S, request: UpdateRequest) -> UpdateStatus
    where
        S: RuleSource,
    {
        let UpdateRequest { phy_id, country } = request;
        let info = match Self::lookup_with_retry(source, phy_id, &country).await {
            Ok(Some(info)) => info,
            Ok(None) => {
                warn!(phy_id, %country, "No regulatory rules for country");
                return UpdateStatus::NotFound;
            }
            Err(e) => {
                error!(phy_id, %country, error = %e, "Regulatory lookup failed");
                return UpdateStatus::SourceFailed { reason: e.to_string() };
            }
        };

        match engine.apply_regulatory_update(&info) {
            Ok(()) => UpdateStatus::Applied,
            Err(e) => UpdateStatus::Rejected { reason: e.to_string() },
        }
    }

    async fn lookup_with_retry<S>(
        source: &mut S,
        phy_id: u8,
        country: &Alpha2,
    ) -> Result<Option<RegulatoryInfo>>
    where
        S: RuleSource,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match source.lookup(phy_id, country).await {
                Ok(found) => return Ok(found),
                Err(e) if e.is_retryable() && attempt < MAX_LOOKUP_ATTEMPTS => {
                    warn!(
                        "Regulatory lookup error ({}/{}): {}",
                        attempt, MAX_LOOKUP_ATTEMPTS, e
                    );
                    // Exponential backoff: 50ms, 100ms, ...
                    let backoff = Duration::from_millis(50 * (1 << attempt.min(5)) / 2);
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl DriverChannels {
    /// Queue a country change for `phy_id`.
    pub async fn request(&self, phy_id: u8, country: Alpha2) -> Result<()> {
        self.requests
            .send(UpdateRequest { phy_id, country })
            .await
            .map_err(|_| RegulatoryError::source_unavailable("regulatory update task has stopped"))
    }
}
