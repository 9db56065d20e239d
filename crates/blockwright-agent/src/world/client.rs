//! HTTP client for the world service.
//!
//! Every failure becomes a [`WorldError`]; nothing here panics on bad input
//! from the network.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use async_trait::async_trait;
use blockwright_core::config::{RetryConfig, WorldConfig};
use serde_json::json;

use super::retry::{backoff_delay, CircuitBreaker};
use super::{Ack, Block, Point, WorldApi, WorldError, WorldSnapshot};
use crate::types::safe_truncate;

const MAX_ERROR_BODY: usize = 500;

pub struct HttpWorldClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
    breaker: Mutex<CircuitBreaker>,
}

impl HttpWorldClient {
    pub fn new(config: &WorldConfig) -> Result<Self, WorldError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| WorldError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry.clone(),
            breaker: Mutex::new(CircuitBreaker::new(config.breaker.clone())),
        })
    }

    fn breaker(&self) -> MutexGuard<'_, CircuitBreaker> {
        self.breaker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Send one request, retrying transient failures with backoff. Only
    /// transient failures count against the breaker: a 4xx means the service
    /// is up.
    async fn execute<F>(&self, op: &'static str, make_request: F) -> Result<String, WorldError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        if let Err(retry_in) = self.breaker().admit(Instant::now()) {
            tracing::debug!(op, ?retry_in, "world call rejected by open circuit");
            return Err(WorldError::CircuitOpen { retry_in });
        }

        let mut attempt = 1;
        loop {
            match send_once(make_request()).await {
                Ok(body) => {
                    self.breaker().record_success();
                    return Ok(body);
                }
                Err(err) if err.is_transient() && attempt < self.retry.max_attempts => {
                    let delay = backoff_delay(&self.retry, attempt);
                    tracing::warn!(
                        op,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "world call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_transient() {
                        self.breaker().record_failure(Instant::now());
                    } else {
                        self.breaker().record_success();
                    }
                    tracing::warn!(op, attempts = attempt, error = %err, "world call failed");
                    return Err(err);
                }
            }
        }
    }
}

async fn send_once(request: reqwest::RequestBuilder) -> Result<String, WorldError> {
    let resp = request
        .send()
        .await
        .map_err(|e| WorldError::Network(e.to_string()))?;
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| WorldError::Network(e.to_string()))?;
    if !status.is_success() {
        return Err(WorldError::HttpStatus {
            status: status.as_u16(),
            body: safe_truncate(&body, MAX_ERROR_BODY).to_string(),
        });
    }
    Ok(body)
}

#[async_trait]
impl WorldApi for HttpWorldClient {
    async fn get_world_state(&self) -> Result<WorldSnapshot, WorldError> {
        let url = format!("{}/known_world_state", self.base_url);
        let body = self
            .execute("get_world_state", || self.http.get(&url))
            .await?;
        let snapshot: WorldSnapshot = serde_json::from_str(&body)
            .map_err(|e| WorldError::Decode(format!("known_world_state: {}", e)))?;
        tracing::debug!(entries = snapshot.len(), "fetched world state");
        Ok(snapshot)
    }

    async fn set_block(&self, block: Block) -> Result<Ack, WorldError> {
        let url = format!("{}/set_block_once", self.base_url);
        let payload = json!({
            "duration": block.duration(),
            "x": block.point.x,
            "y": block.point.y,
            "z": block.point.z,
            "info": { "type_id": block.block_id.as_str() },
        });
        let response = self
            .execute("set_block", || self.http.post(&url).json(&payload))
            .await?;
        tracing::debug!(point = %block.point, block = block.block_id.as_str(), "block placed");
        Ok(Ack { response })
    }

    async fn remove_block(&self, point: Point) -> Result<Ack, WorldError> {
        let url = format!("{}/remove_block", self.base_url);
        let payload = json!({ "x": point.x, "y": point.y, "z": point.z });
        let response = self
            .execute("remove_block", || self.http.post(&url).json(&payload))
            .await?;
        tracing::debug!(point = %point, "block removed");
        Ok(Ack { response })
    }
}
