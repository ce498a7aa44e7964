//! reqwest-backed gateway for the locker REST API.
//!
//! Endpoints:
//! - `GET /api/lockers` -> `{ lockers: [...] }`
//! - `GET /api/transactions` -> `{ transactions: [...] }`
//! - `PUT /api/lockers/{lockerId}` with `{ cabinetNumber, status }`
//! - `PUT /api/transactions/{transactionId}` with `{ parcelStatus }`

use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{LockerError, Result};
use crate::id::RecordId;
use crate::types::{CabinetStatus, Locker, ParcelStatus, Transaction};

use super::LockerGateway;

#[derive(Serialize)]
struct CabinetStatusUpdate<'a> {
    #[serde(rename = "cabinetNumber")]
    cabinet_number: u32,
    status: &'a CabinetStatus,
}

#[derive(Serialize)]
struct TransactionStatusUpdate<'a> {
    #[serde(rename = "parcelStatus")]
    parcel_status: &'a ParcelStatus,
}

/// HTTP gateway to the locker backend.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Create a gateway from configuration
    ///
    /// Uses the configured request and connect timeouts.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::build(config.api_url()?, config)
    }

    /// Create a gateway with default timeouts against `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_base_url(base_url, &Config::default())
    }

    /// Create a gateway against `base_url`, ignoring the configured URL but
    /// keeping its timeouts.
    pub fn with_base_url(base_url: &str, config: &Config) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| LockerError::Config(format!("invalid api url '{base_url}': {e}")))?;
        Self::build(base_url, config)
    }

    fn build(base_url: Url, config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| LockerError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                LockerError::Config(format!("api url '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, operation: &'static str, segments: &[&str]) -> Result<Value> {
        let url = self.endpoint(segments)?;
        debug!(%url, operation, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LockerError::transport(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LockerError::Transport {
                operation,
                message: format!("HTTP {status}"),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LockerError::transport(operation, e))
    }

    async fn put_json<B: Serialize + Sync>(
        &self,
        operation: &'static str,
        segments: &[&str],
        body: &B,
    ) -> Result<Response> {
        let url = self.endpoint(segments)?;
        debug!(%url, operation, "PUT");

        let response = self
            .client
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| LockerError::transport(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LockerError::Persistence {
                operation,
                status,
                message,
            });
        }

        Ok(response)
    }
}

/// Pull the array stored under `key`, if the payload has one.
fn take_array(mut payload: Value, key: &str) -> Option<Vec<Value>> {
    match payload.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    }
}

impl LockerGateway for HttpGateway {
    async fn list_lockers(&self) -> Result<Vec<Locker>> {
        let payload = self.get_json("list lockers", &["api", "lockers"]).await?;

        let Some(items) = take_array(payload, "lockers") else {
            warn!("lockers payload has no lockers array; treating as empty");
            return Ok(Vec::new());
        };

        let lockers: Vec<Locker> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Locker>(item) {
                Ok(locker) => Some(locker),
                Err(e) => {
                    warn!("skipping malformed locker record: {e}");
                    None
                }
            })
            .collect();

        debug!(count = lockers.len(), "fetched lockers");
        Ok(lockers)
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let payload = self
            .get_json("list transactions", &["api", "transactions"])
            .await?;

        let Some(items) = take_array(payload, "transactions") else {
            warn!("transactions payload has no transactions array; treating as empty");
            return Ok(Vec::new());
        };

        let transactions: Vec<Transaction> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Transaction>(item) {
                Ok(t) => Some(t),
                Err(e) => {
                    warn!("skipping malformed transaction record: {e}");
                    None
                }
            })
            .collect();

        debug!(count = transactions.len(), "fetched transactions");
        Ok(transactions)
    }

    async fn set_cabinet_status(
        &self,
        locker_id: &RecordId,
        cabinet_number: u32,
        status: &CabinetStatus,
    ) -> Result<()> {
        let body = CabinetStatusUpdate {
            cabinet_number,
            status,
        };
        self.put_json(
            "update cabinet status",
            &["api", "lockers", locker_id.as_str()],
            &body,
        )
        .await?;
        Ok(())
    }

    async fn set_transaction_status(
        &self,
        transaction_id: &RecordId,
        status: &ParcelStatus,
    ) -> Result<()> {
        let body = TransactionStatusUpdate {
            parcel_status: status,
        };
        let response = self
            .put_json(
                "update transaction status",
                &["api", "transactions", transaction_id.as_str()],
                &body,
            )
            .await?;

        match response.json::<Value>().await {
            Ok(updated) => debug!(%transaction_id, %updated, "transaction updated"),
            Err(e) => debug!(%transaction_id, "transaction updated; response body unreadable: {e}"),
        }
        Ok(())
    }
}
