use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;
use crate::models::SyncRecord;

/// Remote side of the sync protocol.
#[async_trait]
pub trait SyncApi: Send + Sync {
    /// Stores `data`, returning the id the server stored it under.
    async fn save(&self, id: Option<&str>, data: &Value) -> Result<String, ClientError>;
    async fn load(&self, id: &str) -> Result<SyncRecord, ClientError>;
}

#[derive(Debug, Serialize)]
struct SaveBody<'a> {
    data: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}

/// Every response carries `success`; the other fields depend on the call.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    timestamp: Option<String>,
}

pub struct HttpSyncClient {
    client: Client,
    sync_url: Url,
}

impl HttpSyncClient {
    /// `base_url` is where the API is mounted, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let root = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let sync_url = Url::parse(&root)
            .and_then(|base| base.join("sync"))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let client = Client::builder().build()?;
        Ok(Self { client, sync_url })
    }

    async fn read_envelope(response: Response) -> Result<(StatusCode, Envelope), ClientError> {
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));
        let body = response.text().await?;

        if !is_json {
            return Err(ClientError::BadResponse(format!(
                "expected JSON, got {} with {} bytes",
                status,
                body.len()
            )));
        }

        let envelope = serde_json::from_str::<Envelope>(&body)
            .map_err(|e| ClientError::BadResponse(format!("unreadable body: {}", e)))?;
        debug!("sync api responded {} success={}", status, envelope.success);

        Ok((status, envelope))
    }

    fn check(status: StatusCode, envelope: &Envelope) -> Result<(), ClientError> {
        let message = || envelope.message.clone().unwrap_or_else(|| status.to_string());

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(message()));
        }
        if !status.is_success() || !envelope.success {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: message(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SyncApi for HttpSyncClient {
    async fn save(&self, id: Option<&str>, data: &Value) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.sync_url.clone())
            .json(&SaveBody { data, id })
            .send()
            .await?;

        let (status, envelope) = Self::read_envelope(response).await?;
        Self::check(status, &envelope)?;

        envelope
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ClientError::BadResponse("save response has no id".to_string()))
    }

    async fn load(&self, id: &str) -> Result<SyncRecord, ClientError> {
        let mut url = self.sync_url.clone();
        url.query_pairs_mut().append_pair("id", id);

        let response = self.client.get(url).send().await?;

        let (status, envelope) = Self::read_envelope(response).await?;
        Self::check(status, &envelope)?;

        let data = envelope
            .data
            .ok_or_else(|| ClientError::BadResponse("load response has no data".to_string()))?;

        Ok(SyncRecord {
            data,
            timestamp: envelope.timestamp.unwrap_or_default(),
        })
    }
}
