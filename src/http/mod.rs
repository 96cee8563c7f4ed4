// JSON over HTTP for the embedding and chat services
// One request per call; retry policy belongs to the remote service


use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Could not reach {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to encode request for {url}: {message}")]
    Encode { url: String, message: String },

    #[error("Invalid response from {url}: {message}")]
    Decode { url: String, message: String },
}

#[derive(Clone)]
pub struct JsonClient {
    base_url: Url,
    agent: ureq::Agent,
    api_key: Option<String>,
}

impl fmt::Debug for JsonClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl JsonClient {
    #[inline]
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            base_url,
            agent,
            api_key: None,
        }
    }

    /// Send `Authorization: Bearer <key>` with every request
    #[inline]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    #[inline]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, HttpError> {
        self.base_url.join(path).map_err(|e| HttpError::Encode {
            url: format!("{}{}", self.base_url, path),
            message: e.to_string(),
        })
    }

    #[inline]
    pub fn get<Resp: DeserializeOwned>(&self, path: &str) -> Result<Resp, HttpError> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let mut request = self.agent.get(url.as_str());
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key.trim()));
        }

        let body = request
            .call()
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| classify(&url, e))?;

        decode(&url, &body)
    }

    #[inline]
    pub fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        payload: &Req,
    ) -> Result<Resp, HttpError> {
        let url = self.endpoint(path)?;
        let request_json = serde_json::to_string(payload).map_err(|e| HttpError::Encode {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        debug!("POST {} ({} bytes)", url, request_json.len());

        let mut request = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key.trim()));
        }

        let body = request
            .send(&request_json)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| classify(&url, e))?;

        decode(&url, &body)
    }
}

fn classify(url: &Url, error: ureq::Error) -> HttpError {
    match error {
        ureq::Error::StatusCode(status) => {
            warn!("HTTP {} from {}", status, url);
            HttpError::Status {
                status,
                url: url.to_string(),
            }
        }
        other => {
            warn!("Transport error talking to {}: {}", url, other);
            HttpError::Transport {
                url: url.to_string(),
                message: other.to_string(),
            }
        }
    }
}

fn decode<Resp: DeserializeOwned>(url: &Url, body: &str) -> Result<Resp, HttpError> {
    serde_json::from_str(body).map_err(|e| HttpError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}
