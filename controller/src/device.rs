use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Status code and body of a completed device exchange. Whether a given code
/// counts as success is the caller's call; the devices answer 200 when happy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceResponse {
    pub status: u16,
    pub body: String,
}

impl DeviceResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// One physical device endpoint: a blocking request/response exchange with a
/// bounded timeout, or a transport error.
pub trait Device {
    fn url(&self) -> &str;
    async fn read(&self) -> Result<DeviceResponse, DeviceError>;
    async fn write(&self, payload: &serde_json::Value) -> Result<DeviceResponse, DeviceError>;
}

#[derive(Debug, Clone)]
pub struct HttpDevice {
    client: reqwest::Client,
    url: String,
}

impl HttpDevice {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn wrap(&self, err: reqwest::Error) -> DeviceError {
        if err.is_timeout() {
            DeviceError::Timeout {
                url: self.url.clone(),
            }
        } else {
            DeviceError::Http {
                url: self.url.clone(),
                source: err,
            }
        }
    }

    async fn finish(&self, response: reqwest::Response) -> Result<DeviceResponse, DeviceError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| self.wrap(err))?;
        Ok(DeviceResponse { status, body })
    }
}

impl Device for HttpDevice {
    fn url(&self) -> &str {
        &self.url
    }

    async fn read(&self) -> Result<DeviceResponse, DeviceError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| self.wrap(err))?;
        self.finish(response).await
    }

    async fn write(&self, payload: &serde_json::Value) -> Result<DeviceResponse, DeviceError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|err| self.wrap(err))?;
        self.finish(response).await
    }
}

/// All device traffic shares one client so the request timeout is applied
/// uniformly.
pub fn shared_client(timeout_ms: u64) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
}
