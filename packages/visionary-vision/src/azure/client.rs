use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::result::ImageAnalysis;
use crate::service::{VisionError, VisionService, VisualFeature};

pub const DEFAULT_API_VERSION: &str = "2024-02-01";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ANALYZE_PATH: &str = "computervision/imageanalysis:analyze";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Image analysis client bound to one Azure AI Vision resource.
pub struct AzureVisionClient {
    endpoint: String,
    api_key: String,
    api_version: String,
    timeout: Duration,
    client: Client,
}

impl AzureVisionClient {
    /// Create a client for `endpoint` (e.g. `https://<resource>.cognitiveservices.azure.com`)
    /// using the default request timeout.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, VisionError> {
        Self::with_timeout(endpoint, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VisionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VisionError::Network(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout,
            client,
        })
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn analyze_url(&self) -> String {
        format!("{}/{}", self.endpoint, ANALYZE_PATH)
    }
}

#[async_trait]
impl VisionService for AzureVisionClient {
    async fn analyze(
        &self,
        image: &[u8],
        features: &[VisualFeature],
    ) -> Result<ImageAnalysis, VisionError> {
        if image.is_empty() {
            return Err(VisionError::InvalidInput("image is empty".into()));
        }
        if features.is_empty() {
            return Err(VisionError::InvalidInput("no visual features requested".into()));
        }

        let features = feature_list(features);
        debug!(features = %features, bytes = image.len(), "sending image analysis request");

        let response = self
            .client
            .post(self.analyze_url())
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .query(&[
                ("api-version", self.api_version.as_str()),
                ("features", features.as_str()),
            ])
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VisionError::Timeout
                } else {
                    VisionError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(VisionError::Authentication {
                status: status.as_u16(),
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(VisionError::QuotaExceeded { retry_after_secs });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                VisionError::Timeout
            } else {
                VisionError::Network(e.to_string())
            }
        })?;

        if !status.is_success() {
            return Err(VisionError::Service {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "image analysis response received");
        parse_analysis(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

fn feature_list(features: &[VisualFeature]) -> String {
    features
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_analysis(body: &str) -> Result<ImageAnalysis, VisionError> {
    serde_json::from_str(body).map_err(|e| VisionError::InvalidResponse(e.to_string()))
}

/// Pull the message out of an Azure error envelope, falling back to the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            error: ErrorDetail {
                code: Some(code),
                message,
            },
        }) => format!("{code}: {message}"),
        Ok(ErrorResponse { error }) => error.message,
        Err(_) => body.trim().to_string(),
    }
}
