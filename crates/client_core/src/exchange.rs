//! One multipart request/response round trip with the analysis backend.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Body, Client,
};
use shared::protocol::{ActionRequest, ACTION_FIELD, JOB_DESCRIPTION_FIELD, RESUME_FIELD};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::PageConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("HTTP error! status: {status}")]
    NonSuccessStatus { status: u16 },
}

#[async_trait]
pub trait AnalysisExchange: Send + Sync {
    /// Sends the request and returns the raw response body on a 2xx status.
    async fn analyze(&self, request: &ActionRequest) -> Result<String, ExchangeError>;
}

pub struct HttpAnalysisClient {
    http: Client,
    analyze_url: Url,
}

impl HttpAnalysisClient {
    pub fn new(analyze_url: Url) -> Self {
        Self {
            http: Client::new(),
            analyze_url,
        }
    }

    pub fn from_config(config: &PageConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config.analyze_url()?))
    }

    pub fn analyze_url(&self) -> &Url {
        &self.analyze_url
    }

    fn form(request: &ActionRequest) -> Result<Form, ExchangeError> {
        let resume = &request.resume;
        let part = Part::stream_with_length(Body::from(resume.bytes.clone()), resume.len() as u64)
            .file_name(resume.name.clone())
            .mime_str(&resume.media_type)
            .map_err(|e| {
                ExchangeError::Transport(format!(
                    "invalid media type '{}' for resume part: {e}",
                    resume.media_type
                ))
            })?;

        Ok(Form::new()
            .text(JOB_DESCRIPTION_FIELD, request.job_description.clone())
            .part(RESUME_FIELD, part)
            .text(ACTION_FIELD, request.action.as_str().to_string()))
    }
}

#[async_trait]
impl AnalysisExchange for HttpAnalysisClient {
    async fn analyze(&self, request: &ActionRequest) -> Result<String, ExchangeError> {
        let form = Self::form(request)?;
        debug!(submission = %request.id, url = %self.analyze_url, action = %request.action, "posting analysis request");

        let response = self
            .http
            .post(self.analyze_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(submission = %request.id, error = %e, "analysis request failed to send");
                ExchangeError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(submission = %request.id, status = status.as_u16(), "analysis endpoint returned non-success status");
            return Err(ExchangeError::NonSuccessStatus {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            warn!(submission = %request.id, error = %e, "failed to read analysis response body");
            ExchangeError::Transport(e.to_string())
        })
    }
}

#[cfg(test)]
#[path = "tests/exchange_tests.rs"]
mod tests;
