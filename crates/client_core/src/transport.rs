//! reqwest-backed implementation of [`MbkmApi`].

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    error::BackendErrorBody,
    protocol::{ProgramOption, StudentRecord, StudentUpdate, SupervisorOption},
};
use tracing::debug;
use url::Url;

use crate::{error::ApiClientError, MbkmApi};

const STUDENTS_PATH: &str = "mahasiswa";
const PROGRAMS_PATH: &str = "program-mbkm";
const SUPERVISORS_PATH: &str = "dosbing";

pub struct HttpMbkmApi {
    http: Client,
    base_url: Url,
}

impl HttpMbkmApi {
    pub fn new(base_url: &str) -> std::result::Result<Self, ApiClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> std::result::Result<Self, ApiClientError> {
        let parsed = Url::parse(base_url.trim()).map_err(|err| ApiClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "url cannot carry a path".to_string(),
            });
        }
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "base url must start with http:// or https://".to_string(),
            });
        }

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiClientError> {
        let url = self.endpoint(segments);
        debug!(%url, "GET");
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ApiClientError::Transport {
                method: "GET",
                url: url.to_string(),
                source,
            })?;
        let res = ensure_success("GET", &url, res).await?;
        let body = res
            .bytes()
            .await
            .map_err(|source| ApiClientError::Transport {
                method: "GET",
                url: url.to_string(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| ApiClientError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

async fn ensure_success(
    method: &'static str,
    url: &Url,
    res: Response,
) -> Result<Response, ApiClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<BackendErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.summary().map(str::to_string))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("no response body")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });

    Err(ApiClientError::Status {
        method,
        url: url.to_string(),
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl MbkmApi for HttpMbkmApi {
    async fn fetch_student(&self, nim: &str) -> Result<StudentRecord> {
        Ok(self.get_json(&[STUDENTS_PATH, nim]).await?)
    }

    async fn fetch_programs(&self) -> Result<Vec<ProgramOption>> {
        Ok(self.get_json(&[PROGRAMS_PATH]).await?)
    }

    async fn fetch_supervisors(&self) -> Result<Vec<SupervisorOption>> {
        Ok(self.get_json(&[SUPERVISORS_PATH]).await?)
    }

    async fn update_student(&self, nim: &str, update: &StudentUpdate, token: &str) -> Result<()> {
        let url = self.endpoint(&[STUDENTS_PATH, nim]);
        debug!(%url, "PUT");
        let res = self
            .http
            .put(url.clone())
            .bearer_auth(token)
            .json(update)
            .send()
            .await
            .map_err(|source| ApiClientError::Transport {
                method: "PUT",
                url: url.to_string(),
                source,
            })?;
        ensure_success("PUT", &url, res).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
