use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use url::Url;

use dashboard_logging::{dashboard_debug, dashboard_warn};

use crate::wire::{
    decode_jobs, error_message, DiscoveryStartBody, DiscoveryStatusBody, HealthBody, RenovateBody,
};
use crate::{ActionResponse, ClientError, FailureKind, FetchError, JobRecord, JobRef};

const JOBS_PATH: &str = "api/v1/renovatejobs";
const DISCOVERY_STATUS_PATH: &str = "api/v1/discovery/status";
const DISCOVERY_START_PATH: &str = "api/v1/discovery/start";
const RENOVATE_PATH: &str = "api/v1/renovate";
const LOGS_PATH: &str = "api/v1/logs";
const HEALTH_PATH: &str = "health";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applied to read endpoints only; action requests wait indefinitely.
    pub read_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Some(Duration::from_secs(20)),
        }
    }
}

/// The backend's JSON contract.
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    async fn fetch_jobs(&self) -> Result<Vec<JobRecord>, FetchError>;

    /// Whether discovery is running for `job`. Any failure reads as `false`.
    async fn fetch_discovery_status(&self, job: &JobRef) -> bool;

    async fn check_health(&self) -> bool;

    async fn start_discovery(&self, job: &JobRef) -> ActionResponse;

    async fn trigger_renovate(&self, job: &JobRef, project: &str) -> ActionResponse;
}

#[derive(Debug, Clone)]
pub struct ReqwestDashboardApi {
    settings: ClientSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestDashboardApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ClientError::HttpClient(err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    /// Link to a project's renovate logs.
    pub fn logs_url(&self, job: &JobRef, project: &str) -> Result<Url, FetchError> {
        self.endpoint(
            LOGS_PATH,
            &[
                ("renovate", job.name.as_str()),
                ("namespace", job.namespace.as_str()),
                ("project", project),
            ],
        )
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, FetchError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.get(url);
        if let Some(timeout) = self.settings.read_timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                error_message(&body),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(bytes.to_vec())
    }

    async fn try_discovery_status(&self, job: &JobRef) -> Result<bool, FetchError> {
        let url = self.endpoint(
            DISCOVERY_STATUS_PATH,
            &[
                ("renovate", job.name.as_str()),
                ("namespace", job.namespace.as_str()),
            ],
        )?;
        let bytes = self.get_bytes(url).await?;
        let body: DiscoveryStatusBody = serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::MalformedResponse, err.to_string()))?;
        Ok(body.is_running())
    }

    async fn try_health(&self) -> Result<bool, FetchError> {
        let url = self.endpoint(HEALTH_PATH, &[])?;
        let bytes = self.get_bytes(url).await?;
        let body: HealthBody = serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::MalformedResponse, err.to_string()))?;
        Ok(body.healthy)
    }

    async fn post_json<T: Serialize + Sync>(&self, path: &str, body: &T) -> ActionResponse {
        let url = match self.endpoint(path, &[]) {
            Ok(url) => url,
            Err(err) => {
                return ActionResponse::Transport {
                    message: err.to_string(),
                }
            }
        };
        let payload = match serde_json::to_vec(body) {
            Ok(payload) => payload,
            Err(err) => {
                return ActionResponse::Transport {
                    message: err.to_string(),
                }
            }
        };

        let response = match self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                return ActionResponse::Transport {
                    message: map_reqwest_error(err).to_string(),
                }
            }
        };

        let status = response.status();
        if status.is_success() {
            return ActionResponse::Accepted;
        }
        let body = response.text().await.unwrap_or_default();
        ActionResponse::Rejected {
            status: status.as_u16(),
            message: error_message(&body),
        }
    }
}

#[async_trait::async_trait]
impl DashboardApi for ReqwestDashboardApi {
    async fn fetch_jobs(&self) -> Result<Vec<JobRecord>, FetchError> {
        let url = self.endpoint(JOBS_PATH, &[])?;
        let bytes = self.get_bytes(url).await?;
        decode_jobs(&bytes)
    }

    async fn fetch_discovery_status(&self, job: &JobRef) -> bool {
        match self.try_discovery_status(job).await {
            Ok(running) => running,
            Err(err) => {
                dashboard_debug!(
                    "Discovery status for {}/{} unavailable, assuming idle: {}",
                    job.namespace,
                    job.name,
                    err
                );
                false
            }
        }
    }

    async fn check_health(&self) -> bool {
        match self.try_health().await {
            Ok(healthy) => healthy,
            Err(err) => {
                dashboard_warn!("Health check failed: {}", err);
                false
            }
        }
    }

    async fn start_discovery(&self, job: &JobRef) -> ActionResponse {
        let body = DiscoveryStartBody {
            renovate_job: &job.name,
            namespace: &job.namespace,
        };
        self.post_json(DISCOVERY_START_PATH, &body).await
    }

    async fn trigger_renovate(&self, job: &JobRef, project: &str) -> ActionResponse {
        let body = RenovateBody {
            renovate_job: &job.name,
            namespace: &job.namespace,
            project,
        };
        self.post_json(RENOVATE_PATH, &body).await
    }
}

/// Parses the base URL so that relative endpoint paths join below it.
fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|err| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        message: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            message: "not a hierarchical url".to_string(),
        });
    }
    Ok(url)
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return FetchError::new(FailureKind::InvalidUrl, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_path_prefix() {
        let api = ReqwestDashboardApi::new(ClientSettings {
            base_url: "http://example.com/dashboard".to_string(),
            ..ClientSettings::default()
        })
        .unwrap();
        let url = api.endpoint(JOBS_PATH, &[]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/dashboard/api/v1/renovatejobs");
    }

    #[test]
    fn logs_url_encodes_query() {
        let api = ReqwestDashboardApi::new(ClientSettings::default()).unwrap();
        let url = api
            .logs_url(&JobRef::new("my job", "ops&dev"), "group/app")
            .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("renovate".to_string(), "my job".to_string()),
                ("namespace".to_string(), "ops&dev".to_string()),
                ("project".to_string(), "group/app".to_string()),
            ]
        );
        assert!(!url.as_str().contains("ops&dev"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ReqwestDashboardApi::new(ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }
}
