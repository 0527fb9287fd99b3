//! JSON shapes exchanged with the backend.
//!
//! Decoding is lenient where the dashboard can still render something
//! sensible (missing names, missing or non-array `projects`) and strict where
//! it cannot (a listing that is not an array of objects).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use dashboard_logging::dashboard_warn;

use crate::{FailureKind, FetchError, JobRecord, ProjectRecord};

#[derive(Debug, Deserialize)]
struct WireJob {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    projects: Value,
}

#[derive(Debug, Deserialize)]
struct WireProject {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DiscoveryStatusBody {
    #[serde(default)]
    pub status: Option<String>,
}

impl DiscoveryStatusBody {
    pub fn is_running(&self) -> bool {
        self.status.as_deref() == Some("running")
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthBody {
    #[serde(default)]
    pub healthy: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiscoveryStartBody<'a> {
    pub renovate_job: &'a str,
    pub namespace: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RenovateBody<'a> {
    pub renovate_job: &'a str,
    pub namespace: &'a str,
    pub project: &'a str,
}

/// Decodes the job listing body.
pub fn decode_jobs(bytes: &[u8]) -> Result<Vec<JobRecord>, FetchError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| FetchError::new(FailureKind::MalformedResponse, err.to_string()))?;
    let Value::Array(items) = value else {
        return Err(FetchError::new(
            FailureKind::MalformedResponse,
            "expected a JSON array of renovate jobs",
        ));
    };

    items
        .into_iter()
        .map(|item| {
            let job: WireJob = serde_json::from_value(item).map_err(|err| {
                FetchError::new(FailureKind::MalformedResponse, err.to_string())
            })?;
            Ok(into_record(job))
        })
        .collect()
}

fn into_record(job: WireJob) -> JobRecord {
    let name = job.name.unwrap_or_default();
    let projects = match job.projects {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<WireProject>(item) {
                Ok(project) => Some(ProjectRecord {
                    name: project.name.unwrap_or_default(),
                    status: project.status.unwrap_or_default(),
                }),
                Err(err) => {
                    dashboard_warn!("Skipping unreadable project entry in {}: {}", name, err);
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };
    JobRecord {
        name,
        namespace: job.namespace.unwrap_or_default(),
        projects,
    }
}

/// Extracts a human-readable message from an error response body.
///
/// The backend answers errors with `{"Message": ..., "StatusCode": ...}`;
/// anything else is returned trimmed as-is.
pub fn error_message(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for field in ["Message", "message", "error"] {
            if let Some(Value::String(text)) = map.get(field) {
                if !text.trim().is_empty() {
                    return text.trim().to_string();
                }
            }
        }
    }
    trimmed.to_string()
}
