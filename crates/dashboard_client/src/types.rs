use std::fmt;

/// Identity of a renovate job as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobRef {
    pub name: String,
    pub namespace: String,
}

impl JobRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

/// One job of the `/api/v1/renovatejobs` listing, after lenient decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub name: String,
    pub namespace: String,
    pub projects: Vec<ProjectRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub name: String,
    /// Raw status text; interpretation is left to the caller.
    pub status: String,
}

/// Token the engine echoes back when a scheduled delay elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub u64);

/// Resolution of a mutating request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResponse {
    Accepted,
    /// Non-2xx; `message` is the server's explanation, possibly empty.
    Rejected { status: u16, message: String },
    Transport { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    JobsFetched(Result<Vec<JobRecord>, FetchError>),
    DiscoveryStatus {
        job: JobRef,
        seq: u64,
        running: bool,
    },
    Health {
        healthy: bool,
    },
    DiscoveryStarted {
        job: JobRef,
        response: ActionResponse,
    },
    RenovateTriggered {
        job: JobRef,
        project: String,
        response: ActionResponse,
    },
    TimerFired {
        token: TimerToken,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Body was not the JSON shape the endpoint promises.
    MalformedResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

/// Setup failures that prevent the client from being built at all.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid base url {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("failed to build http client: {0}")]
    HttpClient(String),
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
