use std::fmt;

/// Identity of a renovate job: `(name, namespace)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey {
    pub name: String,
    pub namespace: String,
}

impl JobKey {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Caption shown on the job's section.
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.namespace)
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectStatus {
    Scheduled,
    Running,
    Failed,
    Completed,
    /// Anything the dashboard does not know about, kept verbatim.
    Other(String),
}

impl ProjectStatus {
    /// Case-insensitive parse; unknown or empty values are kept as `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "scheduled" => ProjectStatus::Scheduled,
            "running" => ProjectStatus::Running,
            "failed" => ProjectStatus::Failed,
            "completed" => ProjectStatus::Completed,
            _ => ProjectStatus::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProjectStatus::Scheduled => "scheduled",
            ProjectStatus::Running => "running",
            ProjectStatus::Failed => "failed",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Other(raw) => raw,
        }
    }

    /// Sort bucket: running first, unrecognized last.
    pub fn rank(&self) -> u8 {
        match self {
            ProjectStatus::Running => 0,
            ProjectStatus::Scheduled => 1,
            ProjectStatus::Failed => 2,
            ProjectStatus::Completed => 3,
            ProjectStatus::Other(_) => 99,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub status: ProjectStatus,
}

impl Project {
    pub fn new(name: impl Into<String>, status: ProjectStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// One entry of the `/api/v1/renovatejobs` snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    pub namespace: String,
    pub projects: Vec<Project>,
}

impl Job {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        projects: Vec<Project>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            projects,
        }
    }

    pub fn key(&self) -> JobKey {
        JobKey::new(self.name.clone(), self.namespace.clone())
    }
}
