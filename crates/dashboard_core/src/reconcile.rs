//! Snapshot reconciliation.
//!
//! The reconciler owns the rendered sections, one per job identity. Each
//! successful snapshot is diffed against them: sections that survive keep
//! their discovery display, get their caption refreshed and their rows
//! replaced wholesale; sections whose job vanished are dropped.

use std::collections::{BTreeMap, HashMap};

use dashboard_logging::{dashboard_debug, dashboard_info};

use crate::ordering::{sort_jobs, sort_projects};
use crate::{Job, JobKey, ProjectStatus};

/// Last known state of a job's discovery run, as shown on its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryDisplay {
    /// No status response has arrived yet for this section.
    #[default]
    Unknown,
    Idle,
    Running,
}

/// One line item of a section's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowItem {
    Project { name: String, status: ProjectStatus },
    /// Shown instead of project rows when a job reports no projects.
    Placeholder { name: String, namespace: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    key: JobKey,
    caption: String,
    rows: Vec<RowItem>,
    discovery: DiscoveryDisplay,
    applied_discovery_seq: u64,
}

impl RenderedSection {
    fn new(key: JobKey) -> Self {
        Self {
            caption: key.label(),
            key,
            rows: Vec::new(),
            discovery: DiscoveryDisplay::Unknown,
            applied_discovery_seq: 0,
        }
    }

    pub fn key(&self) -> &JobKey {
        &self.key
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn rows(&self) -> &[RowItem] {
        &self.rows
    }

    pub fn discovery(&self) -> DiscoveryDisplay {
        self.discovery
    }

    pub fn has_project(&self, project: &str) -> bool {
        self.rows
            .iter()
            .any(|row| matches!(row, RowItem::Project { name, .. } if name == project))
    }
}

/// Aggregate counters over every project of the latest snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub scheduled: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
}

impl Stats {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let mut stats = Stats::default();
        for project in jobs.iter().flat_map(|job| job.projects.iter()) {
            match project.status {
                ProjectStatus::Scheduled => stats.scheduled += 1,
                ProjectStatus::Running => stats.running += 1,
                ProjectStatus::Completed => stats.completed += 1,
                ProjectStatus::Failed => stats.failed += 1,
                ProjectStatus::Other(_) => {}
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.scheduled + self.running + self.completed + self.failed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionUpdate {
    pub key: JobKey,
    pub caption_changed: bool,
}

/// Discovery-status query the caller must issue for a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRequest {
    pub key: JobKey,
    pub seq: u64,
}

/// What one reconciliation pass did to the rendered sections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub created: Vec<JobKey>,
    pub updated: Vec<SectionUpdate>,
    pub removed: Vec<JobKey>,
    pub discovery_requests: Vec<DiscoveryRequest>,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciler {
    sections: Vec<RenderedSection>,
    next_discovery_seq: u64,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sections in job ordering.
    pub fn sections(&self) -> &[RenderedSection] {
        &self.sections
    }

    pub fn section(&self, key: &JobKey) -> Option<&RenderedSection> {
        self.sections.iter().find(|section| &section.key == key)
    }

    pub fn reconcile(&mut self, snapshot: Vec<Job>) -> ReconcileReport {
        let mut jobs = dedupe_last_wins(snapshot);
        sort_jobs(&mut jobs);

        let mut existing: HashMap<JobKey, RenderedSection> = self
            .sections
            .drain(..)
            .map(|section| (section.key.clone(), section))
            .collect();

        let mut report = ReconcileReport::default();
        let mut next_sections = Vec::with_capacity(jobs.len());

        for job in &jobs {
            let key = job.key();
            let mut section = match existing.remove(&key) {
                Some(mut section) => {
                    let caption = key.label();
                    let caption_changed = section.caption != caption;
                    if caption_changed {
                        section.caption = caption;
                    }
                    report.updated.push(SectionUpdate {
                        key: key.clone(),
                        caption_changed,
                    });
                    section
                }
                None => {
                    report.created.push(key.clone());
                    RenderedSection::new(key.clone())
                }
            };
            section.rows = build_rows(job);

            self.next_discovery_seq += 1;
            report.discovery_requests.push(DiscoveryRequest {
                key,
                seq: self.next_discovery_seq,
            });
            next_sections.push(section);
        }

        let mut removed: Vec<JobKey> = existing.into_keys().collect();
        removed.sort();
        report.removed = removed;

        self.sections = next_sections;
        report.stats = Stats::from_jobs(&jobs);

        dashboard_info!(
            "Reconciled {} jobs: created={} updated={} removed={}",
            jobs.len(),
            report.created.len(),
            report.updated.len(),
            report.removed.len()
        );
        report
    }

    /// Applies a discovery-status response. Responses for vanished sections
    /// or older than the last applied one are dropped.
    pub fn apply_discovery_status(&mut self, key: &JobKey, seq: u64, running: bool) -> bool {
        let Some(section) = self.sections.iter_mut().find(|s| &s.key == key) else {
            dashboard_debug!("Discovery status for unknown section {} dropped", key);
            return false;
        };
        if seq <= section.applied_discovery_seq {
            dashboard_debug!(
                "Stale discovery status for {} dropped (seq {} <= {})",
                key,
                seq,
                section.applied_discovery_seq
            );
            return false;
        }
        section.applied_discovery_seq = seq;
        let next = if running {
            DiscoveryDisplay::Running
        } else {
            DiscoveryDisplay::Idle
        };
        let changed = section.discovery != next;
        section.discovery = next;
        changed
    }
}

fn dedupe_last_wins(snapshot: Vec<Job>) -> Vec<Job> {
    let mut by_key: BTreeMap<JobKey, Job> = BTreeMap::new();
    for job in snapshot {
        by_key.insert(job.key(), job);
    }
    by_key.into_values().collect()
}

fn build_rows(job: &Job) -> Vec<RowItem> {
    if job.projects.is_empty() {
        return vec![RowItem::Placeholder {
            name: job.name.clone(),
            namespace: job.namespace.clone(),
        }];
    }
    let mut projects = job.projects.clone();
    sort_projects(&mut projects);
    projects
        .into_iter()
        .map(|project| RowItem::Project {
            name: project.name,
            status: project.status,
        })
        .collect()
}
