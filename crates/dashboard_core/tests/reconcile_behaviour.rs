use std::sync::Once;

use dashboard_core::{
    update, DashboardState, DiscoveryDisplay, Effect, Job, JobKey, Msg, Project, ProjectStatus,
    Reconciler, RowItem, RowView, Stats, ToastKind,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

fn project(name: &str, status: &str) -> Project {
    Project::new(name, ProjectStatus::parse(status))
}

fn fetched(state: DashboardState, jobs: Vec<Job>) -> (DashboardState, Vec<Effect>) {
    update(state, Msg::JobsFetched(Ok(jobs)))
}

fn section_keys(state: &DashboardState) -> Vec<JobKey> {
    state.sections().iter().map(|s| s.key().clone()).collect()
}

fn sample_jobs() -> Vec<Job> {
    vec![
        Job::new(
            "zeta",
            "ops",
            vec![project("api", "completed"), project("web", "running")],
        ),
        Job::new("alpha", "dev", vec![project("lib", "failed")]),
    ]
}

#[test]
fn poll_requests_jobs_and_health() {
    init_logging();
    let (state, effects) = update(DashboardState::new(), Msg::PollRequested);
    assert_eq!(effects, vec![Effect::FetchJobs, Effect::CheckHealth]);
    assert_eq!(state.poll_count(), 1);
}

#[test]
fn sections_follow_job_ordering_and_request_discovery_status() {
    init_logging();
    let (state, effects) = fetched(DashboardState::new(), sample_jobs());

    assert_eq!(
        section_keys(&state),
        vec![JobKey::new("alpha", "dev"), JobKey::new("zeta", "ops")]
    );
    assert_eq!(
        effects,
        vec![
            Effect::FetchDiscoveryStatus {
                key: JobKey::new("alpha", "dev"),
                seq: 1,
            },
            Effect::FetchDiscoveryStatus {
                key: JobKey::new("zeta", "ops"),
                seq: 2,
            },
        ]
    );
    let zeta = state.section(&JobKey::new("zeta", "ops")).unwrap();
    assert_eq!(zeta.caption(), "zeta - ops");
    assert_eq!(
        zeta.rows(),
        &[
            RowItem::Project {
                name: "web".to_string(),
                status: ProjectStatus::Running,
            },
            RowItem::Project {
                name: "api".to_string(),
                status: ProjectStatus::Completed,
            },
        ]
    );
}

#[test]
fn same_snapshot_twice_creates_and_removes_nothing() {
    init_logging();
    let mut reconciler = Reconciler::new();
    let first = reconciler.reconcile(sample_jobs());
    assert_eq!(first.created.len(), 2);

    let rows_before: Vec<_> = reconciler
        .sections()
        .iter()
        .map(|s| s.rows().to_vec())
        .collect();
    let second = reconciler.reconcile(sample_jobs());

    assert!(second.created.is_empty());
    assert!(second.removed.is_empty());
    assert_eq!(second.updated.len(), 2);
    assert!(second.updated.iter().all(|u| !u.caption_changed));
    let rows_after: Vec<_> = reconciler
        .sections()
        .iter()
        .map(|s| s.rows().to_vec())
        .collect();
    assert_eq!(rows_before, rows_after);
}

#[test]
fn vanished_job_loses_its_section() {
    init_logging();
    let (state, _) = fetched(
        DashboardState::new(),
        vec![
            Job::new("a", "ns1", vec![project("p", "running")]),
            Job::new("b", "ns1", vec![project("q", "running")]),
        ],
    );
    let (state, _) = fetched(
        state,
        vec![Job::new("b", "ns1", vec![project("q", "completed")])],
    );

    assert!(state.section(&JobKey::new("a", "ns1")).is_none());
    assert_eq!(section_keys(&state), vec![JobKey::new("b", "ns1")]);
}

#[test]
fn same_name_in_other_namespace_is_a_different_section() {
    init_logging();
    let mut reconciler = Reconciler::new();
    reconciler.reconcile(vec![Job::new("a", "ns1", Vec::new())]);
    let report = reconciler.reconcile(vec![Job::new("a", "ns2", Vec::new())]);

    assert_eq!(report.created, vec![JobKey::new("a", "ns2")]);
    assert_eq!(report.removed, vec![JobKey::new("a", "ns1")]);
}

#[test]
fn duplicate_keys_keep_the_last_job() {
    init_logging();
    let mut reconciler = Reconciler::new();
    reconciler.reconcile(vec![
        Job::new("a", "ns", vec![project("old", "running")]),
        Job::new("a", "ns", vec![project("new", "failed")]),
    ]);

    assert_eq!(reconciler.sections().len(), 1);
    assert_eq!(
        reconciler.sections()[0].rows(),
        &[RowItem::Project {
            name: "new".to_string(),
            status: ProjectStatus::Failed,
        }]
    );
}

#[test]
fn stats_count_named_buckets_only() {
    init_logging();
    let jobs = vec![
        Job::new(
            "one",
            "ns",
            vec![project("a", "running"), project("b", "failed")],
        ),
        Job::new("two", "ns", vec![project("c", "completed")]),
    ];
    let (state, _) = fetched(DashboardState::new(), jobs);
    assert_eq!(
        state.stats(),
        Stats {
            scheduled: 0,
            running: 1,
            completed: 1,
            failed: 1,
        }
    );

    let (state, _) = fetched(
        state,
        vec![Job::new(
            "one",
            "ns",
            vec![project("a", "scheduled"), project("z", "paused")],
        )],
    );
    assert_eq!(
        state.stats(),
        Stats {
            scheduled: 1,
            running: 0,
            completed: 0,
            failed: 0,
        }
    );
}

#[test]
fn job_without_projects_gets_placeholder_row() {
    init_logging();
    let (state, _) = fetched(DashboardState::new(), vec![Job::new("empty", "ns", Vec::new())]);

    let view = state.view();
    assert_eq!(
        view.sections[0].rows,
        vec![RowView::Placeholder {
            name: "empty".to_string(),
            namespace: "ns".to_string(),
        }]
    );
    assert_eq!(view.stats, Stats::default());
}

#[test]
fn fetch_failure_keeps_render_and_raises_one_error_toast() {
    init_logging();
    let (state, _) = fetched(DashboardState::new(), sample_jobs());
    let keys_before = section_keys(&state);
    let stats_before = state.stats();

    let (state, effects) = update(
        state,
        Msg::JobsFetched(Err("http status 500".to_string())),
    );

    assert_eq!(section_keys(&state), keys_before);
    assert_eq!(state.stats(), stats_before);
    assert_eq!(state.last_error(), Some("http status 500"));
    let errors: Vec<_> = state
        .toasts()
        .iter()
        .filter(|t| t.kind == ToastKind::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "http status 500");
    assert!(matches!(effects.as_slice(), [Effect::ScheduleToastHide { .. }]));

    let (state, _) = fetched(state, sample_jobs());
    assert_eq!(state.last_error(), None);
}

#[test]
fn discovery_status_updates_button_and_drops_stale_answers() {
    init_logging();
    let key = JobKey::new("alpha", "dev");
    let (state, _) = fetched(DashboardState::new(), sample_jobs());
    let (state, _) = fetched(state, sample_jobs());
    // seq 1 and 2 belong to the first pass, 3 and 4 to the second.

    let (state, _) = update(
        state,
        Msg::DiscoveryStatusFetched {
            key: key.clone(),
            seq: 3,
            running: true,
        },
    );
    assert_eq!(
        state.section(&key).unwrap().discovery(),
        DiscoveryDisplay::Running
    );
    let button = state.view().sections[0].discovery_button;
    assert_eq!(button.label, "Discovery Running...");
    assert!(!button.enabled);

    let (state, _) = update(
        state,
        Msg::DiscoveryStatusFetched {
            key: key.clone(),
            seq: 1,
            running: false,
        },
    );
    assert_eq!(
        state.section(&key).unwrap().discovery(),
        DiscoveryDisplay::Running
    );
}

#[test]
fn discovery_state_survives_row_replacement() {
    init_logging();
    let key = JobKey::new("alpha", "dev");
    let (state, _) = fetched(DashboardState::new(), sample_jobs());
    let (state, _) = update(
        state,
        Msg::DiscoveryStatusFetched {
            key: key.clone(),
            seq: 1,
            running: true,
        },
    );
    let (state, _) = fetched(state, sample_jobs());

    assert_eq!(
        state.section(&key).unwrap().discovery(),
        DiscoveryDisplay::Running
    );
}

#[test]
fn health_check_updates_state() {
    init_logging();
    let (mut state, _) = update(DashboardState::new(), Msg::HealthChecked { healthy: false });
    assert_eq!(state.health(), dashboard_core::HealthState::Unhealthy);
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::HealthChecked { healthy: false });
    assert!(!state.consume_dirty());
}
