use std::fmt::Write as _;

use chrono::NaiveDateTime;
use dashboard_core::{
    ButtonTone, ButtonView, DashboardViewModel, HealthState, RowView, SectionView, Stats,
    ToastKind, EMPTY_CELL,
};

use super::commands::USAGE;

const TITLE: &str = "Renovate Jobs Dashboard";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const MIN_NAME_WIDTH: usize = 24;
const STATUS_WIDTH: usize = 12;

/// What the terminal shows besides the view model itself.
pub struct Frame<'a> {
    pub updated_at: NaiveDateTime,
    /// Output of the last command (logs link, parse error).
    pub notice: Option<&'a str>,
    /// Emit ANSI clear and colour codes.
    pub ansi: bool,
}

pub fn render(view: &DashboardViewModel, frame: &Frame<'_>) -> String {
    let mut out = String::new();
    if frame.ansi {
        out.push_str(CLEAR_SCREEN);
    }

    let _ = writeln!(
        out,
        "{TITLE} | backend: {} | poll #{} | updated {}",
        health_label(view.health),
        view.poll_count,
        frame.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "{}", stats_line(&view.stats));
    if let Some(error) = &view.last_error {
        let error = format!("Error: {error}");
        let _ = writeln!(out, "{}", paint(&error, ButtonTone::Danger, frame.ansi));
    }

    if view.sections.is_empty() {
        let _ = writeln!(out, "\nNo renovate jobs.");
    }
    for section in &view.sections {
        out.push('\n');
        render_section(&mut out, section, frame.ansi);
    }

    let visible: Vec<_> = view.toasts.iter().filter(|toast| toast.visible).collect();
    if !visible.is_empty() {
        out.push('\n');
    }
    for toast in visible {
        let (tag, tone) = match toast.kind {
            ToastKind::Success => ("ok", ButtonTone::Success),
            ToastKind::Error => ("error", ButtonTone::Danger),
            ToastKind::Info => ("info", ButtonTone::Neutral),
        };
        let text = if toast.message.is_empty() {
            format!("[{tag}] {}", toast.title)
        } else {
            format!("[{tag}] {}: {}", toast.title, toast.message)
        };
        let _ = writeln!(out, "{}", paint(&text, tone, frame.ansi));
    }

    out.push('\n');
    if let Some(notice) = frame.notice {
        let _ = writeln!(out, "> {notice}");
    }
    let _ = writeln!(out, "{USAGE}");
    out
}

fn render_section(out: &mut String, section: &SectionView, ansi: bool) {
    let _ = writeln!(
        out,
        "{}  {}",
        section.caption,
        button(&section.discovery_button, ansi)
    );

    let width = section
        .rows
        .iter()
        .map(|row| match row {
            RowView::Project { name, .. } => display_name(name).chars().count(),
            RowView::Placeholder { name, .. } => name.chars().count(),
        })
        .max()
        .unwrap_or(0)
        .max(MIN_NAME_WIDTH);

    for row in &section.rows {
        match row {
            RowView::Project {
                name,
                status_label,
                trigger_button,
                ..
            } => {
                let _ = writeln!(
                    out,
                    "  {:<width$} {:<STATUS_WIDTH$} {}",
                    display_name(name),
                    status_label,
                    button(trigger_button, ansi)
                );
            }
            RowView::Placeholder { name, namespace } => {
                let _ = writeln!(
                    out,
                    "  {:<width$} {:<STATUS_WIDTH$} {EMPTY_CELL} {EMPTY_CELL}",
                    name, namespace
                );
            }
        }
    }
}

fn display_name(name: &str) -> &str {
    if name.trim().is_empty() {
        EMPTY_CELL
    } else {
        name
    }
}

fn stats_line(stats: &Stats) -> String {
    format!(
        "Scheduled {} | Running {} | Completed {} | Failed {} | Total {}",
        stats.scheduled,
        stats.running,
        stats.completed,
        stats.failed,
        stats.total()
    )
}

fn health_label(health: HealthState) -> &'static str {
    match health {
        HealthState::Unknown => "unknown",
        HealthState::Healthy => "healthy",
        HealthState::Unhealthy => "unhealthy",
    }
}

/// Enabled buttons in brackets, disabled ones in parentheses.
fn button(view: &ButtonView, ansi: bool) -> String {
    let text = if view.enabled {
        format!("[{}]", view.label)
    } else {
        format!("({})", view.label)
    };
    paint(&text, view.tone, ansi)
}

fn paint(text: &str, tone: ButtonTone, ansi: bool) -> String {
    let code = match tone {
        ButtonTone::Neutral => return text.to_string(),
        ButtonTone::Active => "34",
        ButtonTone::Success => "32",
        ButtonTone::Danger => "31",
    };
    if ansi {
        format!("\x1b[{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}
