//! Plain-text rendering of timelines and projects.

mod gantt;

pub use gantt::render_gantt;

use crate::export::COLUMNS;
use crate::models::Project;
use crate::timeline::{Progress, Timeline};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render the timeline as a fixed-width table.
///
/// ```text
/// Phase   Start Date  End Date    Duration (weeks)
/// ------  ----------  ----------  ----------------
/// Design  2024-01-01  2024-01-15                 2
/// ```
pub fn render_table(timeline: &Timeline) -> String {
    let name_width = timeline
        .entries
        .iter()
        .map(|e| e.phase_name.chars().count())
        .max()
        .unwrap_or(0)
        .max(COLUMNS[0].len());
    let date_width = COLUMNS[1].len().max(10);
    let weeks_width = COLUMNS[3].len();

    let mut output = format!(
        "{:<nw$}  {:<dw$}  {:<dw$}  {}\n",
        COLUMNS[0],
        COLUMNS[1],
        COLUMNS[2],
        COLUMNS[3],
        nw = name_width,
        dw = date_width,
    );
    output.push_str(&format!(
        "{}  {}  {}  {}\n",
        "-".repeat(name_width),
        "-".repeat(date_width),
        "-".repeat(date_width),
        "-".repeat(weeks_width),
    ));

    for entry in &timeline.entries {
        output.push_str(&format!(
            "{:<nw$}  {:<dw$}  {:<dw$}  {:>ww$}\n",
            entry.phase_name,
            entry.start.format(DATE_FORMAT).to_string(),
            entry.end.format(DATE_FORMAT).to_string(),
            entry.duration_weeks,
            nw = name_width,
            dw = date_width,
            ww = weeks_width,
        ));
    }
    output
}

/// `Progress: 0.0% (0/11 weeks)`
pub fn render_progress(progress: &Progress) -> String {
    format!(
        "Progress: {:.1}% ({}/{} weeks)",
        progress.ratio() * 100.0,
        progress.completed_weeks,
        progress.total_weeks
    )
}

/// Project header plus its numbered phase list (1-based, as the shell
/// addresses phases).
pub fn render_project(project: &Project) -> String {
    let name = if project.name.is_empty() {
        "(unnamed)"
    } else {
        project.name.as_str()
    };

    let mut output = format!(
        "Project: {}\nStart date: {}\n",
        name,
        project.start_date.format(DATE_FORMAT)
    );

    if project.phases.is_empty() {
        output.push_str("Phases: none\n");
    } else {
        output.push_str(&format!(
            "Phases ({}, {} weeks):\n",
            project.phases.len(),
            project.phases.total_weeks()
        ));
        for (i, phase) in project.phases.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} ({}w)\n",
                i + 1,
                phase.name,
                phase.duration_weeks
            ));
        }
    }

    if !project.notes.is_empty() {
        output.push_str("Notes:\n");
        for line in project.notes.lines() {
            output.push_str("  ");
            output.push_str(line);
            output.push('\n');
        }
    }
    output
}
