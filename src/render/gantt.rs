//! Horizontal bar chart of a timeline.

use crate::timeline::Timeline;

const BAR: char = '█';
const EMPTY: char = ' ';
const MIN_WIDTH: usize = 20;

/// Render one bar per phase, positioned by start and end date on a shared
/// axis of `width` columns. Phases run top to bottom in execution order.
///
/// Example output (`width = 20`):
/// ```text
/// Website Timeline Gantt Chart
///        2024-01-01  2024-02-05
/// Design |████████            | 2w
/// Build  |        ████████████| 3w
/// ```
pub fn render_gantt(timeline: &Timeline, width: usize) -> String {
    let (Some(start), Some(end)) = (timeline.start(), timeline.end()) else {
        return String::new();
    };
    let width = width.max(MIN_WIDTH);
    let span_days = (end - start).num_days().max(1) as usize;
    let name_width = timeline
        .entries
        .iter()
        .map(|e| e.phase_name.chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    if timeline.project_name.is_empty() {
        output.push_str("Timeline Gantt Chart\n");
    } else {
        output.push_str(&format!("{} Timeline Gantt Chart\n", timeline.project_name));
    }

    // Axis: start date over the left edge, end date over the right edge
    output.push_str(&format!(
        "{:nw$} {}{:>rest$}\n",
        "",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d").to_string(),
        nw = name_width,
        rest = width + 2 - 10,
    ));

    for entry in &timeline.entries {
        let offset = (entry.start - start).num_days() as usize;
        let length = (entry.end - entry.start).num_days() as usize;

        let mut from = offset * width / span_days;
        let mut to = (offset + length) * width / span_days;
        if from >= width {
            from = width - 1;
        }
        if to <= from {
            to = from + 1;
        }
        let to = to.min(width);

        let bar: String = (0..width)
            .map(|col| if col >= from && col < to { BAR } else { EMPTY })
            .collect();

        output.push_str(&format!(
            "{:<nw$} |{}| {}w\n",
            entry.phase_name,
            bar,
            entry.duration_weeks,
            nw = name_width,
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;
    use chrono::NaiveDate;

    fn timeline(name: &str, phases: &[(&str, u32)]) -> Timeline {
        let mut project = Project::new(name, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        for (phase, weeks) in phases {
            project.phases.append(phase, *weeks).unwrap();
        }
        Timeline::generate(&project).unwrap()
    }

    #[test]
    fn test_two_phases() {
        let output = render_gantt(&timeline("Website", &[("Design", 2), ("Build", 3)]), 20);
        let expected = "\
Website Timeline Gantt Chart
       2024-01-01  2024-02-05
Design |████████            | 2w
Build  |        ████████████| 3w
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_short_phase_still_gets_a_bar() {
        let output = render_gantt(&timeline("", &[("Kickoff", 1), ("Build", 52)]), 20);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Timeline Gantt Chart");
        assert!(lines[2].starts_with("Kickoff |█ "));
        assert!(lines[3].ends_with("█| 52w"));
    }

    #[test]
    fn test_narrow_width_is_widened() {
        let output = render_gantt(&timeline("P", &[("A", 1)]), 3);
        let bar_line = output.lines().nth(2).unwrap();
        assert_eq!(bar_line, format!("A |{}| 1w", "█".repeat(MIN_WIDTH)));
    }

    #[test]
    fn test_empty_timeline_renders_nothing() {
        let empty = Timeline {
            project_name: "Nothing".to_string(),
            entries: Vec::new(),
            total_weeks: 0,
        };
        assert_eq!(render_gantt(&empty, 40), "");
    }
}
