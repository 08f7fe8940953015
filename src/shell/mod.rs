//! Interactive editing session.
//!
//! The shell is the only holder of session state: it owns the current
//! [`Project`] and hands it to the stateless core (phase store, calculator,
//! store, exporters) one command at a time. A failed command never replaces
//! the project.

mod command;

pub use command::{Command, HELP};

use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::Local;
use colored::Colorize;

use crate::config::AppConfig;
use crate::error::{Result, TimelineError};
use crate::export;
use crate::models::Project;
use crate::render;
use crate::store::ProjectStore;
use crate::timeline::Timeline;

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    project: Project,
    store: ProjectStore,
    config: AppConfig,
    export_dir: PathBuf,
}

impl Shell {
    /// Start a session on the demo project.
    pub fn new(store: ProjectStore, config: AppConfig) -> Self {
        Self::with_project(Project::demo(Local::now().date_naive()), store, config)
    }

    pub fn with_project(project: Project, store: ProjectStore, config: AppConfig) -> Self {
        Self {
            project,
            store,
            config,
            export_dir: PathBuf::from("."),
        }
    }

    /// Directory that exports without an explicit path are written to.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Read commands line by line until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> anyhow::Result<()> {
        writeln!(out, "{}", render::render_project(&self.project))?;
        writeln!(out, "Type 'help' for commands.")?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let flow = match line.parse::<Command>() {
                Ok(command) => match self.execute(command, out) {
                    Ok(flow) => flow,
                    Err(e) => {
                        self.report(&e, out)?;
                        Flow::Continue
                    }
                },
                Err(e) => {
                    self.report(&e, out)?;
                    Flow::Continue
                }
            };
            out.flush()?;

            if flow == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    fn report<W: Write>(&self, error: &TimelineError, out: &mut W) -> std::io::Result<()> {
        match error {
            TimelineError::EmptyTimeline => {
                tracing::debug!("Skipped generation: no phases");
                writeln!(out, "{} {}", "warning:".yellow().bold(), error)
            }
            TimelineError::Index { position, len } => writeln!(
                out,
                "{} No phase #{} (project has {} phases)",
                "error:".red().bold(),
                position + 1,
                len
            ),
            TimelineError::Validation(_)
            | TimelineError::NotFound(_)
            | TimelineError::Parse { .. } => {
                writeln!(out, "{} {}", "error:".red().bold(), error)
            }
            _ => {
                tracing::warn!("Command failed: {}", error);
                writeln!(out, "{} {}", "error:".red().bold(), error)
            }
        }
    }

    /// Apply one command to the session.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::Help => write!(out, "{}", HELP)?,
            Command::Show => write!(out, "{}", render::render_project(&self.project))?,
            Command::Name(name) => {
                self.project.rename(&name);
                writeln!(out, "Project renamed to '{}'", self.project.name)?;
            }
            Command::Start(date) => {
                self.project.start_date = date;
                writeln!(out, "Start date set to {}", date.format("%Y-%m-%d"))?;
            }
            Command::Add { weeks, name } => {
                let weeks = weeks.unwrap_or(self.config.default_phase_weeks);
                self.project.phases.append(&name, weeks)?;
                writeln!(out, "{} '{}' ({}w)", "Added".green(), name.trim(), weeks)?;
            }
            Command::Edit {
                position,
                weeks,
                name,
            } => {
                if self.project.phases.update(position, &name, weeks)? {
                    writeln!(out, "{} phase #{}", "Updated".green(), position + 1)?;
                } else {
                    writeln!(out, "Phase #{} unchanged", position + 1)?;
                }
            }
            Command::Remove { position } => {
                let removed = self.project.phases.remove(position)?;
                writeln!(out, "{} '{}'", "Removed".green(), removed.name)?;
            }
            Command::Notes(notes) => {
                self.project.set_notes(&notes);
                if notes.is_empty() {
                    writeln!(out, "Notes cleared")?;
                } else {
                    writeln!(out, "Notes updated")?;
                }
            }
            Command::New => {
                self.project = Project::blank(Local::now().date_naive());
                writeln!(out, "Started a new project")?;
            }
            Command::Save => {
                let document = self.store.save(&self.project)?;
                writeln!(out, "{} {}", "Saved project as".green(), document)?;
            }
            Command::List => {
                let documents = self.store.list()?;
                if documents.is_empty() {
                    writeln!(
                        out,
                        "{}",
                        format!("No saved projects in {}", self.store.dir().display()).dimmed()
                    )?;
                }
                for document in documents {
                    writeln!(out, "{}", document)?;
                }
            }
            Command::Load(document) => {
                let project = self.store.load(&document)?;
                self.project = project;
                writeln!(
                    out,
                    "{} '{}' from {}",
                    "Loaded".green(),
                    self.project.name,
                    document
                )?;
            }
            Command::Generate { completed_weeks } => {
                let timeline = Timeline::generate(&self.project)?;
                write_timeline(&timeline, completed_weeks, self.config.chart_width, out)?;
            }
            Command::Export { format, path } => {
                let timeline = Timeline::generate(&self.project)?;
                let bytes = format.render(&timeline.entries)?;
                let path = path.unwrap_or_else(|| {
                    self.export_dir
                        .join(export::file_name(&self.project.name, format))
                });
                fs::write(&path, &bytes)?;
                tracing::info!(path = %path.display(), %format, "Exported timeline");
                writeln!(
                    out,
                    "{} {} bytes to {} ({})",
                    "Wrote".green(),
                    bytes.len(),
                    path.display(),
                    format.mime_type()
                )?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

/// Heading, table, progress line and Gantt chart for a timeline.
pub fn write_timeline<W: Write>(
    timeline: &Timeline,
    completed_weeks: Option<u32>,
    chart_width: usize,
    out: &mut W,
) -> std::io::Result<()> {
    let title = if timeline.project_name.is_empty() {
        "Timeline".to_string()
    } else {
        format!("{} Timeline", timeline.project_name)
    };
    writeln!(out, "{}", title.bold())?;
    write!(out, "{}", render::render_table(timeline))?;
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        render::render_progress(&timeline.progress(completed_weeks))
    )?;
    writeln!(out)?;
    write!(out, "{}", render::render_gantt(timeline, chart_width))
}
