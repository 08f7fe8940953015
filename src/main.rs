use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timeline_builder::config::AppConfig;
use timeline_builder::export::{self, ExportFormat};
use timeline_builder::models::{MAX_DURATION_WEEKS, MIN_DURATION_WEEKS};
use timeline_builder::render;
use timeline_builder::shell::{self, Shell};
use timeline_builder::store::ProjectStore;
use timeline_builder::timeline::Timeline;

#[derive(Parser)]
#[command(name = "tlb")]
#[command(about = "Build project timelines from sequential phases")]
struct Cli {
    /// Directory holding saved project documents
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive editing session (default)
    Shell,
    /// List saved project documents
    List,
    /// Print a saved project with its timeline and Gantt chart
    Show {
        /// Document name, e.g. project_20240101_093000.json
        document: String,

        /// Weeks of work already completed, for the progress line
        #[arg(long)]
        completed: Option<u32>,
    },
    /// Export the timeline of a saved project
    Export {
        /// Document name, e.g. project_20240101_093000.json
        document: String,

        #[arg(short, long, value_enum, default_value = "csv")]
        format: FormatArg,

        /// Output file (defaults to <project name>_timeline.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show or change the saved configuration
    Config {
        /// Directory holding saved project documents
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Width of the Gantt chart bar area, in columns
        #[arg(long)]
        chart_width: Option<usize>,

        /// Weeks used when a phase is added without a duration
        #[arg(long)]
        default_weeks: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Xlsx,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xlsx => ExportFormat::Spreadsheet,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

/// Initialize tracing on stderr so stdout only carries user output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "timeline_builder=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let mut config = AppConfig::load();
    let store = match config.storage_dir(cli.dir) {
        Some(dir) => ProjectStore::open(dir),
        None => ProjectStore::open_default()?,
    };
    tracing::debug!("Using storage directory {}", store.dir().display());

    match cli.command {
        Some(Commands::Shell) | None => {
            let mut session = Shell::new(store, config);
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            session.run(stdin.lock(), &mut stdout)?;
        }
        Some(Commands::List) => {
            let documents = store.list().context("Failed to list saved projects")?;
            if documents.is_empty() {
                println!("No saved projects in {}", store.dir().display());
            }
            for document in documents {
                println!("{}", document);
            }
        }
        Some(Commands::Show {
            document,
            completed,
        }) => {
            let project = store
                .load(&document)
                .with_context(|| format!("Failed to load {}", document))?;
            println!("{}", render::render_project(&project));

            match Timeline::generate(&project) {
                Ok(timeline) => shell::write_timeline(
                    &timeline,
                    completed,
                    config.chart_width,
                    &mut io::stdout(),
                )?,
                Err(e) => println!("{}", e),
            }
        }
        Some(Commands::Export {
            document,
            format,
            output,
        }) => {
            let format = ExportFormat::from(format);
            let project = store
                .load(&document)
                .with_context(|| format!("Failed to load {}", document))?;
            let timeline = Timeline::generate(&project)?;
            let bytes = format.render(&timeline.entries)?;

            let path =
                output.unwrap_or_else(|| PathBuf::from(export::file_name(&project.name, format)));
            std::fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            tracing::info!(path = %path.display(), %format, "Exported timeline");
            println!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        Some(Commands::Config {
            data_dir,
            chart_width,
            default_weeks,
        }) => {
            let changed = data_dir.is_some() || chart_width.is_some() || default_weeks.is_some();
            if let Some(dir) = data_dir {
                config.data_dir = Some(dir);
            }
            if let Some(width) = chart_width {
                config.chart_width = width;
            }
            if let Some(weeks) = default_weeks {
                config.default_phase_weeks =
                    weeks.clamp(MIN_DURATION_WEEKS, MAX_DURATION_WEEKS);
            }
            if changed {
                config.save().context("Failed to save config")?;
                tracing::info!("Saved configuration");
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
