//! Flat-file persistence for projects.
//!
//! Each save writes a new `project_<YYYYMMDD_HHMMSS>.json` document into the
//! store directory. Documents are never overwritten: a save that lands on an
//! existing name gets a numeric suffix (`project_<stamp>_1.json`, ...).

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::error::{Result, TimelineError};
use crate::models::Project;

const DOCUMENT_PREFIX: &str = "project_";
const DOCUMENT_SUFFIX: &str = ".json";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Upper bound on suffixes tried for a single timestamp.
const MAX_SUFFIX: u32 = 1000;

/// Directory of saved project documents.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    dir: PathBuf,
}

impl ProjectStore {
    /// Use `dir` as the storage location. It is created on first save.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Use the platform data directory, e.g. `~/.local/share/timeline-builder`.
    pub fn open_default() -> anyhow::Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "timeline-builder")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(Self::open(dirs.data_dir().join("projects")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `project` as a new document named after the current local time.
    /// Returns the document name.
    pub fn save(&self, project: &Project) -> Result<String> {
        self.save_at(project, Local::now().naive_local())
    }

    /// Save `project` as a new document named after `timestamp`.
    pub fn save_at(&self, project: &Project, timestamp: NaiveDateTime) -> Result<String> {
        fs::create_dir_all(&self.dir)?;
        let body = serde_json::to_vec_pretty(project)?;
        let stamp = timestamp.format(STAMP_FORMAT).to_string();

        for suffix in 0..MAX_SUFFIX {
            let name = document_name(&stamp, suffix);
            let path = self.dir.join(&name);

            // create_new makes the existence check and the create one step
            let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!("Document {} exists, trying next suffix", name);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            write_document(&path, file, &body)?;

            tracing::info!(
                document = %name,
                project = %project.name,
                phases = project.phases.len(),
                "Saved project"
            );
            return Ok(name);
        }

        Err(TimelineError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free document name for timestamp {}", stamp),
        )))
    }

    /// Read and parse the named document.
    pub fn load(&self, document: &str) -> Result<Project> {
        if document.is_empty() || document.contains(['/', '\\']) || document == ".." {
            return Err(TimelineError::NotFound(document.to_string()));
        }

        let path = self.dir.join(document);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("Project document not found: {}", path.display());
                return Err(TimelineError::NotFound(document.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let project: Project =
            serde_json::from_str(&content).map_err(|e| TimelineError::Parse {
                document: document.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(
            document = %document,
            project = %project.name,
            "Loaded project"
        );
        Ok(project)
    }

    /// Names of the saved documents, sorted. A missing directory has none.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_document_name(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Fill a freshly created document. On failure the partial file is removed
/// so it never shows up in `list`.
fn write_document(path: &Path, mut file: File, body: &[u8]) -> std::io::Result<()> {
    let result = file.write_all(body).and_then(|_| file.sync_all());
    if let Err(e) = &result {
        drop(file);
        tracing::warn!("Failed to write {}: {}", path.display(), e);
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Failed to remove partial document {}: {}", path.display(), e);
        }
    }
    result
}

fn document_name(stamp: &str, suffix: u32) -> String {
    if suffix == 0 {
        format!("{}{}{}", DOCUMENT_PREFIX, stamp, DOCUMENT_SUFFIX)
    } else {
        format!("{}{}_{}{}", DOCUMENT_PREFIX, stamp, suffix, DOCUMENT_SUFFIX)
    }
}

/// Whether `name` follows the `project_*.json` convention.
pub fn is_document_name(name: &str) -> bool {
    name.len() > DOCUMENT_PREFIX.len() + DOCUMENT_SUFFIX.len()
        && name.starts_with(DOCUMENT_PREFIX)
        && name.ends_with(DOCUMENT_SUFFIX)
}
