//! Task-set loading.
//!
//! Two file formats are accepted, chosen by extension:
//!
//! **YAML** (`.yaml` / `.yml`):
//! ```yaml
//! tasks:
//!   - name: Task1
//!     period: 4
//!     release: 0      # optional, defaults to 0
//!     execution: 1
//!     deadline: 4     # optional, defaults to period
//! ```
//!
//! **Text** (anything else), one template per line:
//! ```text
//! # period release execution deadline [name]
//! 4 0 1 4 Task1
//! 6 0 2 6 Task2
//! ```
//!
//! Templates with `period <= 0` are kept as loaded; the simulator treats
//! them as disabled.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::scheduler::error::{MalformedReason, SimulationError};
use crate::task::TaskTemplate;

/// Name given to templates that do not carry one.
pub const DEFAULT_TASK_NAME: &str = "Task";

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
struct TaskSetFile {
    #[serde(default)]
    tasks: Vec<TaskEntry>,
}

/// Per-task fields as they appear in the YAML file.
#[derive(Debug, Deserialize)]
struct TaskEntry {
    name: Option<String>,
    period: i64,
    #[serde(default)]
    release: i64,
    execution: i64,
    /// Defaults to `period` when absent.
    deadline: Option<i64>,
}

impl From<TaskEntry> for TaskTemplate {
    fn from(entry: TaskEntry) -> Self {
        TaskTemplate {
            name: entry
                .name
                .unwrap_or_else(|| DEFAULT_TASK_NAME.to_string()),
            period: entry.period,
            release: entry.release,
            execution: entry.execution,
            deadline: entry.deadline.unwrap_or(entry.period),
        }
    }
}

// ── File format ───────────────────────────────────────────────────────────────

/// On-disk layout of a task-set file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFileFormat {
    Yaml,
    Text,
}

impl TaskFileFormat {
    /// `.yaml` / `.yml` (any case) is YAML, everything else is text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                TaskFileFormat::Yaml
            }
            _ => TaskFileFormat::Text,
        }
    }
}

// ── Text format ───────────────────────────────────────────────────────────────

/// Parse the whitespace-separated text format.
///
/// Blank lines and lines starting with `#` are skipped.  Errors carry the
/// 0-based line index as the template index.
pub fn parse_text(content: &str) -> Result<Vec<TaskTemplate>, SimulationError> {
    let mut templates = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if !(4..=5).contains(&fields.len()) {
            return Err(SimulationError::MalformedTemplate {
                index,
                reason: MalformedReason::WrongFieldCount {
                    found: fields.len(),
                },
            });
        }

        let int = |pos: usize, field: &'static str| -> Result<i64, SimulationError> {
            fields[pos]
                .parse::<i64>()
                .map_err(|_| SimulationError::MalformedTemplate {
                    index,
                    reason: MalformedReason::NotAnInteger {
                        field,
                        value: fields[pos].to_string(),
                    },
                })
        };

        let template = TaskTemplate {
            period: int(0, "period")?,
            release: int(1, "release")?,
            execution: int(2, "execution")?,
            deadline: int(3, "deadline")?,
            name: fields
                .get(4)
                .map_or_else(|| DEFAULT_TASK_NAME.to_string(), |n| n.to_string()),
        };
        debug!(line = index + 1, task = %template.name, period = template.period, "parsed template");
        templates.push(template);
    }

    Ok(templates)
}

// ── TaskSetLoader ─────────────────────────────────────────────────────────────

/// Loads task templates from a YAML or text file.
#[derive(Debug, Default)]
pub struct TaskSetLoader {
    /// Templates in file order.
    templates: Vec<TaskTemplate>,

    /// Set to `true` after a successful load.
    loaded: bool,
}

impl TaskSetLoader {
    /// Creates a new, empty `TaskSetLoader`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `path` and replaces any previously loaded templates.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its content cannot be
    /// parsed.  A text-format error wraps a
    /// [`SimulationError::MalformedTemplate`] that callers can downcast to.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        info!("Loading task set from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open task file: {}", path.display()))?;

        self.load_from_str(&content, TaskFileFormat::from_path(path))
            .with_context(|| format!("Failed to parse task file: {}", path.display()))
    }

    /// Parses `content` in the given `format`, replacing any previously
    /// loaded templates.
    pub fn load_from_str(&mut self, content: &str, format: TaskFileFormat) -> Result<()> {
        // Reset state before (re-)loading
        self.templates.clear();
        self.loaded = false;

        let templates = match format {
            TaskFileFormat::Yaml => {
                let file: TaskSetFile =
                    serde_yaml::from_str(content).context("Invalid task set YAML")?;
                file.tasks.into_iter().map(TaskTemplate::from).collect()
            }
            TaskFileFormat::Text => parse_text(content)?,
        };

        if templates.is_empty() {
            warn!("Task set contains no templates");
        }
        let disabled = templates.iter().filter(|t| !t.is_active()).count();
        if disabled > 0 {
            warn!(disabled, "Templates with a non-positive period will be ignored");
        }

        info!(
            "Successfully loaded {} task template(s) ({:?} format)",
            templates.len(),
            format
        );
        for t in &templates {
            debug!(
                "  Task: {} | period: {} | release: {} | execution: {} | deadline: {}",
                t.name, t.period, t.release, t.execution, t.deadline
            );
        }

        self.templates = templates;
        self.loaded = true;
        Ok(())
    }

    /// Loaded templates in file order.
    pub fn templates(&self) -> &[TaskTemplate] {
        &self.templates
    }

    /// Consume the loader and hand the templates over.
    pub fn into_templates(self) -> Vec<TaskTemplate> {
        self.templates
    }

    /// Returns `true` after a successful load.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
