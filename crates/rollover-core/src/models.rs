use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Task as the service sends it over the wire, before any date parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub gid: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub due_on: Option<String>,
    #[serde(default)]
    pub due_at: Option<String>,
}

/// A task with parsed due signals.
///
/// `due_at` wins over `due_date` whenever both are present; the service fills
/// `due_on` in alongside `due_at` for timed tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub due_date: Option<NaiveDate>,
    pub due_at: Option<DateTime<Utc>>,
}

impl Task {
    /// The authoritative due signal, if the task has one.
    pub fn due(&self) -> Option<DueValue> {
        match (self.due_at, self.due_date) {
            (Some(at), _) => Some(DueValue::At(at)),
            (None, Some(on)) => Some(DueValue::On(on)),
            (None, None) => None,
        }
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = CoreError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let due_date = match non_empty(record.due_on.as_deref()) {
            Some(raw) => Some(parse_due_on(raw).ok_or_else(|| CoreError::MalformedTask {
                task_id: record.gid.clone(),
                field: "due_on",
                value: raw.to_string(),
            })?),
            None => None,
        };

        let due_at = match non_empty(record.due_at.as_deref()) {
            Some(raw) => Some(parse_due_at(raw).ok_or_else(|| CoreError::MalformedTask {
                task_id: record.gid.clone(),
                field: "due_at",
                value: raw.to_string(),
            })?),
            None => None,
        };

        Ok(Task {
            id: record.gid,
            name: record.name,
            due_date,
            due_at,
        })
    }
}

/// Untitled tasks come back as `"name": null`.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn parse_due_on(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub fn parse_due_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A due value as it is written back to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueValue {
    /// Calendar date, no time of day.
    On(NaiveDate),
    /// Absolute instant.
    At(DateTime<Utc>),
}

impl fmt::Display for DueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueValue::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DueValue::At(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

/// Partial update body; only the field matching the due kind is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
}

impl From<DueValue> for TaskUpdate {
    fn from(value: DueValue) -> Self {
        match value {
            DueValue::On(_) => TaskUpdate {
                due_on: Some(value.to_string()),
                due_at: None,
            },
            DueValue::At(_) => TaskUpdate {
                due_on: None,
                due_at: Some(value.to_string()),
            },
        }
    }
}

/// Which environment the tool runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Test,
    Production,
}

impl From<&str> for RunMode {
    /// `test` (any case) selects the test project; everything else is production.
    fn from(environment: &str) -> Self {
        if environment.trim().eq_ignore_ascii_case("test") {
            RunMode::Test
        } else {
            RunMode::Production
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Test => f.write_str("test"),
            RunMode::Production => f.write_str("production"),
        }
    }
}

/// Scope of the incomplete-task query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSelector {
    Project(String),
    WorkspaceAssignee { workspace: String, assignee: String },
}

impl TaskSelector {
    pub fn for_mode(mode: RunMode, workspace: &str, test_project: Option<&str>) -> Result<Self, CoreError> {
        match mode {
            RunMode::Test => test_project
                .map(|project| TaskSelector::Project(project.to_string()))
                .ok_or_else(|| {
                    CoreError::Configuration("TEST_PROJECT_ID is required in test mode".to_string())
                }),
            RunMode::Production => Ok(TaskSelector::WorkspaceAssignee {
                workspace: workspace.to_string(),
                assignee: "me".to_string(),
            }),
        }
    }
}

impl fmt::Display for TaskSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskSelector::Project(project) => write!(f, "project {}", project),
            TaskSelector::WorkspaceAssignee { workspace, assignee } => {
                write!(f, "workspace {} (assignee: {})", workspace, assignee)
            }
        }
    }
}

/// Result of evaluating one task against the current local instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingDecision {
    pub task_id: String,
    pub task_name: String,
    pub should_move: bool,
    pub current_due: Option<DueValue>,
    pub new_due: Option<DueValue>,
}
