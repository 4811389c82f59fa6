//! Project, task-group, and subtask data model.
//!
//! A `Project` exclusively owns its ordered `TaskGroup`s, and each group
//! exclusively owns its ordered `Subtask`s. Nothing here is shared across
//! projects. Groups and subtasks are created in one step by the template
//! expansion (`schedule::build_task_structure`); afterwards only their field
//! values mutate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// Display hint used when a template entry carries no colour of its own.
pub const DEFAULT_COLOR: &str = "#6366f1";

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_lead_days() -> i64 {
    crate::template::DEFAULT_LEAD_DAYS
}

fn default_duration_days() -> i64 {
    crate::template::DEFAULT_DURATION_DAYS
}

/// The smallest schedulable unit of work.
///
/// `lead_days` and `duration_days` are the offsets the subtask was built
/// from. They are retained so a release-date change can re-derive this
/// subtask's dates from its own template entry rather than shifting every
/// task by one uniform delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub name: String,
    #[serde(default)]
    pub assignee: String,
    pub status: Status,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub remark: String,
    /// Opaque display token. Never interpreted by the engine.
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_lead_days")]
    pub lead_days: i64,
    #[serde(default = "default_duration_days")]
    pub duration_days: i64,
}

/// A named cluster of related subtasks, e.g. "Song Registration".
///
/// The aggregate `due_date`/`start_date` are a snapshot of the earliest
/// subtask dates, not a live computed property. They are recomputed
/// explicitly via [`TaskGroup::recompute_window`] whenever subtask dates
/// change in bulk (release-date rescheduling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskGroup {
    pub title: String,
    pub status: Status,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub subtasks: Vec<Subtask>,
}

impl TaskGroup {
    /// Reset the aggregate window to the earliest due/start date among the
    /// subtasks. A group with no dated subtasks gets an empty window.
    pub fn recompute_window(&mut self) {
        self.due_date = self.subtasks.iter().filter_map(|s| s.due_date).min();
        self.start_date = self.subtasks.iter().filter_map(|s| s.start_date).min();
    }
}

/// A release effort: one single, album, or live session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub release_date: Option<NaiveDate>,
    /// Derived DD-MM-YYYY counterpart of `release_date`. Recomputed whenever
    /// the release date changes.
    pub release_date_display: String,
    pub artist: String,
    pub label: String,
    pub project_type: ProjectType,
    pub status: Status,
    #[serde(default)]
    pub remark: String,
    pub tasks: Vec<TaskGroup>,
    pub created_at_utc: i64,
}

/// Format a calendar date as DD-MM-YYYY for display, "N/A" when absent.
pub fn format_date_display(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d-%m-%Y").to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(name: &str, due: Option<&str>, start: Option<&str>) -> Subtask {
        Subtask {
            name: name.into(),
            assignee: String::new(),
            status: Status::ToDo,
            start_date: start.map(|s| s.parse().unwrap()),
            due_date: due.map(|s| s.parse().unwrap()),
            remark: String::new(),
            color: DEFAULT_COLOR.into(),
            lead_days: 28,
            duration_days: 7,
        }
    }

    #[test]
    fn test_recompute_window_takes_earliest() {
        let mut group = TaskGroup {
            title: "Song Demo".into(),
            status: Status::ToDo,
            due_date: None,
            start_date: None,
            subtasks: vec![
                sub("Demo", Some("2024-03-10"), Some("2024-03-03")),
                sub("Master", Some("2024-02-20"), Some("2024-02-13")),
            ],
        };
        group.recompute_window();
        assert_eq!(group.due_date, Some("2024-02-20".parse().unwrap()));
        assert_eq!(group.start_date, Some("2024-02-13".parse().unwrap()));
    }

    #[test]
    fn test_recompute_window_empty_group() {
        let mut group = TaskGroup {
            title: "Empty".into(),
            status: Status::ToDo,
            due_date: Some("2024-01-01".parse().unwrap()),
            start_date: None,
            subtasks: vec![],
        };
        group.recompute_window();
        assert_eq!(group.due_date, None);
        assert_eq!(group.start_date, None);
    }

    #[test]
    fn test_subtask_missing_offsets_parses_with_defaults() {
        // Records written before offsets were tracked carry none; they must
        // still parse instead of failing the whole tenant file.
        let json = r#"{
            "name": "Demo",
            "status": "To do",
            "due_date": "2024-05-11"
        }"#;
        let sub: Subtask = serde_json::from_str(json).unwrap();
        assert_eq!(sub.lead_days, 28);
        assert_eq!(sub.duration_days, 7);
        assert_eq!(sub.color, DEFAULT_COLOR);
        assert_eq!(sub.assignee, "");
        assert_eq!(sub.due_date, Some("2024-05-11".parse().unwrap()));
    }

    #[test]
    fn test_format_date_display() {
        assert_eq!(
            format_date_display(Some("2024-03-01".parse().unwrap())),
            "01-03-2024"
        );
        assert_eq!(format_date_display(None), "N/A");
    }
}
