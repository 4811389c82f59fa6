//! Derived view projections: timeline flattening and calendar grouping.
//!
//! Pure transformations over the project tree into independent date-stamped
//! rows. No I/O, no side effects; rendering them is the caller's problem.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::fields::Status;
use crate::project::{Project, DEFAULT_COLOR};

/// Row kind in a flattened view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatKind {
    Project,
    Subtask,
}

/// One date-stamped row for the calendar and timeline views.
#[derive(Debug, Clone)]
pub struct FlattenedTask {
    pub id: String,
    pub project_id: u64,
    pub project_name: String,
    pub task_name: String,
    pub status: Status,
    pub assignee: String,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub color: String,
    pub kind: FlatKind,
}

/// Flatten projects into timeline rows: one release milestone per project
/// plus one row per subtask that has a due date, stable-sorted ascending by
/// due date (dateless rows last). Ties keep production order.
pub fn flatten_for_timeline(projects: &[Project]) -> Vec<FlattenedTask> {
    let mut rows = Vec::new();

    for project in projects {
        rows.push(FlattenedTask {
            id: format!("prj-{}", project.id),
            project_id: project.id,
            project_name: project.name.clone(),
            task_name: format!("RELEASE: {}", project.name),
            status: project.status,
            assignee: project.artist.clone(),
            start_date: project.release_date,
            due_date: project.release_date,
            color: DEFAULT_COLOR.to_string(),
            kind: FlatKind::Project,
        });

        for (g_idx, group) in project.tasks.iter().enumerate() {
            for (s_idx, subtask) in group.subtasks.iter().enumerate() {
                if subtask.due_date.is_none() {
                    continue;
                }
                rows.push(FlattenedTask {
                    id: format!("sub-{}-{}-{}", project.id, g_idx, s_idx),
                    project_id: project.id,
                    project_name: project.name.clone(),
                    task_name: subtask.name.clone(),
                    status: subtask.status,
                    assignee: subtask.assignee.clone(),
                    start_date: subtask.start_date,
                    due_date: subtask.due_date,
                    color: subtask.color.clone(),
                    kind: FlatKind::Subtask,
                });
            }
        }
    }

    rows.sort_by_key(|r| r.due_date.unwrap_or(NaiveDate::MAX));
    rows
}

/// Group flattened rows by due day within one month, for the calendar view.
pub fn tasks_by_day<'a>(
    rows: &'a [FlattenedTask],
    year: i32,
    month: u32,
) -> BTreeMap<NaiveDate, Vec<&'a FlattenedTask>> {
    let mut days: BTreeMap<NaiveDate, Vec<&FlattenedTask>> = BTreeMap::new();
    for row in rows {
        if let Some(due) = row.due_date {
            if due.year() == year && due.month() == month {
                days.entry(due).or_default().push(row);
            }
        }
    }
    days
}

/// Proximity of a release date relative to today, for list-view badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineFlag {
    Overdue,
    WithinWeek,
    WithinFortnight,
    OnTrack,
}

/// Classify a release date against today. Absent dates have no flag.
pub fn deadline_flag(release: Option<NaiveDate>, today: NaiveDate) -> Option<DeadlineFlag> {
    let release = release?;
    let days = (release - today).num_days();
    Some(if days < 0 {
        DeadlineFlag::Overdue
    } else if days <= 7 {
        DeadlineFlag::WithinWeek
    } else if days <= 14 {
        DeadlineFlag::WithinFortnight
    } else {
        DeadlineFlag::OnTrack
    })
}

/// Format a deadline flag for display.
pub fn format_deadline_flag(flag: Option<DeadlineFlag>) -> &'static str {
    match flag {
        Some(DeadlineFlag::Overdue) => "overdue",
        Some(DeadlineFlag::WithinWeek) => "<=7d",
        Some(DeadlineFlag::WithinFortnight) => "<=14d",
        Some(DeadlineFlag::OnTrack) => "on track",
        None => "-",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::ProjectType;
    use crate::project::{format_date_display, Subtask, TaskGroup};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn project(id: u64, name: &str, release: Option<NaiveDate>, tasks: Vec<TaskGroup>) -> Project {
        Project {
            id,
            name: name.into(),
            release_date: release,
            release_date_display: format_date_display(release),
            artist: "Mirrr".into(),
            label: "KruengKao".into(),
            project_type: ProjectType::Single,
            status: Status::ToDo,
            remark: String::new(),
            tasks,
            created_at_utc: 0,
        }
    }

    fn dated_sub(name: &str, due: &str, status: Status) -> Subtask {
        Subtask {
            name: name.into(),
            assignee: String::new(),
            status,
            start_date: None,
            due_date: Some(date(due)),
            remark: String::new(),
            color: DEFAULT_COLOR.into(),
            lead_days: 14,
            duration_days: 7,
        }
    }

    #[test]
    fn test_flatten_two_projects() {
        let with_sub = project(
            1,
            "Moondance",
            Some(date("2024-03-01")),
            vec![TaskGroup {
                title: "Song Demo".into(),
                status: Status::InProgress,
                due_date: Some(date("2024-02-15")),
                start_date: None,
                subtasks: vec![dated_sub("Demo", "2024-02-15", Status::Done)],
            }],
        );
        let bare = project(2, "Undated EP", Some(date("2024-02-01")), vec![]);

        let rows = flatten_for_timeline(&[with_sub, bare]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].due_date, Some(date("2024-02-01")));
        assert_eq!(rows[0].kind, FlatKind::Project);
        assert_eq!(rows[1].due_date, Some(date("2024-02-15")));
        assert_eq!(rows[1].kind, FlatKind::Subtask);
        assert_eq!(rows[1].status, Status::Done);
        assert_eq!(rows[1].id, "sub-1-0-0");
        assert_eq!(rows[1].project_id, 1);
        assert_eq!(rows[2].due_date, Some(date("2024-03-01")));
        assert_eq!(rows[2].task_name, "RELEASE: Moondance");
    }

    #[test]
    fn test_undated_subtasks_are_skipped() {
        let p = project(
            1,
            "No Dates",
            None,
            vec![TaskGroup {
                title: "Song Demo".into(),
                status: Status::ToDo,
                due_date: None,
                start_date: None,
                subtasks: vec![Subtask {
                    due_date: None,
                    ..dated_sub("Demo", "2024-01-01", Status::ToDo)
                }],
            }],
        );
        let rows = flatten_for_timeline(&[p]);
        // Only the milestone row survives, sorted last for lack of a date.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, FlatKind::Project);
        assert_eq!(rows[0].due_date, None);
    }

    #[test]
    fn test_tasks_by_day_filters_month() {
        let p = project(
            1,
            "Moondance",
            Some(date("2024-03-01")),
            vec![TaskGroup {
                title: "Song Demo".into(),
                status: Status::ToDo,
                due_date: None,
                start_date: None,
                subtasks: vec![
                    dated_sub("Demo", "2024-02-15", Status::ToDo),
                    dated_sub("Master", "2024-02-15", Status::ToDo),
                    dated_sub("Banner", "2024-03-20", Status::ToDo),
                ],
            }],
        );
        let rows = flatten_for_timeline(&[p]);
        let feb = tasks_by_day(&rows, 2024, 2);
        assert_eq!(feb.len(), 1);
        assert_eq!(feb[&date("2024-02-15")].len(), 2);
        let march = tasks_by_day(&rows, 2024, 3);
        assert_eq!(march.len(), 2);
        assert_eq!(march[&date("2024-03-01")][0].kind, FlatKind::Project);
    }

    #[test]
    fn test_deadline_flag_bands() {
        let today = date("2024-03-01");
        assert_eq!(deadline_flag(Some(date("2024-02-29")), today), Some(DeadlineFlag::Overdue));
        assert_eq!(deadline_flag(Some(date("2024-03-01")), today), Some(DeadlineFlag::WithinWeek));
        assert_eq!(deadline_flag(Some(date("2024-03-08")), today), Some(DeadlineFlag::WithinWeek));
        assert_eq!(
            deadline_flag(Some(date("2024-03-15")), today),
            Some(DeadlineFlag::WithinFortnight)
        );
        assert_eq!(deadline_flag(Some(date("2024-04-01")), today), Some(DeadlineFlag::OnTrack));
        assert_eq!(deadline_flag(None, today), None);
    }
}
