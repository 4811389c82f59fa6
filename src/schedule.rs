//! Task scheduling: date offsets, template expansion, and rescheduling.
//!
//! All dates are `chrono::NaiveDate` calendar days with no time-of-day
//! component, so comparisons are by calendar day and no timezone conversion
//! can shift a parsed date to an adjacent day. An absent date is `None` and
//! flows through every computation as `None` rather than an error.

use chrono::{Duration, NaiveDate};

use crate::fields::{ProjectType, Status};
use crate::project::{Subtask, TaskGroup};
use crate::template::{CatalogDefaults, GroupContent, TemplateCatalog, TemplateEntry};

/// Subtract a number of days from a calendar date, normalising month and
/// year rollover. Absent input yields absent output.
pub fn date_minus_days(reference: Option<NaiveDate>, days: i64) -> Option<NaiveDate> {
    reference.map(|d| d - Duration::days(days))
}

/// Due date for a task with the given lead time before release.
pub fn due_date_from_release(release: Option<NaiveDate>, lead_days: i64) -> Option<NaiveDate> {
    date_minus_days(release, lead_days)
}

/// Start date back-computed from a due date and a task duration.
pub fn start_date_from_due(due: Option<NaiveDate>, duration_days: i64) -> Option<NaiveDate> {
    date_minus_days(due, duration_days)
}

fn expand_entry(
    entry: &TemplateEntry,
    section: Option<&str>,
    defaults: &CatalogDefaults,
    release: Option<NaiveDate>,
) -> Subtask {
    let lead_days = entry.lead_days.unwrap_or(defaults.lead_days);
    let duration_days = entry.duration_days.unwrap_or(defaults.duration_days);
    let due_date = due_date_from_release(release, lead_days);
    let name = match section {
        Some(prefix) => format!("{}: {}", prefix, entry.name),
        None => entry.name.clone(),
    };
    Subtask {
        name,
        assignee: String::new(),
        status: Status::ToDo,
        start_date: start_date_from_due(due_date, duration_days),
        due_date,
        remark: String::new(),
        color: entry.color.clone().unwrap_or_else(|| defaults.color.clone()),
        lead_days,
        duration_days,
    }
}

/// Expand the catalog template for a project type against a release date
/// into the concrete, dated task-group tree.
///
/// Groups come out in template declaration order; sectioned content flattens
/// to `"<section>: <entry>"` subtask names. Every group starts as "To do"
/// with its aggregate window set to the earliest subtask dates.
pub fn build_task_structure(
    catalog: &TemplateCatalog,
    project_type: ProjectType,
    release_date: Option<NaiveDate>,
) -> Vec<TaskGroup> {
    let template = catalog.template_for(project_type);
    template
        .groups
        .iter()
        .map(|group| {
            let subtasks: Vec<Subtask> = match &group.content {
                GroupContent::Flat(entries) => entries
                    .iter()
                    .map(|e| expand_entry(e, None, &catalog.defaults, release_date))
                    .collect(),
                GroupContent::Sectioned(sections) => sections
                    .iter()
                    .flat_map(|section| {
                        section.entries.iter().map(|e| {
                            expand_entry(e, Some(&section.title), &catalog.defaults, release_date)
                        })
                    })
                    .collect(),
            };
            let mut group = TaskGroup {
                title: group.title.clone(),
                status: Status::ToDo,
                due_date: None,
                start_date: None,
                subtasks,
            };
            group.recompute_window();
            group
        })
        .collect()
}

/// Re-derive every subtask's dates from its own retained lead time and
/// duration against a new release date, then refresh the group windows.
///
/// Each task keeps its differentiation: a 21-day-lead task stays 21 days
/// before the new release date. Returns a new tree; the caller commits it
/// together with the new release date in one write.
pub fn reschedule_tasks(tasks: &[TaskGroup], new_release: Option<NaiveDate>) -> Vec<TaskGroup> {
    tasks
        .iter()
        .map(|group| {
            let mut group = group.clone();
            for subtask in &mut group.subtasks {
                subtask.due_date = due_date_from_release(new_release, subtask.lead_days);
                subtask.start_date = start_date_from_due(subtask.due_date, subtask.duration_days);
            }
            group.recompute_window();
            group
        })
        .collect()
}
