//! Command implementations for the CLI interface.
//!
//! Each handler loads the tenant snapshot through the store, runs the pure
//! scheduling or cascade computation, and commits the result. Rendering is
//! plain text tables; all real rules live in `schedule`, `cascade`, and
//! `views`.

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use chrono::{Datelike, Local, NaiveDate};

use crate::cascade::{apply_group_status, apply_subtask_edit, SubtaskField};
use crate::cli::Cli;
use crate::fields::*;
use crate::project::{format_date_display, Project};
use crate::schedule::reschedule_tasks;
use crate::store::{JsonStore, NewProject, ProjectPatch};
use crate::views::*;

#[derive(Subcommand)]
pub enum Commands {
    /// Create a release project and its full task tree from the template.
    Add {
        /// Project name.
        name: String,
        /// Release date: YYYY-MM-DD. All task deadlines derive from it.
        #[arg(long)]
        release: String,
        /// Artist name.
        #[arg(long)]
        artist: String,
        /// Record label.
        #[arg(long)]
        label: String,
        /// Release kind: single | album | live-session.
        #[arg(long = "type", value_enum, default_value_t = ProjectType::Single)]
        project_type: ProjectType,
    },

    /// List projects ordered by release date.
    List,

    /// Show one project's task groups and subtasks.
    View {
        /// Project ID.
        id: u64,
    },

    /// Set a project's status (never derived automatically).
    SetStatus {
        /// Project ID.
        id: u64,
        /// New status: to-do | in-progress | done | on-hold.
        #[arg(value_enum)]
        status: Status,
    },

    /// Set a project's free-text remark.
    Remark {
        /// Project ID.
        id: u64,
        /// Remark text. An empty string clears it.
        remark: String,
    },

    /// Set a task group's status. Done cascades to its subtasks.
    GroupStatus {
        /// Project ID.
        id: u64,
        /// Group index as shown by `view`.
        group: usize,
        #[arg(value_enum)]
        status: Status,
    },

    /// Edit fields on one subtask. A status edit recomputes the group status.
    Edit {
        /// Project ID.
        id: u64,
        /// Group index as shown by `view`.
        group: usize,
        /// Subtask index within the group as shown by `view`.
        subtask: usize,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Due date: YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
        /// Start date: YYYY-MM-DD.
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        remark: Option<String>,
        /// Clear the due date.
        #[arg(long)]
        clear_due: bool,
        /// Clear the start date.
        #[arg(long)]
        clear_start: bool,
    },

    /// Move a project's release date, re-deriving every task's dates from
    /// its own lead time and duration.
    Reschedule {
        /// Project ID.
        id: u64,
        /// New release date: YYYY-MM-DD.
        release: String,
    },

    /// All dated tasks and release milestones, ascending by due date.
    Timeline,

    /// Tasks due in one month, grouped per day.
    Calendar {
        /// Month to show: YYYY-MM. Defaults to the current month.
        #[arg(long)]
        month: Option<String>,
    },

    /// Delete a project and everything it owns.
    Delete {
        /// Project ID.
        id: u64,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_date_arg(s: &str) -> NaiveDate {
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => {
            eprintln!("Invalid date '{}', expected YYYY-MM-DD", s);
            std::process::exit(1);
        }
    }
}

fn require_project(store: &JsonStore, tenant: &str, id: u64) -> Project {
    match store.load(tenant).get(id) {
        Some(p) => p.clone(),
        None => {
            eprintln!("Project with ID {} not found", id);
            std::process::exit(1);
        }
    }
}

fn exit_on_err<T>(result: Result<T, String>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Create a project with its template-expanded task tree.
pub fn cmd_add(
    store: &mut JsonStore,
    tenant: &str,
    name: String,
    release: String,
    artist: String,
    label: String,
    project_type: ProjectType,
) {
    let release_date = parse_date_arg(&release);
    let id = exit_on_err(store.create(
        tenant,
        NewProject {
            name,
            release_date: Some(release_date),
            artist,
            label,
            project_type,
        },
    ));
    println!("Added project {}", id);
}

/// List projects ordered by release date ascending.
pub fn cmd_list(store: &JsonStore, tenant: &str) {
    let db = store.load(tenant);
    if db.projects.is_empty() {
        println!("No projects.");
        return;
    }
    let today = Local::now().date_naive();
    println!(
        "{:<5} {:<24} {:<16} {:<13} {:<12} {:<12} {}",
        "ID", "Name", "Artist", "Type", "Release", "Status", "Deadline"
    );
    for p in &db.projects {
        println!(
            "{:<5} {:<24} {:<16} {:<13} {:<12} {:<12} {}",
            p.id,
            truncate(&p.name, 24),
            truncate(&p.artist, 16),
            format_project_type(p.project_type),
            p.release_date_display,
            format_status(p.status),
            format_deadline_flag(deadline_flag(p.release_date, today)),
        );
    }
}

/// Show a project's full task tree with the indices `edit` and
/// `group-status` address.
pub fn cmd_view(store: &JsonStore, tenant: &str, id: u64) {
    let p = require_project(store, tenant, id);
    println!(
        "{} — {} [{}] ({})",
        p.name,
        p.artist,
        p.label,
        format_project_type(p.project_type)
    );
    println!(
        "Release: {}   Status: {}",
        p.release_date_display,
        format_status(p.status)
    );
    if !p.remark.is_empty() {
        println!("Remark: {}", p.remark);
    }
    for (g_idx, group) in p.tasks.iter().enumerate() {
        println!(
            "\n[{}] {} — {} (due {}, start {})",
            g_idx,
            group.title,
            format_status(group.status),
            format_date_display(group.due_date),
            format_date_display(group.start_date),
        );
        println!(
            "    {:<4} {:<34} {:<14} {:<12} {:<12} {:<12} {}",
            "#", "Subtask", "Assignee", "Status", "Start", "Due", "Remark"
        );
        for (s_idx, sub) in group.subtasks.iter().enumerate() {
            println!(
                "    {:<4} {:<34} {:<14} {:<12} {:<12} {:<12} {}",
                s_idx,
                truncate(&sub.name, 34),
                truncate(if sub.assignee.is_empty() { "-" } else { sub.assignee.as_str() }, 14),
                format_status(sub.status),
                format_date_display(sub.start_date),
                format_date_display(sub.due_date),
                sub.remark,
            );
        }
    }
}

/// Set project status by direct user action.
pub fn cmd_set_status(store: &mut JsonStore, tenant: &str, id: u64, status: Status) {
    require_project(store, tenant, id);
    exit_on_err(store.commit(
        tenant,
        id,
        ProjectPatch {
            status: Some(status),
            ..ProjectPatch::default()
        },
    ));
    println!("Project {} status set to {}", id, format_status(status));
}

/// Set project remark.
pub fn cmd_remark(store: &mut JsonStore, tenant: &str, id: u64, remark: String) {
    require_project(store, tenant, id);
    exit_on_err(store.commit(
        tenant,
        id,
        ProjectPatch {
            remark: Some(remark),
            ..ProjectPatch::default()
        },
    ));
    println!("Project {} remark updated", id);
}

/// Set a group's status; Done cascades down to its subtasks.
pub fn cmd_group_status(store: &mut JsonStore, tenant: &str, id: u64, group: usize, status: Status) {
    let p = require_project(store, tenant, id);
    let Some(tasks) = apply_group_status(&p.tasks, group, status) else {
        // Stale index: the tree changed shape under us. Deliberate no-op.
        println!("Group {} no longer exists on project {}; nothing changed", group, id);
        return;
    };
    exit_on_err(store.commit(
        tenant,
        id,
        ProjectPatch {
            tasks: Some(tasks),
            ..ProjectPatch::default()
        },
    ));
    println!("Group {} status set to {}", group, format_status(status));
}

/// Apply field edits to one subtask and commit the resulting tree.
#[allow(clippy::too_many_arguments)]
pub fn cmd_edit(
    store: &mut JsonStore,
    tenant: &str,
    id: u64,
    group: usize,
    subtask: usize,
    assignee: Option<String>,
    status: Option<Status>,
    due: Option<String>,
    start: Option<String>,
    remark: Option<String>,
    clear_due: bool,
    clear_start: bool,
) {
    let p = require_project(store, tenant, id);

    let mut edits: Vec<SubtaskField> = Vec::new();
    if let Some(v) = assignee {
        edits.push(SubtaskField::Assignee(v));
    }
    if let Some(v) = status {
        edits.push(SubtaskField::Status(v));
    }
    if clear_due {
        edits.push(SubtaskField::DueDate(None));
    } else if let Some(v) = due {
        edits.push(SubtaskField::DueDate(Some(parse_date_arg(&v))));
    }
    if clear_start {
        edits.push(SubtaskField::StartDate(None));
    } else if let Some(v) = start {
        edits.push(SubtaskField::StartDate(Some(parse_date_arg(&v))));
    }
    if let Some(v) = remark {
        edits.push(SubtaskField::Remark(v));
    }
    if edits.is_empty() {
        println!("Nothing to edit. Pass --assignee, --status, --due, --start, or --remark.");
        return;
    }

    let mut tasks = p.tasks;
    for edit in edits {
        match apply_subtask_edit(&tasks, group, subtask, edit) {
            Some(next) => tasks = next,
            None => {
                println!(
                    "Subtask {}.{} no longer exists on project {}; nothing changed",
                    group, subtask, id
                );
                return;
            }
        }
    }
    exit_on_err(store.commit(
        tenant,
        id,
        ProjectPatch {
            tasks: Some(tasks),
            ..ProjectPatch::default()
        },
    ));
    println!("Updated subtask {}.{} on project {}", group, subtask, id);
}

/// Move the release date, re-deriving every subtask's dates from its own
/// offsets, and commit date + tree in a single write.
pub fn cmd_reschedule(store: &mut JsonStore, tenant: &str, id: u64, release: String) {
    let p = require_project(store, tenant, id);
    let new_release = parse_date_arg(&release);
    let tasks = reschedule_tasks(&p.tasks, Some(new_release));
    exit_on_err(store.commit(
        tenant,
        id,
        ProjectPatch {
            release_date: Some(Some(new_release)),
            tasks: Some(tasks),
            ..ProjectPatch::default()
        },
    ));
    println!(
        "Project {} rescheduled to {}",
        id,
        format_date_display(Some(new_release))
    );
}

/// Print every dated task and release milestone, ascending by due date.
pub fn cmd_timeline(store: &JsonStore, tenant: &str) {
    let db = store.load(tenant);
    let rows = flatten_for_timeline(&db.projects);
    if rows.is_empty() {
        println!("No tasks.");
        return;
    }
    println!(
        "{:<12} {:<12} {:<9} {:<20} {:<38} {:<12} {}",
        "Due", "Start", "Kind", "Project", "Task", "Status", "Assignee"
    );
    for row in &rows {
        println!(
            "{:<12} {:<12} {:<9} {:<20} {:<38} {:<12} {}",
            format_date_display(row.due_date),
            format_date_display(row.start_date),
            match row.kind {
                FlatKind::Project => "Release",
                FlatKind::Subtask => "Subtask",
            },
            truncate(&row.project_name, 20),
            truncate(&row.task_name, 38),
            format_status(row.status),
            if row.assignee.is_empty() { "-" } else { row.assignee.as_str() },
        );
    }
}

/// Print the tasks due in one month, grouped per day.
pub fn cmd_calendar(store: &JsonStore, tenant: &str, month: Option<String>) {
    let (year, month) = match month {
        Some(s) => match parse_month_arg(&s) {
            Some(ym) => ym,
            None => {
                eprintln!("Invalid month '{}', expected YYYY-MM", s);
                std::process::exit(1);
            }
        },
        None => {
            let today = Local::now().date_naive();
            (today.year(), today.month())
        }
    };

    let db = store.load(tenant);
    let rows = flatten_for_timeline(&db.projects);
    let days = tasks_by_day(&rows, year, month);
    println!("{:04}-{:02}", year, month);
    if days.is_empty() {
        println!("  (nothing due)");
        return;
    }
    for (day, due_rows) in days {
        println!("  {}", day.format("%a %d"));
        for row in due_rows {
            println!(
                "    {} {} — {} ({})",
                match row.kind {
                    FlatKind::Project => "*",
                    FlatKind::Subtask => "-",
                },
                row.task_name,
                row.project_name,
                format_status(row.status),
            );
        }
    }
}

/// Delete a project.
pub fn cmd_delete(store: &mut JsonStore, tenant: &str, id: u64) {
    exit_on_err(store.delete(tenant, id));
    println!("Deleted project {}", id);
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

fn parse_month_arg(s: &str) -> Option<(i32, u32)> {
    let (y, m) = s.trim().split_once('-')?;
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    if (1..=12).contains(&month) {
        Some((year, month))
    } else {
        None
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_arg() {
        assert_eq!(parse_month_arg("2024-03"), Some((2024, 3)));
        assert_eq!(parse_month_arg("2024-13"), None);
        assert_eq!(parse_month_arg("march"), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long project name", 8), "a long …");
    }
}
