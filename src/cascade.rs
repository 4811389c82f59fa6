//! Status propagation between subtasks and their task group.
//!
//! Two fixed cascade rules:
//!
//! - Rule A: a subtask status edit recomputes the owning group's status from
//!   the Done count. A group that was manually put On Hold resists the
//!   recomputation unless it would become Done.
//! - Rule B: explicitly setting a group to Done force-marks every subtask
//!   Done. No other group status cascades downward.
//!
//! Project status is set only by direct user action and is never derived
//! from its groups; the asymmetry is intentional.
//!
//! Every function here is a pure computation over a snapshot of one task
//! tree: it returns a new tree and leaves the input untouched. Edits that
//! reference an index which no longer exists return `None` so a stale edit
//! is a no-op instead of a panic.

use chrono::NaiveDate;

use crate::fields::Status;
use crate::project::{Subtask, TaskGroup};

/// One editable subtask field with its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum SubtaskField {
    Assignee(String),
    Status(Status),
    StartDate(Option<NaiveDate>),
    DueDate(Option<NaiveDate>),
    Remark(String),
}

/// Rule A: group status implied by the subtask Done count, with On-Hold
/// resistance applied against the group's current status.
pub fn group_status_after_edit(current: Status, subtasks: &[Subtask]) -> Status {
    let total = subtasks.len();
    let completed = subtasks.iter().filter(|s| s.status == Status::Done).count();
    let derived = if total > 0 && completed == total {
        Status::Done
    } else if completed > 0 {
        Status::InProgress
    } else {
        Status::ToDo
    };
    // A held group only moves when it would complete.
    if current == Status::OnHold && derived != Status::Done {
        Status::OnHold
    } else {
        derived
    }
}

/// Apply one field edit to a subtask, returning the resulting task tree.
///
/// A status edit triggers the Rule A recomputation of the owning group's
/// status; edits to any other field leave group status untouched. Stale
/// indices yield `None`.
pub fn apply_subtask_edit(
    tasks: &[TaskGroup],
    group_idx: usize,
    subtask_idx: usize,
    edit: SubtaskField,
) -> Option<Vec<TaskGroup>> {
    tasks.get(group_idx)?.subtasks.get(subtask_idx)?;

    let mut tasks = tasks.to_vec();
    let group = &mut tasks[group_idx];
    let is_status_edit = matches!(edit, SubtaskField::Status(_));
    {
        let subtask = &mut group.subtasks[subtask_idx];
        match edit {
            SubtaskField::Assignee(v) => subtask.assignee = v,
            SubtaskField::Status(v) => subtask.status = v,
            SubtaskField::StartDate(v) => subtask.start_date = v,
            SubtaskField::DueDate(v) => subtask.due_date = v,
            SubtaskField::Remark(v) => subtask.remark = v,
        }
    }
    if is_status_edit {
        group.status = group_status_after_edit(group.status, &group.subtasks);
    }
    Some(tasks)
}

/// Rule B: set a group's status by direct user action, returning the
/// resulting task tree. Done cascades to every subtask in the group; any
/// other status leaves the subtasks alone. Stale indices yield `None`.
pub fn apply_group_status(
    tasks: &[TaskGroup],
    group_idx: usize,
    status: Status,
) -> Option<Vec<TaskGroup>> {
    tasks.get(group_idx)?;

    let mut tasks = tasks.to_vec();
    let group = &mut tasks[group_idx];
    group.status = status;
    if status == Status::Done {
        for subtask in &mut group.subtasks {
            subtask.status = Status::Done;
        }
    }
    Some(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::DEFAULT_COLOR;

    fn sub(name: &str, status: Status) -> Subtask {
        Subtask {
            name: name.into(),
            assignee: String::new(),
            status,
            start_date: None,
            due_date: None,
            remark: String::new(),
            color: DEFAULT_COLOR.into(),
            lead_days: 28,
            duration_days: 7,
        }
    }

    fn group(status: Status, subtasks: Vec<Subtask>) -> TaskGroup {
        TaskGroup {
            title: "Song Demo".into(),
            status,
            due_date: None,
            start_date: None,
            subtasks,
        }
    }

    #[test]
    fn test_group_climbs_todo_inprogress_done() {
        let mut tasks = vec![group(
            Status::ToDo,
            vec![sub("Demo", Status::ToDo), sub("Super Demo", Status::ToDo), sub("Master", Status::ToDo)],
        )];
        tasks = apply_subtask_edit(&tasks, 0, 0, SubtaskField::Status(Status::Done)).unwrap();
        assert_eq!(tasks[0].status, Status::InProgress);
        tasks = apply_subtask_edit(&tasks, 0, 1, SubtaskField::Status(Status::Done)).unwrap();
        assert_eq!(tasks[0].status, Status::InProgress);
        tasks = apply_subtask_edit(&tasks, 0, 2, SubtaskField::Status(Status::Done)).unwrap();
        assert_eq!(tasks[0].status, Status::Done);
    }

    #[test]
    fn test_group_reverts_to_todo_when_no_progress() {
        let mut tasks = vec![group(
            Status::InProgress,
            vec![sub("Demo", Status::Done), sub("Master", Status::ToDo)],
        )];
        tasks = apply_subtask_edit(&tasks, 0, 0, SubtaskField::Status(Status::ToDo)).unwrap();
        assert_eq!(tasks[0].status, Status::ToDo);
    }

    #[test]
    fn test_on_hold_resists_partial_progress() {
        let tasks = vec![group(
            Status::OnHold,
            vec![sub("Demo", Status::ToDo), sub("Master", Status::ToDo)],
        )];
        let tasks = apply_subtask_edit(&tasks, 0, 0, SubtaskField::Status(Status::Done)).unwrap();
        assert_eq!(tasks[0].status, Status::OnHold);
        assert_eq!(tasks[0].subtasks[0].status, Status::Done);
    }

    #[test]
    fn test_on_hold_yields_when_all_done() {
        let tasks = vec![group(
            Status::OnHold,
            vec![sub("Demo", Status::Done), sub("Master", Status::ToDo)],
        )];
        let tasks = apply_subtask_edit(&tasks, 0, 1, SubtaskField::Status(Status::Done)).unwrap();
        assert_eq!(tasks[0].status, Status::Done);
    }

    #[test]
    fn test_non_status_edit_leaves_group_status() {
        let tasks = vec![group(Status::OnHold, vec![sub("Demo", Status::ToDo)])];
        let tasks =
            apply_subtask_edit(&tasks, 0, 0, SubtaskField::Assignee("Mild".into())).unwrap();
        assert_eq!(tasks[0].status, Status::OnHold);
        assert_eq!(tasks[0].subtasks[0].assignee, "Mild");

        let tasks = apply_subtask_edit(
            &tasks,
            0,
            0,
            SubtaskField::DueDate(Some("2024-05-01".parse().unwrap())),
        )
        .unwrap();
        assert_eq!(tasks[0].status, Status::OnHold);
    }

    #[test]
    fn test_group_done_cascades_to_subtasks() {
        let tasks = vec![group(
            Status::InProgress,
            vec![
                sub("Demo", Status::Done),
                sub("Super Demo", Status::InProgress),
                sub("Master", Status::ToDo),
            ],
        )];
        let tasks = apply_group_status(&tasks, 0, Status::Done).unwrap();
        assert!(tasks[0].subtasks.iter().all(|s| s.status == Status::Done));
    }

    #[test]
    fn test_group_on_hold_does_not_cascade() {
        let tasks = vec![group(
            Status::InProgress,
            vec![sub("Demo", Status::Done), sub("Master", Status::ToDo)],
        )];
        let tasks = apply_group_status(&tasks, 0, Status::OnHold).unwrap();
        assert_eq!(tasks[0].status, Status::OnHold);
        assert_eq!(tasks[0].subtasks[0].status, Status::Done);
        assert_eq!(tasks[0].subtasks[1].status, Status::ToDo);
    }

    #[test]
    fn test_stale_indices_are_noops() {
        let tasks = vec![group(Status::ToDo, vec![sub("Demo", Status::ToDo)])];
        assert!(apply_subtask_edit(&tasks, 1, 0, SubtaskField::Status(Status::Done)).is_none());
        assert!(apply_subtask_edit(&tasks, 0, 5, SubtaskField::Remark("x".into())).is_none());
        assert!(apply_group_status(&tasks, 3, Status::Done).is_none());
    }

    #[test]
    fn test_empty_group_never_autocompletes() {
        assert_eq!(group_status_after_edit(Status::ToDo, &[]), Status::ToDo);
        assert_eq!(group_status_after_edit(Status::OnHold, &[]), Status::OnHold);
    }
}
