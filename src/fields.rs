//! Enumerations and field types for release projects.
//!
//! This module defines the status and project-type enums shared by projects,
//! task groups, and subtasks, plus their display helpers. Serde
//! representations match the persisted wire strings ("To do", "Live Session"
//! and so on), while clap accepts the kebab-case forms on the command line.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Workflow status shared by projects, task groups, and subtasks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
pub enum Status {
    #[serde(rename = "To do")]
    ToDo,
    #[serde(rename = "In progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
    #[serde(rename = "On Hold")]
    OnHold,
}

/// Kind of release a project represents. Selects the task template.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
pub enum ProjectType {
    #[serde(rename = "Single")]
    Single,
    #[serde(rename = "Album")]
    Album,
    #[serde(rename = "Live Session")]
    LiveSession,
}

/// Format a status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::ToDo => "To do",
        Status::InProgress => "In progress",
        Status::Done => "Done",
        Status::OnHold => "On Hold",
    }
}

/// Format a project type for display.
pub fn format_project_type(t: ProjectType) -> &'static str {
    match t {
        ProjectType::Single => "Single",
        ProjectType::Album => "Album",
        ProjectType::LiveSession => "Live Session",
    }
}
