//! # relpm - Music-Release Project Management CLI
//!
//! Tracks release projects (singles, albums, live sessions), expands a
//! per-type template into a dated tree of task groups and subtasks anchored
//! to the release date, and keeps statuses consistent as edits land.
//!
//! ## Key features
//!
//! - **Template-driven scheduling**: every project type carries a catalog of
//!   production tasks with lead times and durations; task deadlines are
//!   computed backward from the release date.
//! - **Status cascades**: subtask edits roll up into group status, a group
//!   marked Done rolls down to its subtasks, and a held group resists
//!   partial progress.
//! - **Rescheduling**: moving the release date re-derives each task's dates
//!   from its own offsets.
//! - **Views**: project list, per-day calendar, and a flattened timeline of
//!   every dated task and release milestone.
//! - **Local file storage**: one JSON file per tenant under `~/.relpm`,
//!   written atomically.
//!
//! ## Quick start
//!
//! ```bash
//! relpm add "Moondance" --release 2024-06-01 --artist Mirrr --label KruengKao --type single
//! relpm list
//! relpm view 1
//! relpm edit 1 0 0 --status done --assignee "P'Aom"
//! relpm reschedule 1 2024-06-15
//! relpm timeline
//! relpm calendar --month 2024-05
//! ```

use std::path::PathBuf;

use clap::Parser;

pub mod cascade;
pub mod cli;
pub mod cmd;
pub mod fields;
pub mod project;
pub mod schedule;
pub mod store;
pub mod template;
pub mod views;

use cli::Cli;
use cmd::*;
use store::JsonStore;
use template::TemplateCatalog;

fn main() {
    let cli = Cli::parse();

    let dir = cli.dir.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".relpm")
    });
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Failed to create data directory {}: {}", dir.display(), e);
        std::process::exit(1);
    }

    let mut store = JsonStore::new(dir, TemplateCatalog::builtin());
    let tenant = cli.tenant;

    match cli.command {
        Commands::Add {
            name,
            release,
            artist,
            label,
            project_type,
        } => cmd_add(&mut store, &tenant, name, release, artist, label, project_type),

        Commands::List => cmd_list(&store, &tenant),

        Commands::View { id } => cmd_view(&store, &tenant, id),

        Commands::SetStatus { id, status } => cmd_set_status(&mut store, &tenant, id, status),

        Commands::Remark { id, remark } => cmd_remark(&mut store, &tenant, id, remark),

        Commands::GroupStatus { id, group, status } => {
            cmd_group_status(&mut store, &tenant, id, group, status)
        }

        Commands::Edit {
            id,
            group,
            subtask,
            assignee,
            status,
            due,
            start,
            remark,
            clear_due,
            clear_start,
        } => cmd_edit(
            &mut store, &tenant, id, group, subtask, assignee, status, due, start, remark,
            clear_due, clear_start,
        ),

        Commands::Reschedule { id, release } => cmd_reschedule(&mut store, &tenant, id, release),

        Commands::Timeline => cmd_timeline(&store, &tenant),

        Commands::Calendar { month } => cmd_calendar(&store, &tenant, month),

        Commands::Delete { id } => cmd_delete(&mut store, &tenant, id),

        Commands::Completions { shell } => cmd_completions(shell),
    }
}
