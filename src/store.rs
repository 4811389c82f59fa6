//! Project persistence and change notification.
//!
//! Projects for one tenant live in a single JSON file named
//! `<tenant>_projects.json` inside the data directory, written atomically
//! via temp file + rename. `JsonStore` is the repository boundary the
//! scheduling core talks to: load a snapshot, create, commit a partial
//! update, delete, and push-based subscriptions that deliver the full
//! project list (ordered by release date ascending) after every change.
//!
//! The store never retries a failed write; failures surface to the caller
//! as a `String` error and the user retries the action.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{ProjectType, Status};
use crate::project::{format_date_display, Project, TaskGroup};
use crate::schedule::build_task_structure;
use crate::template::TemplateCatalog;

/// In-memory snapshot of one tenant's projects.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    pub projects: Vec<Project>,
}

impl Database {
    /// Load from a JSON file, starting empty if the file is missing or
    /// unreadable. Projects come out ordered by release date ascending.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Database::default();
        }
        let mut buf = String::new();
        let mut db = match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("Error parsing store, starting fresh: {e}");
                    Database::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading store, starting fresh: {e}");
                Database::default()
            }
        };
        db.sort_by_release();
        db
    }

    /// Save to a JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self).expect("project tree serializes");
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Generate the next available project ID.
    pub fn next_id(&self) -> u64 {
        self.projects.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    /// Get a project by ID.
    pub fn get(&self, id: u64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Get a mutable reference to a project by ID.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// Order by release date ascending, dateless projects last, ID as the
    /// tiebreak.
    pub fn sort_by_release(&mut self) {
        self.projects
            .sort_by_key(|p| (p.release_date.unwrap_or(NaiveDate::MAX), p.id));
    }
}

/// Fields required to create a project. The task tree is synthesized from
/// the template catalog, never supplied by the caller.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub release_date: Option<NaiveDate>,
    pub artist: String,
    pub label: String,
    pub project_type: ProjectType,
}

/// Partial update of one project record. `tasks` replaces the whole tree;
/// there is no narrower group or subtask primitive. Patching the release
/// date also refreshes its derived display form.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub status: Option<Status>,
    pub remark: Option<String>,
    pub release_date: Option<Option<NaiveDate>>,
    pub tasks: Option<Vec<TaskGroup>>,
}

impl ProjectPatch {
    fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(remark) = self.remark {
            project.remark = remark;
        }
        if let Some(release_date) = self.release_date {
            project.release_date = release_date;
            project.release_date_display = format_date_display(release_date);
        }
        if let Some(tasks) = self.tasks {
            project.tasks = tasks;
        }
    }
}

/// Handle returned by [`JsonStore::subscribe`].
pub type SubscriptionId = u64;

/// Callback invoked with the tenant's full, ordered project list.
pub type ChangeCallback = Box<dyn FnMut(&[Project])>;

struct Subscriber {
    id: SubscriptionId,
    tenant: String,
    callback: ChangeCallback,
}

/// File-backed project repository with push-based change notification.
pub struct JsonStore {
    dir: PathBuf,
    catalog: TemplateCatalog,
    subscribers: Vec<Subscriber>,
    next_subscription: SubscriptionId,
}

impl JsonStore {
    pub fn new(dir: PathBuf, catalog: TemplateCatalog) -> Self {
        JsonStore {
            dir,
            catalog,
            subscribers: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Storage path for a tenant's project file.
    pub fn tenant_path(&self, tenant: &str) -> PathBuf {
        self.dir
            .join(format!("{}_projects.json", sanitize_tenant(tenant)))
    }

    /// Load the current snapshot for a tenant.
    pub fn load(&self, tenant: &str) -> Database {
        Database::load(&self.tenant_path(tenant))
    }

    /// Register for pushes of the tenant's full, ordered project list. The
    /// current snapshot is delivered immediately, then again after every
    /// change, until [`JsonStore::unsubscribe`] is called with the returned
    /// handle.
    pub fn subscribe(&mut self, tenant: &str, mut on_change: ChangeCallback) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        let db = self.load(tenant);
        on_change(&db.projects);
        self.subscribers.push(Subscriber {
            id,
            tenant: tenant.to_string(),
            callback: on_change,
        });
        id
    }

    /// Tear down a subscription. No further callbacks after this returns.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|s| s.id != id);
    }

    /// Create a project from its required fields, expanding the template
    /// catalog into the full dated task tree. Missing required fields are
    /// rejected before anything is built or written.
    pub fn create(&mut self, tenant: &str, data: NewProject) -> Result<u64, String> {
        if data.name.trim().is_empty() {
            return Err("Project name cannot be empty".into());
        }
        if data.artist.trim().is_empty() {
            return Err("Artist cannot be empty".into());
        }
        if data.label.trim().is_empty() {
            return Err("Label cannot be empty".into());
        }
        let release_date = match data.release_date {
            Some(d) => d,
            None => return Err("Release date is required".into()),
        };

        let tasks = build_task_structure(&self.catalog, data.project_type, Some(release_date));
        let mut db = self.load(tenant);
        let id = db.next_id();
        db.projects.push(Project {
            id,
            name: data.name.trim().to_string(),
            release_date: Some(release_date),
            release_date_display: format_date_display(Some(release_date)),
            artist: data.artist.trim().to_string(),
            label: data.label.trim().to_string(),
            project_type: data.project_type,
            status: Status::ToDo,
            remark: String::new(),
            tasks,
            created_at_utc: Utc::now().timestamp(),
        });
        self.persist_and_notify(tenant, db)?;
        Ok(id)
    }

    /// Apply a partial update to exactly one project.
    pub fn commit(&mut self, tenant: &str, project_id: u64, patch: ProjectPatch) -> Result<(), String> {
        let mut db = self.load(tenant);
        match db.get_mut(project_id) {
            Some(project) => patch.apply(project),
            None => return Err(format!("Project with ID {} not found", project_id)),
        }
        self.persist_and_notify(tenant, db)
    }

    /// Remove a project and everything it owns.
    pub fn delete(&mut self, tenant: &str, project_id: u64) -> Result<(), String> {
        let mut db = self.load(tenant);
        let before = db.projects.len();
        db.projects.retain(|p| p.id != project_id);
        if db.projects.len() == before {
            return Err(format!("Project with ID {} not found", project_id));
        }
        self.persist_and_notify(tenant, db)
    }

    fn persist_and_notify(&mut self, tenant: &str, mut db: Database) -> Result<(), String> {
        db.sort_by_release();
        db.save(&self.tenant_path(tenant))
            .map_err(|e| format!("Failed to save store: {e}"))?;
        for sub in self.subscribers.iter_mut().filter(|s| s.tenant == tenant) {
            (sub.callback)(&db.projects);
        }
        Ok(())
    }
}

/// Convert a tenant identifier to a safe file-name stem. Lowercases and
/// collapses any non-alphanumeric runs to single underscores.
pub fn sanitize_tenant(tenant: &str) -> String {
    tenant
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
