//! Template catalog: per-project-type definitions of task groups.
//!
//! Pure data. Each entry names a production task and, optionally, its lead
//! time (days before release), duration, and display colour; missing fields
//! fall back to catalog-wide defaults so legacy entries that were plain names
//! still expand. The catalog is an explicit value handed to the builder,
//! never a hidden global.

use serde::{Deserialize, Serialize};

use crate::fields::ProjectType;
use crate::project::DEFAULT_COLOR;

/// Catalog-wide fallback lead time in days before release.
pub const DEFAULT_LEAD_DAYS: i64 = 28;
/// Catalog-wide fallback task duration in days.
pub const DEFAULT_DURATION_DAYS: i64 = 7;

/// One named task inside a group template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub name: String,
    #[serde(default)]
    pub lead_days: Option<i64>,
    #[serde(default)]
    pub duration_days: Option<i64>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A named section inside a sectioned group ("Documents", "Audio", ...).
/// Section names become subtask-name prefixes at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub entries: Vec<TemplateEntry>,
}

/// Body of a group template: a flat run of entries, or one extra level of
/// named sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GroupContent {
    Flat(Vec<TemplateEntry>),
    Sectioned(Vec<Section>),
}

/// One task group in a project template, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupTemplate {
    pub title: String,
    pub content: GroupContent,
}

/// Ordered group templates for one project type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectTemplate {
    pub groups: Vec<GroupTemplate>,
}

/// Fallbacks applied to entries that carry no explicit metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDefaults {
    pub lead_days: i64,
    pub duration_days: i64,
    pub color: String,
}

impl Default for CatalogDefaults {
    fn default() -> Self {
        CatalogDefaults {
            lead_days: DEFAULT_LEAD_DAYS,
            duration_days: DEFAULT_DURATION_DAYS,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

/// Immutable template configuration for all project types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCatalog {
    pub defaults: CatalogDefaults,
    pub single: ProjectTemplate,
    pub album: ProjectTemplate,
    pub live_session: ProjectTemplate,
}

impl TemplateCatalog {
    /// Select the template for a project type.
    pub fn template_for(&self, project_type: ProjectType) -> &ProjectTemplate {
        match project_type {
            ProjectType::Single => &self.single,
            ProjectType::Album => &self.album,
            ProjectType::LiveSession => &self.live_session,
        }
    }

    /// The built-in production catalog.
    pub fn builtin() -> Self {
        TemplateCatalog {
            defaults: CatalogDefaults::default(),
            single: single_template(),
            album: album_template(),
            live_session: live_session_template(),
        }
    }
}

// Entry constructors. `t` leaves duration and colour to the defaults, which
// is how the legacy name-only entries behaved.
fn t(name: &str, lead_days: i64) -> TemplateEntry {
    TemplateEntry {
        name: name.to_string(),
        lead_days: Some(lead_days),
        duration_days: None,
        color: None,
    }
}

fn td(name: &str, lead_days: i64, duration_days: i64) -> TemplateEntry {
    TemplateEntry {
        duration_days: Some(duration_days),
        ..t(name, lead_days)
    }
}

fn tinted(entries: Vec<TemplateEntry>, color: &str) -> Vec<TemplateEntry> {
    entries
        .into_iter()
        .map(|e| TemplateEntry {
            color: Some(color.to_string()),
            ..e
        })
        .collect()
}

fn flat(title: &str, entries: Vec<TemplateEntry>, color: &str) -> GroupTemplate {
    GroupTemplate {
        title: title.to_string(),
        content: GroupContent::Flat(tinted(entries, color)),
    }
}

fn sectioned(title: &str, sections: Vec<(&str, Vec<TemplateEntry>)>, color: &str) -> GroupTemplate {
    GroupTemplate {
        title: title.to_string(),
        content: GroupContent::Sectioned(
            sections
                .into_iter()
                .map(|(section_title, entries)| Section {
                    title: section_title.to_string(),
                    entries: tinted(entries, color),
                })
                .collect(),
        ),
    }
}

fn single_template() -> ProjectTemplate {
    ProjectTemplate {
        groups: vec![
            flat(
                "Song Demo",
                vec![td("Demo", 60, 14), td("Super Demo", 50, 7), td("Master", 45, 5)],
                "#f472b6",
            ),
            flat(
                "Music Video Production",
                vec![
                    t("Find Director", 60),
                    td("Brief", 55, 3),
                    td("Pre-Production", 45, 10),
                    td("Shooting", 40, 2),
                    td("Post-Production", 30, 10),
                    td("Cutting and Color Check", 25, 5),
                    td("Audio Checking", 20, 3),
                ],
                "#6366f1",
            ),
            flat(
                "Songcode Request",
                vec![
                    td("Production Fee Form", 30, 2),
                    td("Songcode Form", 30, 2),
                    td("Lyrics.docx", 30, 2),
                ],
                "#f59e0b",
            ),
            sectioned(
                "Song Registration",
                vec![
                    (
                        "Documents",
                        vec![
                            td("Registration Form", 42, 3),
                            td("Shelf Form", 42, 3),
                            td("Lyrics .txt", 42, 3),
                        ],
                    ),
                    (
                        "Audio",
                        vec![
                            t("Multitrack (MLT)", 21),
                            t("Full Mix (F)", 21),
                            t("Instrumental (B)", 21),
                            t("MinusOne (M)", 21),
                            t("ACapella (V)", 21),
                            t("Tiktok Cut", 21),
                            t("Ringtone", 21),
                            t("Ring Back Tone", 21),
                        ],
                    ),
                    (
                        "Artwork",
                        vec![
                            t("Banner", 21),
                            t("Single Cover", 21),
                            t("Streaming Profile", 21),
                            t("Spotify Canvas", 21),
                        ],
                    ),
                ],
                "#34d399",
            ),
            sectioned(
                "VDO Registration",
                vec![
                    ("Teaser", vec![t("Teaser", 21)]),
                    (
                        "MV",
                        vec![t("Download", 21), t("NoSubNoPlatform", 21), t("Clean", 21)],
                    ),
                    ("Text", vec![t("Teaser", 21), t("MV", 21)]),
                    ("AW", vec![t("BHS", 21), t("Thumbnail", 21)]),
                    (
                        "MV Release",
                        vec![
                            t("Thumbnail", 21),
                            t("Title Desc", 21),
                            t("Subtitles", 21),
                            t("Debug Sharing", 21),
                        ],
                    ),
                ],
                "#60a5fa",
            ),
        ],
    }
}

fn album_template() -> ProjectTemplate {
    ProjectTemplate {
        groups: vec![
            flat(
                "Song Demo",
                vec![td("Demo", 90, 21), td("Super Demo", 75, 14), td("Master", 60, 7)],
                "#f472b6",
            ),
            flat(
                "Songcode Request",
                vec![
                    td("Production Fee Form", 45, 2),
                    td("Songcode Form", 45, 2),
                    td("Lyrics.docx", 45, 2),
                ],
                "#f59e0b",
            ),
            sectioned(
                "Song Registration",
                vec![
                    (
                        "Documents",
                        vec![
                            td("Songlist", 30, 3),
                            td("Registration Form", 30, 3),
                            td("Shelf Form", 30, 3),
                            td("Lyrics .txt", 30, 3),
                        ],
                    ),
                    (
                        "Audio",
                        vec![
                            t("Multitrack (MLT)", 30),
                            t("Full Mix (F)", 30),
                            t("Instrumental (B)", 30),
                            t("MinusOne (M)", 30),
                            t("ACapella (V)", 30),
                        ],
                    ),
                    (
                        "Artwork",
                        vec![
                            t("Banner", 21),
                            t("Album Cover", 30),
                            t("Streaming Profile", 21),
                            t("Spotify Canvas", 21),
                        ],
                    ),
                ],
                "#34d399",
            ),
        ],
    }
}

fn live_session_template() -> ProjectTemplate {
    ProjectTemplate {
        groups: vec![sectioned(
            "VDO",
            vec![
                (
                    "Checking",
                    vec![td("Cutting", 20, 5), td("Color", 15, 3), td("Sound", 15, 3)],
                ),
                (
                    "Details",
                    vec![
                        td("Thumbnail", 7, 2),
                        td("Title/Description", 7, 1),
                        td("Sharing Debugging", 3, 1),
                    ],
                ),
            ],
            "#60a5fa",
        )],
    }
}
