//! Project records, listing, and operator selection

pub mod lister;
pub mod selector;

pub use lister::ProjectLister;
pub use selector::{AutoSelector, InteractiveSelector, ProjectSelector};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One active project as returned by the project-management API.
///
/// Ephemeral: fetched fresh each run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    /// Label shown in selection prompts and progress output
    pub fn display_label(&self) -> String {
        format!(
            "{} - {} (Updated At: {})",
            self.id,
            self.name,
            self.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
