use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::ParseEnumError;

/// A unit of billable work for a client.
///
/// `client` is a free-text name, not a foreign key; the aggregation path
/// matches it case-insensitively against [`super::Client::name`].
/// `progress` is conventionally 0..=100 but the store does not clamp it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub client: String,
    pub budget: f64,
    pub deadline: String,
    pub progress: f64,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            // A record rehydrated without an id gets a fresh one here.
            id: Uuid::new_v4(),
            name: String::new(),
            client: String::new(),
            budget: 0.0,
            deadline: "TBD".to_string(),
            progress: 0.0,
        }
    }
}

impl Project {
    /// Status derived from progress. Not persisted.
    #[must_use]
    pub fn status(&self) -> ProjectStatus {
        if self.progress >= 100.0 {
            ProjectStatus::Completed
        } else if self.progress > 0.0 {
            ProjectStatus::InProgress
        } else {
            ProjectStatus::Planning
        }
    }
}

/// The three derived progress buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Completed,
}

impl ProjectStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planning" => Ok(Self::Planning),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

/// Input for creating a project.
///
/// Numeric fields arrive as free text and are coerced at the add
/// boundary: non-numeric input becomes 0, never an error.
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub id: Option<Uuid>,
    pub name: String,
    pub client: String,
    pub budget: Option<String>,
    pub deadline: Option<String>,
    pub progress: Option<String>,
}

/// Partial update merged into an existing project by id.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub client: Option<String>,
    pub budget: Option<f64>,
    pub deadline: Option<String>,
    pub progress: Option<f64>,
}
