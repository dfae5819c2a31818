use serde::{Deserialize, Serialize};

use super::priority::Priority;
use super::project::{Project, ProjectStatus};
use super::ParseEnumError;

/// Active project filters. The default value matches every project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    /// Case-insensitive substring matched against name and description
    #[serde(default)]
    pub search: String,
}

/// Partial update to [`FilterCriteria`]; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub status: Option<Option<ProjectStatus>>,
    pub priority: Option<Option<Priority>>,
    pub search: Option<String>,
}

impl FilterCriteria {
    pub fn is_default(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.search.is_empty()
    }

    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(search) = patch.search {
            self.search = search;
        }
    }

    /// True when the project satisfies every active predicate
    pub fn matches(&self, project: &Project) -> bool {
        if let Some(status) = self.status
            && project.status != status
        {
            return false;
        }
        if let Some(priority) = self.priority
            && project.priority != priority
        {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        project.name.to_lowercase().contains(&needle)
            || project.description.to_lowercase().contains(&needle)
    }
}

impl FilterPatch {
    pub fn status(mut self, status: Option<ProjectStatus>) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

/// Parse a filter value where `all` (or empty) means "no filter".
pub fn parse_filter_value<T>(value: &str) -> Result<Option<T>, ParseEnumError>
where
    T: std::str::FromStr<Err = ParseEnumError>,
{
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}
