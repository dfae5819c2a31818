use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::DataConfig;
use crate::model::project::Project;
use crate::model::task::Task;

const BUNDLED_PROJECTS: &str = include_str!("../../data/projects.json");
const BUNDLED_TASKS: &str = include_str!("../../data/tasks.json");

/// Error type for loading the mock data source
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {what}: {source}")]
    ParseError {
        what: String,
        source: serde_json::Error,
    },
}

/// The static collections served by the gateway
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockData {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
}

impl MockData {
    /// The data compiled into the binary
    pub fn bundled() -> Result<Self, DataError> {
        Ok(MockData {
            projects: parse_json(BUNDLED_PROJECTS, "bundled projects.json")?,
            tasks: parse_json(BUNDLED_TASKS, "bundled tasks.json")?,
        })
    }

    /// Bundled data with the overrides from `config` applied. Relative
    /// override paths resolve against `base_dir`.
    pub fn load(config: &DataConfig, base_dir: &Path) -> Result<Self, DataError> {
        let mut data = Self::bundled()?;
        if let Some(path) = &config.projects {
            data.projects = read_json_file(&base_dir.join(path))?;
        }
        if let Some(path) = &config.tasks {
            data.tasks = read_json_file(&base_dir.join(path))?;
        }
        Ok(data)
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(text: &str, what: &str) -> Result<T, DataError> {
    serde_json::from_str(text).map_err(|source| DataError::ParseError {
        what: what.to_string(),
        source,
    })
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let text = fs::read_to_string(path).map_err(|source| DataError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&text, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskStatus;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_bundled_data_parses() {
        let data = MockData::bundled().unwrap();
        assert_eq!(data.projects.len(), 5);
        assert_eq!(data.tasks.len(), 12);
    }

    #[test]
    fn test_bundled_ids_unique_and_tasks_reference_projects() {
        let data = MockData::bundled().unwrap();
        let project_ids: HashSet<_> = data.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(project_ids.len(), data.projects.len());
        let task_ids: HashSet<_> = data.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(task_ids.len(), data.tasks.len());
        assert!(data.tasks.iter().all(|t| project_ids.contains(t.project_id.as_str())));
    }

    #[test]
    fn test_blank_assignee_in_bundle_is_unassigned() {
        let data = MockData::bundled().unwrap();
        let t = data.tasks.iter().find(|t| t.id == "4").unwrap();
        assert_eq!(t.assignee, None);
        assert_eq!(t.status, TaskStatus::Todo);
    }

    #[test]
    fn test_override_relative_to_base_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("mine.json"),
            r#"[{"id":"x1","name":"Only","status":"active","priority":"low"}]"#,
        )
        .unwrap();
        let config = DataConfig {
            projects: Some(PathBuf::from("mine.json")),
            tasks: None,
        };
        let data = MockData::load(&config, tmp.path()).unwrap();
        assert_eq!(data.projects.len(), 1);
        assert_eq!(data.projects[0].id, "x1");
        assert_eq!(data.tasks.len(), 12);
    }

    #[test]
    fn test_missing_override_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let config = DataConfig {
            projects: None,
            tasks: Some(PathBuf::from("nope.json")),
        };
        let err = MockData::load(&config, tmp.path()).unwrap_err();
        assert!(matches!(err, DataError::ReadError { .. }));
    }

    #[test]
    fn test_malformed_override_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.json"), "{not json").unwrap();
        let config = DataConfig {
            projects: Some(PathBuf::from("bad.json")),
            tasks: None,
        };
        let err = MockData::load(&config, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
