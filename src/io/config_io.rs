use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::model::view::{Grouping, SortKey, ViewConfig, default_expanded_groups};
use crate::ops::dragdrop::DropPermissions;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "roster.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// User-level configuration, read at startup and never written back.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub server: ServerConfig,
    pub view: ViewDefaults,
    pub drag_drop: DropPermissions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub url: String,
    /// Ask the server for structured payloads instead of text listings
    pub structured: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            url: "http://localhost:8080".to_string(),
            structured: false,
        }
    }
}

/// Startup defaults for the view configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ViewDefaults {
    pub grouping: Grouping,
    pub sorting: SortKey,
    pub sort_ascending: bool,
    pub show_completed: bool,
    pub show_empty_groups: bool,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        let view = ViewConfig::default();
        ViewDefaults {
            grouping: view.grouping,
            sorting: view.sorting,
            sort_ascending: view.sort_ascending,
            show_completed: view.show_completed,
            show_empty_groups: view.show_empty_groups,
        }
    }
}

impl ViewDefaults {
    /// Seed a full view configuration, including the groups that start
    /// expanded under the configured grouping
    pub fn to_view_config(&self) -> ViewConfig {
        ViewConfig {
            grouping: self.grouping,
            sorting: self.sorting,
            sort_ascending: self.sort_ascending,
            show_completed: self.show_completed,
            show_empty_groups: self.show_empty_groups,
            expanded: default_expanded_groups(self.grouping),
            filter: Default::default(),
        }
    }
}

/// Read configuration from `path`. A missing file yields the defaults; a
/// present but malformed file is an error.
pub fn read_config(path: &Path) -> Result<RosterConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(RosterConfig::default());
    }
    let raw = fs::read_to_string(path)?;
    let config = toml::from_str(&raw)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = read_config(Path::new("/nonexistent/roster.toml")).unwrap();
        assert_eq!(config.server.url, "http://localhost:8080");
        assert!(!config.server.structured);
        assert!(config.drag_drop.status_change);
        assert_eq!(config.view.grouping, Grouping::ByStatus);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
url = "http://tasks.example:9000"

[view]
grouping = "by-priority"
show-completed = false

[drag_drop]
create-dependency = false
"#
        )
        .unwrap();

        let config = read_config(file.path()).unwrap();
        assert_eq!(config.server.url, "http://tasks.example:9000");
        assert_eq!(config.view.grouping, Grouping::ByPriority);
        assert!(!config.view.show_completed);
        assert!(!config.drag_drop.create_dependency);
        assert!(config.drag_drop.make_subtask);

        let view = config.view.to_view_config();
        assert!(view.expanded.contains("yuksek"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[server\nurl=").unwrap();
        assert!(matches!(
            read_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
