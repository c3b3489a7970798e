//! Configuration loader.

use std::path::Path;

use tracing::debug;

use crate::{Config, ConfigError, ConfigResult};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "unreleased.toml";

/// Loads configuration from the given path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    debug!(?path, "loading configuration");

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    Ok(config)
}

/// Finds and loads configuration from the current directory or parents.
///
/// Falls back to the built-in defaults when no file exists anywhere up the tree.
///
/// # Errors
///
/// Returns an error if a configuration file is found but cannot be parsed.
pub fn find_and_load_config() -> ConfigResult<Config> {
    let current_dir = std::env::current_dir()?;
    match find_and_load_config_from(&current_dir) {
        Err(ConfigError::NotFound(path)) => {
            debug!(?path, "no configuration file, using defaults");
            Ok(Config::default())
        }
        other => other,
    }
}

/// Finds and loads configuration starting from the given directory.
///
/// Walks up the directory tree until a configuration file is found.
///
/// # Errors
///
/// Returns an error if no configuration file is found or it cannot be parsed.
pub fn find_and_load_config_from(start_dir: impl AsRef<Path>) -> ConfigResult<Config> {
    let start_dir = start_dir.as_ref();
    let mut dir = start_dir;

    loop {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return load_config(config_path);
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    Err(ConfigError::NotFound(start_dir.join(CONFIG_FILE_NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_name() {
        assert_eq!(CONFIG_FILE_NAME, "unreleased.toml");
    }

    #[test]
    fn test_load_config_not_found() {
        let result = load_config("/nonexistent/path/unreleased.toml");
        match result {
            Err(ConfigError::NotFound(path)) => {
                assert!(path.to_string_lossy().contains("unreleased.toml"));
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_load_config_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "").unwrap();

        // Default values should be used
        let config = load_config(&config_path).unwrap();
        assert_eq!(config.github.organization, "jenkinsci");
        assert_eq!(config.github.delay_secs, 3);
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "this is not valid toml [[[").unwrap();

        assert!(matches!(
            load_config(&config_path),
            Err(ConfigError::InvalidToml(_))
        ));
    }

    #[test]
    fn test_load_config_custom_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            r#"
            [feed]
            url = "http://localhost:8080/update-center.json"

            [github]
            organization = "hudson"
            delay_secs = 0

            [issues]
            project = "HUDSON"
        "#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.feed.url, "http://localhost:8080/update-center.json");
        assert_eq!(config.github.organization, "hudson");
        assert_eq!(config.github.delay_secs, 0);
        assert_eq!(config.issues.project, "HUDSON");
        // Untouched sections keep their defaults
        assert_eq!(config.svn.command, "svn");
    }

    #[test]
    fn test_find_and_load_config_in_parent() {
        let parent_dir = TempDir::new().unwrap();
        fs::write(
            parent_dir.path().join(CONFIG_FILE_NAME),
            r#"
            [report]
            ecosystem = "Hudson"
        "#,
        )
        .unwrap();

        let child_dir = parent_dir.path().join("subdir");
        fs::create_dir(&child_dir).unwrap();

        let config = find_and_load_config_from(&child_dir).unwrap();
        assert_eq!(config.report.ecosystem, "Hudson");
    }

    #[test]
    fn test_find_and_load_config_from_missing() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        // May still find a file in a real ancestor of the temp dir; only the
        // error kind matters when nothing is found.
        if let Err(err) = find_and_load_config_from(&nested) {
            assert!(matches!(err, ConfigError::NotFound(_)));
        }
    }
}
