use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid include pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

/// Grammar knobs, mirrored onto the engine's `GrammarOptions` by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarSettings {
    pub max_heading_level: usize,
    pub memoize_inline: bool,
}

impl Default for GrammarSettings {
    fn default() -> Self {
        Self {
            max_heading_level: 6,
            memoize_inline: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub notes_path: PathBuf,
    /// Glob, relative to `notes_path`, selecting the files to parse.
    #[serde(default = "default_include")]
    pub include: String,
    #[serde(default)]
    pub grammar: GrammarSettings,
}

fn default_include() -> String {
    "**/*.md".to_string()
}

impl Config {
    pub fn new(notes_path: impl Into<PathBuf>) -> Self {
        Self {
            notes_path: notes_path.into(),
            include: default_include(),
            grammar: GrammarSettings::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded notes path
        config.notes_path = Self::expand_path(&config.notes_path).unwrap_or(config.notes_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/textmarkup");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Files under `root` matching the include pattern, sorted.
    ///
    /// Unreadable entries are skipped.
    pub fn matching_files(&self, root: &Path) -> Result<Vec<PathBuf>, ConfigError> {
        let pattern = root.join(&self.include);
        let pattern = pattern.to_string_lossy();
        let entries = glob::glob(&pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: self.include.clone(),
            source,
        })?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .collect();
        files.sort();
        Ok(files)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/textmarkup/config.toml"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            notes_path: PathBuf::from("/tmp/test-notes"),
            include: "journal/*.md".to_string(),
            grammar: GrammarSettings {
                max_heading_level: 3,
                memoize_inline: false,
            },
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original.notes_path, deserialized.notes_path);
        assert_eq!(original.include, deserialized.include);
        assert_eq!(original.grammar, deserialized.grammar);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let config: Config = toml::from_str(r#"notes_path = "/notes""#).unwrap();

        assert_eq!(config.include, "**/*.md");
        assert_eq!(config.grammar, GrammarSettings::default());
    }

    #[test]
    fn test_partial_grammar_table() {
        let config_content = r#"
notes_path = "/notes"

[grammar]
max_heading_level = 2
"#;
        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(config.grammar.max_heading_level, 2);
        assert!(config.grammar.memoize_inline);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("TEXTMARKUP_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$TEXTMARKUP_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/subdir")));

        unsafe {
            env::remove_var("TEXTMARKUP_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_absolute_path() {
        let path = PathBuf::from("/absolute/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "notes_path = [").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let test_config = Config::new("/tmp/test-notes");

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config.notes_path, test_config.notes_path);
        assert_eq!(loaded_config.include, test_config.include);
    }

    #[test]
    fn test_matching_files_uses_include_glob() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("journal")).unwrap();
        std::fs::write(root.join("index.md"), "# Index\n").unwrap();
        std::fs::write(root.join("journal/today.md"), "- item\n").unwrap();
        std::fs::write(root.join("journal/notes.txt"), "plain").unwrap();

        let config = Config::new(root);
        let files = config.matching_files(root).unwrap();
        assert_eq!(files, vec![root.join("index.md"), root.join("journal/today.md")]);

        let journal_only = Config {
            include: "journal/*.md".to_string(),
            ..Config::new(root)
        };
        assert_eq!(
            journal_only.matching_files(root).unwrap(),
            vec![root.join("journal/today.md")]
        );
    }

    #[test]
    fn test_invalid_include_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            include: "[".to_string(),
            ..Config::new(temp_dir.path())
        };

        let err = config.matching_files(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }
}
