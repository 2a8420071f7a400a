//! Configuration file support for project-common.
//!
//! Provides YAML-based defaults through `project-common.config.yml` files:
//! the console quit word and debug notices, the file encoding and append
//! mode, and the database connection settings.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::adapters::outbound::console::{ConsoleOptions, StderrDiagnosticSink};
use crate::adapters::outbound::database::SqlRequestTemplate;
use crate::adapters::outbound::filesystem::{
    FileReaderTemplate, FileWriterTemplate, TextEncoding,
};
use crate::ports::outbound::DiagnosticSink;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "project-common.config.yml";

const DEFAULT_ENCODING: &str = "UTF-8";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub console: Option<ConsoleSection>,
    pub file: Option<FileSection>,
    pub database: Option<DatabaseSection>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// `console:` section.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConsoleSection {
    pub quit_word: Option<String>,
    pub debug: Option<bool>,
}

/// `file:` section, shared by the reader and writer templates.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct FileSection {
    pub encoding: Option<String>,
    pub append: Option<bool>,
}

/// `database:` section.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSection {
    pub url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl From<&ConsoleSection> for ConsoleOptions {
    fn from(section: &ConsoleSection) -> Self {
        let defaults = ConsoleOptions::default();
        ConsoleOptions::new(
            section
                .quit_word
                .clone()
                .unwrap_or_else(|| defaults.quit_word().to_string()),
            section.debug.unwrap_or(defaults.debug()),
        )
    }
}

impl FileSection {
    pub fn encoding(&self) -> &str {
        self.encoding.as_deref().unwrap_or(DEFAULT_ENCODING)
    }

    pub fn reader_for(&self, path: impl AsRef<Path>) -> FileReaderTemplate {
        FileReaderTemplate::new(path, self.encoding())
    }

    pub fn writer_for(&self, path: impl AsRef<Path>) -> FileWriterTemplate {
        FileWriterTemplate::new(path, self.encoding(), self.append.unwrap_or(false))
    }
}

impl DatabaseSection {
    pub fn template(&self) -> SqlRequestTemplate {
        SqlRequestTemplate::new(&self.url, &self.user, &self.password)
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref console) = config.console {
        if console.quit_word.as_deref() == Some("") {
            bail!(
                "Invalid config: console.quit_word must not be empty.\n\n\
                 💡 Hint: Remove the field to use the default quit word \"q\"."
            );
        }
    }
    if let Some(label) = config.file.as_ref().and_then(|file| file.encoding.as_deref()) {
        TextEncoding::for_label(label).with_context(|| {
            format!(
                "Invalid config: file.encoding '{}' is not a known encoding.\n\n\
                 💡 Hint: Use a label such as \"UTF-8\", \"Shift_JIS\" or \"EUC-JP\".",
                label
            )
        })?;
    }
    if let Some(ref database) = config.database {
        if database.url.trim().is_empty() {
            bail!(
                "Invalid config: database.url must not be empty.\n\n\
                 💡 Hint: Use a SQLite URL such as \"jdbc:sqlite:app.db\"."
            );
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let sink = StderrDiagnosticSink::new();
    for key in config.unknown_fields.keys() {
        sink.report(&format!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
console:
  quit_word: exit
  debug: false
file:
  encoding: Shift_JIS
  append: true
database:
  url: "jdbc:sqlite:shop.db"
  user: admin
  password: secret
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        let console = config.console.unwrap();
        assert_eq!(console.quit_word.as_deref(), Some("exit"));
        assert_eq!(console.debug, Some(false));
        let file = config.file.unwrap();
        assert_eq!(file.encoding(), "Shift_JIS");
        assert_eq!(file.append, Some(true));
        let database = config.database.unwrap();
        assert_eq!(database.url, "jdbc:sqlite:shop.db");
        assert_eq!(database.user, "admin");
        assert_eq!(database.password, "secret");
        assert!(config.unknown_fields.is_empty());
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"
console:
  debug: true
"#,
        )
        .unwrap();

        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_some());
        let console = config.unwrap().console.unwrap();
        assert_eq!(console.debug, Some(true));
        assert!(console.quit_word.is_none());
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        assert!(result.is_err());
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let result = load_config_from_path(&config_path);
        assert!(result.is_err());
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_empty_quit_word_validation_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
console:
  quit_word: ""
"#,
        )
        .unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("must not be empty"));
    }

    #[test]
    fn test_unknown_encoding_validation_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
file:
  encoding: klingon-8
"#,
        )
        .unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("klingon-8"));
        assert!(err.contains("Hint"));
    }

    #[test]
    fn test_empty_database_url_validation_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
database:
  url: "  "
"#,
        )
        .unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("database.url"));
    }

    #[test]
    fn test_unknown_fields_warning() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
console:
  debug: false
logging: verbose
another_unknown: value
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.unknown_fields.len(), 2);
        assert!(config.unknown_fields.contains_key("logging"));
        assert!(config.unknown_fields.contains_key("another_unknown"));
    }

    #[test]
    fn test_console_options_from_section() {
        let options = ConsoleOptions::from(&ConsoleSection {
            quit_word: Some("end".to_string()),
            debug: None,
        });
        assert_eq!(options.quit_word(), "end");
        assert!(options.debug());

        let defaults = ConsoleOptions::from(&ConsoleSection::default());
        assert_eq!(defaults, ConsoleOptions::default());
    }

    #[test]
    fn test_file_section_builds_templates() {
        let section = FileSection {
            encoding: None,
            append: Some(true),
        };
        let reader = section.reader_for("in.txt");
        assert_eq!(reader.encoding(), "UTF-8");
        assert_eq!(reader.path(), Path::new("in.txt"));

        let writer = section.writer_for("out.txt");
        assert_eq!(writer.encoding(), "UTF-8");
        assert!(writer.is_append());
    }

    #[test]
    fn test_database_section_builds_template() {
        let section = DatabaseSection {
            url: ":memory:".to_string(),
            user: "admin".to_string(),
            password: String::new(),
        };
        let template = section.template();
        assert_eq!(template.url(), ":memory:");
        assert_eq!(template.user(), "admin");
    }

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert!(config.console.is_none());
        assert!(config.file.is_none());
        assert!(config.database.is_none());
        assert!(config.unknown_fields.is_empty());
    }
}
