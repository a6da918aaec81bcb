//! Configuration management for imagelabel using the prefer crate.
//!
//! Settings are layered: built-in defaults, then a config file, then
//! environment variables, then command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::util::{redact_url_password, validate_database_url};
use crate::repository::{DbContext, DieselError, Repositories};

/// Default database filename.
pub const DEFAULT_DATABASE_FILENAME: &str = "imagelabel.db";

/// Default label vocabulary.
pub const DEFAULT_LABELS: &[&str] = &["funny", "dull"];

/// Default image file extensions.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg"];

/// Default images subdirectory name.
const IMAGES_SUBDIR: &str = "images";

/// Environment variable prefix.
const ENV_PREFIX: &str = "IMAGELABEL_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {format} config {}: {message}", path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
    #[error("{0}")]
    UnsupportedDatabase(String),
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename, relative to `data_dir` unless absolute.
    pub database_filename: String,
    /// Database URL (overrides data_dir/database_filename if set).
    pub database_url: Option<String>,
    /// Directory scanned for images.
    pub image_dir: PathBuf,
    /// Label vocabulary offered to annotators.
    pub labels: Vec<String>,
    /// File extensions treated as images.
    pub image_extensions: Vec<String>,
    /// Log every repository operation.
    pub db_echo: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("imagelabel");

        Self {
            image_dir: data_dir.join(IMAGES_SUBDIR),
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            database_url: None,
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            db_echo: false,
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            image_dir: data_dir.join(IMAGES_SUBDIR),
            data_dir,
            ..Default::default()
        }
    }

    /// Get the database URL, constructing from path if not explicitly set.
    pub fn database_url(&self) -> String {
        if let Some(ref url) = self.database_url {
            url.clone()
        } else {
            format!("sqlite:{}", self.database_path().display())
        }
    }

    /// Get the full path to the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }

    /// Ensure the data and image directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        let db_dir = self
            .database_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.data_dir.clone());

        for (dir, label) in [
            (&self.data_dir, "data"),
            (&db_dir, "database"),
            (&self.image_dir, "image"),
        ] {
            fs::create_dir_all(dir).map_err(|e| {
                std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create {} directory '{}': {}",
                        label,
                        dir.display(),
                        e
                    ),
                )
            })?;
        }
        Ok(())
    }

    /// Create a database context using the configured database URL or path.
    pub fn create_db_context(&self) -> Result<DbContext, DieselError> {
        DbContext::from_url(&self.database_url())
    }

    /// Create the repository bundle for this database.
    pub fn repositories(&self) -> Result<Repositories, DieselError> {
        Ok(Repositories::new(self.create_db_context()?))
    }

    /// Apply `IMAGELABEL_*` and `DATABASE_URL` overrides from `lookup`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name)).filter(|v| !v.trim().is_empty())
        };

        if let Some(dir) = var("DATA_DIR") {
            let data_dir = expand_path(&dir);
            if self.image_dir == self.data_dir.join(IMAGES_SUBDIR) {
                self.image_dir = data_dir.join(IMAGES_SUBDIR);
            }
            self.data_dir = data_dir;
        }
        if let Some(path) = var("DB_PATH") {
            self.database_filename = expand_path(&path).display().to_string();
        }
        if let Some(dir) = var("IMAGE_DIR") {
            self.image_dir = expand_path(&dir);
        }
        if let Some(labels) = var("LABELS") {
            self.labels = split_list(&labels);
        }
        if let Some(extensions) = var("IMAGE_EXTENSIONS") {
            self.image_extensions = split_list(&extensions);
        }
        if let Some(echo) = var("DB_ECHO") {
            self.db_echo = matches!(
                echo.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "debug"
            );
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
            tracing::debug!(
                "Using DATABASE_URL from environment: {}",
                redact_url_password(&url)
            );
            self.database_url = Some(url);
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn expand_path(path_str: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path_str).as_ref())
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Database filename or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Directory containing the images to label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_dir: Option<String>,
    /// Label vocabulary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_extensions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_echo: Option<bool>,

    /// Path the config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer for discovery.
    ///
    /// Looks for imagelabel config files in the standard locations. A file
    /// that cannot be parsed is reported and ignored.
    pub async fn load() -> Self {
        match prefer::load("imagelabel").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Ignoring config file: {}", e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Format is picked by extension: TOML, YAML, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_error = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| parse_error("TOML", e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).map_err(|e| parse_error("YAML", e.to_string()))?
            }
            _ => serde_json::from_str(&contents).map_err(|e| parse_error("JSON", e.to_string()))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved against `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let path = expand_path(path_str);
        if path.is_absolute() {
            path
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
            settings.image_dir = settings.data_dir.join(IMAGES_SUBDIR);
        }
        if let Some(ref database) = self.database {
            settings.database_filename = expand_path(database).display().to_string();
        }
        if let Some(ref image_dir) = self.image_dir {
            settings.image_dir = self.resolve_path(image_dir, base_dir);
        }
        if let Some(ref labels) = self.labels {
            settings.labels = labels.clone();
        }
        if let Some(ref extensions) = self.image_extensions {
            settings.image_extensions = extensions.clone();
        }
        if let Some(echo) = self.db_echo {
            settings.db_echo = echo;
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Data directory or database file (--data flag).
    pub data: Option<PathBuf>,
    /// Image directory (--images flag).
    pub images: Option<PathBuf>,
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

fn is_db_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "db" || ext == "sqlite" || ext == "sqlite3")
        || path.is_file()
}

/// Look for a config file in the data directory.
fn find_config_in_data_dir(data_dir: &Path) -> Option<PathBuf> {
    ["toml", "yaml", "yml", "json"]
        .iter()
        .map(|ext| data_dir.join(format!("imagelabel.{}", ext)))
        .find(|path| path.exists())
}

async fn load_file_config(
    options: &LoadOptions,
    data_dir: Option<&Path>,
) -> Result<Config, ConfigError> {
    // Priority 1: explicit --config flag
    if let Some(ref config_path) = options.config_path {
        return Config::load_from_path(config_path).await;
    }

    // Priority 2: config inside the data dir
    if let Some(config_path) = data_dir.and_then(find_config_in_data_dir) {
        tracing::debug!("Found config in data dir: {}", config_path.display());
        return Config::load_from_path(&config_path).await;
    }

    // Priority 3: auto-discover via prefer
    Ok(Config::load().await)
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), ConfigError> {
    load_settings_with_env(options, |name| std::env::var(name).ok()).await
}

async fn load_settings_with_env(
    options: LoadOptions,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(Settings, Config), ConfigError> {
    // --data may name the database file or the directory holding it
    let data = options.data.as_deref().map(absolute);
    let (data_dir_override, db_file_override) = match data {
        Some(path) if is_db_file(&path) => {
            let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            let file = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(DEFAULT_DATABASE_FILENAME)
                .to_string();
            (Some(dir), Some(file))
        }
        Some(path) => (Some(path), None),
        None => (None, None),
    };

    let config = load_file_config(&options, data_dir_override.as_deref()).await?;

    let mut settings = Settings::default();
    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    config.apply_to_settings(&mut settings, &base_dir);

    settings.apply_env(lookup);

    // Command-line flags take precedence over everything else
    if let Some(data_dir) = data_dir_override {
        if settings.image_dir == settings.data_dir.join(IMAGES_SUBDIR) {
            settings.image_dir = data_dir.join(IMAGES_SUBDIR);
        }
        settings.data_dir = data_dir;
    }
    if let Some(file) = db_file_override {
        settings.database_filename = file;
    }
    if let Some(ref images) = options.images {
        settings.image_dir = absolute(images);
    }

    validate_database_url(&settings.database_url()).map_err(ConfigError::UnsupportedDatabase)?;

    Ok((settings, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::with_data_dir(PathBuf::from("/srv/labels"));
        assert_eq!(settings.image_dir, PathBuf::from("/srv/labels/images"));
        assert_eq!(
            settings.database_url(),
            "sqlite:/srv/labels/imagelabel.db".to_string()
        );
        assert_eq!(settings.labels, vec!["funny", "dull"]);
        assert_eq!(settings.image_extensions, vec!["jpg"]);
        assert!(!settings.db_echo);
    }

    #[test]
    fn test_absolute_database_filename_wins() {
        let mut settings = Settings::with_data_dir(PathBuf::from("/srv/labels"));
        settings.database_filename = "/var/db/other.db".to_string();
        assert_eq!(settings.database_path(), PathBuf::from("/var/db/other.db"));
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::with_data_dir(PathBuf::from("/srv/labels"));
        settings.apply_env(env(&[
            ("IMAGELABEL_DATA_DIR", "/data"),
            ("IMAGELABEL_LABELS", "cute, scary ,,boring"),
            ("IMAGELABEL_IMAGE_EXTENSIONS", "jpg,png"),
            ("IMAGELABEL_DB_ECHO", "true"),
        ]));

        assert_eq!(settings.data_dir, PathBuf::from("/data"));
        assert_eq!(settings.image_dir, PathBuf::from("/data/images"));
        assert_eq!(settings.labels, vec!["cute", "scary", "boring"]);
        assert_eq!(settings.image_extensions, vec!["jpg", "png"]);
        assert!(settings.db_echo);
    }

    #[test]
    fn test_env_image_dir_not_replaced_by_data_dir() {
        let mut settings = Settings::with_data_dir(PathBuf::from("/srv/labels"));
        settings.apply_env(env(&[
            ("IMAGELABEL_IMAGE_DIR", "/photos"),
            ("IMAGELABEL_DATA_DIR", "/data"),
        ]));
        assert_eq!(settings.image_dir, PathBuf::from("/photos"));
    }

    #[tokio::test]
    async fn test_load_toml_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("imagelabel.toml");
        fs::write(
            &path,
            "data_dir = \"state\"\nlabels = [\"cat\", \"dog\"]\ndb_echo = true\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.labels, Some(vec!["cat".to_string(), "dog".to_string()]));
        assert_eq!(config.base_dir(), Some(dir.path().to_path_buf()));

        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, dir.path());
        assert_eq!(settings.data_dir, dir.path().join("state"));
        assert_eq!(settings.image_dir, dir.path().join("state").join("images"));
        assert!(settings.db_echo);
    }

    #[tokio::test]
    async fn test_load_yaml_and_json_config() {
        let dir = tempdir().unwrap();
        let yaml = dir.path().join("c.yaml");
        fs::write(&yaml, "image_extensions: [jpg, jpeg]\n").unwrap();
        let config = Config::load_from_path(&yaml).await.unwrap();
        assert_eq!(
            config.image_extensions,
            Some(vec!["jpg".to_string(), "jpeg".to_string()])
        );

        let json = dir.path().join("c.json");
        fs::write(&json, r#"{"image_dir": "/pics"}"#).unwrap();
        let config = Config::load_from_path(&json).await.unwrap();
        assert_eq!(config.image_dir.as_deref(), Some("/pics"));
    }

    #[tokio::test]
    async fn test_invalid_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "labels = 3").unwrap();

        let err = Config::load_from_path(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "TOML", .. }));
    }

    #[tokio::test]
    async fn test_data_flag_with_db_file() {
        let dir = tempdir().unwrap();
        let options = LoadOptions {
            data: Some(dir.path().join("labels.db")),
            images: Some(dir.path().join("pics")),
            ..Default::default()
        };

        let (settings, _) = load_settings_with_env(options, env(&[])).await.unwrap();
        assert_eq!(settings.data_dir, dir.path());
        assert_eq!(settings.database_path(), dir.path().join("labels.db"));
        assert_eq!(settings.image_dir, dir.path().join("pics"));
    }

    #[tokio::test]
    async fn test_config_found_in_data_dir() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("imagelabel.toml"),
            "labels = [\"good\", \"bad\"]\n",
        )
        .unwrap();

        let options = LoadOptions {
            data: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let (settings, config) = load_settings_with_env(options, env(&[])).await.unwrap();
        assert_eq!(settings.labels, vec!["good", "bad"]);
        assert_eq!(settings.image_dir, dir.path().join("images"));
        assert!(config.source_path.is_some());
    }

    #[tokio::test]
    async fn test_postgres_url_rejected() {
        let dir = tempdir().unwrap();
        let options = LoadOptions {
            data: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let result = load_settings_with_env(
            options,
            env(&[("DATABASE_URL", "postgres://user:secret@db/labels")]),
        )
        .await;

        match result {
            Err(ConfigError::UnsupportedDatabase(msg)) => assert!(!msg.contains("secret")),
            other => panic!("expected UnsupportedDatabase, got {:?}", other.map(|_| ())),
        }
    }
}
