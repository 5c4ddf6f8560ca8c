//! Generator configuration schema for modelgen.yaml
//!
//! The configuration is loaded once at startup and handed to the
//! [`Generator`](crate::generator::Generator) explicitly; nothing in the
//! crate reads it from ambient state.

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{GeneratorError, SchemaError};

/// Top-level configuration from modelgen.yaml
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Named database connections, in declaration order
    pub connections: IndexMap<String, ConnectionConfig>,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub pool: PoolSettings,
}

/// Connection parameters for one database.
///
/// Exactly one of `url` or `url_env` must be set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub url: Option<String>,
    /// Name of an environment variable holding the URL
    #[serde(default)]
    pub url_env: Option<String>,
}

impl ConnectionConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            url_env: None,
        }
    }

    /// Resolve the database URL for the connection called `name`.
    ///
    /// A missing environment variable is a connection failure, not a
    /// configuration failure, so the other connections still get processed.
    pub fn resolve_url(&self, name: &str) -> Result<String, SchemaError> {
        match (&self.url, &self.url_env) {
            (Some(url), _) => Ok(url.clone()),
            (None, Some(var)) => std::env::var(var).map_err(|e| {
                SchemaError::connection(name, format!("environment variable {}: {}", var, e))
            }),
            (None, None) => Err(SchemaError::connection(name, "no url configured")),
        }
    }
}

/// Output locations, relative to `base`
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_base")]
    pub base: PathBuf,
    #[serde(default = "default_models_dir")]
    pub models: PathBuf,
    #[serde(default = "default_controllers_dir")]
    pub controllers: PathBuf,
    #[serde(default = "default_routes_file")]
    pub routes: PathBuf,
}

fn default_base() -> PathBuf {
    PathBuf::from(".")
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("app/Models")
}

fn default_controllers_dir() -> PathBuf {
    PathBuf::from("app/Http/Controllers")
}

fn default_routes_file() -> PathBuf {
    PathBuf::from("routes/web.php")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            models: default_models_dir(),
            controllers: default_controllers_dir(),
            routes: default_routes_file(),
        }
    }
}

impl PathsConfig {
    pub fn models_dir(&self) -> PathBuf {
        self.base.join(&self.models)
    }

    pub fn controllers_dir(&self) -> PathBuf {
        self.base.join(&self.controllers)
    }

    pub fn routes_file(&self) -> PathBuf {
        self.base.join(&self.routes)
    }
}

/// Settings for the generated framework code
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_model_namespace")]
    pub model_namespace: String,
    #[serde(default = "default_controller_namespace")]
    pub controller_namespace: String,
    /// Middleware applied in every controller constructor
    #[serde(default = "default_middleware")]
    pub middleware: Option<String>,
    #[serde(default)]
    pub soft_delete: SoftDeleteConfig,
}

fn default_model_namespace() -> String {
    "App\\Models".to_string()
}

fn default_controller_namespace() -> String {
    "App\\Http\\Controllers".to_string()
}

fn default_middleware() -> Option<String> {
    Some("auth".to_string())
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            model_namespace: default_model_namespace(),
            controller_namespace: default_controller_namespace(),
            middleware: default_middleware(),
            soft_delete: SoftDeleteConfig::default(),
        }
    }
}

/// Column and sentinel used by the generated delete handler
#[derive(Debug, Clone, Deserialize)]
pub struct SoftDeleteConfig {
    #[serde(default = "default_soft_delete_column")]
    pub column: String,
    #[serde(default = "default_soft_delete_value")]
    pub value: String,
}

fn default_soft_delete_column() -> String {
    "recordstatus".to_string()
}

fn default_soft_delete_value() -> String {
    "DEL".to_string()
}

impl Default for SoftDeleteConfig {
    fn default() -> Self {
        Self {
            column: default_soft_delete_column(),
            value: default_soft_delete_value(),
        }
    }
}

/// r2d2 pool options used for each introspected connection
#[derive(Debug, Clone, Deserialize)]
pub struct PoolSettings {
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    1
}

fn default_connection_timeout_secs() -> u64 {
    10
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            connection_timeout_secs: default_connection_timeout_secs(),
        }
    }
}

impl GeneratorConfig {
    /// Build a configuration with default paths and target settings
    pub fn new(connections: IndexMap<String, ConnectionConfig>) -> Self {
        Self {
            connections,
            paths: PathsConfig::default(),
            target: TargetConfig::default(),
            pool: PoolSettings::default(),
        }
    }

    /// Load configuration from modelgen.yaml
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GeneratorError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self, GeneratorError> {
        let config: Self = serde_yaml::from_str(contents)
            .map_err(|e| GeneratorError::Config(format!("failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.connections.is_empty() {
            return Err(GeneratorError::Config(
                "at least one connection must be configured".to_string(),
            ));
        }

        for (name, connection) in &self.connections {
            match (&connection.url, &connection.url_env) {
                (Some(_), Some(_)) => {
                    return Err(GeneratorError::Config(format!(
                        "connection '{}' sets both url and url_env",
                        name
                    )))
                }
                (None, None) => {
                    return Err(GeneratorError::Config(format!(
                        "connection '{}' needs either url or url_env",
                        name
                    )))
                }
                _ => {}
            }
        }

        for (key, value) in [
            ("paths.models", &self.paths.models),
            ("paths.controllers", &self.paths.controllers),
            ("paths.routes", &self.paths.routes),
        ] {
            if value.as_os_str().is_empty() {
                return Err(GeneratorError::Config(format!("{} must not be empty", key)));
            }
        }

        if self.pool.connection_timeout_secs == 0 {
            return Err(GeneratorError::Config(
                "pool.connection_timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Names of all configured connections, in declaration order
    pub fn connection_names(&self) -> impl Iterator<Item = &str> {
        self.connections.keys().map(String::as_str)
    }
}
