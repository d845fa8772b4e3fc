use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory that receives uploaded pictures
    pub root: String,
    /// Prefix of the URLs handed back to clients
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: "target/media".into(),
            public_base_url: "http://localhost:3000/media".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FrontendConfig {
    pub dist_dir: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            dist_dir: "dist".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ValidationConfig {
    /// Reject edits of existing contacts that fail validation
    pub block_on_update: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            block_on_update: true,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/directory.db"

[server]
host = "0.0.0.0"
port = 3000

[storage]
root = "target/media"
public_base_url = "http://localhost:3000/media"

[frontend]
dist_dir = "dist"

[validation]
block_on_update = true
"#;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Load once and keep for the lifetime of the process
pub fn init_config() -> anyhow::Result<&'static Config> {
    CONFIG.get_or_try_init(load_config)
}

/// Loaded configuration. Falls back to the embedded default when
/// `init_config` has not run (tests).
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| {
        load_config().unwrap_or_else(|e| {
            tracing::error!("Failed to load config, using defaults: {}", e);
            default_config()
        })
    })
}

fn default_config() -> Config {
    Config {
        database: DatabaseConfig {
            path: "target/db/directory.db".into(),
        },
        server: ServerConfig::default(),
        storage: StorageConfig::default(),
        frontend: FrontendConfig::default(),
        validation: ValidationConfig::default(),
    }
}

/// Resolve a configured path. Relative paths are taken relative to the
/// executable directory.
pub fn resolve_path(configured: &str) -> PathBuf {
    let path = Path::new(configured);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(configured)
}

/// Get the database file path from configuration
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/directory.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.root, "target/media");
        assert!(config.validation.block_on_update);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            path = "/var/lib/directory.db"

            [validation]
            block_on_update = false
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.frontend.dist_dir, "dist");
        assert!(!config.validation.block_on_update);
        assert_eq!(
            get_database_path(&config),
            PathBuf::from("/var/lib/directory.db")
        );
    }

    #[test]
    fn test_relative_paths_resolve_next_to_executable() {
        let resolved = resolve_path("target/media");
        assert!(resolved.ends_with("target/media"));
        assert!(resolved.is_absolute() || resolved == PathBuf::from("target/media"));
    }
}
