use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Secret for signing access tokens; generated at startup when absent
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_hours")]
    pub access_token_hours: i64,
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    /// Initial admin password; the admin user is not created without it
    pub admin_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_hours: default_token_hours(),
            admin_username: default_admin_username(),
            admin_password: None,
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_token_hours() -> i64 {
    24
}

fn default_admin_username() -> String {
    "admin".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "data/depot.db"

[server]
port = 3000

[auth]
access_token_hours = 24
admin_username = "admin"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                return load_config_from(&config_path);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    // Fallback: use relative to current directory
    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "data/depot.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.access_token_hours, 24);
        assert_eq!(config.auth.admin_username, "admin");
        assert!(config.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_optional_sections_default() {
        let config: Config = toml::from_str("[database]\npath = \"/tmp/x.db\"\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.auth.admin_password.is_none());
        assert_eq!(
            get_database_path(&config).unwrap(),
            PathBuf::from("/tmp/x.db")
        );
    }

    #[test]
    fn test_shipped_config_has_no_admin_password() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config.toml");
        let config = load_config_from(&path).unwrap();
        assert!(config.auth.admin_password.is_none());
        assert!(config.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_missing_database_section_fails() {
        let config: Result<Config, _> = toml::from_str("[server]\nport = 8080\n");
        assert!(config.is_err());
    }
}
