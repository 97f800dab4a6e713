use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// SQLite connection URL for a database file, created on first open
pub fn sqlite_url(path: &Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Open the database file and keep the pool for the rest of the process.
///
/// The schema itself is owned by `migration_runner`.
pub async fn initialize_database(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_path)
    };

    let db_url = sqlite_url(&absolute_path);
    tracing::info!("Connecting to database: {}", absolute_path.display());

    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url_unix_path() {
        assert_eq!(
            sqlite_url(Path::new("/var/lib/depot/depot.db")),
            "sqlite:///var/lib/depot/depot.db?mode=rwc"
        );
    }

    #[test]
    fn test_sqlite_url_windows_path() {
        assert_eq!(
            sqlite_url(Path::new(r"C:\depot\depot.db")),
            "sqlite:///C:/depot/depot.db?mode=rwc"
        );
    }
}
