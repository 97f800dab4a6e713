use sqlx::sqlite::SqlitePool;
use std::path::{Path, PathBuf};

use super::db::sqlite_url;

fn candidate_migrations_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.join("migrations"));
        }
    }

    dirs.push(PathBuf::from("migrations"));
    dirs.push(PathBuf::from("../../migrations"));
    dirs.push(PathBuf::from("../../../migrations"));

    dirs
}

fn find_migrations_dir() -> anyhow::Result<PathBuf> {
    candidate_migrations_dirs()
        .into_iter()
        .find(|p| p.exists() && p.is_dir())
        .ok_or_else(|| anyhow::anyhow!("migrations directory not found"))
}

/// Apply every pending `migrations/*.sql` script to the database file
pub async fn run_migrations(db_path: &Path) -> anyhow::Result<()> {
    let pool = SqlitePool::connect(&sqlite_url(db_path)).await?;

    let migrations_dir = find_migrations_dir()?;
    tracing::info!("Using migrations directory: {}", migrations_dir.display());

    let migrator = sqlx::migrate::Migrator::new(migrations_dir.as_path()).await?;
    migrator.run(&pool).await?;
    pool.close().await;

    tracing::info!("Database migrations applied successfully");
    Ok(())
}
