//! Migrated SQLite file shared by the service tests of one test binary.
//!
//! The connection lives in a process-wide `OnceCell`, so every test runs on
//! one runtime that owns the pool. Tests must not depend on an empty table:
//! use fresh names and codes per test.

use once_cell::sync::Lazy;
use std::future::Future;
use tokio::runtime::Runtime;
use tokio::sync::OnceCell;

use super::{db, migration_runner};

static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build test runtime")
});

static READY: OnceCell<()> = OnceCell::const_new();

async fn prepare() {
    READY
        .get_or_init(|| async {
            let path = std::env::temp_dir().join(format!(
                "depot-test-{}.db",
                uuid::Uuid::new_v4().simple()
            ));
            db::initialize_database(&path)
                .await
                .expect("failed to open test database");
            migration_runner::run_migrations(&path)
                .await
                .expect("failed to migrate test database");
        })
        .await;
}

/// Runs an async test body against the shared test database
pub fn run<F: Future<Output = ()>>(test: F) {
    RUNTIME.block_on(async {
        prepare().await;
        test.await;
    });
}

/// Short unique suffix for names that must not collide between tests
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &uuid::Uuid::new_v4().simple().to_string()[..8])
}
