//! User fixtures for tests that need assignees

use chrono::Utc;
use contracts::system::access::Role;
use contracts::system::users::User;

use super::repository;
use crate::shared::data::test_db;

/// Stores a technician directly, bypassing the service, and returns its id
pub async fn insert_user(name: &str, is_active: bool) -> String {
    let now = Utc::now().to_rfc3339();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: test_db::unique(name),
        full_name: None,
        role: Role::Technician,
        is_active,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };
    repository::create_with_password(&user, "not-a-hash")
        .await
        .unwrap();
    user.id
}
