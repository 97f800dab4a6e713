use anyhow::Result;
use chrono::Utc;
use contracts::system::users::{CreateUserDto, User};

use super::repository;
use crate::shared::error::{ServiceError, ServiceResult};
use crate::system::auth::password;

/// Create a new user
pub async fn create(dto: CreateUserDto) -> ServiceResult<String> {
    let username = dto.username.trim().to_string();
    if username.is_empty() {
        return Err(ServiceError::validation("Username cannot be empty"));
    }

    if repository::get_by_username(&username).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Username '{}' already exists",
            username
        )));
    }

    password::validate_password_strength(&dto.password)
        .map_err(|e| ServiceError::Validation(e.to_string()))?;
    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        username,
        full_name: dto.full_name,
        role: dto.role,
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };

    repository::create_with_password(&user, &password_hash).await?;
    tracing::info!("Created user '{}' with role {}", user.username, user.role.as_str());

    Ok(user_id)
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> Result<Vec<User>> {
    repository::list_all().await
}

/// Verify user credentials; `None` for an unknown, inactive or mismatched user
pub async fn verify_credentials(username: &str, password: &str) -> Result<Option<User>> {
    let Some(user) = repository::get_by_username(username.trim()).await? else {
        return Ok(None);
    };

    if !user.is_active {
        tracing::warn!("Login attempt for inactive user '{}'", user.username);
        return Ok(None);
    }

    let Some(hash) = repository::get_password_hash(&user.id).await? else {
        return Ok(None);
    };

    if !password::verify_password(password, &hash)? {
        return Ok(None);
    }

    repository::update_last_login(&user.id).await?;
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::test_db;
    use axum::http::StatusCode;
    use contracts::system::access::Role;

    fn dto(username: &str, password: &str) -> CreateUserDto {
        CreateUserDto {
            username: username.to_string(),
            password: password.to_string(),
            full_name: None,
            role: Role::Warehouse,
        }
    }

    #[test]
    fn test_create_and_login() {
        test_db::run(async {
            let username = test_db::unique("keeper");
            let id = create(dto(&username, "s3cret")).await.unwrap();

            let user = verify_credentials(&username, "s3cret").await.unwrap().unwrap();
            assert_eq!(user.id, id);
            assert!(verify_credentials(&username, "wrong").await.unwrap().is_none());
        });
    }

    #[test]
    fn test_bad_input_is_a_client_error() {
        test_db::run(async {
            let err = create(dto("   ", "s3cret")).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

            let err = create(dto(&test_db::unique("short"), "ab")).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

            let username = test_db::unique("twice");
            create(dto(&username, "s3cret")).await.unwrap();
            let err = create(dto(&username, "s3cret")).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::CONFLICT);
        });
    }

    #[test]
    fn test_storage_failure_is_a_server_error() {
        let err: ServiceError = anyhow::anyhow!("disk I/O error").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
