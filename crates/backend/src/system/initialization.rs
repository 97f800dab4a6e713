use anyhow::Result;
use contracts::system::access::Role;
use contracts::system::users::CreateUserDto;

use crate::shared::config::AuthConfig;
use crate::system::users::{repository, service};

/// Create the configured admin user when the users table is empty
pub async fn ensure_admin_user_exists(auth: &AuthConfig) -> Result<()> {
    if repository::count_users().await? > 0 {
        return Ok(());
    }

    let Some(password) = auth.admin_password.as_ref().filter(|p| !p.is_empty()) else {
        tracing::warn!("No users exist and auth.admin_password is not set; nobody can log in");
        return Ok(());
    };

    tracing::info!("No users found. Creating admin user '{}'", auth.admin_username);
    let admin_id = service::create(CreateUserDto {
        username: auth.admin_username.clone(),
        password: password.clone(),
        full_name: Some("Administrator".to_string()),
        role: Role::Admin,
    })
    .await?;

    tracing::warn!(
        "Admin user '{}' created ({}). Change the password in config.toml for production.",
        auth.admin_username,
        admin_id
    );
    Ok(())
}
