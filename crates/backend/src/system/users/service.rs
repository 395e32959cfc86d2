use anyhow::Result;
use chrono::Utc;
use sea_orm::ConnectionTrait;

use super::repository::{self, User};
use crate::system::auth::password;

/// Create a new active user, returns its id
pub async fn create<C: ConnectionTrait>(
    conn: &C,
    username: &str,
    password_plain: &str,
    full_name: Option<String>,
) -> Result<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(anyhow::anyhow!("Username cannot be empty"));
    }
    if password_plain.is_empty() {
        return Err(anyhow::anyhow!("Password cannot be empty"));
    }

    if repository::get_with_hash_by_username(conn, username)
        .await?
        .is_some()
    {
        return Err(anyhow::anyhow!("Username already exists"));
    }

    let password_hash = password::hash_password_off_thread(password_plain).await?;

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: username.to_string(),
        full_name,
        is_active: true,
        created_at: Utc::now().to_rfc3339(),
        last_login_at: None,
    };

    repository::create_with_password(conn, &user, &password_hash).await?;

    Ok(user.id)
}

/// Returns the user when the password matches; `None` for unknown users,
/// wrong passwords and inactive accounts.
pub async fn verify_credentials<C: ConnectionTrait>(
    conn: &C,
    username: &str,
    password_plain: &str,
) -> Result<Option<User>> {
    let Some((user, password_hash)) =
        repository::get_with_hash_by_username(conn, username.trim()).await?
    else {
        return Ok(None);
    };

    if !user.is_active {
        tracing::warn!("Login attempt for inactive user {}", user.username);
        return Ok(None);
    }

    if !password::verify_password_off_thread(password_plain, &password_hash).await? {
        return Ok(None);
    }

    if let Err(e) = repository::update_last_login(conn, &user.id, &Utc::now().to_rfc3339()).await {
        tracing::warn!("Failed to record last login for {}: {:#}", user.username, e);
    }

    Ok(Some(user))
}
