use anyhow::Result;
use sea_orm::ConnectionTrait;

use crate::shared::config::AuthConfig;
use crate::system::users::{repository, service};

/// Ensure an admin user exists (created from config when the table is empty)
pub async fn ensure_admin_user_exists<C: ConnectionTrait>(conn: &C, auth: &AuthConfig) -> Result<()> {
    let count = repository::count_users(conn).await?;
    if count > 0 {
        return Ok(());
    }

    tracing::info!("No users found. Creating default admin user...");

    let admin_id = service::create(
        conn,
        &auth.admin_username,
        &auth.admin_password,
        Some("Administrator".to_string()),
    )
    .await?;

    tracing::warn!(
        "Default admin user '{}' created (id {}). Change the bootstrap password in config.toml",
        auth.admin_username,
        admin_id
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_connection;

    #[tokio::test]
    async fn test_admin_created_only_once() {
        let conn = test_connection().await;
        let auth = AuthConfig::default();

        ensure_admin_user_exists(&conn, &auth).await.unwrap();
        ensure_admin_user_exists(&conn, &auth).await.unwrap();

        assert_eq!(repository::count_users(&conn).await.unwrap(), 1);
        assert!(service::verify_credentials(&conn, "admin", "admin")
            .await
            .unwrap()
            .is_some());
    }
}
