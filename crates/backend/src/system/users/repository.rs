use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

/// Row of `sys_users` without the password hash
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// Create user with password hash
pub async fn create_with_password<C: ConnectionTrait>(
    conn: &C,
    user: &User,
    password_hash: &str,
) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_users (id, username, password_hash, full_name, is_active, created_at, last_login_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        [
            user.id.clone().into(),
            user.username.clone().into(),
            password_hash.to_string().into(),
            user.full_name.clone().into(),
            (if user.is_active { 1 } else { 0 }).into(),
            user.created_at.clone().into(),
            user.last_login_at.clone().into(),
        ],
    ))
    .await
    .context("Failed to insert user")?;

    Ok(())
}

/// Get user by username together with the stored password hash
pub async fn get_with_hash_by_username<C: ConnectionTrait>(
    conn: &C,
    username: &str,
) -> Result<Option<(User, String)>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id, username, password_hash, full_name, is_active, created_at, last_login_at
             FROM sys_users WHERE username = ?",
            [username.into()],
        ))
        .await?;

    match result {
        Some(row) => {
            let user = User {
                id: row.try_get("", "id")?,
                username: row.try_get("", "username")?,
                full_name: row.try_get("", "full_name")?,
                is_active: row.try_get::<i32>("", "is_active")? != 0,
                created_at: row.try_get("", "created_at")?,
                last_login_at: row.try_get("", "last_login_at")?,
            };
            let hash: String = row.try_get("", "password_hash")?;
            Ok(Some((user, hash)))
        }
        None => Ok(None),
    }
}

pub async fn count_users<C: ConnectionTrait>(conn: &C) -> Result<i64> {
    let row = conn
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS cnt FROM sys_users".to_string(),
        ))
        .await?;

    match row {
        Some(row) => Ok(row.try_get("", "cnt")?),
        None => Ok(0),
    }
}

pub async fn update_last_login<C: ConnectionTrait>(conn: &C, user_id: &str, at: &str) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET last_login_at = ? WHERE id = ?",
        [at.into(), user_id.into()],
    ))
    .await
    .context("Failed to update last login")?;

    Ok(())
}
