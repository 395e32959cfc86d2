use anyhow::Context;
use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const SCHEMA: &[(&str, &str)] = &[
    (
        "sys_settings",
        r#"
        CREATE TABLE IF NOT EXISTS sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "sys_users",
        r#"
        CREATE TABLE IF NOT EXISTS sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            full_name TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            last_login_at TEXT
        );
        "#,
    ),
    (
        "a001_payroll",
        r#"
        CREATE TABLE IF NOT EXISTS a001_payroll (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id TEXT NOT NULL,
            full_name TEXT NOT NULL,
            cccd TEXT NOT NULL DEFAULT '',
            position TEXT,
            salary_month TEXT NOT NULL,
            total_income REAL NOT NULL DEFAULT 0,
            deductions REAL NOT NULL DEFAULT 0,
            net_salary REAL NOT NULL DEFAULT 0,
            source_file TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "idx_a001_payroll_employee",
        "CREATE INDEX IF NOT EXISTS idx_a001_payroll_employee ON a001_payroll (employee_id, salary_month);",
    ),
];

/// Opens (creating if needed) the SQLite file and bootstraps the schema.
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database: {}", db_url);
    let conn = Database::connect(&db_url).await?;

    ensure_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

/// Creates missing tables; safe to run on every start.
pub async fn ensure_schema<C: ConnectionTrait>(conn: &C) -> anyhow::Result<()> {
    for (name, sql) in SCHEMA {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await
            .with_context(|| format!("Failed to create {}", name))?;
    }
    tracing::info!("Database schema ready");
    Ok(())
}

pub fn get_connection() -> anyhow::Result<&'static DatabaseConnection> {
    DB_CONN
        .get()
        .ok_or_else(|| anyhow::anyhow!("Database connection has not been initialized"))
}

/// Fresh in-memory database with the schema applied.
#[cfg(test)]
pub async fn test_connection() -> DatabaseConnection {
    use sea_orm::ConnectOptions;

    // One pooled connection: every :memory: connection is a separate database
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let conn = Database::connect(options).await.unwrap();
    ensure_schema(&conn).await.unwrap();
    conn
}
