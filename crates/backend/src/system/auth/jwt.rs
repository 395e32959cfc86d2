use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

const JWT_SECRET_KEY: &str = "jwt_secret";

struct JwtSettings {
    secret: String,
    lifetime_hours: i64,
}

static JWT_SETTINGS: OnceCell<JwtSettings> = OnceCell::new();

/// Loads the signing secret (creating it on first start) and fixes the token lifetime.
pub async fn initialize<C: ConnectionTrait>(conn: &C, lifetime_hours: i64) -> Result<()> {
    let secret = get_or_create_secret(conn).await?;
    JWT_SETTINGS
        .set(JwtSettings {
            secret,
            lifetime_hours,
        })
        .map_err(|_| anyhow::anyhow!("JWT settings already initialized"))?;
    Ok(())
}

fn settings() -> Result<&'static JwtSettings> {
    JWT_SETTINGS
        .get()
        .ok_or_else(|| anyhow::anyhow!("JWT settings have not been initialized"))
}

/// Generate an access token for the user with the configured lifetime
pub fn generate_access_token(user_id: &str, username: &str) -> Result<String> {
    let settings = settings()?;
    let claims = build_claims(user_id, username, settings.lifetime_hours);
    encode_token(&settings.secret, &claims)
}

/// Validate token against the configured secret and extract claims
pub fn validate_token(token: &str) -> Result<TokenClaims> {
    decode_token(&settings()?.secret, token)
}

pub fn build_claims(user_id: &str, username: &str, lifetime_hours: i64) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: (now + chrono::Duration::hours(lifetime_hours)).timestamp() as usize,
        iat: now.timestamp() as usize,
    }
}

pub fn encode_token(secret: &str, claims: &TokenClaims) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

pub fn decode_token(secret: &str, token: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

async fn get_or_create_secret<C: ConnectionTrait>(conn: &C) -> Result<String> {
    let existing = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [JWT_SECRET_KEY.into()],
        ))
        .await?;

    if let Some(row) = existing {
        let secret: String = row.try_get("", "value")?;
        return Ok(secret);
    }

    let secret = generate_jwt_secret();
    let now = Utc::now().to_rfc3339();
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_settings (key, value, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            JWT_SECRET_KEY.into(),
            secret.clone().into(),
            "Auto-generated JWT secret for authentication".into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await
    .context("Failed to store JWT secret")?;

    tracing::info!("Generated a new JWT secret");
    Ok(secret)
}

/// 256 random bits, base64 encoded
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_connection;

    #[test]
    fn test_token_roundtrip() {
        let claims = build_claims("u-1", "admin", 24);
        let token = encode_token("secret", &claims).unwrap();
        assert_eq!(decode_token("secret", &token).unwrap(), claims);
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let token = encode_token("secret", &build_claims("u-1", "admin", 24)).unwrap();
        assert!(decode_token("other", &token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = build_claims("u-1", "admin", -2);
        let token = encode_token("secret", &claims).unwrap();
        assert!(decode_token("secret", &token).is_err());
    }

    #[tokio::test]
    async fn test_secret_is_created_once() {
        let conn = test_connection().await;
        let first = get_or_create_secret(&conn).await.unwrap();
        let second = get_or_create_secret(&conn).await.unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
