use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use contracts::system::users::UserRole;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::data::db::get_connection;

const ACCESS_TOKEN_LIFETIME_HOURS: i64 = 24;
const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 30;
const JWT_SECRET_KEY: &str = "jwt_secret";

static JWT_SECRET: OnceCell<String> = OnceCell::new();

pub fn access_token_lifetime_secs() -> i64 {
    ACCESS_TOKEN_LIFETIME_HOURS * 3600
}

pub fn build_claims(user_id: &str, email: &str, role: UserRole) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp: (now + chrono::Duration::hours(ACCESS_TOKEN_LIFETIME_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    }
}

pub fn encode_claims(claims: &TokenClaims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

pub fn decode_claims(token: &str, secret: &str) -> Result<TokenClaims> {
    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;
    Ok(data.claims)
}

/// Issue an access token for a signed-in user
pub async fn generate_access_token(user_id: &str, email: &str, role: UserRole) -> Result<String> {
    let secret = get_jwt_secret().await?;
    encode_claims(&build_claims(user_id, email, role), &secret)
}

/// Validate an access token and return its claims
pub async fn validate_token(token: &str) -> Result<TokenClaims> {
    let secret = get_jwt_secret().await?;
    decode_claims(token, &secret)
}

/// Opaque refresh token
pub fn generate_refresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn calculate_refresh_token_expiration() -> String {
    (Utc::now() + chrono::Duration::days(REFRESH_TOKEN_LIFETIME_DAYS)).to_rfc3339()
}

/// Secret from `sys_settings`, generated and stored on first use
pub async fn get_jwt_secret() -> Result<String> {
    if let Some(secret) = JWT_SECRET.get() {
        return Ok(secret.clone());
    }

    let secret = match load_jwt_secret().await? {
        Some(secret) => secret,
        None => {
            let secret = generate_jwt_secret();
            save_jwt_secret(&secret).await?;
            tracing::info!("Generated a new JWT secret");
            secret
        }
    };
    Ok(JWT_SECRET.get_or_init(|| secret).clone())
}

/// 256 random bits, base64 encoded
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

async fn load_jwt_secret() -> Result<Option<String>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [JWT_SECRET_KEY.into()],
        ))
        .await
        .context("Failed to read JWT secret")?;

    match row {
        Some(row) => Ok(Some(row.try_get("", "value")?)),
        None => Ok(None),
    }
}

async fn save_jwt_secret(secret: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR IGNORE INTO sys_settings (key, value, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                JWT_SECRET_KEY.into(),
                secret.to_string().into(),
                "Signing key for access tokens".into(),
                now.clone().into(),
                now.into(),
            ],
        ))
        .await
        .context("Failed to store JWT secret")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let claims = build_claims("u1", "admin@agri.local", UserRole::Admin);
        let token = encode_claims(&claims, "secret").unwrap();
        let decoded = decode_claims(&token, "secret").unwrap();
        assert_eq!(decoded.sub, "u1");
        assert_eq!(decoded.email, "admin@agri.local");
        assert_eq!(decoded.role, UserRole::Admin);
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = encode_claims(&build_claims("u1", "a@b.com", UserRole::Viewer), "one").unwrap();
        assert!(decode_claims(&token, "two").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut claims = build_claims("u1", "a@b.com", UserRole::Viewer);
        claims.iat -= 10 * 3600;
        claims.exp = claims.iat + 60;
        let token = encode_claims(&claims, "secret").unwrap();
        assert!(decode_claims(&token, "secret").is_err());
    }

    #[test]
    fn test_generated_secret_is_256_bits() {
        use base64::{engine::general_purpose, Engine as _};
        let secret = generate_jwt_secret();
        assert_eq!(general_purpose::STANDARD.decode(secret).unwrap().len(), 32);
    }
}
