use axum::{
    extract::Json,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo, VerifyResponse,
};
use contracts::system::users::SystemUser;

use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::middleware::{session_user, token_from_headers};
use crate::system::auth::{jwt, SESSION_COOKIE};
use crate::system::users::service::{self as user_service, LoginOutcome};

fn user_info(user: SystemUser) -> UserInfo {
    UserInfo {
        id: user.uid,
        email: user.email,
        full_name: user.full_name,
        role: user.role,
        is_active: user.is_active,
    }
}

pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        jwt::access_token_lifetime_secs()
    )
}

pub fn expired_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// POST /api/system/auth/login
pub async fn login(Json(request): Json<LoginRequest>) -> Result<Response, StatusCode> {
    let outcome = user_service::verify_credentials(&request.email, &request.password)
        .await
        .map_err(|e| {
            tracing::error!("Login failed for {}: {}", request.email, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let user = match outcome {
        LoginOutcome::Success(user) => user,
        LoginOutcome::InvalidCredentials => {
            tracing::warn!("Invalid credentials for {}", request.email);
            return Err(StatusCode::UNAUTHORIZED);
        }
        LoginOutcome::Disabled => {
            tracing::warn!("Disabled account {} tried to sign in", request.email);
            return Err(StatusCode::FORBIDDEN);
        }
    };

    let access_token = jwt::generate_access_token(&user.uid, &user.email, user.role)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let refresh_token = jwt::generate_refresh_token();
    store_refresh_token(&user.uid, &refresh_token)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    tracing::info!("{} signed in", user.email);

    let cookie = session_cookie(&access_token);
    let response = LoginResponse {
        access_token,
        refresh_token,
        user: user_info(user),
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(response)).into_response())
}

/// POST /api/system/auth/refresh
pub async fn refresh(Json(request): Json<RefreshRequest>) -> Result<Response, StatusCode> {
    let user_id = validate_refresh_token(&request.refresh_token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = user_service::get_by_id(&user_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !user.is_active {
        return Err(StatusCode::FORBIDDEN);
    }

    let access_token = jwt::generate_access_token(&user.uid, &user.email, user.role)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let cookie = session_cookie(&access_token);
    Ok(([(header::SET_COOKIE, cookie)], Json(RefreshResponse { access_token })).into_response())
}

/// POST /api/system/auth/logout
pub async fn logout(Json(request): Json<RefreshRequest>) -> Result<Response, StatusCode> {
    revoke_refresh_token(&request.refresh_token)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(([(header::SET_COOKIE, expired_session_cookie())], StatusCode::OK).into_response())
}

/// GET /api/system/auth/me
pub async fn current_user(CurrentUser(claims): CurrentUser) -> Result<Json<UserInfo>, StatusCode> {
    let user = user_service::get_by_id(&claims.sub)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(user_info(user)))
}

/// GET /api/system/auth/verify: 401 without a valid token, 403 when the
/// account has been disabled since the token was issued
pub async fn verify(headers: HeaderMap) -> Result<Json<VerifyResponse>, StatusCode> {
    let token = token_from_headers(&headers).ok_or(StatusCode::UNAUTHORIZED)?;
    let (_, user) = session_user(&token).await?;

    Ok(Json(VerifyResponse {
        valid: true,
        user: user_info(user),
    }))
}

// Refresh tokens are stored as SHA-256 hashes

async fn store_refresh_token(user_id: &str, token: &str) -> anyhow::Result<()> {
    use crate::shared::data::db::get_connection;
    use chrono::Utc;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_refresh_tokens (id, user_id, token_hash, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                uuid::Uuid::new_v4().to_string().into(),
                user_id.into(),
                hash_token(token).into(),
                jwt::calculate_refresh_token_expiration().into(),
                Utc::now().to_rfc3339().into(),
            ],
        ))
        .await?;
    Ok(())
}

async fn validate_refresh_token(token: &str) -> anyhow::Result<String> {
    use crate::shared::data::db::get_connection;
    use chrono::Utc;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT user_id FROM sys_refresh_tokens
             WHERE token_hash = ? AND expires_at > ? AND revoked_at IS NULL",
            [hash_token(token).into(), Utc::now().to_rfc3339().into()],
        ))
        .await?;

    match row {
        Some(row) => Ok(row.try_get("", "user_id")?),
        None => Err(anyhow::anyhow!("Invalid or expired refresh token")),
    }
}

async fn revoke_refresh_token(token: &str) -> anyhow::Result<()> {
    use crate::shared::data::db::get_connection;
    use chrono::Utc;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE token_hash = ?",
            [Utc::now().to_rfc3339().into(), hash_token(token).into()],
        ))
        .await?;
    Ok(())
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_hex_sha256() {
        let hash = hash_token("abc");
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok");
        assert!(cookie.starts_with("session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(expired_session_cookie().contains("Max-Age=0"));
    }
}
