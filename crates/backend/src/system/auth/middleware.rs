use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use contracts::system::auth::TokenClaims;
use contracts::system::users::{SystemUser, UserRole};

use super::SESSION_COOKIE;
use crate::system::users::service as user_service;

/// Who may pass a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    SignedIn,
    Editor,
    Admin,
}

impl Gate {
    pub fn allows(&self, role: UserRole) -> bool {
        match self {
            Gate::SignedIn => true,
            Gate::Editor => role.can_edit_directory(),
            Gate::Admin => role.can_manage_users(),
        }
    }
}

/// Value of one cookie from the `Cookie` header
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Access token from `Authorization: Bearer`, else from the session cookie
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    bearer.or_else(|| cookie_value(headers, SESSION_COOKIE))
}

/// Resolve a token to its account. The stored record decides: a deleted
/// account gets 401, a disabled one 403. The returned claims carry the
/// stored email and role, not the ones signed into the token.
pub async fn session_user(token: &str) -> Result<(TokenClaims, SystemUser), StatusCode> {
    let mut claims = super::jwt::validate_token(token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = user_service::get_by_id(&claims.sub)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load session user {}: {}", claims.sub, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !user.is_active {
        tracing::warn!("Disabled account {} rejected", user.email);
        return Err(StatusCode::FORBIDDEN);
    }

    claims.email = user.email.clone();
    claims.role = user.role;
    Ok((claims, user))
}

async fn authorize(headers: &HeaderMap, gate: Gate) -> Result<TokenClaims, StatusCode> {
    let token = token_from_headers(headers).ok_or(StatusCode::UNAUTHORIZED)?;
    let (claims, _) = session_user(&token).await?;

    if !gate.allows(claims.role) {
        tracing::warn!("{} ({}) denied: needs {:?}", claims.email, claims.role, gate);
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(claims)
}

/// Any signed-in user
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = authorize(req.headers(), Gate::SignedIn).await?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Admin or DataEntry
pub async fn require_editor(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = authorize(req.headers(), Gate::Editor).await?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub async fn require_admin(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = authorize(req.headers(), Gate::Admin).await?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_gates() {
        assert!(Gate::SignedIn.allows(UserRole::Viewer));
        assert!(Gate::Editor.allows(UserRole::DataEntry));
        assert!(Gate::Editor.allows(UserRole::Admin));
        assert!(!Gate::Editor.allows(UserRole::Viewer));
        assert!(Gate::Admin.allows(UserRole::Admin));
        assert!(!Gate::Admin.allows(UserRole::DataEntry));
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_disabled_account_fails_every_gate() {
        crate::test_support::database().await;
        let admin = crate::test_support::user(UserRole::Admin, false).await;
        let headers = bearer(&crate::test_support::token_for(&admin).await);

        assert_eq!(authorize(&headers, Gate::SignedIn).await.err(), Some(StatusCode::FORBIDDEN));
        assert_eq!(authorize(&headers, Gate::Admin).await.err(), Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_role_comes_from_stored_account() {
        crate::test_support::database().await;
        let mut user = crate::test_support::user(UserRole::Viewer, true).await;
        let token = crate::test_support::token_for(&user).await;
        user.role = UserRole::DataEntry;
        crate::system::users::repository::update(&user).await.unwrap();

        let claims = authorize(&bearer(&token), Gate::Editor).await.unwrap();
        assert_eq!(claims.role, UserRole::DataEntry);
        assert_eq!(claims.sub, user.uid);
    }

    #[tokio::test]
    async fn test_unknown_account_is_unauthorized() {
        crate::test_support::database().await;
        let token = super::super::jwt::generate_access_token("no-such-user", "x@agri.test", UserRole::Admin)
            .await
            .unwrap();
        assert_eq!(
            session_user(&token).await.err(),
            Some(StatusCode::UNAUTHORIZED)
        );
    }

    #[test]
    fn test_bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("session=xyz"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_cookie_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=xyz; other=1"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(token_from_headers(&headers), None);
    }
}
