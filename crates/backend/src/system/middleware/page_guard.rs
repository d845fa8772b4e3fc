use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use contracts::system::auth::{CONSOLE_PATH, LOGIN_PATH};

use crate::system::auth::{middleware::cookie_value, middleware::session_user, SESSION_COOKIE};

/// Pages that need a signed-in browser
pub const PROTECTED_PREFIXES: [&str; 1] = [CONSOLE_PATH];

pub fn is_protected_page(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// `/` opens the console. Console requests without a session cookie of an
/// active account go to the login page. API routes carry their own checks
/// and are not touched.
pub async fn page_guard(req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path().to_string();
    if path == "/" {
        return Redirect::to(CONSOLE_PATH).into_response();
    }
    if !is_protected_page(&path) {
        return next.run(req).await;
    }

    let valid = match cookie_value(req.headers(), SESSION_COOKIE) {
        Some(token) => session_user(&token).await.is_ok(),
        None => false,
    };

    if valid {
        next.run(req).await
    } else {
        tracing::debug!("No session for {}, redirecting to {}", path, LOGIN_PATH);
        Redirect::to(LOGIN_PATH).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::users::service as user_service;
    use crate::test_support;
    use axum::http::{header, StatusCode};
    use axum::{middleware, routing::get, Router};
    use contracts::system::users::UserRole;
    use tower::ServiceExt;

    #[test]
    fn test_protected_prefixes() {
        assert!(is_protected_page("/console"));
        assert!(is_protected_page("/console/anything"));
        assert!(!is_protected_page("/consoles"));
        assert!(!is_protected_page("/login"));
        assert!(!is_protected_page("/api/contacts"));
        assert!(!is_protected_page("/pkg/frontend.js"));
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "index" }))
            .route(CONSOLE_PATH, get(|| async { "console" }))
            .route(LOGIN_PATH, get(|| async { "login" }))
            .layer(middleware::from_fn(page_guard))
    }

    async fn open(path: &str, cookie: Option<String>) -> Response {
        let mut request = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_console_without_session_goes_to_login() {
        test_support::database().await;

        let response = open("/console?active=a004_contact", None).await;
        assert!(response.status().is_redirection());
        assert_eq!(location(&response), LOGIN_PATH);

        let root = open("/", None).await;
        assert_eq!(location(&root), CONSOLE_PATH);

        let login = open(LOGIN_PATH, None).await;
        assert_eq!(login.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_console_with_session_is_served() {
        test_support::database().await;
        let user = test_support::user(UserRole::Viewer, true).await;
        let cookie = format!("{}={}", SESSION_COOKIE, test_support::token_for(&user).await);

        let response = open("/console?active=a004_contact", Some(cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_disabled_account_cookie_goes_to_login() {
        test_support::database().await;
        let user = test_support::user(UserRole::Admin, false).await;
        let cookie = format!("{}={}", SESSION_COOKIE, test_support::token_for(&user).await);

        let response = open("/console", Some(cookie)).await;
        assert_eq!(location(&response), LOGIN_PATH);

        user_service::delete(&user.uid).await.unwrap();
    }
}
