use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::system::auth::middleware::{require_admin, require_auth, require_editor};
use crate::{handlers, system};

/// All API routes of the application.
///
/// Reads need a signed-in user, category and contact writes need Admin or
/// DataEntry, user management needs Admin.
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        .route(
            "/api/system/auth/refresh",
            post(system::handlers::auth::refresh),
        )
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout),
        )
        .route(
            "/api/system/auth/verify",
            get(system::handlers::auth::verify),
        )
        // System auth routes (protected)
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn(require_auth)),
        )
        // System users management (admin only)
        .route(
            "/api/system/users",
            get(system::handlers::users::list)
                .post(system::handlers::users::create)
                .layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/api/system/users/:id",
            get(system::handlers::users::get_by_id)
                .put(system::handlers::users::update)
                .delete(system::handlers::users::delete)
                .layer(middleware::from_fn(require_admin)),
        )
        // Self or admin, checked in the handler
        .route(
            "/api/system/users/:id/change-password",
            post(system::handlers::users::change_password)
                .layer(middleware::from_fn(require_auth)),
        )
        // ========================================
        // CATEGORIES
        // ========================================
        .route(
            "/api/categories",
            get(handlers::categories::snapshot).layer(middleware::from_fn(require_auth)),
        )
        // A001 Department
        .route(
            "/api/departments",
            get(handlers::a001_department::list_all)
                .route_layer(middleware::from_fn(require_auth))
                .merge(
                    post(handlers::a001_department::create)
                        .route_layer(middleware::from_fn(require_editor)),
                ),
        )
        .route(
            "/api/departments/:id",
            get(handlers::a001_department::get_by_id)
                .route_layer(middleware::from_fn(require_auth))
                .merge(
                    axum::routing::put(handlers::a001_department::update)
                        .delete(handlers::a001_department::delete)
                        .route_layer(middleware::from_fn(require_editor)),
                ),
        )
        // A002 Institute
        .route(
            "/api/institutes",
            get(handlers::a002_institute::list)
                .route_layer(middleware::from_fn(require_auth))
                .merge(
                    post(handlers::a002_institute::create)
                        .route_layer(middleware::from_fn(require_editor)),
                ),
        )
        .route(
            "/api/institutes/:id",
            get(handlers::a002_institute::get_by_id)
                .route_layer(middleware::from_fn(require_auth))
                .merge(
                    axum::routing::put(handlers::a002_institute::update)
                        .delete(handlers::a002_institute::delete)
                        .route_layer(middleware::from_fn(require_editor)),
                ),
        )
        // A003 Unit
        .route(
            "/api/units",
            get(handlers::a003_unit::list)
                .route_layer(middleware::from_fn(require_auth))
                .merge(
                    post(handlers::a003_unit::create)
                        .route_layer(middleware::from_fn(require_editor)),
                ),
        )
        .route(
            "/api/units/:id",
            get(handlers::a003_unit::get_by_id)
                .route_layer(middleware::from_fn(require_auth))
                .merge(
                    axum::routing::put(handlers::a003_unit::update)
                        .delete(handlers::a003_unit::delete)
                        .route_layer(middleware::from_fn(require_editor)),
                ),
        )
        // ========================================
        // CONTACTS
        // ========================================
        .route(
            "/api/contacts",
            get(handlers::a004_contact::list)
                .route_layer(middleware::from_fn(require_auth))
                .merge(
                    post(handlers::a004_contact::create)
                        .route_layer(middleware::from_fn(require_editor)),
                ),
        )
        .route(
            "/api/contacts/list",
            get(handlers::a004_contact::list_page).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/contacts/testdata",
            post(handlers::a004_contact::insert_test_data)
                .layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/api/contacts/:id",
            get(handlers::a004_contact::get_by_id)
                .route_layer(middleware::from_fn(require_auth))
                .merge(
                    axum::routing::put(handlers::a004_contact::update)
                        .delete(handlers::a004_contact::delete)
                        .route_layer(middleware::from_fn(require_editor)),
                ),
        )
        // ========================================
        // UPLOADS
        // ========================================
        .route(
            "/api/uploads/:category",
            post(handlers::uploads::upload).layer(middleware::from_fn(require_editor)),
        )
        // ========================================
        // DASHBOARDS
        // ========================================
        .route(
            "/api/dashboard/summary",
            get(handlers::d400_directory_summary::get_summary)
                .layer(middleware::from_fn(require_auth)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::users::{repository as user_repository, service as user_service};
    use crate::test_support;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use contracts::domain::a004_contact::aggregate::ContactDto;
    use contracts::system::users::UserRole;
    use tower::ServiceExt;

    async fn send(method: Method, uri: &str, token: Option<&str>, body: Option<String>) -> StatusCode {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json)
            }
            None => Body::empty(),
        };
        configure_routes()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
            .status()
    }

    async fn new_contact_json(label: &str) -> String {
        let (department_id, institute_id, unit_id) = test_support::hierarchy(label).await;
        serde_json::to_string(&ContactDto {
            full_name: format!("{} Perera", label),
            official_email: format!("{}@agri.gov.lk", label.to_lowercase()),
            mobile_no1: "0771234567".into(),
            department_id,
            institute_id,
            unit_id,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_viewer_reads_but_cannot_write_contacts() {
        test_support::database().await;
        let viewer = test_support::user(UserRole::Viewer, true).await;
        let token = test_support::token_for(&viewer).await;

        assert_eq!(send(Method::GET, "/api/contacts", Some(&token), None).await, StatusCode::OK);
        assert_eq!(
            send(Method::GET, "/api/contacts/list?page=1", Some(&token), None).await,
            StatusCode::OK
        );

        let body = new_contact_json("Viewer").await;
        assert_eq!(
            send(Method::POST, "/api/contacts", Some(&token), Some(body)).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            send(Method::GET, "/api/system/users", Some(&token), None).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_editor_creates_contacts() {
        test_support::database().await;
        let editor = test_support::user(UserRole::DataEntry, true).await;
        let token = test_support::token_for(&editor).await;

        let body = new_contact_json("Editor").await;
        assert_eq!(
            send(Method::POST, "/api/contacts", Some(&token), Some(body)).await,
            StatusCode::CREATED
        );
        assert_eq!(
            send(Method::POST, "/api/contacts/testdata", Some(&token), None).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        test_support::database().await;
        assert_eq!(send(Method::GET, "/api/contacts", None, None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            send(Method::GET, "/api/contacts", Some("garbage"), None).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_account_changes_apply_to_issued_tokens() {
        test_support::database().await;

        let disabled = test_support::user(UserRole::Admin, false).await;
        let token = test_support::token_for(&disabled).await;
        assert_eq!(send(Method::GET, "/api/contacts", Some(&token), None).await, StatusCode::FORBIDDEN);

        let mut demoted = test_support::user(UserRole::Admin, true).await;
        let token = test_support::token_for(&demoted).await;
        demoted.role = UserRole::Viewer;
        user_repository::update(&demoted).await.unwrap();
        assert_eq!(
            send(Method::GET, "/api/system/users", Some(&token), None).await,
            StatusCode::FORBIDDEN
        );

        let removed = test_support::user(UserRole::Admin, true).await;
        let token = test_support::token_for(&removed).await;
        user_service::delete(&removed.uid).await.unwrap();
        assert_eq!(
            send(Method::GET, "/api/contacts", Some(&token), None).await,
            StatusCode::UNAUTHORIZED
        );
    }
}
