use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::system::auth::TokenClaims;

/// Claims of the caller, placed in the request by the auth middleware
pub struct CurrentUser(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0.sub
    }

    /// The caller is `user_id` or an administrator
    pub fn may_manage(&self, user_id: &str) -> bool {
        self.0.sub == user_id || self.0.role.can_manage_users()
    }
}
