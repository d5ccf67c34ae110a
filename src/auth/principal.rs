use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::AppError;

/// Identity established for a single request by the authentication gate.
/// Lives in request extensions for the lifetime of the request and nowhere
/// else; there is no ambient security context.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

/// Map a stored role to its authority string, e.g. "owner" -> "ROLE_OWNER".
pub fn authorities(role: &str) -> Vec<String> {
    vec![format!("ROLE_{}", role.to_uppercase())]
}

/// Extractor for handlers that require an authenticated caller. The gate
/// never rejects a request itself; this is where a missing principal becomes
/// a 401.
pub struct AuthUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorities_upper_cases_the_stored_role() {
        assert_eq!(authorities("owner"), vec!["ROLE_OWNER".to_string()]);
        assert_eq!(authorities("user"), vec!["ROLE_USER".to_string()]);
    }
}
