use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use crate::{
    auth::principal::{authorities, Principal},
    state::AppState,
};

/// Per-request authentication gate. Establishes a [`Principal`] in request
/// extensions when a valid bearer token is presented and continues the
/// pipeline unconditionally — a request that fails authentication proceeds
/// unauthenticated, and downstream extractors decide whether that matters.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if req.extensions().get::<Principal>().is_none() {
        if let Some(principal) = resolve_principal(&state, req.headers()).await {
            req.extensions_mut().insert(principal);
        }
    }
    next.run(req).await
}

async fn resolve_principal(state: &AppState, headers: &HeaderMap) -> Option<Principal> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;

    let subject = match state.jwt.extract_subject(token) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "bearer token rejected");
            return None;
        }
    };

    let user = match state.users.find_by_username(&subject).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(subject = %subject, "token subject has no matching user");
            return None;
        }
        Err(e) => {
            error!(error = %e, "user lookup failed during authentication");
            return None;
        }
    };

    if !state.jwt.is_valid(token, &user.username) {
        warn!(subject = %subject, "token failed validation");
        return None;
    }

    // Authorities come from the stored role, not the token's role claims.
    Some(Principal {
        user_id: user.id,
        username: user.username,
        roles: authorities(&user.role),
    })
}
