use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        password,
        principal::authorities,
        repo_types::NewUser,
    },
    error::AppError,
    state::AppState,
};

const DEFAULT_ROLE: &str = "owner";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_register(req: &RegisterRequest) -> Result<(), AppError> {
    if req.username.is_empty() || req.username.len() > 100 {
        return Err(AppError::Validation("Invalid username".into()));
    }
    if !is_valid_email(&req.email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    if req.password.len() < 8 {
        return Err(AppError::Validation("Password too short".into()));
    }
    Ok(())
}

/// Register a new user: uniqueness pre-checks, password hashing, a single
/// insert and a freshly issued token.
pub async fn register(state: &AppState, req: RegisterRequest) -> Result<AuthResponse, AppError> {
    validate_register(&req)?;

    if state.users.exists_by_username(&req.username).await? {
        warn!(username = %req.username, "registration rejected: username taken");
        return Err(AppError::DuplicateUsername);
    }
    if state.users.exists_by_email(&req.email).await? {
        warn!(email = %req.email, "registration rejected: email taken");
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = state
        .users
        .create(NewUser {
            id: Uuid::new_v4(),
            username: req.username.clone(),
            email: req.email,
            // Full name defaults to the username until profiles exist
            full_name: Some(req.username),
            password_hash,
            role: DEFAULT_ROLE.into(),
        })
        .await?;

    let token = state.jwt.sign(&user.username, authorities(&user.role))?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(AuthResponse {
        token,
        username: user.username,
        role: user.role,
        user_id: user.id,
    })
}

/// Authenticate a user by username and password. Unknown usernames and wrong
/// passwords are indistinguishable to the caller, and the unknown-username
/// path still pays the full hashing cost.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<AuthResponse, AppError> {
    let user = match state.users.find_by_username(&req.username).await? {
        Some(u) => u,
        None => {
            password::verify_dummy(&req.password);
            warn!(username = %req.username, "login failed: unknown username");
            return Err(AppError::InvalidCredentials);
        }
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        warn!(username = %user.username, user_id = %user.id, "login failed: password mismatch");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.jwt.sign(&user.username, authorities(&user.role))?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(AuthResponse {
        token,
        username: user.username,
        role: user.role,
        user_id: user.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: "Secret123".into(),
        }
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
    }

    #[tokio::test]
    async fn register_issues_token_with_matching_subject() {
        let state = AppState::fake();
        let resp = register(&state, register_request("alice", "a@x.com"))
            .await
            .expect("register");
        assert!(!resp.token.is_empty());
        assert_eq!(resp.role, "owner");
        assert_eq!(
            state.jwt.extract_subject(&resp.token).expect("subject"),
            "alice"
        );
        assert!(state.jwt.is_valid(&resp.token, "alice"));
    }

    #[tokio::test]
    async fn duplicate_username_fails_and_first_credential_survives() {
        let state = AppState::fake();
        register(&state, register_request("alice", "a@x.com"))
            .await
            .expect("first register");

        let err = register(&state, register_request("alice", "other@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUsername));

        // First registration still logs in
        let resp = login(
            &state,
            LoginRequest {
                username: "alice".into(),
                password: "Secret123".into(),
            },
        )
        .await
        .expect("login after duplicate attempt");
        assert_eq!(resp.username, "alice");
    }

    #[tokio::test]
    async fn duplicate_email_fails() {
        let state = AppState::fake();
        register(&state, register_request("alice", "a@x.com"))
            .await
            .expect("first register");
        let err = register(&state, register_request("bob", "a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let state = AppState::fake();
        let err = register(
            &state,
            RegisterRequest {
                username: "alice".into(),
                email: "a@x.com".into(),
                password: "short".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_username_are_indistinguishable() {
        let state = AppState::fake();
        register(&state, register_request("alice", "a@x.com"))
            .await
            .expect("register");

        let wrong_password = login(
            &state,
            LoginRequest {
                username: "alice".into(),
                password: "wrong".into(),
            },
        )
        .await
        .unwrap_err();
        let unknown_user = login(
            &state,
            LoginRequest {
                username: "nobody".into(),
                password: "whatever".into(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert_eq!(wrong_password.to_string(), "Invalid username or password");
    }
}
