use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    pub role: String,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_uses_camel_case_user_id() {
        let response = AuthResponse {
            token: "t".into(),
            username: "alice".into(),
            role: "owner".into(),
            user_id: Uuid::new_v4(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"userId\""));
        assert!(json.contains("\"token\""));
    }
}
