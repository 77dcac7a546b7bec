use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Sent back by signup/login. Failures keep HTTP 200 and flip `success`,
/// which is what the dashboard's auth pages key off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: Option<String>,
    pub username: Option<String>,
    pub message: String,
    pub success: bool,
}

impl AuthResponse {
    pub fn failure(message: &str) -> Self {
        Self {
            token: None,
            username: None,
            message: message.to_string(),
            success: false,
        }
    }

    pub fn granted(token: String, username: String, message: &str) -> Self {
        Self {
            token: Some(token),
            username: Some(username),
            message: message.to_string(),
            success: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_response_has_no_token() {
        let response = AuthResponse::failure("Username is required");
        assert!(!response.success);
        assert!(response.token.is_none());
        assert!(response.username.is_none());
        assert_eq!(response.message, "Username is required");
    }

    #[test]
    fn test_granted_response_carries_token_and_username() {
        let response =
            AuthResponse::granted("tok".to_string(), "alice".to_string(), "Login successful");
        assert!(response.success);
        assert_eq!(response.token.as_deref(), Some("tok"));
        assert_eq!(response.username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_auth_request_tolerates_missing_fields() {
        let request: AuthRequest =
            serde_json::from_str(r#"{"username": "alice"}"#).expect("deserialize");
        assert_eq!(request.username.as_deref(), Some("alice"));
        assert!(request.email.is_none());
        assert!(request.password.is_none());
    }
}
