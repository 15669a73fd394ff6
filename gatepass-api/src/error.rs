use serde_json::Value;

/// Fallback shown when the backend gives us nothing usable
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Error code the backend attaches to a 401 caused by an invalid or
/// expired token. Only this code terminates the session; any other 401
/// (wrong password, missing permission) is an ordinary API error.
pub const TOKEN_NOT_VALID: &str = "token_not_valid";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The session token was rejected. The client has already been logged
    /// out; the only move left is the login page.
    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("{0}")]
    Config(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Resolve a human-readable message from an error body: the backend's
/// `error` field wins, then `message`, then the generic fallback.
pub fn resolve_message(body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .unwrap_or(GENERIC_ERROR)
        .to_string()
}

/// Whether a 401 body carries the terminal invalid-token code
pub fn is_token_not_valid(body: &Value) -> bool {
    body.get("code").and_then(Value::as_str) == Some(TOKEN_NOT_VALID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_resolution_order() {
        assert_eq!(
            resolve_message(&json!({"error": "Card declined", "message": "ignored"})),
            "Card declined"
        );
        assert_eq!(
            resolve_message(&json!({"message": "Event not found"})),
            "Event not found"
        );
        assert_eq!(resolve_message(&json!({"detail": "opaque"})), GENERIC_ERROR);
        assert_eq!(resolve_message(&json!(null)), GENERIC_ERROR);
    }

    #[test]
    fn test_token_not_valid_detection() {
        assert!(is_token_not_valid(&json!({"code": "token_not_valid"})));
        assert!(!is_token_not_valid(&json!({"code": "authentication_failed"})));
        assert!(!is_token_not_valid(&json!({"error": "Invalid credentials"})));
    }
}
