//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs and the error type
//! shared by every client call.

use contracts::domain::a001_payroll::ErrorResponse;
use thiserror::Error;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url(PAYROLLS_PATH);
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Value of the `Authorization` header
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 401: the stored credential is missing, invalid or expired
    #[error("unauthorized")]
    Unauthorized,
    /// Non-success status with an `{error}` body
    #[error("{0}")]
    Rejected(String),
    /// Non-success status without a readable body
    #[error("HTTP {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Classifies a non-success response from its status and body text.
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthorized;
        }
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(err) if !err.error.trim().is_empty() => ApiError::Rejected(err.error),
            _ => ApiError::Status(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_wins_over_body() {
        assert_eq!(
            ApiError::from_response(401, r#"{"error":"Invalid or expired token"}"#),
            ApiError::Unauthorized
        );
    }

    #[test]
    fn test_error_body_is_kept_verbatim() {
        assert_eq!(
            ApiError::from_response(400, r#"{"error":"File a.xlsx: thiếu cột \"CCCD\""}"#),
            ApiError::Rejected("File a.xlsx: thiếu cột \"CCCD\"".to_string())
        );
    }

    #[test]
    fn test_unreadable_body_keeps_status() {
        assert_eq!(ApiError::from_response(502, "<html>"), ApiError::Status(502));
        assert_eq!(ApiError::from_response(500, r#"{"error":""}"#), ApiError::Status(500));
    }

    #[test]
    fn test_bearer() {
        assert_eq!(bearer("abc"), "Bearer abc");
    }
}
