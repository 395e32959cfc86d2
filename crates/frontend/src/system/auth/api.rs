use contracts::domain::a001_payroll::api::LOGIN_PATH;
use contracts::system::auth::{LoginRequest, LoginResponse};
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, ApiError};

/// Login with username and password
pub async fn login(username: String, password: String) -> Result<LoginResponse, ApiError> {
    let request = LoginRequest { username, password };

    let response = Request::post(&api_url(LOGIN_PATH))
        .json(&request)
        .map_err(|e| ApiError::Transport(format!("Failed to serialize request: {}", e)))?
        .send()
        .await
        .map_err(|e| ApiError::Transport(format!("Failed to send request: {}", e)))?;

    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_response(response.status(), &body));
    }

    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| ApiError::Transport(format!("Failed to parse response: {}", e)))
}
