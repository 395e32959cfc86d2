use axum::{extract::Json, http::StatusCode};
use contracts::domain::a001_payroll::ErrorResponse;
use contracts::system::auth::{LoginRequest, LoginResponse};

use crate::shared::data::db::get_connection;
use crate::system::{auth::jwt, users::service as user_service};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// POST /api/admin/login
pub async fn login(Json(request): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    let conn = get_connection().map_err(internal)?;

    let user = user_service::verify_credentials(conn, &request.username, &request.password)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            tracing::warn!("Failed login for '{}'", request.username);
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Sai tên đăng nhập hoặc mật khẩu")),
            )
        })?;

    let token = jwt::generate_access_token(&user.id, &user.username).map_err(internal)?;

    tracing::info!("User '{}' logged in", user.username);
    Ok(Json(LoginResponse {
        token,
        username: user.username,
    }))
}

fn internal(e: anyhow::Error) -> (StatusCode, Json<ErrorResponse>) {
    tracing::error!("Login failed: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error")),
    )
}
