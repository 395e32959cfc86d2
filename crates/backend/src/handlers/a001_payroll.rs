use axum::extract::{Json, Multipart};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Local;
use contracts::domain::a001_payroll::api::{
    SAMPLE_BUNDLE_FILE_NAME, SAMPLE_FILE_NAME, UPLOAD_FIELD_PREFIX, XLSX_CONTENT_TYPE,
    ZIP_CONTENT_TYPE,
};
use contracts::domain::a001_payroll::{ErrorResponse, PayrollListResponse, UploadResponse};

use crate::domain::a001_payroll::sample;
use crate::domain::a001_payroll::service::{self, UploadError, UploadedFile};
use crate::shared::data::db::get_connection;
use crate::system::auth::extractor::CurrentUser;

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

/// GET /api/admin/payrolls
pub async fn list(CurrentUser(_user): CurrentUser) -> ApiResult<PayrollListResponse> {
    let conn = get_connection().map_err(internal)?;
    let response = service::list_with_stats(conn).await.map_err(internal)?;
    Ok(Json(response))
}

/// POST /api/admin/upload
///
/// Multipart body; every part named `file*` is one workbook.
pub async fn upload(
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<UploadResponse> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_string();
        if !name.starts_with(UPLOAD_FIELD_PREFIX) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());
        let bytes = field.bytes().await.map_err(bad_request)?;
        files.push(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    tracing::info!("User '{}' uploads {} file(s)", user.username, files.len());

    let conn = get_connection().map_err(internal)?;
    match service::import_files(conn, files).await {
        Ok(response) => {
            tracing::info!(
                "Upload by '{}': {} records from {} file(s)",
                user.username,
                response.total_records,
                response.files_processed
            );
            Ok(Json(response))
        }
        Err(UploadError::Invalid(e)) => {
            tracing::warn!("Upload rejected: {}", e);
            Err(bad_request(e))
        }
        Err(UploadError::Other(e)) => Err(internal(e)),
    }
}

/// GET /api/admin/download-sample
pub async fn download_sample() -> Result<Response, ApiError> {
    let bytes = sample::build_sample_workbook(Local::now().date_naive()).map_err(internal)?;
    Ok(attachment(bytes, XLSX_CONTENT_TYPE, SAMPLE_FILE_NAME))
}

/// GET /api/admin/download-multiple-samples
pub async fn download_sample_bundle() -> Result<Response, ApiError> {
    let bytes = sample::build_sample_bundle(Local::now().date_naive()).map_err(internal)?;
    Ok(attachment(bytes, ZIP_CONTENT_TYPE, SAMPLE_BUNDLE_FILE_NAME))
}

fn attachment(bytes: Vec<u8>, content_type: &str, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn bad_request(e: impl std::fmt::Display) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string())))
}

fn internal(e: anyhow::Error) -> ApiError {
    tracing::error!("Payroll request failed: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error")),
    )
}
