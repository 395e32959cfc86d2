//! HTTP client for the payroll endpoints.
//!
//! [`PayrollApi`] is the seam the dashboard controller talks to; the browser
//! build uses [`HttpPayrollApi`].

use async_trait::async_trait;
use contracts::domain::a001_payroll::api::{upload_field_name, PAYROLLS_PATH, UPLOAD_PATH};
use contracts::domain::a001_payroll::{PayrollListResponse, UploadResponse};
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, bearer, ApiError};

#[async_trait(?Send)]
pub trait PayrollApi {
    /// Selected-file handle sent by `upload`
    type File: Clone;

    async fn list(&self, token: &str) -> Result<PayrollListResponse, ApiError>;

    async fn upload(&self, token: &str, files: &[Self::File]) -> Result<UploadResponse, ApiError>;

    /// Binary body of a GET to `path`
    async fn download(&self, token: &str, path: &str) -> Result<Vec<u8>, ApiError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HttpPayrollApi;

#[async_trait(?Send)]
impl PayrollApi for HttpPayrollApi {
    type File = web_sys::File;

    async fn list(&self, token: &str) -> Result<PayrollListResponse, ApiError> {
        let response = Request::get(&api_url(PAYROLLS_PATH))
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to send request: {}", e)))?;

        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(response.status(), &body));
        }

        response
            .json::<PayrollListResponse>()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to parse response: {}", e)))
    }

    async fn upload(&self, token: &str, files: &[web_sys::File]) -> Result<UploadResponse, ApiError> {
        use wasm_bindgen::JsCast;
        use web_sys::{FormData, Headers, RequestInit, RequestMode, Response};

        let js_err = |e: wasm_bindgen::JsValue| ApiError::Transport(format!("{e:?}"));

        let form_data = FormData::new().map_err(js_err)?;
        for (index, file) in files.iter().enumerate() {
            form_data
                .append_with_blob_and_filename(&upload_field_name(index), file, &file.name())
                .map_err(js_err)?;
        }

        let headers = Headers::new().map_err(js_err)?;
        headers
            .set("Authorization", &bearer(token))
            .map_err(js_err)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_headers(&headers);
        opts.set_body(&form_data);

        let request =
            web_sys::Request::new_with_str_and_init(&api_url(UPLOAD_PATH), &opts).map_err(js_err)?;

        let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".to_string()))?;
        let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_err)?;
        let resp: Response = resp_value.dyn_into().map_err(js_err)?;

        let text = wasm_bindgen_futures::JsFuture::from(resp.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        let text: String = text.as_string().unwrap_or_default();

        if !resp.ok() {
            return Err(ApiError::from_response(resp.status(), &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| ApiError::Transport(format!("Failed to parse response: {}", e)))
    }

    async fn download(&self, token: &str, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = Request::get(&api_url(path))
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to send request: {}", e)))?;

        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(response.status(), &body));
        }

        response
            .binary()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response: {}", e)))
    }
}
