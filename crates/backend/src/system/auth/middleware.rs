use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use contracts::domain::a001_payroll::ErrorResponse;

/// Middleware that requires a valid bearer token.
/// The decoded claims are put into request extensions for [`super::extractor::CurrentUser`].
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return unauthorized("Missing bearer token");
    };

    let claims = match super::jwt::validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Rejected token: {:#}", e);
            return unauthorized("Invalid or expired token");
        }
    };

    req.extensions_mut().insert(claims);
    next.run(req).await
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
