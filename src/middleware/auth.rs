use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::AdminCredentials;
use crate::error::AppError;
use crate::AppState;

/// HTTP Basic authentication for the admin routes.
/// With no admin password configured every request is rejected.
pub async fn admin_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_basic);

    match (&state.admin_credentials, presented) {
        (Some(expected), Some((username, password)))
            if expected.username == username && expected.password == password =>
        {
            next.run(req).await
        }
        (None, _) => {
            tracing::warn!("Admin request rejected: no admin password configured");
            unauthorized()
        }
        _ => {
            tracing::warn!("Admin request rejected: invalid credentials");
            unauthorized()
        }
    }
}

fn parse_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn unauthorized() -> Response {
    let mut response =
        AppError::Unauthorized("Admin credentials required".to_string()).into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"admin\""),
    );
    response
}

/// Value for an `Authorization` header carrying these credentials.
pub fn basic_header(credentials: &AdminCredentials) -> String {
    let raw = format!("{}:{}", credentials.username, credentials.password);
    format!("Basic {}", STANDARD.encode(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_header_round_trip() {
        let creds = AdminCredentials {
            username: "admin".to_string(),
            password: "s3cr:et".to_string(),
        };
        let header = basic_header(&creds);
        assert_eq!(
            parse_basic(&header),
            Some(("admin".to_string(), "s3cr:et".to_string()))
        );
    }

    #[test]
    fn test_parse_basic_rejects_other_schemes() {
        assert_eq!(parse_basic("Bearer abc"), None);
        assert_eq!(parse_basic("Basic !!!not-base64"), None);
    }
}
