use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::{header, StatusCode};
use serde::Serialize;

/// Every way a gated request can be refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingHeader,
    #[error("Authorization header is not in the form: `Bearer xyz`.")]
    MalformedHeader,
    #[error("Unable to find a signing key for the token.")]
    UnknownKey,
    #[error("Token signature could not be verified.")]
    BadSignature,
    #[error("Incorrect claims, please check the audience and issuer.")]
    InvalidClaims,
    #[error("Token expired.")]
    Expired,
    #[error("You are not authorized to access this resource.")]
    NoPermissionsClaim,
    #[error("Permission not found.")]
    PermissionDenied,
    #[error("Unable to authenticate.")]
    UpstreamUnavailable,
}

impl AuthError {
    pub const fn status(&self) -> StatusCode {
        match self {
            AuthError::NoPermissionsClaim | AuthError::PermissionDenied => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Reason code carried in the `error` field of the response body.
    pub const fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::UnknownKey => "unknown_key",
            AuthError::BadSignature => "bad_signature",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::Expired => "token_expired",
            AuthError::NoPermissionsClaim => "no_permissions_claim",
            AuthError::PermissionDenied => "permission_denied",
            AuthError::UpstreamUnavailable => "upstream_unavailable",
        }
    }
}

#[derive(Debug, Serialize)]
struct AuthErrorBody {
    success: bool,
    code: u16,
    error: &'static str,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!(err = %self, code = self.code(), "Refused");

        let status_code = self.status();

        let body = Json(AuthErrorBody {
            success: false,
            code: status_code.as_u16(),
            error: self.code(),
            message: self.to_string(),
        });

        if status_code == StatusCode::UNAUTHORIZED {
            return (status_code, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }

        (status_code, body).into_response()
    }
}

impl From<AuthError> for Response {
    fn from(value: AuthError) -> Self {
        value.into_response()
    }
}

/// Failures raised by the resource handlers once a request got past its gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status();

        if status_code.is_server_error() {
            tracing::error!(err = %self, "Request failed");
        }

        let body = Json(ApiErrorBody {
            success: false,
            error: status_code.as_u16(),
            message: self.to_string(),
        });

        (status_code, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        serde_json::from_slice(&bytes).expect("Body is not json")
    }

    #[test]
    fn authentication_failures_are_401_and_authorization_failures_are_403() {
        for err in [
            AuthError::MissingHeader,
            AuthError::MalformedHeader,
            AuthError::UnknownKey,
            AuthError::BadSignature,
            AuthError::InvalidClaims,
            AuthError::Expired,
            AuthError::UpstreamUnavailable,
        ] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED, "{err:?}");
        }

        for err in [AuthError::NoPermissionsClaim, AuthError::PermissionDenied] {
            assert_eq!(err.status(), StatusCode::FORBIDDEN, "{err:?}");
        }
    }

    #[tokio::test]
    async fn auth_error_renders_json_body_and_challenge() {
        let response = AuthError::MissingHeader.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let body = body_json(response).await;

        assert_eq!(body["success"], false);
        assert_eq!(body["code"], 401);
        assert_eq!(body["error"], "missing_header");
        assert_eq!(body["message"], "Authorization header is expected.");
    }

    #[tokio::test]
    async fn forbidden_has_no_challenge() {
        let response = AuthError::PermissionDenied.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());

        let body = body_json(response).await;

        assert_eq!(body["code"], 403);
        assert_eq!(body["error"], "permission_denied");
    }

    #[tokio::test]
    async fn upstream_failure_degrades_to_generic_message() {
        let body = body_json(AuthError::UpstreamUnavailable.into_response()).await;

        assert_eq!(body["message"], "Unable to authenticate.");
    }

    #[tokio::test]
    async fn api_error_renders_status_in_body() {
        let response = ApiError::NotFound(String::from("drink not found")).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;

        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 404);
        assert_eq!(body["message"], "drink not found");
    }
}
