use http::{header::AUTHORIZATION, HeaderMap};

use crate::error::AuthError;

pub trait BearerExtractor {
    fn extract_bearer<'a>(&self, headers: &'a HeaderMap) -> Result<&'a str, AuthError>;
}

/// Reads the credential from the `Authorization` header.
///
/// The header must consist of exactly two space separated parts, the first being `Bearer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBearerExtractor;

impl DefaultBearerExtractor {
    pub const fn new() -> Self {
        Self
    }

    pub fn parse_bearer(authorization: &str) -> Result<&str, AuthError> {
        let mut parts = authorization.split(' ');

        match (parts.next(), parts.next(), parts.next()) {
            (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
            _ => Err(AuthError::MalformedHeader),
        }
    }
}

impl BearerExtractor for DefaultBearerExtractor {
    #[tracing::instrument(skip_all)]
    fn extract_bearer<'a>(&self, headers: &'a HeaderMap) -> Result<&'a str, AuthError> {
        let authorization = headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AuthError::MalformedHeader)?;

        Self::parse_bearer(authorization)
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers_with(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(authorization).expect("Invalid header value"),
        );
        headers
    }

    #[test]
    fn missing_header() {
        let headers = HeaderMap::new();

        assert_eq!(
            DefaultBearerExtractor::new().extract_bearer(&headers),
            Err(AuthError::MissingHeader)
        );
    }

    #[test]
    fn extracts_token() {
        let headers = headers_with("Bearer abc.def.ghi");

        assert_eq!(
            DefaultBearerExtractor::new().extract_bearer(&headers),
            Ok("abc.def.ghi")
        );
    }

    #[test]
    fn rejects_malformed_headers() {
        for authorization in [
            "Basic abc",
            "bearer abc",
            "Bearer",
            "Bearer ",
            "Bearer abc def",
            "Bearer  abc",
            "abc",
        ] {
            let headers = headers_with(authorization);

            assert_eq!(
                DefaultBearerExtractor::new().extract_bearer(&headers),
                Err(AuthError::MalformedHeader),
                "{authorization}"
            );
        }
    }

    #[test]
    fn rejects_non_ascii_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfa").expect("Invalid header value"),
        );

        assert_eq!(
            DefaultBearerExtractor::new().extract_bearer(&headers),
            Err(AuthError::MalformedHeader)
        );
    }
}
