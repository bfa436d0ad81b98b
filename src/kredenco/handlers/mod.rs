pub mod health;
pub use self::health::health;

pub mod register;
pub use self::register::register;

pub mod login;
pub use self::login::login;

// common functions for the handlers
use crate::auth::AuthError;
use axum::http::StatusCode;

/// Map the auth taxonomy to a response.
///
/// Infrastructure failures collapse into a generic 500; the cause is logged
/// at the point of failure and never echoed to the caller.
pub(crate) fn error_response(err: &AuthError) -> (StatusCode, String) {
    match err {
        AuthError::InvalidInput => (
            StatusCode::BAD_REQUEST,
            "Missing username or password".to_string(),
        ),
        AuthError::UsernameTaken => (
            StatusCode::CONFLICT,
            "Username already exists".to_string(),
        ),
        AuthError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "Invalid username or password".to_string(),
        ),
        AuthError::StoreUnavailable | AuthError::Internal => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_mapping() {
        let cases = [
            (AuthError::InvalidInput, StatusCode::BAD_REQUEST),
            (AuthError::UsernameTaken, StatusCode::CONFLICT),
            (AuthError::UserNotFound, StatusCode::NOT_FOUND),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::StoreUnavailable, StatusCode::INTERNAL_SERVER_ERROR),
            (AuthError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            let (got, _) = error_response(&err);
            assert_eq!(got, status, "{err}");
        }
    }

    #[test]
    fn test_internal_errors_stay_generic() {
        let (_, body) = error_response(&AuthError::StoreUnavailable);
        assert_eq!(body, "Internal server error");

        let (_, body) = error_response(&AuthError::Internal);
        assert_eq!(body, "Internal server error");
    }
}
