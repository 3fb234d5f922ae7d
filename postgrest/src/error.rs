//! Mapping HTTP failures onto [`BackendError`].

use pooja_search::BackendError;
use reqwest::StatusCode;

/// Error for a response that came back with a non-success status
pub(crate) fn from_status(status: StatusCode, body: String) -> BackendError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => BackendError::RateLimited,
        status => BackendError::Status {
            status: status.as_u16(),
            message: body,
        },
    }
}

/// Error for a request that produced no usable response
pub(crate) fn from_transport(error: &reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Unavailable(format!("timed out: {error}"))
    } else if error.is_decode() {
        BackendError::ResponseParseFailed(error.to_string())
    } else {
        BackendError::RequestFailed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_and_throttling_have_their_own_variants() {
        assert_eq!(from_status(StatusCode::UNAUTHORIZED, String::new()), BackendError::Unauthorized);
        assert_eq!(from_status(StatusCode::FORBIDDEN, String::new()), BackendError::Unauthorized);
        assert_eq!(from_status(StatusCode::TOO_MANY_REQUESTS, String::new()), BackendError::RateLimited);
    }

    #[test]
    fn other_statuses_keep_the_body() {
        assert_eq!(
            from_status(StatusCode::BAD_REQUEST, "column does not exist".to_string()),
            BackendError::Status {
                status: 400,
                message: "column does not exist".to_string(),
            }
        );
    }
}
