//! Portal error types.

use thiserror::Error;

/// Errors that can occur when talking to the school portal.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// The API envelope reported a failure.
    #[error("API error (state {state}): {message}")]
    Api { state: i64, message: String },

    /// The login captcha was wrong.
    #[error("incorrect captcha")]
    IncorrectCaptcha,

    /// The username or password was rejected.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// Login failed for another reason.
    #[error("login failed: {0}")]
    LoginFailed(String),

    /// The portal wants a captcha but the login cannot prompt for one.
    #[error("captcha required, please run 'myxb login' again")]
    CaptchaRequired,

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns `true` if saved credentials should be discarded.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidCredentials | ApiError::CaptchaRequired | ApiError::LoginFailed(_)
        )
    }
}
