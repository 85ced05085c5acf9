use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("File error: {0}")]
    File(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Password hash error: {0}")]
    PasswordHash(String),
    #[error("Session error: {0}")]
    Session(#[from] axum_login::tower_sessions::session::Error),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("OAuth error: {0}")]
    OAuth(String),
    #[error("Email error: {0}")]
    Email(#[from] lettre::transport::smtp::Error),
    #[error("Email address error: {0}")]
    EmailAddress(#[from] lettre::address::AddressError),
    #[error("Email build error: {0}")]
    EmailBuild(#[from] lettre::error::Error),
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),
    #[error("Invalid value for environment variable: {0}")]
    InvalidEnv(&'static str),
    #[error("User exists")]
    DuplicateUser,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Listing {0} not found")]
    ListingNotFound(String),
    #[error("Unknown moderation action: {0}")]
    UnknownAction(String),
    #[error("CSRF state mismatch during OAuth callback")]
    CsrfMismatch,
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        Error::PasswordHash(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::DuplicateUser => (StatusCode::CONFLICT, "User exists".to_string()),
            // Which of the two occurred stays in the logs, never in the response.
            Error::UserNotFound | Error::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            Error::ListingNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Error::UnknownAction(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::CsrfMismatch => (
                StatusCode::BAD_REQUEST,
                "There was an issue logging you in, please try again.".to_string(),
            ),
            _ => {
                tracing::error!("Request failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };
        (status, message).into_response()
    }
}
