use axum::Form;
use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum_login::tower_sessions::Session;
use serde::Deserialize;

use crate::Error;
use crate::models::{AuthSession, Credentials, Signup};

/// Session key for the OAuth CSRF token
static SESSION_OAUTH_CSRF_TOKEN: &str = "oauth:csrf_token";

pub fn router() -> Router {
    Router::new()
        .route("/register", post(self::post::register))
        .route("/login", post(self::post::login))
        .route("/logout", get(self::get::logout))
        .route("/auth/discord", get(self::get::discord))
        .route("/auth/discord/callback", get(self::get::discord_callback))
}

mod post {
    use super::*;

    pub async fn register(auth: AuthSession, Form(signup): Form<Signup>) -> Response {
        match auth.backend.register(&signup.email, &signup.password).await {
            Ok(user) => {
                tracing::info!("User {} registered", user.id);
                Redirect::to("/").into_response()
            }
            Err(err @ Error::DuplicateUser) => {
                tracing::info!("Failed to register user: Email already exists");
                err.into_response()
            }
            Err(err) => {
                tracing::error!("Failed to register user: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }

    pub async fn login(mut auth: AuthSession, Form(credentials): Form<Credentials>) -> Response {
        let user = match auth.authenticate(credentials).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                return (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
                    .into_response();
            }
            Err(err) => {
                tracing::error!("Failed to login user: {}", err);
                return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
            }
        };
        match auth.login(&user).await {
            Ok(_) => {
                tracing::info!("User {} logged in", user.id);
                Redirect::to("/").into_response()
            }
            Err(err) => {
                tracing::error!("Failed to login user {}: {}", user.id, err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}

mod get {
    use super::*;

    /// Query parameters Discord appends to the callback redirect.
    #[derive(Deserialize)]
    pub struct CallbackParams {
        /// CSRF state token to be validated against the session value.
        pub state: String,
        /// Authorization code for the token exchange.
        pub code: String,
    }

    pub async fn logout(mut auth: AuthSession) -> Response {
        match auth.logout().await {
            Ok(_) => Redirect::to("/").into_response(),
            Err(err) => {
                tracing::error!("Failed to logout user: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }

    pub async fn discord(auth: AuthSession, session: Session) -> Result<Response, Error> {
        let (url, csrf_token) = auth.backend.authorize_url();

        // Stored for verification during the callback
        session
            .insert(SESSION_OAUTH_CSRF_TOKEN, csrf_token.secret())
            .await?;

        Ok(Redirect::temporary(url.as_str()).into_response())
    }

    pub async fn discord_callback(
        mut auth: AuthSession,
        session: Session,
        Query(params): Query<CallbackParams>,
    ) -> Result<Response, Error> {
        let stored_state: Option<String> = session.remove(SESSION_OAUTH_CSRF_TOKEN).await?;
        if stored_state.as_deref() != Some(params.state.as_str()) {
            return Err(Error::CsrfMismatch);
        }

        let profile = auth.backend.exchange_code(params.code).await?;
        let user = auth.backend.link_or_create(profile).await?;

        match auth.login(&user).await {
            Ok(_) => {
                tracing::info!("User {} logged in via Discord", user.id);
                Ok(Redirect::to("/").into_response())
            }
            Err(err) => {
                tracing::error!("Failed to login user {}: {}", user.id, err);
                Ok((StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response())
            }
        }
    }
}
