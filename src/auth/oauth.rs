use oauth2::{AuthorizationCode, CsrfToken, Scope, TokenResponse, url::Url};

use crate::Error;
use crate::models::{Backend, DiscordProfile};

const DISCORD_USER_URL: &str = "https://discord.com/api/users/@me";

impl Backend {
    /// Builds the Discord authorize redirect plus the CSRF state the caller
    /// must stash in the session for the callback.
    pub fn authorize_url(&self) -> (Url, CsrfToken) {
        self.oauth_client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("identify".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .url()
    }

    /// Exchanges the callback code for an access token and fetches the
    /// user's Discord profile with it.
    pub async fn exchange_code(&self, authorization_code: String) -> Result<DiscordProfile, Error> {
        let token = self
            .oauth_client
            .exchange_code(AuthorizationCode::new(authorization_code))
            .request_async(&self.http_client)
            .await
            .map_err(|e| Error::OAuth(e.to_string()))?;

        let profile = self
            .http_client
            .get(DISCORD_USER_URL)
            .header(
                "Authorization",
                format!("Bearer {}", token.access_token().secret()),
            )
            .send()
            .await?
            .json::<DiscordProfile>()
            .await?;

        Ok(profile)
    }
}
