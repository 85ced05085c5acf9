mod listing;
mod user;

pub use listing::*;
pub use user::*;

use oauth2::basic::{BasicClient, BasicErrorResponseType, BasicTokenType};
use oauth2::{
    AuthUrl, Client, ClientId, ClientSecret, EmptyExtraTokenFields, EndpointNotSet, EndpointSet,
    RedirectUrl, RevocationErrorResponseType, StandardErrorResponse, StandardRevocableToken,
    StandardTokenIntrospectionResponse, StandardTokenResponse, TokenUrl,
};

use crate::config::{Config, Site};
use crate::store::Collection;
use crate::utils::{Error, Mailer};

const DISCORD_AUTH_URL: &str = "https://discord.com/oauth2/authorize";
const DISCORD_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";

/// OAuth2 client configured for the Discord authorization-code flow.
pub type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Time-based record id. Not collision-checked.
pub fn next_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// Shared application backend: the two JSON collections, the Discord OAuth
/// client, and the optional alert mailer. Cloned per request by the auth
/// layer; every field is cheap to clone.
#[derive(Clone, Debug)]
pub struct Backend {
    pub users: Collection<User>,
    pub listings: Collection<Listing>,
    pub oauth_client: OAuth2Client,
    pub http_client: reqwest::Client,
    pub mailer: Option<Mailer>,
    pub admin_emails: Vec<String>,
    pub site: Site,
}

impl Backend {
    pub async fn new(config: &Config) -> Result<Self, Error> {
        let oauth_client = BasicClient::new(ClientId::new(config.discord_client_id.clone()))
            .set_client_secret(ClientSecret::new(config.discord_client_secret.clone()))
            .set_auth_uri(
                AuthUrl::new(DISCORD_AUTH_URL.to_string())
                    .map_err(|e| Error::OAuth(e.to_string()))?,
            )
            .set_token_uri(
                TokenUrl::new(DISCORD_TOKEN_URL.to_string())
                    .map_err(|e| Error::OAuth(e.to_string()))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(config.discord_redirect_url.clone())
                    .map_err(|e| Error::OAuth(e.to_string()))?,
            );

        // No redirects on the token-exchange client, per oauth2's SSRF guidance.
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let mailer = match &config.smtp {
            Some(smtp) => Some(Mailer::new(smtp)?),
            None => None,
        };

        Ok(Self {
            users: Collection::open(&config.users_db).await?,
            listings: Collection::open(&config.servers_db).await?,
            oauth_client,
            http_client,
            mailer,
            admin_emails: config.admin_emails.clone(),
            site: config.site.clone(),
        })
    }
}

pub type AuthSession = axum_login::AuthSession<Backend>;
