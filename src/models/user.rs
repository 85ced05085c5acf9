use serde::{Deserialize, Serialize};

/// A directory account. Either local (keyed by `email`, carries
/// `password_hash`) or federated through Discord (carries `discord_id`);
/// never required to have both.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("discord_id", &self.discord_id)
            .field("username", &self.username)
            .finish()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Signup {
    pub email: String,
    pub password: String,
}

/// The subset of `https://discord.com/api/users/@me` we consume.
#[derive(Clone, Debug, Deserialize)]
pub struct DiscordProfile {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
}

/// Outbound view of a user; the password hash never leaves the process.
#[derive(Clone, Debug, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub email: Option<String>,
    pub username: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
        }
    }
}
