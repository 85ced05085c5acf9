use std::path::PathBuf;

use serde::Serialize;

use crate::Error;

/// Display metadata handed to the home page as-is.
#[derive(Clone, Debug, Serialize)]
pub struct Site {
    pub name: String,
    pub slogan: String,
    pub theme: String,
}

#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub recipient: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub users_db: PathBuf,
    pub servers_db: PathBuf,
    pub port: u16,
    pub site: Site,
    /// Emails granted the admin permission. Matched byte-exact, so
    /// `Admin@X.com` and `admin@x.com` are different admins.
    pub admin_emails: Vec<String>,
    pub discord_client_id: String,
    pub discord_client_secret: String,
    pub discord_redirect_url: String,
    /// Present only when EMAIL_ALERTS is enabled.
    pub smtp: Option<SmtpConfig>,
}

fn required(name: &'static str) -> Result<String, Error> {
    std::env::var(name).map_err(|_| Error::MissingEnv(name))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let smtp = match std::env::var("EMAIL_ALERTS").as_deref() {
            Ok("true") | Ok("1") => Some(SmtpConfig {
                host: required("SMTP_HOST")?,
                port: match std::env::var("SMTP_PORT") {
                    Ok(port) => Some(port.parse().map_err(|_| Error::InvalidEnv("SMTP_PORT"))?),
                    Err(_) => None,
                },
                username: required("SMTP_USERNAME")?,
                password: required("SMTP_PASSWORD")?,
                recipient: required("ALERT_RECIPIENT")?,
            }),
            _ => None,
        };

        Ok(Self {
            users_db: PathBuf::from(optional("USERS_DB", "users.json")),
            servers_db: PathBuf::from(optional("SERVERS_DB", "servers.json")),
            port: optional("PORT", "3000")
                .parse()
                .map_err(|_| Error::InvalidEnv("PORT"))?,
            site: Site {
                name: optional("SITE_NAME", "Cordly"),
                slogan: optional("SITE_SLOGAN", "Find your community"),
                theme: optional("SITE_THEME", "dark"),
            },
            admin_emails: required("ADMIN_EMAILS")?
                .split(',')
                .map(|email| email.trim().to_string())
                .filter(|email| !email.is_empty())
                .collect(),
            discord_client_id: required("DISCORD_CLIENT_ID")?,
            discord_client_secret: required("DISCORD_CLIENT_SECRET")?,
            discord_redirect_url: required("DISCORD_REDIRECT_URL")?,
            smtp,
        })
    }
}
