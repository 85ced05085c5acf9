use std::collections::HashSet;

use async_trait::async_trait;
use axum_login::{AuthUser, AuthnBackend, AuthzBackend, UserId};

use crate::Error;
use crate::models::{Backend, Credentials, User};

impl AuthUser for User {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn session_auth_hash(&self) -> &[u8] {
        // Federated accounts have no password; their identity is the stable
        // record id.
        match &self.password_hash {
            Some(hash) => hash.as_bytes(),
            None => self.id.as_bytes(),
        }
    }
}

#[async_trait]
impl AuthnBackend for Backend {
    type User = User;
    type Error = Error;
    type Credentials = Credentials;

    async fn authenticate(
        &self,
        Credentials { email, password }: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        match self.verify_credentials(&email, &password).await {
            Ok(user) => Ok(Some(user)),
            // Collapsed for the login form; the log line keeps the two
            // failure kinds apart.
            Err(err @ (Error::UserNotFound | Error::InvalidCredentials)) => {
                tracing::info!("Login rejected for {}: {}", email, err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        // A stale id (record removed out-of-band) is "not authenticated",
        // not an error.
        self.users.find(|user| &user.id == user_id).await
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    Admin,
}

#[async_trait]
impl AuthzBackend for Backend {
    type Permission = Permission;

    async fn get_user_permissions(
        &self,
        user: &Self::User,
    ) -> Result<HashSet<Self::Permission>, Self::Error> {
        let mut permissions = HashSet::new();
        if let Some(email) = &user.email {
            // Byte-exact match against the configured role list.
            if self.admin_emails.iter().any(|admin| admin == email) {
                permissions.insert(Permission::Admin);
            }
        }
        Ok(permissions)
    }
}
