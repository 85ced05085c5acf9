use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::Error;
use crate::models::{Backend, DiscordProfile, User, next_id};

/// Placeholder hash verified when the email is unknown or the account has no
/// password, so every failed login pays the same argon2 cost and failure
/// kinds cannot be told apart by latency. A match against it never
/// authenticates.
const PLACEHOLDER_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

impl Backend {
    /// Creates a local account. The duplicate check is a linear scan inside
    /// the collection's write lock, so two racing registrations cannot both
    /// land.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, Error> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        let user = User {
            id: next_id(),
            email: Some(email.to_string()),
            password_hash: Some(password_hash),
            discord_id: None,
            username: None,
        };

        self.users
            .update(|users| {
                if users.iter().any(|u| u.email.as_deref() == Some(email)) {
                    return Err(Error::DuplicateUser);
                }
                users.push(user.clone());
                Ok(())
            })
            .await?;

        Ok(user)
    }

    /// Checks an email/password pair against the stored argon2 hash.
    /// `UserNotFound` and `InvalidCredentials` stay distinct here; the public
    /// login surface collapses them.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, Error> {
        let user = self
            .users
            .find(|u| u.email.as_deref() == Some(email))
            .await?;

        // Missing users and passwordless federated accounts are checked
        // against the placeholder so all failure paths do the same work.
        let stored_hash = user
            .as_ref()
            .and_then(|u| u.password_hash.as_deref())
            .unwrap_or(PLACEHOLDER_HASH);

        let parsed_hash = PasswordHash::new(stored_hash)?;
        let verified = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();

        match user {
            Some(user) if verified && user.password_hash.is_some() => Ok(user),
            Some(_) => Err(Error::InvalidCredentials),
            None => Err(Error::UserNotFound),
        }
    }

    /// Resolves a Discord profile to a local record, creating one on first
    /// sight. Repeat logins return the stored record unmodified; the profile
    /// is deliberately not refreshed (stable identity).
    pub async fn link_or_create(&self, profile: DiscordProfile) -> Result<User, Error> {
        self.users
            .update(|users| {
                if let Some(user) = users.iter().find(|u| u.discord_id.as_deref() == Some(&profile.id))
                {
                    return Ok(user.clone());
                }
                let user = User {
                    id: next_id(),
                    email: profile.email.clone(),
                    password_hash: None,
                    discord_id: Some(profile.id.clone()),
                    username: Some(profile.username.clone()),
                };
                users.push(user.clone());
                Ok(user)
            })
            .await
    }
}

#[cfg(test)]
mod test {
    use crate::Error;
    use crate::models::DiscordProfile;
    use crate::test_support::test_backend;

    #[tokio::test]
    async fn register_stores_a_salted_hash_not_the_password() {
        let (_dir, backend) = test_backend().await;
        let user = backend.register("a@x.com", "pw1").await.unwrap();

        let hash = user.password_hash.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("pw1"));
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected_and_adds_nothing() {
        let (_dir, backend) = test_backend().await;
        backend.register("a@x.com", "pw1").await.unwrap();

        let second = backend.register("a@x.com", "other").await;
        assert!(matches!(second, Err(Error::DuplicateUser)));
        assert_eq!(backend.users.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn verify_credentials_distinguishes_failures_internally() {
        let (_dir, backend) = test_backend().await;
        let created = backend.register("a@x.com", "pw1").await.unwrap();

        let ok = backend.verify_credentials("a@x.com", "pw1").await.unwrap();
        assert_eq!(ok.id, created.id);

        let wrong = backend.verify_credentials("a@x.com", "pw2").await;
        assert!(matches!(wrong, Err(Error::InvalidCredentials)));

        let missing = backend.verify_credentials("b@x.com", "pw1").await;
        assert!(matches!(missing, Err(Error::UserNotFound)));
    }

    #[tokio::test]
    async fn failed_lookups_verify_against_the_placeholder_hash() {
        let (_dir, backend) = test_backend().await;
        backend.register("a@x.com", "pw1").await.unwrap();

        // The failure kind is still reported correctly after the
        // equal-cost placeholder verification.
        let missing = backend.verify_credentials("b@x.com", "pw1").await;
        assert!(matches!(missing, Err(Error::UserNotFound)));

        // A guess that happens to match the placeholder's preimage must
        // never authenticate anyone.
        let preimage = backend.verify_credentials("b@x.com", "hunter42").await;
        assert!(matches!(preimage, Err(Error::UserNotFound)));
    }

    #[tokio::test]
    async fn federated_account_never_passes_local_login() {
        let (_dir, backend) = test_backend().await;
        backend
            .link_or_create(DiscordProfile {
                id: "555".to_string(),
                username: "gamer".to_string(),
                email: Some("g@x.com".to_string()),
            })
            .await
            .unwrap();

        let result = backend.verify_credentials("g@x.com", "anything").await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));

        let preimage = backend.verify_credentials("g@x.com", "hunter42").await;
        assert!(matches!(preimage, Err(Error::InvalidCredentials)));
    }

    #[tokio::test]
    async fn link_or_create_is_idempotent_on_the_discord_id() {
        let (_dir, backend) = test_backend().await;
        let profile = DiscordProfile {
            id: "555".to_string(),
            username: "gamer".to_string(),
            email: Some("g@x.com".to_string()),
        };

        let first = backend.link_or_create(profile.clone()).await.unwrap();
        let second = backend
            .link_or_create(DiscordProfile {
                username: "renamed".to_string(),
                ..profile
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        // Stable identity: the stored profile is not refreshed.
        assert_eq!(second.username.as_deref(), Some("gamer"));
        assert_eq!(backend.users.load().await.unwrap().len(), 1);
    }
}
