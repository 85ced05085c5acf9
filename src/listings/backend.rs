use crate::Error;
use crate::models::{Backend, Listing, ListingStatus, ModerationAction, next_id};

impl Backend {
    /// Creates a listing in pending state. Name, URL and description are
    /// taken as submitted; moderation is the validation step.
    pub async fn submit_listing(
        &self,
        name: String,
        url: String,
        description: String,
        submitted_by: String,
    ) -> Result<Listing, Error> {
        let listing = Listing {
            id: next_id(),
            name,
            url,
            description,
            status: ListingStatus::Pending,
            submitted_by,
        };

        self.listings
            .update(|listings| {
                listings.push(listing.clone());
                Ok(())
            })
            .await?;

        Ok(listing)
    }

    /// Applies a moderation action to a listing. Admin input is trusted:
    /// there is no transition matrix, any status can be set from any other.
    pub async fn transition_listing(
        &self,
        id: &str,
        action: ModerationAction,
    ) -> Result<Listing, Error> {
        self.listings
            .update(|listings| {
                let listing = listings
                    .iter_mut()
                    .find(|listing| listing.id == id)
                    .ok_or_else(|| Error::ListingNotFound(id.to_string()))?;
                listing.status = action.target_status();
                Ok(listing.clone())
            })
            .await
    }

    pub async fn all_listings(&self) -> Result<Vec<Listing>, Error> {
        self.listings.load().await
    }
}

#[cfg(test)]
mod test {
    use crate::Error;
    use crate::models::{ListingStatus, ModerationAction};
    use crate::test_support::test_backend;

    #[tokio::test]
    async fn submit_always_starts_pending() {
        let (_dir, backend) = test_backend().await;
        let listing = backend
            .submit_listing(
                "Foo".to_string(),
                "http://foo".to_string(),
                "d".to_string(),
                "42".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(listing.status, ListingStatus::Pending);
        assert_eq!(listing.submitted_by, "42");

        let stored = backend.all_listings().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, ListingStatus::Pending);
    }

    #[tokio::test]
    async fn approve_transitions_to_approved() {
        let (_dir, backend) = test_backend().await;
        let listing = backend
            .submit_listing(
                "Foo".to_string(),
                "http://foo".to_string(),
                "d".to_string(),
                "42".to_string(),
            )
            .await
            .unwrap();

        let updated = backend
            .transition_listing(&listing.id, ModerationAction::Approve)
            .await
            .unwrap();
        assert_eq!(updated.status, ListingStatus::Approved);

        let stored = backend.all_listings().await.unwrap();
        assert_eq!(stored[0].status, ListingStatus::Approved);
    }

    #[tokio::test]
    async fn ban_on_missing_listing_is_not_found() {
        let (_dir, backend) = test_backend().await;
        let result = backend.transition_listing("999", ModerationAction::Ban).await;
        assert!(matches!(result, Err(Error::ListingNotFound(id)) if id == "999"));
    }

    #[tokio::test]
    async fn unknown_action_fails_to_parse() {
        let action = "bogus".parse::<ModerationAction>();
        assert!(action.is_err());

        for (value, expected) in [
            ("approve", ListingStatus::Approved),
            ("suspend", ListingStatus::Suspended),
            ("ban", ListingStatus::Banned),
        ] {
            let action = value.parse::<ModerationAction>().unwrap();
            assert_eq!(action.target_status(), expected);
        }
    }
}
