//! Card use-cases: publishing, listing, deletion, and the like toggle.
//!
//! Ownership is enforced here, after authentication and before the store is
//! touched. Deletion is owner-only; likes are open to every authenticated
//! user whose account still exists.

use std::sync::Arc;

use chrono::Utc;

use super::account_service::map_user_store_error;
use super::card::{Card, CardId, CardName};
use super::error::Error;
use super::ports::{CardRepository, CardStoreError, UserRepository};
use super::user::UserId;
use super::web_url::WebUrl;
use crate::domain::ApiResult;

/// Card use-cases over the card store, with owner checks against the
/// credential store.
pub struct CardService {
    cards: Arc<dyn CardRepository>,
    users: Arc<dyn UserRepository>,
}

impl CardService {
    /// Build a service over the given stores.
    pub fn new(cards: Arc<dyn CardRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { cards, users }
    }

    /// All cards in creation order.
    pub async fn list(&self) -> ApiResult<Vec<Card>> {
        self.cards.list().await.map_err(map_card_store_error)
    }

    /// Publish a new card owned by `owner`.
    pub async fn publish(&self, owner: UserId, name: CardName, link: WebUrl) -> ApiResult<Card> {
        self.require_registered(owner).await?;

        let card = Card::new(CardId::random(), name, link, owner, Utc::now());
        self.cards
            .insert(&card)
            .await
            .map_err(map_card_store_error)?;

        tracing::info!(card_id = %card.id(), owner = %owner, "card published");
        Ok(card)
    }

    /// Delete a card; only its owner may do so.
    pub async fn remove(&self, id: CardId, caller: UserId) -> ApiResult<()> {
        let card = self
            .cards
            .find_by_id(id)
            .await
            .map_err(map_card_store_error)?
            .ok_or_else(card_not_found)?;

        if !card.is_owned_by(caller) {
            return Err(Error::forbidden("only the owner may delete a card"));
        }

        let deleted = self.cards.delete(id).await.map_err(map_card_store_error)?;
        if !deleted {
            // Lost a race with another delete of the same card.
            return Err(card_not_found());
        }

        tracing::info!(card_id = %id, owner = %caller, "card deleted");
        Ok(())
    }

    /// Add the caller to the card's like set; liking twice is a no-op.
    pub async fn like(&self, id: CardId, caller: UserId) -> ApiResult<Card> {
        self.require_registered(caller).await?;
        self.cards
            .add_like(id, caller)
            .await
            .map_err(map_card_store_error)?
            .ok_or_else(card_not_found)
    }

    /// Remove the caller from the card's like set; unliking a card the caller
    /// never liked is a no-op.
    pub async fn unlike(&self, id: CardId, caller: UserId) -> ApiResult<Card> {
        self.require_registered(caller).await?;
        self.cards
            .remove_like(id, caller)
            .await
            .map_err(map_card_store_error)?
            .ok_or_else(card_not_found)
    }

    /// A verified token is not enough for mutations: the subject must still
    /// exist in the credential store.
    async fn require_registered(&self, user: UserId) -> ApiResult<()> {
        let found = self
            .users
            .find_by_id(user)
            .await
            .map_err(map_user_store_error)?;
        if found.is_none() {
            return Err(Error::unauthorized("authorisation required"));
        }
        Ok(())
    }
}

fn card_not_found() -> Error {
    Error::not_found("card not found")
}

/// Map card-store failures onto the API error taxonomy.
fn map_card_store_error(error: CardStoreError) -> Error {
    match error {
        CardStoreError::Connection { message } => {
            tracing::error!(error = %message, "card store unavailable");
            Error::service_unavailable("card store is unavailable")
        }
        CardStoreError::Query { message } => {
            tracing::error!(error = %message, "card store query failed");
            Error::internal("card store query failed")
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::user::{Email, ProfileAbout, ProfileName, User};
    use crate::domain::{ErrorCode, PasswordHash, ports::CredentialRecord};
    use crate::outbound::persistence::{MemoryCardRepository, MemoryUserRepository};
    use rstest::rstest;

    struct Fixture {
        service: CardService,
        users: Arc<MemoryUserRepository>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(MemoryUserRepository::default());
        let cards = Arc::new(MemoryCardRepository::default());
        Fixture {
            service: CardService::new(cards, users.clone()),
            users,
        }
    }

    async fn registered_user(users: &MemoryUserRepository, email: &str) -> UserId {
        let user = User::new(
            UserId::random(),
            Email::new(email).expect("valid email"),
            ProfileName::new("Ada Lovelace").expect("valid name"),
            ProfileAbout::new("Mathematician").expect("valid about"),
            WebUrl::new("https://example.com/ada.png").expect("valid url"),
        );
        let id = user.id();
        users
            .insert(&CredentialRecord {
                user,
                password_hash: PasswordHash::from_digest("digest"),
            })
            .await
            .expect("insert succeeds");
        id
    }

    fn peaks_name() -> CardName {
        CardName::new("Peaks").expect("valid name")
    }

    fn peaks_link() -> WebUrl {
        WebUrl::new("http://x/y.png").expect("valid link")
    }

    #[tokio::test]
    async fn publishing_sets_the_owner_and_an_empty_like_set() {
        let Fixture { service, users } = fixture();
        let owner = registered_user(&users, "a@x.com").await;

        let card = service
            .publish(owner, peaks_name(), peaks_link())
            .await
            .expect("publish succeeds");
        assert_eq!(card.owner(), owner);
        assert!(card.likes().is_empty());

        let listed = service.list().await.expect("list succeeds");
        assert_eq!(listed, vec![card]);
    }

    #[tokio::test]
    async fn unregistered_owner_cannot_publish() {
        let Fixture { service, .. } = fixture();
        let err = service
            .publish(UserId::random(), peaks_name(), peaks_link())
            .await
            .expect_err("publish must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn only_the_owner_may_delete() {
        let Fixture { service, users } = fixture();
        let owner = registered_user(&users, "a@x.com").await;
        let other = registered_user(&users, "b@x.com").await;
        let card = service
            .publish(owner, peaks_name(), peaks_link())
            .await
            .expect("publish succeeds");

        let err = service
            .remove(card.id(), other)
            .await
            .expect_err("non-owner delete must fail");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(service.list().await.expect("list succeeds").len(), 1);

        service
            .remove(card.id(), owner)
            .await
            .expect("owner delete succeeds");
        let err = service
            .remove(card.id(), owner)
            .await
            .expect_err("repeat delete must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn liking_twice_leaves_the_like_set_unchanged() {
        let Fixture { service, users } = fixture();
        let owner = registered_user(&users, "a@x.com").await;
        let fan = registered_user(&users, "b@x.com").await;
        let card = service
            .publish(owner, peaks_name(), peaks_link())
            .await
            .expect("publish succeeds");

        let first = service.like(card.id(), fan).await.expect("like succeeds");
        let second = service
            .like(card.id(), fan)
            .await
            .expect("repeat like succeeds");
        assert_eq!(first.likes(), second.likes());
        assert_eq!(second.likes().len(), 1);
        assert!(second.likes().contains(&fan));
    }

    #[tokio::test]
    async fn unliking_a_card_never_liked_is_a_no_op() {
        let Fixture { service, users } = fixture();
        let owner = registered_user(&users, "a@x.com").await;
        let bystander = registered_user(&users, "b@x.com").await;
        let card = service
            .publish(owner, peaks_name(), peaks_link())
            .await
            .expect("publish succeeds");

        let unliked = service
            .unlike(card.id(), bystander)
            .await
            .expect("unlike succeeds");
        assert!(unliked.likes().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn like_and_unlike_of_an_unknown_card_are_not_found() {
        let Fixture { service, users } = fixture();
        let fan = registered_user(&users, "a@x.com").await;

        let err = service
            .like(CardId::random(), fan)
            .await
            .expect_err("like must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err = service
            .unlike(CardId::random(), fan)
            .await
            .expect_err("unlike must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn cards_list_in_creation_order() {
        let Fixture { service, users } = fixture();
        let owner = registered_user(&users, "a@x.com").await;

        let first = service
            .publish(owner, CardName::new("First").expect("valid name"), peaks_link())
            .await
            .expect("publish succeeds");
        let second = service
            .publish(owner, CardName::new("Second").expect("valid name"), peaks_link())
            .await
            .expect("publish succeeds");

        let ids: Vec<_> = service
            .list()
            .await
            .expect("list succeeds")
            .into_iter()
            .map(|card| card.id())
            .collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
    }
}
