//! In-memory store adapters.
//!
//! Back the unit and end-to-end tests, and let the server run without a
//! database. A poisoned lock is reported as a store error rather than a
//! panic so a failed request cannot wedge the whole process.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::card::{Card, CardId};
use crate::domain::ports::{
    CardRepository, CardStoreError, CredentialRecord, UserRepository, UserStoreError,
};
use crate::domain::user::{Email, ProfileAbout, ProfileName, User, UserId};
use crate::domain::web_url::WebUrl;

/// Credential store backed by a hash map under a read-write lock.
#[derive(Default)]
pub struct MemoryUserRepository {
    records: RwLock<HashMap<Uuid, CredentialRecord>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, record: &CredentialRecord) -> Result<(), UserStoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| UserStoreError::query("user store lock poisoned"))?;

        // Uniqueness check and insert happen under the same write lock.
        if records
            .values()
            .any(|existing| existing.user.email() == record.user.email())
        {
            return Err(UserStoreError::DuplicateEmail);
        }

        records.insert(record.user.id().as_uuid(), record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| UserStoreError::query("user store lock poisoned"))?;
        Ok(records.get(&id.as_uuid()).map(|record| record.user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<CredentialRecord>, UserStoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| UserStoreError::query("user store lock poisoned"))?;
        Ok(records
            .values()
            .find(|record| record.user.email() == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: UserId,
        name: &ProfileName,
        about: &ProfileAbout,
    ) -> Result<Option<User>, UserStoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| UserStoreError::query("user store lock poisoned"))?;
        let Some(record) = records.get_mut(&id.as_uuid()) else {
            return Ok(None);
        };
        record.user = record
            .user
            .clone()
            .with_profile(name.clone(), about.clone());
        Ok(Some(record.user.clone()))
    }

    async fn update_avatar(
        &self,
        id: UserId,
        avatar: &WebUrl,
    ) -> Result<Option<User>, UserStoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| UserStoreError::query("user store lock poisoned"))?;
        let Some(record) = records.get_mut(&id.as_uuid()) else {
            return Ok(None);
        };
        record.user = record.user.clone().with_avatar(avatar.clone());
        Ok(Some(record.user.clone()))
    }
}

/// Card store backed by a hash map under a read-write lock.
///
/// The write lock makes every like toggle an atomic read-modify-write, which
/// is what the port contract demands.
#[derive(Default)]
pub struct MemoryCardRepository {
    state: RwLock<CardState>,
}

#[derive(Default)]
struct CardState {
    cards: HashMap<Uuid, (u64, Card)>,
    next_seq: u64,
}

impl MemoryCardRepository {
    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, CardState>, CardStoreError> {
        self.state
            .read()
            .map_err(|_| CardStoreError::query("card store lock poisoned"))
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, CardState>, CardStoreError> {
        self.state
            .write()
            .map_err(|_| CardStoreError::query("card store lock poisoned"))
    }
}

#[async_trait]
impl CardRepository for MemoryCardRepository {
    async fn insert(&self, card: &Card) -> Result<(), CardStoreError> {
        let mut state = self.write_state()?;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.cards.insert(card.id().as_uuid(), (seq, card.clone()));
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Card>, CardStoreError> {
        let state = self.read_state()?;
        let mut entries: Vec<_> = state.cards.values().cloned().collect();
        entries.sort_by_key(|(seq, _)| *seq);
        Ok(entries.into_iter().map(|(_, card)| card).collect())
    }

    async fn find_by_id(&self, id: CardId) -> Result<Option<Card>, CardStoreError> {
        let state = self.read_state()?;
        Ok(state.cards.get(&id.as_uuid()).map(|(_, card)| card.clone()))
    }

    async fn delete(&self, id: CardId) -> Result<bool, CardStoreError> {
        let mut state = self.write_state()?;
        Ok(state.cards.remove(&id.as_uuid()).is_some())
    }

    async fn add_like(&self, id: CardId, user: UserId) -> Result<Option<Card>, CardStoreError> {
        let mut state = self.write_state()?;
        let Some((_, card)) = state.cards.get_mut(&id.as_uuid()) else {
            return Ok(None);
        };
        card.add_like(user);
        Ok(Some(card.clone()))
    }

    async fn remove_like(&self, id: CardId, user: UserId) -> Result<Option<Card>, CardStoreError> {
        let mut state = self.write_state()?;
        let Some((_, card)) = state.cards.get_mut(&id.as_uuid()) else {
            return Ok(None);
        };
        card.remove_like(user);
        Ok(Some(card.clone()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::PasswordHash;
    use crate::domain::card::CardName;
    use chrono::Utc;

    fn user(email: &str) -> CredentialRecord {
        CredentialRecord {
            user: User::new(
                UserId::random(),
                Email::new(email).expect("valid email"),
                ProfileName::new("Ada Lovelace").expect("valid name"),
                ProfileAbout::new("Mathematician").expect("valid about"),
                WebUrl::new("https://example.com/ada.png").expect("valid url"),
            ),
            password_hash: PasswordHash::from_digest("digest"),
        }
    }

    fn card(owner: UserId) -> Card {
        Card::new(
            CardId::random(),
            CardName::new("Peaks").expect("valid name"),
            WebUrl::new("http://x/y.png").expect("valid link"),
            owner,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn duplicate_emails_are_rejected_at_the_store_boundary() {
        let repo = MemoryUserRepository::default();
        repo.insert(&user("a@x.com")).await.expect("first insert");

        let err = repo
            .insert(&user("a@x.com"))
            .await
            .expect_err("duplicate insert must fail");
        assert_eq!(err, UserStoreError::DuplicateEmail);
    }

    #[tokio::test]
    async fn lookups_by_email_return_the_credential_record() {
        let repo = MemoryUserRepository::default();
        let record = user("a@x.com");
        repo.insert(&record).await.expect("insert succeeds");

        let found = repo
            .find_by_email(record.user.email())
            .await
            .expect("lookup succeeds")
            .expect("record present");
        assert_eq!(found.user.id(), record.user.id());
        assert_eq!(found.password_hash, record.password_hash);
    }

    #[tokio::test]
    async fn like_toggles_are_idempotent_per_user() {
        let repo = MemoryCardRepository::default();
        let fan = UserId::random();
        let card = card(UserId::random());
        repo.insert(&card).await.expect("insert succeeds");

        let after_first = repo
            .add_like(card.id(), fan)
            .await
            .expect("add_like succeeds")
            .expect("card present");
        let after_second = repo
            .add_like(card.id(), fan)
            .await
            .expect("add_like succeeds")
            .expect("card present");
        assert_eq!(after_first.likes(), after_second.likes());

        let after_remove = repo
            .remove_like(card.id(), fan)
            .await
            .expect("remove_like succeeds")
            .expect("card present");
        assert!(after_remove.likes().is_empty());

        let after_repeat_remove = repo
            .remove_like(card.id(), fan)
            .await
            .expect("remove_like succeeds")
            .expect("card present");
        assert!(after_repeat_remove.likes().is_empty());
    }

    #[tokio::test]
    async fn like_toggles_on_an_unknown_card_return_none() {
        let repo = MemoryCardRepository::default();
        let result = repo
            .add_like(CardId::random(), UserId::random())
            .await
            .expect("call succeeds");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn listing_preserves_insertion_order() {
        let repo = MemoryCardRepository::default();
        let owner = UserId::random();
        let first = card(owner);
        let second = card(owner);
        repo.insert(&first).await.expect("insert succeeds");
        repo.insert(&second).await.expect("insert succeeds");

        let ids: Vec<_> = repo
            .list()
            .await
            .expect("list succeeds")
            .into_iter()
            .map(|card| card.id())
            .collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
    }

    #[tokio::test]
    async fn deleting_twice_reports_the_second_attempt_as_a_miss() {
        let repo = MemoryCardRepository::default();
        let card = card(UserId::random());
        repo.insert(&card).await.expect("insert succeeds");

        assert!(repo.delete(card.id()).await.expect("delete succeeds"));
        assert!(!repo.delete(card.id()).await.expect("delete succeeds"));
    }
}
