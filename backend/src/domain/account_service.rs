//! Registration, login, and profile use-cases over the credential store.

use std::sync::Arc;

use tokio::task;
use zeroize::Zeroizing;

use super::auth::{Credentials, Registration};
use super::error::Error;
use super::password::{self, DEFAULT_HASH_COST, PasswordHash};
use super::ports::{CredentialRecord, UserRepository, UserStoreError};
use super::user::{
    DEFAULT_ABOUT, DEFAULT_AVATAR, DEFAULT_NAME, ProfileAbout, ProfileName, User, UserId,
};
use super::web_url::WebUrl;
use crate::domain::ApiResult;

/// Account use-cases: registration, login, and profile maintenance.
///
/// Password hashing runs on the blocking thread pool so bcrypt's deliberate
/// slowness never stalls the async executor.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hash_cost: u32,
}

impl AccountService {
    /// Build a service over the given credential store.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            hash_cost: DEFAULT_HASH_COST,
        }
    }

    /// Override the bcrypt cost. Tests use the minimum cost to stay fast.
    #[must_use]
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Register a new account, filling omitted profile fields with the
    /// documented defaults. Fails with a conflict when the email is taken.
    pub async fn register(&self, registration: Registration) -> ApiResult<User> {
        let Registration {
            credentials,
            name,
            about,
            avatar,
        } = registration;

        let name = match name {
            Some(name) => name,
            None => default_name()?,
        };
        let about = match about {
            Some(about) => about,
            None => default_about()?,
        };
        let avatar = match avatar {
            Some(avatar) => avatar,
            None => default_avatar()?,
        };

        let user = User::new(
            UserId::random(),
            credentials.email().clone(),
            name,
            about,
            avatar,
        );
        let password_hash = self
            .hash(Zeroizing::new(credentials.password().to_owned()))
            .await?;

        let record = CredentialRecord {
            user: user.clone(),
            password_hash,
        };
        self.users
            .insert(&record)
            .await
            .map_err(map_user_store_error)?;

        tracing::info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    /// Authenticate credentials and return the account.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// response does not reveal which one was wrong.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<User> {
        let record = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_store_error)?;
        let Some(record) = record else {
            return Err(invalid_credentials());
        };

        let plaintext = Zeroizing::new(credentials.password().to_owned());
        let hash = record.password_hash.clone();
        let matches = task::spawn_blocking(move || password::verify_password(&plaintext, &hash))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))?;

        if matches {
            Ok(record.user)
        } else {
            Err(invalid_credentials())
        }
    }

    /// Fetch a user, failing with `NotFound` for unknown ids.
    pub async fn user_by_id(&self, id: UserId) -> ApiResult<User> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    /// Replace profile fields of the caller's own record. Either field may be
    /// omitted; omitting both is a validation error.
    pub async fn update_profile(
        &self,
        id: UserId,
        name: Option<ProfileName>,
        about: Option<ProfileAbout>,
    ) -> ApiResult<User> {
        if name.is_none() && about.is_none() {
            return Err(Error::invalid_request(
                "at least one of name or about must be provided",
            ));
        }

        let current = self.user_by_id(id).await?;
        let name = name.unwrap_or_else(|| current.name().clone());
        let about = about.unwrap_or_else(|| current.about().clone());

        self.users
            .update_profile(id, &name, &about)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    /// Replace the avatar of the caller's own record.
    pub async fn update_avatar(&self, id: UserId, avatar: WebUrl) -> ApiResult<User> {
        self.users
            .update_avatar(id, &avatar)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn hash(&self, plaintext: Zeroizing<String>) -> ApiResult<PasswordHash> {
        let cost = self.hash_cost;
        task::spawn_blocking(move || password::hash_password(&plaintext, cost))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("incorrect email or password")
}

fn default_name() -> ApiResult<ProfileName> {
    ProfileName::new(DEFAULT_NAME)
        .map_err(|err| Error::internal(format!("invalid default profile name: {err}")))
}

fn default_about() -> ApiResult<ProfileAbout> {
    ProfileAbout::new(DEFAULT_ABOUT)
        .map_err(|err| Error::internal(format!("invalid default profile about: {err}")))
}

fn default_avatar() -> ApiResult<WebUrl> {
    WebUrl::new(DEFAULT_AVATAR)
        .map_err(|err| Error::internal(format!("invalid default avatar url: {err}")))
}

/// Map credential-store failures onto the API error taxonomy.
pub(crate) fn map_user_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => {
            tracing::error!(error = %message, "user store unavailable");
            Error::service_unavailable("user store is unavailable")
        }
        UserStoreError::Query { message } => {
            tracing::error!(error = %message, "user store query failed");
            Error::internal("user store query failed")
        }
        UserStoreError::DuplicateEmail => Error::conflict("email is already registered"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::outbound::persistence::MemoryUserRepository;
    use rstest::rstest;

    const TEST_COST: u32 = 4;

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoryUserRepository::default())).with_hash_cost(TEST_COST)
    }

    fn registration(email: &str, password: &str) -> Registration {
        Registration::new(
            Credentials::try_from_parts(email, password).expect("valid credentials"),
        )
    }

    #[tokio::test]
    async fn register_then_login_round_trips() {
        let service = service();
        let registered = service
            .register(registration("a@x.com", "pw1"))
            .await
            .expect("registration succeeds");

        let credentials = Credentials::try_from_parts("a@x.com", "pw1").expect("valid credentials");
        let logged_in = service.login(&credentials).await.expect("login succeeds");
        assert_eq!(logged_in.id(), registered.id());
    }

    #[tokio::test]
    async fn omitted_profile_fields_receive_defaults() {
        let service = service();
        let user = service
            .register(registration("a@x.com", "pw1"))
            .await
            .expect("registration succeeds");

        assert_eq!(user.name().as_ref(), DEFAULT_NAME);
        assert_eq!(user.about().as_ref(), DEFAULT_ABOUT);
        assert_eq!(user.avatar().as_str(), DEFAULT_AVATAR);
    }

    #[tokio::test]
    async fn second_registration_with_the_same_email_conflicts() {
        let service = service();
        service
            .register(registration("a@x.com", "pw1"))
            .await
            .expect("first registration succeeds");

        let err = service
            .register(registration("A@X.com", "pw2"))
            .await
            .expect_err("duplicate email must fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[case("nobody@x.com", "pw1")]
    #[case("a@x.com", "wrong")]
    #[tokio::test]
    async fn login_failures_are_indistinguishable(#[case] email: &str, #[case] password: &str) {
        let service = service();
        service
            .register(registration("a@x.com", "pw1"))
            .await
            .expect("registration succeeds");

        let credentials =
            Credentials::try_from_parts(email, password).expect("well-formed credentials");
        let err = service
            .login(&credentials)
            .await
            .expect_err("login must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "incorrect email or password");
    }

    #[tokio::test]
    async fn profile_update_keeps_omitted_fields() {
        let service = service();
        let user = service
            .register(registration("a@x.com", "pw1"))
            .await
            .expect("registration succeeds");

        let updated = service
            .update_profile(
                user.id(),
                Some(ProfileName::new("Ada Lovelace").expect("valid name")),
                None,
            )
            .await
            .expect("update succeeds");
        assert_eq!(updated.name().as_ref(), "Ada Lovelace");
        assert_eq!(updated.about().as_ref(), DEFAULT_ABOUT);
    }

    #[tokio::test]
    async fn empty_profile_update_is_a_validation_error() {
        let service = service();
        let user = service
            .register(registration("a@x.com", "pw1"))
            .await
            .expect("registration succeeds");

        let err = service
            .update_profile(user.id(), None, None)
            .await
            .expect_err("empty update must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn profile_update_for_unknown_user_is_not_found() {
        let service = service();
        let err = service
            .update_profile(
                UserId::random(),
                Some(ProfileName::new("Ada Lovelace").expect("valid name")),
                None,
            )
            .await
            .expect_err("unknown user must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn avatar_update_replaces_the_avatar() {
        let service = service();
        let user = service
            .register(registration("a@x.com", "pw1"))
            .await
            .expect("registration succeeds");

        let avatar = WebUrl::new("https://example.com/new.png").expect("valid url");
        let updated = service
            .update_avatar(user.id(), avatar.clone())
            .await
            .expect("update succeeds");
        assert_eq!(updated.avatar(), &avatar);
    }
}
