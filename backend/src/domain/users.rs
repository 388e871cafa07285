//! User model: credential records and authentication.
//!
//! The service talks to storage exclusively through the [`UserStore`] port
//! and to credential hashing through the [`CredentialHasher`] port. It never
//! receives or returns transport objects, and it has no knowledge of the
//! content model.

use std::sync::Arc;

use tracing::{debug, info};

use super::error::Error;
use super::ports::{CredentialHasher, UserStore};
use super::user::{DisplayName, EmailAddress, User, UserDraft, UserId, UserPatch, UserQuery};

/// Storage- and transport-independent owner of user records.
#[derive(Clone)]
pub struct UserService {
    store: Arc<UserStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserService {
    /// Create a service over an explicit store handle and hashing strategy.
    pub fn new(store: Arc<UserStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    /// Create a user record with a freshly salted credential hash.
    ///
    /// The plaintext is hashed and dropped; only the hash reaches the store.
    /// A duplicate email surfaces as [`ErrorCode::Conflict`], store failures
    /// as [`ErrorCode::Unavailable`].
    ///
    /// [`ErrorCode::Conflict`]: super::error::ErrorCode::Conflict
    /// [`ErrorCode::Unavailable`]: super::error::ErrorCode::Unavailable
    pub async fn create(
        &self,
        display_name: DisplayName,
        email: EmailAddress,
        password: &str,
    ) -> Result<User, Error> {
        if password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        let password_hash = self.hasher.hash(password)?;
        let draft = UserDraft {
            display_name,
            email,
            password_hash,
        };
        let user = self.store.save(draft).await?;
        info!(user_id = %user.id(), "user created");
        Ok(user)
    }

    /// Fetch a user by identifier; a miss is [`ErrorCode::NotFound`].
    ///
    /// [`ErrorCode::NotFound`]: super::error::ErrorCode::NotFound
    pub async fn get(&self, id: &UserId) -> Result<User, Error> {
        let mut found = self.store.fetch(&UserQuery::ById(id.clone())).await?;
        found
            .pop()
            .ok_or_else(|| Error::not_found(format!("no user with id {id}")))
    }

    /// Check credentials against the stored hash.
    ///
    /// A mismatch or an unknown email is a normal outcome, not an error:
    /// both return `Ok(None)`. Only store failures surface as errors.
    pub async fn authenticate(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Option<User>, Error> {
        let mut found = self.store.fetch(&UserQuery::ByEmail(email.clone())).await?;
        let Some(user) = found.pop() else {
            debug!(%email, "authentication failed: unknown email");
            return Ok(None);
        };
        if self.hasher.verify(user.password_hash(), password) {
            Ok(Some(user))
        } else {
            debug!(%email, "authentication failed: credential mismatch");
            Ok(None)
        }
    }

    /// Replace the stored credential hash.
    ///
    /// Returns whether a record was affected; an absent id is
    /// [`ErrorCode::NotFound`].
    ///
    /// [`ErrorCode::NotFound`]: super::error::ErrorCode::NotFound
    pub async fn change_password(&self, id: &UserId, new_password: &str) -> Result<bool, Error> {
        if new_password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        let password_hash = self.hasher.hash(new_password)?;
        let affected = self
            .store
            .update(
                &UserQuery::ById(id.clone()),
                UserPatch::PasswordHash(password_hash),
            )
            .await?;
        if affected == 0 {
            return Err(Error::not_found(format!("no user with id {id}")));
        }
        info!(user_id = %id, "password changed");
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Model-level coverage with stub ports; no transport, no real hashing.
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{DataStore, HashingError, StoreError};
    use crate::domain::user::PasswordHashString;
    use crate::domain::ErrorCode;

    /// Deterministic hasher for tests; real salting is covered by the
    /// Argon2 adapter's own tests.
    struct StubHasher;

    impl CredentialHasher for StubHasher {
        fn hash(&self, password: &str) -> Result<PasswordHashString, HashingError> {
            Ok(PasswordHashString::new(format!("stub${password}")))
        }

        fn verify(&self, hash: &PasswordHashString, password: &str) -> bool {
            hash.as_str() == format!("stub${password}")
        }
    }

    #[derive(Default)]
    struct StubUserStore {
        records: Mutex<Vec<User>>,
        fail_with: Mutex<Option<StoreError>>,
    }

    impl StubUserStore {
        fn set_failure(&self, failure: StoreError) {
            *self.fail_with.lock().expect("lock") = Some(failure);
        }

        fn take_failure(&self) -> Option<StoreError> {
            self.fail_with.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl DataStore for StubUserStore {
        type Draft = UserDraft;
        type Record = User;
        type Query = UserQuery;
        type Patch = UserPatch;

        async fn save(&self, draft: UserDraft) -> Result<User, StoreError> {
            if let Some(failure) = self.take_failure() {
                return Err(failure);
            }
            let mut records = self.records.lock().expect("lock");
            if records.iter().any(|u| u.email() == &draft.email) {
                return Err(StoreError::duplicate("email"));
            }
            let user = User::new(
                UserId::random(),
                draft.display_name,
                draft.email,
                draft.password_hash,
            );
            records.push(user.clone());
            Ok(user)
        }

        async fn fetch(&self, query: &UserQuery) -> Result<Vec<User>, StoreError> {
            if let Some(failure) = self.take_failure() {
                return Err(failure);
            }
            let records = self.records.lock().expect("lock");
            Ok(records
                .iter()
                .filter(|u| match query {
                    UserQuery::ById(id) => u.id() == id,
                    UserQuery::ByEmail(email) => u.email() == email,
                })
                .cloned()
                .collect())
        }

        async fn update(&self, query: &UserQuery, patch: UserPatch) -> Result<u64, StoreError> {
            if let Some(failure) = self.take_failure() {
                return Err(failure);
            }
            let mut records = self.records.lock().expect("lock");
            let UserPatch::PasswordHash(hash) = patch;
            let mut affected = 0;
            for record in records.iter_mut().filter(|u| match query {
                UserQuery::ById(id) => u.id() == id,
                UserQuery::ByEmail(email) => u.email() == email,
            }) {
                record.set_password_hash(hash.clone());
                affected += 1;
            }
            Ok(affected)
        }
    }

    fn service() -> (UserService, std::sync::Arc<StubUserStore>) {
        let store = std::sync::Arc::new(StubUserStore::default());
        let service = UserService::new(store.clone(), Arc::new(StubHasher));
        (service, store)
    }

    fn name(raw: &str) -> DisplayName {
        DisplayName::new(raw).expect("valid display name")
    }

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw).expect("valid email")
    }

    #[tokio::test]
    async fn create_then_authenticate_returns_the_same_user() {
        let (service, _store) = service();
        let created = service
            .create(name("alice"), email("alice@x.com"), "pw123")
            .await
            .expect("create");
        let authenticated = service
            .authenticate(&email("alice@x.com"), "pw123")
            .await
            .expect("authenticate")
            .expect("credentials match");
        assert_eq!(authenticated.id(), created.id());
    }

    #[rstest]
    #[case("bad")]
    #[case("pw1234")]
    #[case("PW123")]
    fn wrong_passwords_yield_none(#[case] wrong: &str) {
        actix_rt::System::new().block_on(async {
            let (service, _store) = service();
            service
                .create(name("alice"), email("alice@x.com"), "pw123")
                .await
                .expect("create");
            let outcome = service
                .authenticate(&email("alice@x.com"), wrong)
                .await
                .expect("authenticate");
            assert!(outcome.is_none());
        });
    }

    #[tokio::test]
    async fn unknown_email_is_a_normal_outcome() {
        let (service, _store) = service();
        let outcome = service
            .authenticate(&email("ghost@x.com"), "pw")
            .await
            .expect("authenticate");
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn plaintext_never_reaches_the_store() {
        let (service, store) = service();
        service
            .create(name("alice"), email("alice@x.com"), "pw123")
            .await
            .expect("create");
        let records = store.records.lock().expect("lock");
        let stored = records.first().expect("one record");
        assert_ne!(stored.password_hash().as_str(), "pw123");
    }

    #[tokio::test]
    async fn change_password_rotates_the_credential() {
        let (service, _store) = service();
        let created = service
            .create(name("alice"), email("alice@x.com"), "pw123")
            .await
            .expect("create");
        let affected = service
            .change_password(created.id(), "pw456")
            .await
            .expect("change password");
        assert!(affected);

        let with_old = service
            .authenticate(&email("alice@x.com"), "pw123")
            .await
            .expect("authenticate");
        assert!(with_old.is_none());

        let with_new = service
            .authenticate(&email("alice@x.com"), "pw456")
            .await
            .expect("authenticate")
            .expect("new password matches");
        assert_eq!(with_new.id(), created.id());
    }

    #[tokio::test]
    async fn change_password_for_missing_user_is_not_found() {
        let (service, _store) = service();
        let err = service
            .change_password(&UserId::random(), "pw456")
            .await
            .expect_err("absent id must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn empty_passwords_fail_validation() {
        let (service, _store) = service();
        let err = service
            .create(name("alice"), email("alice@x.com"), "")
            .await
            .expect_err("empty password must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn duplicate_email_surfaces_as_conflict() {
        let (service, _store) = service();
        service
            .create(name("alice"), email("alice@x.com"), "pw123")
            .await
            .expect("first create");
        let err = service
            .create(name("alice2"), email("alice@x.com"), "pw456")
            .await
            .expect_err("duplicate email must fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn store_failures_surface_as_unavailable() {
        let (service, store) = service();
        store.set_failure(StoreError::unavailable("connection refused"));
        let err = service
            .get(&UserId::random())
            .await
            .expect_err("store failure must propagate");
        assert_eq!(err.code(), ErrorCode::Unavailable);
    }

    #[tokio::test]
    async fn get_for_missing_user_is_not_found() {
        let (service, _store) = service();
        let err = service
            .get(&UserId::random())
            .await
            .expect_err("absent id must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
