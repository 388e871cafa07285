//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the models expect to interact with driven adapters
//! (stores, credential hashing, clocks). Each trait exposes strongly typed
//! errors so adapters map their failures into predictable variants instead
//! of returning `anyhow::Result`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::comment::{Comment, CommentDraft, CommentPatch, CommentQuery};
use super::error::Error as DomainError;
use super::user::{PasswordHashString, User, UserDraft, UserPatch, UserQuery};

/// Errors surfaced by DataStore adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A uniqueness constraint on the named field was violated.
    #[error("store rejected a duplicate value for {field}")]
    Duplicate { field: String },
    /// The store failed or is unreachable.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    /// Helper for uniqueness violations.
    pub fn duplicate(field: impl Into<String>) -> Self {
        Self::Duplicate {
            field: field.into(),
        }
    }

    /// Helper for connectivity and query failures.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field } => Self::conflict(format!("{field} already in use")),
            StoreError::Unavailable { message } => Self::unavailable(message),
        }
    }
}

/// Generic persistence port consumed by the models.
///
/// One implementation exists per entity; the associated types pin down the
/// record, query, and patch shapes the adapter understands. `save` assigns
/// the record identifier, `fetch` returns matches in insertion order, and
/// `update` reports how many records were touched.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Record content without an identifier.
    type Draft: Send + Sync;
    /// Stored record, identifier included.
    type Record: Send + Sync;
    /// Lookup shape.
    type Query: Send + Sync;
    /// Mutation shape.
    type Patch: Send + Sync;

    /// Persist a draft; the store assigns the identifier and returns the
    /// stored record.
    async fn save(&self, draft: Self::Draft) -> Result<Self::Record, StoreError>;

    /// Fetch every record matching the query, in insertion order.
    async fn fetch(&self, query: &Self::Query) -> Result<Vec<Self::Record>, StoreError>;

    /// Apply a patch to every record matching the query; returns the number
    /// of records affected.
    async fn update(&self, query: &Self::Query, patch: Self::Patch) -> Result<u64, StoreError>;
}

/// DataStore instantiation for user records.
pub type UserStore =
    dyn DataStore<Draft = UserDraft, Record = User, Query = UserQuery, Patch = UserPatch>;

/// DataStore instantiation for comment records.
pub type CommentStore = dyn DataStore<
        Draft = CommentDraft,
        Record = Comment,
        Query = CommentQuery,
        Patch = CommentPatch,
    >;

/// Errors surfaced by credential hashing adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashingError {
    /// The hashing primitive itself failed.
    #[error("credential hashing failed: {message}")]
    Failed { message: String },
}

impl HashingError {
    /// Helper for hashing failures.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

impl From<HashingError> for DomainError {
    fn from(err: HashingError) -> Self {
        Self::internal(err.to_string())
    }
}

/// Pluggable credential-hashing strategy.
///
/// Implementations must salt every hash and compare in constant time so the
/// algorithm can be upgraded without touching model call signatures.
pub trait CredentialHasher: Send + Sync {
    /// Compute a fresh salted hash of the plaintext.
    fn hash(&self, password: &str) -> Result<PasswordHashString, HashingError>;

    /// Verify the plaintext against a stored hash in constant time.
    fn verify(&self, hash: &PasswordHashString, password: &str) -> bool;
}

/// Clock port so models can stamp timestamps without reaching for ambient
/// time, which keeps them deterministic under test.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Production clock reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn duplicate_maps_to_conflict() {
        let err = DomainError::from(StoreError::duplicate("email"));
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert!(err.message().contains("email"));
    }

    #[rstest]
    fn unavailable_maps_to_unavailable() {
        let err = DomainError::from(StoreError::unavailable("connection refused"));
        assert_eq!(err.code(), ErrorCode::Unavailable);
    }

    #[rstest]
    fn hashing_failures_map_to_internal() {
        let err = DomainError::from(HashingError::failed("out of memory"));
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn system_clock_does_not_go_backwards() {
        let clock = SystemClock;
        let first = clock.now_utc();
        let second = clock.now_utc();
        assert!(second >= first);
    }
}
