//! Comment entity and its value types.
//!
//! The author reference is an uninterpreted key supplied by the caller; this
//! module has no dependency on the user model and never checks that the
//! reference points at an existing user.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the comment value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    EmptyId,
    InvalidId,
    EmptyAuthorRef,
    EmptyBody,
    BodyTooLong { max: usize },
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "comment id must not be empty"),
            Self::InvalidId => write!(f, "comment id must be a valid UUID"),
            Self::EmptyAuthorRef => write!(f, "author reference must not be empty"),
            Self::EmptyBody => write!(f, "comment text must not be empty"),
            Self::BodyTooLong { max } => {
                write!(f, "comment text must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// Stable comment identifier stored as a UUID, assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentId(Uuid);

impl CommentId {
    /// Validate and construct a [`CommentId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, CommentValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(CommentValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| CommentValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`CommentId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CommentId> for String {
    fn from(value: CommentId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for CommentId {
    type Error = CommentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque author reference.
///
/// Callers usually pass a user id here, but the content model treats the
/// value as an uninterpreted key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthorRef(String);

impl AuthorRef {
    /// Validate and construct an [`AuthorRef`]; the value is trimmed and must
    /// be non-empty afterwards.
    pub fn new(value: impl Into<String>) -> Result<Self, CommentValidationError> {
        let trimmed = value.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(CommentValidationError::EmptyAuthorRef);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the reference as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AuthorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AuthorRef> for String {
    fn from(value: AuthorRef) -> Self {
        value.0
    }
}

impl TryFrom<String> for AuthorRef {
    type Error = CommentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for a comment body.
pub const COMMENT_BODY_MAX: usize = 4096;

/// Comment text, non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentBody(String);

impl CommentBody {
    /// Validate and construct a [`CommentBody`]. The text is stored as given;
    /// only the trimmed view is used for the emptiness check.
    pub fn new(body: impl Into<String>) -> Result<Self, CommentValidationError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(CommentValidationError::EmptyBody);
        }
        if body.chars().count() > COMMENT_BODY_MAX {
            return Err(CommentValidationError::BodyTooLong {
                max: COMMENT_BODY_MAX,
            });
        }
        Ok(Self(body))
    }

    /// Borrow the text as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<CommentBody> for String {
    fn from(value: CommentBody) -> Self {
        value.0
    }
}

impl TryFrom<String> for CommentBody {
    type Error = CommentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A posted comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    id: CommentId,
    author: AuthorRef,
    body: CommentBody,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Assemble a comment record. Called by DataStore adapters once the store
    /// has assigned an identifier.
    pub fn new(
        id: CommentId,
        author: AuthorRef,
        body: CommentBody,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author,
            body,
            created_at,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &CommentId {
        &self.id
    }

    /// Opaque author reference supplied at creation.
    pub fn author(&self) -> &AuthorRef {
        &self.author
    }

    /// Comment text.
    pub fn body(&self) -> &CommentBody {
        &self.body
    }

    /// Creation timestamp stamped by the content model.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Record content handed to the DataStore for persistence; the store assigns
/// the identifier.
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub author: AuthorRef,
    pub body: CommentBody,
    pub created_at: DateTime<Utc>,
}

/// Lookup shapes understood by comment DataStore adapters.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentQuery {
    All,
    ById(CommentId),
    ByAuthor(AuthorRef),
}

/// Comments are immutable once posted, so no patch shape is inhabited.
#[derive(Debug, Clone)]
pub enum CommentPatch {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", CommentValidationError::EmptyAuthorRef)]
    #[case("   ", CommentValidationError::EmptyAuthorRef)]
    fn invalid_author_refs(#[case] raw: &str, #[case] expected: CommentValidationError) {
        let err = AuthorRef::new(raw).expect_err("invalid author ref must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn author_refs_are_opaque() {
        // Anything non-empty is accepted; the model never interprets it.
        let author = AuthorRef::new("legacy:42").expect("valid ref");
        assert_eq!(author.as_str(), "legacy:42");
    }

    #[rstest]
    #[case("")]
    #[case(" \n\t ")]
    fn blank_bodies_are_rejected(#[case] raw: &str) {
        let err = CommentBody::new(raw).expect_err("blank body must fail");
        assert_eq!(err, CommentValidationError::EmptyBody);
    }

    #[rstest]
    fn overlong_bodies_are_rejected() {
        let raw = "x".repeat(COMMENT_BODY_MAX + 1);
        let err = CommentBody::new(raw).expect_err("overlong body must fail");
        assert_eq!(
            err,
            CommentValidationError::BodyTooLong {
                max: COMMENT_BODY_MAX
            }
        );
    }

    #[rstest]
    fn bodies_keep_interior_whitespace() {
        let body = CommentBody::new("  hello world  ").expect("valid body");
        assert_eq!(body.as_str(), "  hello world  ");
    }

    #[rstest]
    #[case("not-a-uuid")]
    fn invalid_comment_ids(#[case] raw: &str) {
        let err = CommentId::new(raw).expect_err("invalid id must fail");
        assert_eq!(err, CommentValidationError::InvalidId);
    }
}
