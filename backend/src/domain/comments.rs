//! Content model: comment records.
//!
//! Mirrors the user model's shape: storage through the [`CommentStore`]
//! port and timestamps through the [`Clock`] port. There is no structural
//! dependency on the user model; the author reference stays an
//! uninterpreted key.

use std::sync::Arc;

use tracing::info;

use super::comment::{AuthorRef, Comment, CommentBody, CommentDraft, CommentId, CommentQuery};
use super::comment::CommentValidationError;
use super::error::Error;
use super::ports::{Clock, CommentStore};

/// Storage- and transport-independent owner of comment records.
#[derive(Clone)]
pub struct CommentService {
    store: Arc<CommentStore>,
    clock: Arc<dyn Clock>,
}

impl CommentService {
    /// Create a service over an explicit store handle and clock.
    pub fn new(store: Arc<CommentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Persist a comment stamped with the current time.
    pub async fn create(&self, author: AuthorRef, body: &str) -> Result<Comment, Error> {
        let body = CommentBody::new(body).map_err(map_validation_error)?;
        let draft = CommentDraft {
            author,
            body,
            created_at: self.clock.now_utc(),
        };
        let comment = self.store.save(draft).await?;
        info!(comment_id = %comment.id(), author = %comment.author(), "comment created");
        Ok(comment)
    }

    /// Fetch a comment by identifier; a miss is [`ErrorCode::NotFound`].
    ///
    /// [`ErrorCode::NotFound`]: super::error::ErrorCode::NotFound
    pub async fn get(&self, id: &CommentId) -> Result<Comment, Error> {
        let mut found = self.store.fetch(&CommentQuery::ById(id.clone())).await?;
        found
            .pop()
            .ok_or_else(|| Error::not_found(format!("no comment with id {id}")))
    }

    /// Every comment, in creation order. Author data is not joined in;
    /// callers combine with the user model if they need it.
    pub async fn all(&self) -> Result<Vec<Comment>, Error> {
        Ok(self.store.fetch(&CommentQuery::All).await?)
    }

    /// Comments by one author reference, in creation order.
    pub async fn all_by_author(&self, author: &AuthorRef) -> Result<Vec<Comment>, Error> {
        Ok(self
            .store
            .fetch(&CommentQuery::ByAuthor(author.clone()))
            .await?)
    }
}

fn map_validation_error(err: CommentValidationError) -> Error {
    Error::invalid_request(err.to_string())
}
