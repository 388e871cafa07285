//! In-memory DataStore adapters.
//!
//! The reference implementation of the store contract: identifiers are
//! assigned on `save`, results come back in insertion order, and the email
//! uniqueness constraint lives here rather than in the user model. Backed by
//! a `Vec` behind an `RwLock`; a poisoned lock is reported as the store
//! being unavailable rather than panicking the request.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::comment::{Comment, CommentDraft, CommentPatch, CommentQuery};
use crate::domain::ports::{DataStore, StoreError};
use crate::domain::user::{User, UserDraft, UserPatch, UserQuery};
use crate::domain::{CommentId, UserId};

fn user_matches(user: &User, query: &UserQuery) -> bool {
    match query {
        UserQuery::ById(id) => user.id() == id,
        UserQuery::ByEmail(email) => user.email() == email,
    }
}

/// In-memory user store enforcing email uniqueness.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    records: RwLock<Vec<User>>,
}

#[async_trait]
impl DataStore for MemoryUserStore {
    type Draft = UserDraft;
    type Record = User;
    type Query = UserQuery;
    type Patch = UserPatch;

    async fn save(&self, draft: UserDraft) -> Result<User, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::unavailable("user store lock poisoned"))?;
        if records.iter().any(|user| user.email() == &draft.email) {
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
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::unavailable("user store lock poisoned"))?;
        Ok(records
            .iter()
            .filter(|user| user_matches(user, query))
            .cloned()
            .collect())
    }

    async fn update(&self, query: &UserQuery, patch: UserPatch) -> Result<u64, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::unavailable("user store lock poisoned"))?;
        let UserPatch::PasswordHash(hash) = patch;
        let mut affected = 0;
        for user in records.iter_mut().filter(|user| user_matches(user, query)) {
            user.set_password_hash(hash.clone());
            affected += 1;
        }
        Ok(affected)
    }
}

/// In-memory comment store preserving creation order.
#[derive(Debug, Default)]
pub struct MemoryCommentStore {
    records: RwLock<Vec<Comment>>,
}

#[async_trait]
impl DataStore for MemoryCommentStore {
    type Draft = CommentDraft;
    type Record = Comment;
    type Query = CommentQuery;
    type Patch = CommentPatch;

    async fn save(&self, draft: CommentDraft) -> Result<Comment, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::unavailable("comment store lock poisoned"))?;
        let comment = Comment::new(
            CommentId::random(),
            draft.author,
            draft.body,
            draft.created_at,
        );
        records.push(comment.clone());
        Ok(comment)
    }

    async fn fetch(&self, query: &CommentQuery) -> Result<Vec<Comment>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::unavailable("comment store lock poisoned"))?;
        Ok(records
            .iter()
            .filter(|comment| match query {
                CommentQuery::All => true,
                CommentQuery::ById(id) => comment.id() == id,
                CommentQuery::ByAuthor(author) => comment.author() == author,
            })
            .cloned()
            .collect())
    }

    async fn update(&self, _query: &CommentQuery, patch: CommentPatch) -> Result<u64, StoreError> {
        // CommentPatch is uninhabited; comments are immutable once posted.
        match patch {}
    }
}
