//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the two models and remain testable without real storage.

use crate::domain::{CommentService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential and identity records.
    pub users: UserService,
    /// Comment records.
    pub comments: CommentService,
}

impl HttpState {
    /// Bundle the model services the handlers need.
    pub fn new(users: UserService, comments: CommentService) -> Self {
        Self { users, comments }
    }
}
