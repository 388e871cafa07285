//! Shared helpers for HTTP adapter tests.

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;

use crate::domain::ports::{Clock, CredentialHasher, HashingError, SystemClock};
use crate::domain::{CommentService, PasswordHashString, UserService};
use crate::inbound::http::session::session_middleware;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{MemoryCommentStore, MemoryUserStore};

/// Cookie session middleware with an ephemeral key and `Secure` disabled so
/// plain-HTTP test requests round-trip the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    session_middleware(Key::generate(), false)
}

/// Deterministic hasher so handler tests stay fast; the Argon2 adapter has
/// its own coverage.
pub struct StubHasher;

impl CredentialHasher for StubHasher {
    fn hash(&self, password: &str) -> Result<PasswordHashString, HashingError> {
        Ok(PasswordHashString::new(format!("stub${password}")))
    }

    fn verify(&self, hash: &PasswordHashString, password: &str) -> bool {
        hash.as_str() == format!("stub${password}")
    }
}

/// Handler state over fresh in-memory stores and the stub hasher.
pub fn stub_state() -> HttpState {
    let users = UserService::new(Arc::new(MemoryUserStore::default()), Arc::new(StubHasher));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let comments = CommentService::new(Arc::new(MemoryCommentStore::default()), clock);
    HttpState::new(users, comments)
}
