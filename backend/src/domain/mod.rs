//! Domain entities, models, and ports.
//!
//! Purpose: own the user and comment records, their invariants, and the
//! contracts (DataStore, credential hashing, clock) that keep the models
//! independent of storage engines and transports. Nothing in this tree
//! imports actix types; inbound adapters do all request/response mapping.

pub mod auth;
pub mod comment;
pub mod comments;
pub mod error;
pub mod ports;
pub mod user;
pub mod users;

pub use self::auth::{CredentialValidationError, Credentials};
pub use self::comment::{
    AuthorRef, Comment, CommentBody, CommentId, CommentValidationError, COMMENT_BODY_MAX,
};
pub use self::comments::CommentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::user::{
    DisplayName, EmailAddress, PasswordHashString, User, UserId, UserValidationError,
    DISPLAY_NAME_MAX,
};
pub use self::users::UserService;
