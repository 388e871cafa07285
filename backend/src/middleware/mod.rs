//! Request pipeline stages.
//!
//! Ordering is a security invariant: the session middleware must wrap
//! [`ResolveIdentity`], which must run before [`RequireIdentity`], which must
//! wrap every protected route. The route wiring in `inbound::http` is the
//! single place that encodes this.

pub mod access;
pub mod identity;

pub use access::RequireIdentity;
pub use identity::{CurrentIdentity, ResolveIdentity};
