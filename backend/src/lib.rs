//! Backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` owns the models and ports,
//! `middleware` holds the request pipeline stages, `inbound` maps transport
//! to the domain, and `outbound` implements the driven ports.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::{CurrentIdentity, RequireIdentity, ResolveIdentity};
