//! Persistence adapters for the DataStore port.
//!
//! Only the in-memory reference adapter lives here; durable engines are
//! external collaborators this repo does not implement.

mod memory;

pub use memory::{MemoryCommentStore, MemoryUserStore};
