//! `usersroles-core` — value types and the error model shared by the store.
//!
//! This crate is intentionally free of I/O and hashing concerns.

pub mod error;
pub mod principal;
pub mod realm;

pub use error::{RecordSource, StoreError, StoreResult};
pub use principal::Principal;
pub use realm::Realm;
