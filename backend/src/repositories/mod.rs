//! Database repositories
//!
//! Provides the credential store used by the auth flow.

pub mod memory;
pub mod user;

pub use memory::InMemoryUserStore;
pub use user::{NewUser, PgUserStore, StoreError, UserRecord, UserStore};
