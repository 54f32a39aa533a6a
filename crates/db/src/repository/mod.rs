//! Repository operations, implemented as methods on [`crate::SqlStore`].
//!
//! Every operation builds one statement, runs it on the store's pool and
//! returns a `StoreResult<T>`. No business logic lives here.

pub mod workspaces;

pub use workspaces::new_signup_token;
