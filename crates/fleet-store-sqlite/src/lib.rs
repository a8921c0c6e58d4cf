//! SQLite backend for the fleet workspace.
//!
//! Each named collection is one row holding its JSON body. Access goes
//! through [`tokio_rusqlite`] so queries run on a dedicated thread without
//! blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
