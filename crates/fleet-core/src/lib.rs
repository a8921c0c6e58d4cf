//! Core types and state engine for the fleet record keeper.
//!
//! This crate has no database dependencies. It owns the
//! entity model, the cross-entity rules, licence-expiry alerting and the
//! activity log; storage backends plug in through
//! [`store::CollectionStore`].

// Native `async fn` in trait impls; the trait declarations spell out `Send`.
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod alert;
pub mod assignment;
pub mod clock;
pub mod committed;
pub mod driver;
pub mod error;
pub mod log;
pub mod notification;
pub mod query;
pub mod repository;
pub mod retention;
pub mod store;
pub mod vehicle;
pub mod workspace;

pub use committed::Committed;
pub use error::{Error, Result};
pub use workspace::{Workspace, WorkspaceSettings};
