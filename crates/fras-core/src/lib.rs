//! Core types and trait definitions for the FRAS attendance client.
//!
//! This crate is deliberately free of database and terminal dependencies.
//! The session state machine and the attendance query engine live here; the
//! data they operate on comes from the collaborator traits in [`slot`],
//! [`accounts`] and [`supplier`].

// Native `async fn` in traits; the trait definitions spell out `Send` bounds
// on the returned futures where it matters.
#![allow(async_fn_in_trait)]

pub mod accounts;
pub mod attendance;
pub mod dashboard;
pub mod error;
pub mod identity;
pub mod issue;
pub mod query;
pub mod session;
pub mod settings;
pub mod slot;
pub mod supplier;

pub use error::{Error, Result};
