//! REST client for the venue backend.
//!
//! [`ApiClient`] speaks JSON over HTTP, authenticates with the bearer token
//! of an injected [`crate::session::SessionContext`] and implements the
//! backend traits of every aggregate.

mod auth;
mod client;
mod clients;
pub mod error;
mod events;
mod items;
mod notifications;
mod payments;

pub use client::ApiClient;
pub use error::ApiError;
