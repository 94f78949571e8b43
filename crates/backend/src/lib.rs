//! The contract between the chatbot client and its remote backend.
//!
//! The backend is someone else's service: a chat endpoint, a greeting
//! template endpoint and a handful of account endpoints. This crate defines
//! the data that crosses that boundary and the traits a backend
//! implementation has to provide. It contains no I/O.

#![deny(missing_docs)]

mod account;
mod auth;
mod chat;
mod error;
mod oauth;
mod plan;

pub use account::*;
pub use auth::*;
pub use chat::*;
pub use error::*;
pub use oauth::*;
pub use plan::*;
