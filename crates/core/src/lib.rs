//! Chat session logic, typewriter reveal and account handling, independent
//! of any particular backend or front-end.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod account;
mod backend_client;
mod controller;
pub mod input;
mod session_id;
mod token_store;
pub mod transcript;
mod typewriter;

pub use account::{AccountSession, AccountState, AuthError};
pub use controller::{ChatController, ChatControllerBuilder, ChatStage, ChatView};
pub use input::{Key, KeyPress};
pub use session_id::SessionId;
pub use token_store::{MemoryTokenStore, TokenStore};
pub use transcript::{Message, Role, Transcript};
pub use typewriter::Typewriter;
