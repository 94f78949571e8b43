//! Terminal front-end for the chatbot service.
//!
//! The crate includes the `chatbot` CLI. The library half holds the pieces
//! that can be tested without a terminal, such as where the access token is
//! kept, how input lines are read and how view updates become printable
//! text.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod dashboard;
mod input;
mod printer;
mod token_file;

pub use dashboard::account_rows;
pub use input::{InputLine, InputReader};
pub use printer::{PrintEvent, TranscriptPrinter};
pub use token_file::FileTokenStore;

/// Re-exports of [`chatbot_core`] crate.
pub mod core {
    pub use chatbot_core::*;
}
