//! An out-of-the-box shopping guide that assembles the dialogue engine with
//! the available backends.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to bring the guided conversation into your own host
//! apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod prompt;
mod session;

pub use session::{Session, SessionBuilder, SessionError};

/// Re-exports of [`shopping_guide_core`] crate.
pub mod core {
    pub use shopping_guide_core::*;
}
