//! An abstraction layer for the backends a guided dialogue can talk to.
//!
//! This crate establishes an unified protocol for the dialogue engine to
//! interact with either a chat-completion endpoint or a proxy that already
//! decodes the model's answer, so that the engine can switch between them
//! without modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod reply;
mod request;

pub use error::*;
pub use provider::*;
pub use reply::*;
pub use request::*;
