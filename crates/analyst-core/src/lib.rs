//! Core abstractions for the equity analysis pipeline
//!
//! This crate defines the fundamental traits and types shared by every
//! analysis stage: the [`Stage`] trait, the [`FactStore`] shared-state
//! substrate, and the core error type.

pub mod error;
pub mod stage;
pub mod store;

pub use error::{Error, Result};
pub use stage::Stage;
pub use store::FactStore;
