//! Storage abstraction layer
//!
//! Defines the traits the lifecycle core depends on. The PostgreSQL
//! implementation lives in [`crate::adapters::postgresql`].

pub mod traits;

pub use traits::{DraftStore, NoteStore, SettingsStore};
