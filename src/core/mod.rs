//! Business logic
//!
//! - [`drafts`] - autosave reconciliation and recovery
//! - [`lifecycle`] - note creation, signing, addenda
//! - [`settings`] - typed clinical settings reads
//! - [`queries`] - read-side projections

pub mod drafts;
pub mod lifecycle;
pub mod queries;
pub mod settings;
