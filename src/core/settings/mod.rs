//! Typed clinical settings reads

pub mod gate;

pub use gate::{SettingsGate, ALLOW_POST_SIGNATURE_EDITS};
