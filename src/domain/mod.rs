//! Domain models and types for Scribe.
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`NoteId`], [`PatientId`], [`ProviderId`], ...)
//! - **Entities** ([`ClinicalNote`], [`NoteDraft`], [`ClinicalSetting`])
//! - **The error taxonomy** ([`ScribeError`]) and [`Result`] alias
//!
//! Identifiers use the newtype pattern so note, patient, and provider keys
//! cannot be mixed, and every fallible operation returns
//! [`Result<T, ScribeError>`](Result).

pub mod caller;
pub mod draft;
pub mod errors;
pub mod ids;
pub mod note;
pub mod result;
pub mod setting;

// Re-export commonly used types for convenience
pub use caller::Caller;
pub use draft::{DraftKey, DraftPayload, DraftSelector, NoteDraft};
pub use errors::ScribeError;
pub use ids::{AppointmentId, DraftId, NoteId, PatientId, ProviderId};
pub use note::{
    ClinicalNote, NewNote, NewNoteBuilder, NoteContent, NoteFilter, NoteHandle, NoteStatus,
    PatientNote, SignatureStamp, SupervisorReviewStatus,
};
pub use result::Result;
pub use setting::{ClinicalSetting, SettingDetail, SettingType, SettingValue};
