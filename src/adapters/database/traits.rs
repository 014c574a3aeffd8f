//! Storage abstraction traits
//!
//! These traits are the seam between the lifecycle core and the relational
//! store. The store is the sole arbiter of concurrent writes: the draft
//! upsert is a single atomic keyed operation, and the sign transition is a
//! conditional update whose affected-row count decides success. No
//! implementation may cache note or draft state across calls.

use crate::domain::draft::{DraftKey, DraftPayload, DraftSelector, NoteDraft};
use crate::domain::ids::{DraftId, NoteId};
use crate::domain::note::{ClinicalNote, NewNote, NoteFilter, NoteHandle, PatientNote, SignatureStamp};
use crate::domain::setting::ClinicalSetting;
use crate::domain::Result;
use async_trait::async_trait;

/// Store for clinical note rows
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Inserts a new note in draft state and returns its generated
    /// identifiers
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    async fn insert_note(&self, note: &NewNote) -> Result<NoteHandle>;

    /// Loads a note by id
    ///
    /// Returns `Ok(None)` when the note does not exist.
    async fn find_note(&self, id: NoteId) -> Result<Option<ClinicalNote>>;

    /// Applies the signed+locked transition iff the note is currently
    /// unlocked and not blocked by the supervisor gate
    ///
    /// This is the single irreversible transition in the note lifecycle and
    /// must execute as one conditional statement: the update matches only
    /// rows with `is_locked = false` whose supervisor review, when required,
    /// is approved.
    ///
    /// # Returns
    ///
    /// The number of rows updated: 1 on success, 0 when the guard did not
    /// match (locked, gated, or absent). The caller re-reads the note to
    /// report the precise cause.
    async fn mark_signed(&self, id: NoteId, stamp: &SignatureStamp) -> Result<u64>;

    /// Walks the addendum chain upward from `id`, returning the parent id
    /// of the given note (None at the chain root)
    async fn find_parent_id(&self, id: NoteId) -> Result<Option<NoteId>>;

    /// Patient-notes projection with display names resolved, ordered by
    /// service date descending then creation time descending
    async fn list_patient_notes(&self, filter: &NoteFilter) -> Result<Vec<PatientNote>>;
}

/// Store for autosave drafts
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Atomically creates or updates the single draft for the resolved
    /// identity and returns its id
    ///
    /// Two concurrent upserts carrying the same key must converge on one
    /// row; the last writer's payload wins.
    async fn upsert_draft(&self, key: &DraftKey, payload: &DraftPayload) -> Result<DraftId>;

    /// Finds drafts matching the selector, newest first where the selector
    /// can match more than one
    async fn find_drafts(&self, selector: &DraftSelector) -> Result<Vec<NoteDraft>>;

    /// Removes drafts keyed to a note, returning the number deleted
    ///
    /// Used after the note is signed; a locked note's draft must never be
    /// resurrected as editable.
    async fn delete_drafts_for_note(&self, note_id: NoteId) -> Result<u64>;
}

/// Read-only store for the clinical settings table
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetches one setting row; `Ok(None)` when the key is not configured
    async fn fetch_setting(&self, key: &str) -> Result<Option<ClinicalSetting>>;

    /// Fetches all setting rows ordered by key
    async fn fetch_all_settings(&self) -> Result<Vec<ClinicalSetting>>;
}
