//! Draft store reconciler
//!
//! Repeated autosave calls during composition converge on a single draft row
//! per resolved identity. The identity is composite (note, appointment, or
//! type+date) and the write is delegated to the store as one atomic keyed
//! upsert, so concurrent autosaves from multiple tabs or devices cannot
//! duplicate drafts.

use crate::adapters::database::traits::{DraftStore, NoteStore};
use crate::domain::draft::{DraftKey, DraftPayload, DraftSelector, NoteDraft};
use crate::domain::ids::{AppointmentId, DraftId, NoteId, PatientId};
use crate::domain::{Caller, Result, ScribeError};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

/// Autosave request
///
/// The provider identity comes from the authenticated caller, never from the
/// request itself.
#[derive(Debug, Clone)]
pub struct SaveDraftRequest {
    pub patient_id: PatientId,
    /// Set when editing an existing note
    pub note_id: Option<NoteId>,
    /// Set when composing from a calendar appointment
    pub appointment_id: Option<AppointmentId>,
    pub note_type: String,
    pub service_date: NaiveDate,
    /// Opaque serialized form state
    pub content: serde_json::Value,
}

/// Result of a successful autosave
#[derive(Debug, Clone, Copy)]
pub struct SavedDraft {
    pub draft_id: DraftId,
    pub saved_at: DateTime<Utc>,
}

/// Draft recovery lookup
///
/// Resolved in priority order: note, appointment, patient (most recent),
/// otherwise all of the caller's drafts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DraftQuery {
    pub note_id: Option<NoteId>,
    pub appointment_id: Option<AppointmentId>,
    pub patient_id: Option<PatientId>,
}

/// Find-or-create reconciler for autosave drafts
pub struct DraftReconciler {
    notes: Arc<dyn NoteStore>,
    drafts: Arc<dyn DraftStore>,
}

impl DraftReconciler {
    pub fn new(notes: Arc<dyn NoteStore>, drafts: Arc<dyn DraftStore>) -> Self {
        Self { notes, drafts }
    }

    /// Saves an autosave payload, creating or updating the single draft for
    /// the resolved identity
    ///
    /// # Errors
    ///
    /// - [`ScribeError::Validation`] on a blank note type or a request
    ///   carrying both a note id and an appointment id
    /// - [`ScribeError::NotFound`] when the referenced note does not exist
    /// - [`ScribeError::Conflict`] when the referenced note is locked; a
    ///   locked note's draft can never be re-attached to a mutable note
    /// - [`ScribeError::Storage`] when the upsert fails
    pub async fn save_draft(&self, caller: &Caller, request: SaveDraftRequest) -> Result<SavedDraft> {
        if request.note_type.trim().is_empty() {
            return Err(ScribeError::Validation(
                "noteType is required".to_string(),
            ));
        }

        let key = DraftKey::resolve(
            caller.provider_id(),
            request.patient_id,
            request.note_id,
            request.appointment_id,
            &request.note_type,
            request.service_date,
        )
        .map_err(ScribeError::Validation)?;

        if let Some(note_id) = key.note_id() {
            let note = self
                .notes
                .find_note(note_id)
                .await?
                .ok_or_else(|| ScribeError::NotFound(format!("note {note_id} not found")))?;
            if note.is_locked {
                return Err(ScribeError::Conflict("note is locked".to_string()));
            }
        }

        let saved_at = Utc::now();
        let payload = DraftPayload {
            note_type: request.note_type,
            service_date: request.service_date,
            content: request.content,
            saved_at,
        };

        let draft_id = self.drafts.upsert_draft(&key, &payload).await?;

        tracing::debug!(
            provider_id = %caller.provider_id(),
            patient_id = %request.patient_id,
            draft_id = %draft_id,
            "Draft saved"
        );

        Ok(SavedDraft { draft_id, saved_at })
    }

    /// Retrieves saved drafts for recovery
    ///
    /// A note or appointment anchor yields at most one draft; a patient
    /// yields the caller's most recent draft for that patient; an empty
    /// query yields all of the caller's drafts, newest first.
    pub async fn get_draft(&self, caller: &Caller, query: DraftQuery) -> Result<Vec<NoteDraft>> {
        let provider_id = caller.provider_id();

        let selector = if let Some(note_id) = query.note_id {
            DraftSelector::ForNote {
                provider_id,
                note_id,
            }
        } else if let Some(appointment_id) = query.appointment_id {
            DraftSelector::ForAppointment {
                provider_id,
                appointment_id,
            }
        } else if let Some(patient_id) = query.patient_id {
            DraftSelector::LatestForPatient {
                provider_id,
                patient_id,
            }
        } else {
            DraftSelector::AllForProvider { provider_id }
        };

        self.drafts.find_drafts(&selector).await
    }
}
