//! Note lifecycle manager
//!
//! Owns the note's state transitions: creation (draft), signing
//! (draft → signed + locked), and addendum spawning (locked parent → new
//! linked draft). Signing is the single irreversible transition; nothing in
//! this crate ever unlocks a note.

use crate::adapters::database::traits::{DraftStore, NoteStore};
use crate::core::settings::SettingsGate;
use crate::domain::ids::{AppointmentId, NoteId, PatientId};
use crate::domain::note::{NewNote, NoteContent};
use crate::domain::{Caller, Result, ScribeError};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Attributes for creating a note
#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub patient_id: PatientId,
    pub appointment_id: Option<AppointmentId>,
    pub note_type: String,
    /// Defaults to "standard" when absent
    pub template_type: Option<String>,
    pub service_date: NaiveDate,
    pub content: NoteContent,
    pub supervisor_review_required: bool,
}

/// Identifiers of a created note or addendum
#[derive(Debug, Clone, Copy)]
pub struct CreatedNote {
    pub note_id: NoteId,
    pub uuid: Uuid,
}

/// Note lifecycle operations
pub struct NoteLifecycle {
    notes: Arc<dyn NoteStore>,
    drafts: Arc<dyn DraftStore>,
    settings: Arc<SettingsGate>,
    max_addendum_chain_depth: usize,
}

impl NoteLifecycle {
    pub fn new(
        notes: Arc<dyn NoteStore>,
        drafts: Arc<dyn DraftStore>,
        settings: Arc<SettingsGate>,
        max_addendum_chain_depth: usize,
    ) -> Self {
        Self {
            notes,
            drafts,
            settings,
            max_addendum_chain_depth,
        }
    }

    /// Creates a note in draft state
    ///
    /// Assigns a fresh UUID; the note enters the store unlocked and stays
    /// freely mutable until signed.
    ///
    /// # Errors
    ///
    /// [`ScribeError::Validation`] on a blank note type;
    /// [`ScribeError::Storage`] when the insert fails.
    pub async fn create(&self, caller: &Caller, request: CreateNoteRequest) -> Result<CreatedNote> {
        let mut builder = NewNote::builder()
            .uuid(Uuid::new_v4())
            .patient_id(request.patient_id)
            .provider_id(caller.provider_id())
            .note_type(request.note_type)
            .service_date(request.service_date)
            .content(request.content)
            .supervisor_review_required(request.supervisor_review_required);

        if let Some(appointment_id) = request.appointment_id {
            builder = builder.appointment_id(appointment_id);
        }
        if let Some(template_type) = request.template_type {
            builder = builder.template_type(template_type);
        }

        let new_note = builder.build().map_err(ScribeError::Validation)?;
        let handle = self.notes.insert_note(&new_note).await?;

        tracing::info!(
            note_id = %handle.id,
            uuid = %handle.uuid,
            patient_id = %new_note.patient_id,
            provider_id = %new_note.provider_id,
            "Clinical note created"
        );

        Ok(CreatedNote {
            note_id: handle.id,
            uuid: handle.uuid,
        })
    }

    /// Signs and locks a note
    ///
    /// The transition executes as a single conditional update (lock iff
    /// currently unlocked and, when review is required, approved), so two
    /// concurrent sign calls cannot both succeed. Signing is deliberately
    /// not idempotent: re-signing a locked note reports a conflict.
    ///
    /// # Errors
    ///
    /// - [`ScribeError::NotFound`] when the note does not exist
    /// - [`ScribeError::Conflict`] when the note is already locked
    /// - [`ScribeError::Precondition`] while supervisor approval is pending
    pub async fn sign(
        &self,
        caller: &Caller,
        note_id: NoteId,
        signature_data: Option<String>,
    ) -> Result<DateTime<Utc>> {
        let note = self
            .notes
            .find_note(note_id)
            .await?
            .ok_or_else(|| ScribeError::NotFound(format!("note {note_id} not found")))?;

        if note.is_locked {
            return Err(ScribeError::Conflict(
                "note is already signed and locked".to_string(),
            ));
        }
        if note.supervisor_approval_pending() {
            return Err(ScribeError::Precondition(
                "note requires supervisor approval before signing".to_string(),
            ));
        }

        let stamp = crate::domain::note::SignatureStamp {
            signed_by: caller.provider_id(),
            signature_data,
            signed_at: Utc::now(),
        };

        let affected = self.notes.mark_signed(note_id, &stamp).await?;
        if affected == 0 {
            // Lost the race between the read and the conditional update;
            // re-read to report the precise cause.
            return Err(self.explain_sign_failure(note_id).await?);
        }

        tracing::info!(
            note_id = %note_id,
            signed_by = %stamp.signed_by,
            "Note signed and locked"
        );

        // The note is locked; its autosave shadow is disposable. A failure
        // here leaves an orphan draft that the locked-note guard keeps
        // read-only, so it must not mask the committed sign.
        if let Err(e) = self.drafts.delete_drafts_for_note(note_id).await {
            tracing::warn!(note_id = %note_id, error = %e, "Failed to clear drafts after signing");
        }

        Ok(stamp.signed_at)
    }

    /// Creates an addendum note chained to a locked parent
    ///
    /// The addendum is a fresh note with its own full lifecycle: it starts
    /// as an unlocked draft and must itself be signed to become locked.
    ///
    /// # Errors
    ///
    /// - [`ScribeError::Validation`] on a blank reason or content
    /// - [`ScribeError::NotFound`] when the parent does not exist
    /// - [`ScribeError::Policy`] when post-signature addenda are disabled
    /// - [`ScribeError::Precondition`] when the parent is not locked, or the
    ///   addendum chain is already at its maximum depth
    pub async fn create_addendum(
        &self,
        caller: &Caller,
        parent_note_id: NoteId,
        reason: String,
        content: String,
    ) -> Result<CreatedNote> {
        if reason.trim().is_empty() {
            return Err(ScribeError::Validation(
                "addendumReason is required".to_string(),
            ));
        }
        if content.trim().is_empty() {
            return Err(ScribeError::Validation(
                "addendumContent is required".to_string(),
            ));
        }

        let parent = self
            .notes
            .find_note(parent_note_id)
            .await?
            .ok_or_else(|| {
                ScribeError::NotFound(format!("parent note {parent_note_id} not found"))
            })?;

        if !self.settings.allow_post_signature_edits().await? {
            return Err(ScribeError::Policy(
                "post-signature addenda are disabled".to_string(),
            ));
        }

        if !parent.is_locked {
            return Err(ScribeError::Precondition(
                "addenda are only for locked notes; edit the note directly instead".to_string(),
            ));
        }

        let depth = self.chain_depth(parent_note_id).await?;
        if depth >= self.max_addendum_chain_depth {
            return Err(ScribeError::Precondition(format!(
                "addendum chain depth limit ({}) reached",
                self.max_addendum_chain_depth
            )));
        }

        let content = NoteContent {
            plan: Some(content),
            ..NoteContent::default()
        };

        let new_note = NewNote::builder()
            .uuid(Uuid::new_v4())
            .patient_id(parent.patient_id)
            .provider_id(caller.provider_id())
            .note_type(parent.note_type.clone())
            .template_type("addendum")
            .service_date(parent.service_date)
            .content(content)
            .addendum_of(parent_note_id, reason)
            .build()
            .map_err(ScribeError::Validation)?;

        let handle = self.notes.insert_note(&new_note).await?;

        tracing::info!(
            addendum_id = %handle.id,
            parent_note_id = %parent_note_id,
            provider_id = %caller.provider_id(),
            "Addendum created"
        );

        Ok(CreatedNote {
            note_id: handle.id,
            uuid: handle.uuid,
        })
    }

    /// Number of ancestors above `note_id` in the addendum chain
    ///
    /// The walk is capped one step past the configured maximum, which also
    /// terminates on a (theoretically impossible) parent cycle.
    async fn chain_depth(&self, note_id: NoteId) -> Result<usize> {
        let mut depth = 0;
        let mut current = note_id;

        while let Some(parent) = self.notes.find_parent_id(current).await? {
            depth += 1;
            if depth > self.max_addendum_chain_depth {
                break;
            }
            current = parent;
        }

        Ok(depth)
    }

    async fn explain_sign_failure(&self, note_id: NoteId) -> Result<ScribeError> {
        let note = self.notes.find_note(note_id).await?;
        Ok(match note {
            None => ScribeError::NotFound(format!("note {note_id} not found")),
            Some(note) if note.is_locked => {
                ScribeError::Conflict("note is already signed and locked".to_string())
            }
            Some(note) if note.supervisor_approval_pending() => ScribeError::Precondition(
                "note requires supervisor approval before signing".to_string(),
            ),
            // The guard matched nothing yet the row looks signable now;
            // surface it rather than retrying.
            Some(_) => ScribeError::Storage(format!(
                "conditional sign of note {note_id} affected no rows"
            )),
        })
    }
}
