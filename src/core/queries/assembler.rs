//! Patient notes projection
//!
//! Read-side assembly of a patient's notes with related-party display names
//! resolved and JSON-encoded clinical fields decoded. No lifecycle mutation
//! happens here.

use crate::adapters::database::traits::NoteStore;
use crate::domain::ids::PatientId;
use crate::domain::note::{NoteFilter, NoteStatus, PatientNote};
use crate::domain::{Result, ScribeError};
use chrono::NaiveDate;
use std::sync::Arc;

/// Filter inputs for the patient-notes listing
///
/// The status filter arrives as the client's string form and is validated
/// here before it reaches the store.
#[derive(Debug, Clone, Default)]
pub struct PatientNotesRequest {
    pub note_type: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Read-only patient-notes query
pub struct PatientNotesQuery {
    notes: Arc<dyn NoteStore>,
}

impl PatientNotesQuery {
    pub fn new(notes: Arc<dyn NoteStore>) -> Self {
        Self { notes }
    }

    /// Fetches a patient's notes, most recent service date first with
    /// creation time as the tie-breaker
    ///
    /// # Errors
    ///
    /// [`ScribeError::Validation`] on an unknown status filter or an
    /// inverted date range; [`ScribeError::Storage`] on query failure.
    pub async fn fetch(
        &self,
        patient_id: PatientId,
        request: PatientNotesRequest,
    ) -> Result<Vec<PatientNote>> {
        let status = request
            .status
            .as_deref()
            .map(|s| {
                s.parse::<NoteStatus>()
                    .map_err(ScribeError::Validation)
            })
            .transpose()?;

        if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
            if start > end {
                return Err(ScribeError::Validation(format!(
                    "start_date {start} is after end_date {end}"
                )));
            }
        }

        let filter = NoteFilter {
            patient_id,
            note_type: request.note_type,
            status,
            service_date_from: request.start_date,
            service_date_to: request.end_date,
        };

        let notes = self.notes.list_patient_notes(&filter).await?;

        tracing::debug!(
            patient_id = %patient_id,
            count = notes.len(),
            "Fetched patient notes"
        );

        Ok(notes)
    }
}
