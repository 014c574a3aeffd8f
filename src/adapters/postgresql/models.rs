//! Row-to-domain conversions for the PostgreSQL adapter
//!
//! Enum columns are stored as text; a row carrying an unknown enum value is
//! reported as a storage error rather than silently skipped.

use crate::domain::draft::NoteDraft;
use crate::domain::ids::{AppointmentId, DraftId, NoteId, PatientId, ProviderId};
use crate::domain::note::{ClinicalNote, NoteContent, NoteStatus, PatientNote, SupervisorReviewStatus};
use crate::domain::setting::{ClinicalSetting, SettingType};
use crate::domain::{Result, ScribeError};
use tokio_postgres::Row;

fn storage(err: impl std::fmt::Display) -> ScribeError {
    ScribeError::Storage(err.to_string())
}

fn id_column<T>(
    row: &Row,
    column: &str,
    make: impl Fn(i64) -> std::result::Result<T, String>,
) -> Result<T> {
    let raw: i64 = row.try_get(column).map_err(storage)?;
    make(raw).map_err(|e| ScribeError::Storage(format!("corrupt {column} column: {e}")))
}

fn opt_id_column<T>(
    row: &Row,
    column: &str,
    make: impl Fn(i64) -> std::result::Result<T, String>,
) -> Result<Option<T>> {
    let raw: Option<i64> = row.try_get(column).map_err(storage)?;
    raw.map(|v| {
        make(v).map_err(|e| ScribeError::Storage(format!("corrupt {column} column: {e}")))
    })
    .transpose()
}

/// Maps a `clinical_notes` row to the domain entity
pub fn note_from_row(row: &Row) -> Result<ClinicalNote> {
    let status: String = row.try_get("status").map_err(storage)?;
    let status: NoteStatus = status
        .parse()
        .map_err(|e| ScribeError::Storage(format!("corrupt status column: {e}")))?;

    let review_status: Option<String> =
        row.try_get("supervisor_review_status").map_err(storage)?;
    let review_status: Option<SupervisorReviewStatus> = review_status
        .map(|s| s.parse())
        .transpose()
        .map_err(|e| {
            ScribeError::Storage(format!("corrupt supervisor_review_status column: {e}"))
        })?;

    let content = NoteContent {
        service_duration: row.try_get("service_duration").map_err(storage)?,
        service_location: row.try_get("service_location").map_err(storage)?,
        behavior_problem: row.try_get("behavior_problem").map_err(storage)?,
        intervention: row.try_get("intervention").map_err(storage)?,
        response: row.try_get("response").map_err(storage)?,
        plan: row.try_get("plan").map_err(storage)?,
        risk_assessment: row.try_get("risk_assessment").map_err(storage)?,
        risk_present: row.try_get("risk_present").map_err(storage)?,
        goals_addressed: row.try_get("goals_addressed").map_err(storage)?,
        interventions_selected: row.try_get("interventions_selected").map_err(storage)?,
        client_presentation: row.try_get("client_presentation").map_err(storage)?,
        diagnosis_codes: row.try_get("diagnosis_codes").map_err(storage)?,
        presenting_concerns: row.try_get("presenting_concerns").map_err(storage)?,
        clinical_observations: row.try_get("clinical_observations").map_err(storage)?,
        mental_status_exam: row.try_get("mental_status_exam").map_err(storage)?,
    };

    Ok(ClinicalNote {
        id: id_column(row, "id", NoteId::new)?,
        uuid: row.try_get("uuid").map_err(storage)?,
        patient_id: id_column(row, "patient_id", PatientId::new)?,
        provider_id: id_column(row, "provider_id", ProviderId::new)?,
        appointment_id: opt_id_column(row, "appointment_id", AppointmentId::new)?,
        note_type: row.try_get("note_type").map_err(storage)?,
        template_type: row.try_get("template_type").map_err(storage)?,
        service_date: row.try_get("service_date").map_err(storage)?,
        content,
        status,
        is_locked: row.try_get("is_locked").map_err(storage)?,
        signed_at: row.try_get("signed_at").map_err(storage)?,
        signed_by: opt_id_column(row, "signed_by", ProviderId::new)?,
        signature_data: row.try_get("signature_data").map_err(storage)?,
        locked_at: row.try_get("locked_at").map_err(storage)?,
        supervisor_review_required: row
            .try_get("supervisor_review_required")
            .map_err(storage)?,
        supervisor_review_status: review_status,
        supervisor_signed_at: row.try_get("supervisor_signed_at").map_err(storage)?,
        supervisor_signed_by: opt_id_column(row, "supervisor_signed_by", ProviderId::new)?,
        supervisor_comments: row.try_get("supervisor_comments").map_err(storage)?,
        parent_note_id: opt_id_column(row, "parent_note_id", NoteId::new)?,
        is_addendum: row.try_get("is_addendum").map_err(storage)?,
        addendum_reason: row.try_get("addendum_reason").map_err(storage)?,
        created_at: row.try_get("created_at").map_err(storage)?,
        updated_at: row.try_get("updated_at").map_err(storage)?,
    })
}

/// Maps a joined projection row (note columns plus display-name columns) to
/// [`PatientNote`]
pub fn patient_note_from_row(row: &Row) -> Result<PatientNote> {
    Ok(PatientNote {
        note: note_from_row(row)?,
        provider_name: row.try_get("provider_name").map_err(storage)?,
        signed_by_name: row.try_get("signed_by_name").map_err(storage)?,
        supervisor_name: row.try_get("supervisor_name").map_err(storage)?,
    })
}

/// Maps a `note_drafts` row to the domain entity
pub fn draft_from_row(row: &Row) -> Result<NoteDraft> {
    Ok(NoteDraft {
        id: id_column(row, "id", DraftId::new)?,
        note_id: opt_id_column(row, "note_id", NoteId::new)?,
        provider_id: id_column(row, "provider_id", ProviderId::new)?,
        patient_id: id_column(row, "patient_id", PatientId::new)?,
        appointment_id: opt_id_column(row, "appointment_id", AppointmentId::new)?,
        note_type: row.try_get("note_type").map_err(storage)?,
        service_date: row.try_get("service_date").map_err(storage)?,
        content: row.try_get("draft_content").map_err(storage)?,
        saved_at: row.try_get("saved_at").map_err(storage)?,
    })
}

/// Maps a `clinical_settings` row (joined with the user shadow table for the
/// updater's display name) to the domain entity
pub fn setting_from_row(row: &Row) -> Result<ClinicalSetting> {
    let value_type: String = row.try_get("setting_type").map_err(storage)?;
    let value_type: SettingType = value_type
        .parse()
        .map_err(|e| ScribeError::Storage(format!("corrupt setting_type column: {e}")))?;

    Ok(ClinicalSetting {
        key: row.try_get("setting_key").map_err(storage)?,
        value: row.try_get("setting_value").map_err(storage)?,
        value_type,
        updated_at: row.try_get("updated_at").map_err(storage)?,
        updated_by: row.try_get("updated_by_name").map_err(storage)?,
    })
}
