//! PostgreSQL adapter implementing the storage traits
//!
//! Concurrency-sensitive statements live here: the draft upsert targets the
//! partial unique index matching the resolved identity form, and the sign
//! transition is a conditional update guarded on lock state and the
//! supervisor gate.

use crate::adapters::database::traits::{DraftStore, NoteStore, SettingsStore};
use crate::adapters::postgresql::client::PostgresClient;
use crate::adapters::postgresql::models::{
    draft_from_row, note_from_row, patient_note_from_row, setting_from_row,
};
use crate::domain::draft::{DraftKey, DraftPayload, DraftSelector, NoteDraft};
use crate::domain::ids::{DraftId, NoteId};
use crate::domain::note::{ClinicalNote, NewNote, NoteFilter, NoteHandle, PatientNote, SignatureStamp};
use crate::domain::setting::ClinicalSetting;
use crate::domain::{Result, ScribeError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

const PATIENT_NOTES_SELECT: &str = r#"
    SELECT n.*,
        NULLIF(TRIM(CONCAT(p.first_name, ' ', p.last_name)), '') AS provider_name,
        NULLIF(TRIM(CONCAT(sb.first_name, ' ', sb.last_name)), '') AS signed_by_name,
        NULLIF(TRIM(CONCAT(ss.first_name, ' ', ss.last_name)), '') AS supervisor_name
    FROM clinical_notes n
    LEFT JOIN users p ON p.id = n.provider_id
    LEFT JOIN users sb ON sb.id = n.signed_by
    LEFT JOIN users ss ON ss.id = n.supervisor_signed_by
    WHERE n.patient_id = $1"#;

const SETTINGS_SELECT: &str = r#"
    SELECT s.setting_key, s.setting_value, s.setting_type, s.updated_at,
        NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), '') AS updated_by_name
    FROM clinical_settings s
    LEFT JOIN users u ON u.id = s.updated_by"#;

/// PostgreSQL implementation of the storage traits
pub struct PostgresAdapter {
    client: Arc<PostgresClient>,
}

impl PostgresAdapter {
    /// Create a new adapter owning its client
    pub fn new(client: PostgresClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Create a new adapter sharing an existing client (and its pool)
    pub fn new_with_arc(client: Arc<PostgresClient>) -> Self {
        Self { client }
    }

    /// Reference to the underlying client
    pub fn client(&self) -> &Arc<PostgresClient> {
        &self.client
    }
}

#[async_trait]
impl NoteStore for PostgresAdapter {
    async fn insert_note(&self, note: &NewNote) -> Result<NoteHandle> {
        let insert_query = r#"
            INSERT INTO clinical_notes (
                uuid, patient_id, provider_id, appointment_id, note_type,
                template_type, service_date, service_duration, service_location,
                behavior_problem, intervention, response, plan, risk_assessment,
                risk_present, goals_addressed, interventions_selected,
                client_presentation, diagnosis_codes, presenting_concerns,
                clinical_observations, mental_status_exam, status, is_locked,
                supervisor_review_required, supervisor_review_status,
                parent_note_id, is_addendum, addendum_reason
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, 'draft', FALSE,
                $23, $24, $25, $26, $27
            )
            RETURNING id
        "#;

        let patient_id = note.patient_id.get();
        let provider_id = note.provider_id.get();
        let appointment_id = note.appointment_id.map(|a| a.get());
        let parent_note_id = note.parent_note_id.map(|p| p.get());
        // A review-gated note starts its workflow as pending
        let review_status = if note.supervisor_review_required {
            Some("pending")
        } else {
            None
        };
        let c = &note.content;

        let row = self
            .client
            .query_one(
                insert_query,
                &[
                    &note.uuid,
                    &patient_id,
                    &provider_id,
                    &appointment_id,
                    &note.note_type,
                    &note.template_type,
                    &note.service_date,
                    &c.service_duration,
                    &c.service_location,
                    &c.behavior_problem,
                    &c.intervention,
                    &c.response,
                    &c.plan,
                    &c.risk_assessment,
                    &c.risk_present,
                    &c.goals_addressed,
                    &c.interventions_selected,
                    &c.client_presentation,
                    &c.diagnosis_codes,
                    &c.presenting_concerns,
                    &c.clinical_observations,
                    &c.mental_status_exam,
                    &note.supervisor_review_required,
                    &review_status,
                    &parent_note_id,
                    &note.is_addendum,
                    &note.addendum_reason,
                ],
            )
            .await?;

        let id: i64 = row
            .try_get(0)
            .map_err(|e| ScribeError::Storage(e.to_string()))?;
        let id = NoteId::new(id).map_err(ScribeError::Storage)?;

        tracing::debug!(note_id = %id, uuid = %note.uuid, "Inserted clinical note");

        Ok(NoteHandle {
            id,
            uuid: note.uuid,
        })
    }

    async fn find_note(&self, id: NoteId) -> Result<Option<ClinicalNote>> {
        let raw = id.get();
        let row = self
            .client
            .query_opt("SELECT * FROM clinical_notes WHERE id = $1", &[&raw])
            .await?;

        row.as_ref().map(note_from_row).transpose()
    }

    async fn mark_signed(&self, id: NoteId, stamp: &SignatureStamp) -> Result<u64> {
        // Lock iff currently unlocked and not blocked by the supervisor gate;
        // the affected-row count is the arbiter under concurrent signers.
        let sign_query = r#"
            UPDATE clinical_notes SET
                status = 'signed',
                is_locked = TRUE,
                signed_at = $2,
                signed_by = $3,
                signature_data = $4,
                locked_at = $2,
                updated_at = $2
            WHERE id = $1
              AND is_locked = FALSE
              AND (supervisor_review_required = FALSE
                   OR supervisor_review_status = 'approved')
        "#;

        let raw = id.get();
        let signed_by = stamp.signed_by.get();

        let affected = self
            .client
            .execute(
                sign_query,
                &[&raw, &stamp.signed_at, &signed_by, &stamp.signature_data],
            )
            .await?;

        tracing::debug!(note_id = %id, affected, "Conditional sign executed");
        Ok(affected)
    }

    async fn find_parent_id(&self, id: NoteId) -> Result<Option<NoteId>> {
        let raw = id.get();
        let row = self
            .client
            .query_opt(
                "SELECT parent_note_id FROM clinical_notes WHERE id = $1",
                &[&raw],
            )
            .await?;

        let parent: Option<i64> = match row {
            Some(row) => row
                .try_get(0)
                .map_err(|e| ScribeError::Storage(e.to_string()))?,
            None => None,
        };

        parent
            .map(|p| NoteId::new(p).map_err(ScribeError::Storage))
            .transpose()
    }

    async fn list_patient_notes(&self, filter: &NoteFilter) -> Result<Vec<PatientNote>> {
        let patient_id = filter.patient_id.get();
        let status = filter.status.map(|s| s.as_str().to_string());

        let mut sql = String::from(PATIENT_NOTES_SELECT);
        let mut params: Vec<&(dyn ToSql + Sync)> = vec![&patient_id];

        if let Some(ref note_type) = filter.note_type {
            sql.push_str(&format!(" AND n.note_type = ${}", params.len() + 1));
            params.push(note_type);
        }
        if let Some(ref status) = status {
            sql.push_str(&format!(" AND n.status = ${}", params.len() + 1));
            params.push(status);
        }
        if let Some(ref from) = filter.service_date_from {
            sql.push_str(&format!(" AND n.service_date >= ${}", params.len() + 1));
            params.push(from);
        }
        if let Some(ref to) = filter.service_date_to {
            sql.push_str(&format!(" AND n.service_date <= ${}", params.len() + 1));
            params.push(to);
        }

        sql.push_str(" ORDER BY n.service_date DESC, n.created_at DESC");

        let rows = self.client.query(&sql, &params).await?;
        rows.iter().map(patient_note_from_row).collect()
    }
}

#[async_trait]
impl DraftStore for PostgresAdapter {
    async fn upsert_draft(&self, key: &DraftKey, payload: &DraftPayload) -> Result<DraftId> {
        // Each identity form targets its own partial unique index so the
        // find-or-create has no check-then-act window.
        let row = match key {
            DraftKey::ForNote {
                provider_id,
                patient_id,
                note_id,
            } => {
                let upsert = r#"
                    INSERT INTO note_drafts (
                        note_id, provider_id, patient_id, appointment_id,
                        note_type, service_date, draft_content, saved_at
                    )
                    VALUES ($1, $2, $3, NULL, $4, $5, $6, $7)
                    ON CONFLICT (provider_id, patient_id, note_id)
                        WHERE note_id IS NOT NULL
                    DO UPDATE SET
                        draft_content = EXCLUDED.draft_content,
                        note_type = EXCLUDED.note_type,
                        service_date = EXCLUDED.service_date,
                        saved_at = EXCLUDED.saved_at
                    RETURNING id
                "#;
                let note_id = note_id.get();
                let provider_id = provider_id.get();
                let patient_id = patient_id.get();
                self.client
                    .query_one(
                        upsert,
                        &[
                            &note_id,
                            &provider_id,
                            &patient_id,
                            &payload.note_type,
                            &payload.service_date,
                            &payload.content,
                            &payload.saved_at,
                        ],
                    )
                    .await?
            }
            DraftKey::ForAppointment {
                provider_id,
                patient_id,
                appointment_id,
            } => {
                let upsert = r#"
                    INSERT INTO note_drafts (
                        note_id, provider_id, patient_id, appointment_id,
                        note_type, service_date, draft_content, saved_at
                    )
                    VALUES (NULL, $1, $2, $3, $4, $5, $6, $7)
                    ON CONFLICT (provider_id, patient_id, appointment_id)
                        WHERE note_id IS NULL AND appointment_id IS NOT NULL
                    DO UPDATE SET
                        draft_content = EXCLUDED.draft_content,
                        note_type = EXCLUDED.note_type,
                        service_date = EXCLUDED.service_date,
                        saved_at = EXCLUDED.saved_at
                    RETURNING id
                "#;
                let provider_id = provider_id.get();
                let patient_id = patient_id.get();
                let appointment_id = appointment_id.get();
                self.client
                    .query_one(
                        upsert,
                        &[
                            &provider_id,
                            &patient_id,
                            &appointment_id,
                            &payload.note_type,
                            &payload.service_date,
                            &payload.content,
                            &payload.saved_at,
                        ],
                    )
                    .await?
            }
            DraftKey::Unattached {
                provider_id,
                patient_id,
                note_type,
                service_date,
            } => {
                // The key's type and date are the identity; the payload
                // carries the same values for this form.
                let upsert = r#"
                    INSERT INTO note_drafts (
                        note_id, provider_id, patient_id, appointment_id,
                        note_type, service_date, draft_content, saved_at
                    )
                    VALUES (NULL, $1, $2, NULL, $3, $4, $5, $6)
                    ON CONFLICT (provider_id, patient_id, note_type, service_date)
                        WHERE note_id IS NULL AND appointment_id IS NULL
                    DO UPDATE SET
                        draft_content = EXCLUDED.draft_content,
                        saved_at = EXCLUDED.saved_at
                    RETURNING id
                "#;
                let provider_id = provider_id.get();
                let patient_id = patient_id.get();
                self.client
                    .query_one(
                        upsert,
                        &[
                            &provider_id,
                            &patient_id,
                            note_type,
                            service_date,
                            &payload.content,
                            &payload.saved_at,
                        ],
                    )
                    .await?
            }
        };

        let id: i64 = row
            .try_get(0)
            .map_err(|e| ScribeError::Storage(e.to_string()))?;
        DraftId::new(id).map_err(ScribeError::Storage)
    }

    async fn find_drafts(&self, selector: &DraftSelector) -> Result<Vec<NoteDraft>> {
        let rows = match selector {
            DraftSelector::ForNote {
                provider_id,
                note_id,
            } => {
                let provider_id = provider_id.get();
                let note_id = note_id.get();
                self.client
                    .query(
                        "SELECT * FROM note_drafts WHERE provider_id = $1 AND note_id = $2",
                        &[&provider_id, &note_id],
                    )
                    .await?
            }
            DraftSelector::ForAppointment {
                provider_id,
                appointment_id,
            } => {
                let provider_id = provider_id.get();
                let appointment_id = appointment_id.get();
                self.client
                    .query(
                        "SELECT * FROM note_drafts WHERE provider_id = $1 AND appointment_id = $2",
                        &[&provider_id, &appointment_id],
                    )
                    .await?
            }
            DraftSelector::LatestForPatient {
                provider_id,
                patient_id,
            } => {
                let provider_id = provider_id.get();
                let patient_id = patient_id.get();
                self.client
                    .query(
                        "SELECT * FROM note_drafts WHERE provider_id = $1 AND patient_id = $2 \
                         ORDER BY saved_at DESC LIMIT 1",
                        &[&provider_id, &patient_id],
                    )
                    .await?
            }
            DraftSelector::AllForProvider { provider_id } => {
                let provider_id = provider_id.get();
                self.client
                    .query(
                        "SELECT * FROM note_drafts WHERE provider_id = $1 ORDER BY saved_at DESC",
                        &[&provider_id],
                    )
                    .await?
            }
        };

        rows.iter().map(draft_from_row).collect()
    }

    async fn delete_drafts_for_note(&self, note_id: NoteId) -> Result<u64> {
        let raw = note_id.get();
        let deleted = self
            .client
            .execute("DELETE FROM note_drafts WHERE note_id = $1", &[&raw])
            .await?;

        if deleted > 0 {
            tracing::debug!(note_id = %note_id, deleted, "Removed drafts for signed note");
        }
        Ok(deleted)
    }
}

#[async_trait]
impl SettingsStore for PostgresAdapter {
    async fn fetch_setting(&self, key: &str) -> Result<Option<ClinicalSetting>> {
        let sql = format!("{SETTINGS_SELECT} WHERE s.setting_key = $1");
        let row = self.client.query_opt(&sql, &[&key]).await?;
        row.as_ref().map(setting_from_row).transpose()
    }

    async fn fetch_all_settings(&self) -> Result<Vec<ClinicalSetting>> {
        let sql = format!("{SETTINGS_SELECT} ORDER BY s.setting_key");
        let rows = self.client.query(&sql, &[]).await?;
        rows.iter().map(setting_from_row).collect()
    }
}
