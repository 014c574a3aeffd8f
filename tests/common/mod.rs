//! In-memory store double for integration tests
//!
//! Implements the three storage traits with the same atomicity semantics the
//! PostgreSQL adapter gets from the database: the draft upsert is keyed and
//! atomic under the store mutex, and the sign transition only applies to an
//! unlocked, un-gated note.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use scribe::adapters::database::traits::{DraftStore, NoteStore, SettingsStore};
use scribe::domain::draft::{DraftKey, DraftPayload, DraftSelector, NoteDraft};
use scribe::domain::ids::{DraftId, NoteId, PatientId, ProviderId};
use scribe::domain::note::{
    ClinicalNote, NewNote, NoteFilter, NoteHandle, NoteStatus, PatientNote, SignatureStamp,
    SupervisorReviewStatus,
};
use scribe::domain::setting::{ClinicalSetting, SettingType};
use scribe::domain::Result;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    notes: HashMap<i64, ClinicalNote>,
    next_note_id: i64,
    drafts: HashMap<DraftKey, NoteDraft>,
    next_draft_id: i64,
    settings: Vec<ClinicalSetting>,
    users: HashMap<i64, String>,
}

/// Shared in-memory record store
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a note for assertions
    pub fn note(&self, id: NoteId) -> Option<ClinicalNote> {
        self.inner.lock().unwrap().notes.get(&id.get()).cloned()
    }

    /// Total number of live drafts
    pub fn draft_count(&self) -> usize {
        self.inner.lock().unwrap().drafts.len()
    }

    /// Simulates the external supervisor-review workflow recording a status
    pub fn set_supervisor_status(&self, id: NoteId, status: SupervisorReviewStatus) {
        let mut inner = self.inner.lock().unwrap();
        let note = inner
            .notes
            .get_mut(&id.get())
            .expect("note must exist for supervisor update");
        note.supervisor_review_status = Some(status);
    }

    /// Inserts or replaces a clinical setting row
    pub fn put_setting(&self, key: &str, value: &str, value_type: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.settings.retain(|s| s.key != key);
        inner.settings.push(ClinicalSetting {
            key: key.to_string(),
            value: value.to_string(),
            value_type: SettingType::from_str(value_type).expect("valid setting type"),
            updated_at: Some(Utc::now()),
            updated_by: None,
        });
    }

    /// Removes a clinical setting row
    pub fn remove_setting(&self, key: &str) {
        self.inner.lock().unwrap().settings.retain(|s| s.key != key);
    }

    /// Registers a display name in the user directory shadow
    pub fn add_user(&self, id: i64, name: &str) {
        self.inner.lock().unwrap().users.insert(id, name.to_string());
    }
}

fn display_name(inner: &Inner, id: Option<ProviderId>) -> Option<String> {
    id.and_then(|p| inner.users.get(&p.get()).cloned())
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn insert_note(&self, note: &NewNote) -> Result<NoteHandle> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_note_id += 1;
        let id = NoteId::new(inner.next_note_id).unwrap();

        // Monotonic creation times keep the tie-break ordering deterministic
        let created_at = Utc::now() + Duration::microseconds(inner.next_note_id);

        let review_status = if note.supervisor_review_required {
            Some(SupervisorReviewStatus::Pending)
        } else {
            None
        };

        let stored = ClinicalNote {
            id,
            uuid: note.uuid,
            patient_id: note.patient_id,
            provider_id: note.provider_id,
            appointment_id: note.appointment_id,
            note_type: note.note_type.clone(),
            template_type: note.template_type.clone(),
            service_date: note.service_date,
            content: note.content.clone(),
            status: NoteStatus::Draft,
            is_locked: false,
            signed_at: None,
            signed_by: None,
            signature_data: None,
            locked_at: None,
            supervisor_review_required: note.supervisor_review_required,
            supervisor_review_status: review_status,
            supervisor_signed_at: None,
            supervisor_signed_by: None,
            supervisor_comments: None,
            parent_note_id: note.parent_note_id,
            is_addendum: note.is_addendum,
            addendum_reason: note.addendum_reason.clone(),
            created_at,
            updated_at: created_at,
        };

        inner.notes.insert(id.get(), stored);

        Ok(NoteHandle {
            id,
            uuid: note.uuid,
        })
    }

    async fn find_note(&self, id: NoteId) -> Result<Option<ClinicalNote>> {
        Ok(self.inner.lock().unwrap().notes.get(&id.get()).cloned())
    }

    async fn mark_signed(&self, id: NoteId, stamp: &SignatureStamp) -> Result<u64> {
        let mut inner = self.inner.lock().unwrap();
        let Some(note) = inner.notes.get_mut(&id.get()) else {
            return Ok(0);
        };

        let gate_open = !note.supervisor_review_required
            || note.supervisor_review_status == Some(SupervisorReviewStatus::Approved);
        if note.is_locked || !gate_open {
            return Ok(0);
        }

        note.status = NoteStatus::Signed;
        note.is_locked = true;
        note.signed_at = Some(stamp.signed_at);
        note.signed_by = Some(stamp.signed_by);
        note.signature_data = stamp.signature_data.clone();
        note.locked_at = Some(stamp.signed_at);
        note.updated_at = stamp.signed_at;
        Ok(1)
    }

    async fn find_parent_id(&self, id: NoteId) -> Result<Option<NoteId>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .notes
            .get(&id.get())
            .and_then(|n| n.parent_note_id))
    }

    async fn list_patient_notes(&self, filter: &NoteFilter) -> Result<Vec<PatientNote>> {
        let inner = self.inner.lock().unwrap();

        let mut notes: Vec<ClinicalNote> = inner
            .notes
            .values()
            .filter(|n| n.patient_id == filter.patient_id)
            .filter(|n| {
                filter
                    .note_type
                    .as_deref()
                    .map(|t| n.note_type == t)
                    .unwrap_or(true)
            })
            .filter(|n| filter.status.map(|s| n.status == s).unwrap_or(true))
            .filter(|n| {
                filter
                    .service_date_from
                    .map(|d| n.service_date >= d)
                    .unwrap_or(true)
            })
            .filter(|n| {
                filter
                    .service_date_to
                    .map(|d| n.service_date <= d)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        notes.sort_by(|a, b| {
            b.service_date
                .cmp(&a.service_date)
                .then(b.created_at.cmp(&a.created_at))
        });

        Ok(notes
            .into_iter()
            .map(|note| {
                let provider_name = display_name(&inner, Some(note.provider_id));
                let signed_by_name = display_name(&inner, note.signed_by);
                let supervisor_name = display_name(&inner, note.supervisor_signed_by);
                PatientNote {
                    note,
                    provider_name,
                    signed_by_name,
                    supervisor_name,
                }
            })
            .collect())
    }
}

#[async_trait]
impl DraftStore for MemoryStore {
    async fn upsert_draft(&self, key: &DraftKey, payload: &DraftPayload) -> Result<DraftId> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(existing) = inner.drafts.get_mut(key) {
            existing.note_type = payload.note_type.clone();
            existing.service_date = payload.service_date;
            existing.content = payload.content.clone();
            existing.saved_at = payload.saved_at;
            return Ok(existing.id);
        }

        inner.next_draft_id += 1;
        let id = DraftId::new(inner.next_draft_id).unwrap();

        let (note_id, appointment_id) = match key {
            DraftKey::ForNote { note_id, .. } => (Some(*note_id), None),
            DraftKey::ForAppointment { appointment_id, .. } => (None, Some(*appointment_id)),
            DraftKey::Unattached { .. } => (None, None),
        };

        let draft = NoteDraft {
            id,
            note_id,
            provider_id: key.provider_id(),
            patient_id: key.patient_id(),
            appointment_id,
            note_type: payload.note_type.clone(),
            service_date: payload.service_date,
            content: payload.content.clone(),
            saved_at: payload.saved_at,
        };

        inner.drafts.insert(key.clone(), draft);
        Ok(id)
    }

    async fn find_drafts(&self, selector: &DraftSelector) -> Result<Vec<NoteDraft>> {
        let inner = self.inner.lock().unwrap();
        let mut drafts: Vec<NoteDraft> = match selector {
            DraftSelector::ForNote {
                provider_id,
                note_id,
            } => inner
                .drafts
                .values()
                .filter(|d| d.provider_id == *provider_id && d.note_id == Some(*note_id))
                .cloned()
                .collect(),
            DraftSelector::ForAppointment {
                provider_id,
                appointment_id,
            } => inner
                .drafts
                .values()
                .filter(|d| {
                    d.provider_id == *provider_id && d.appointment_id == Some(*appointment_id)
                })
                .cloned()
                .collect(),
            DraftSelector::LatestForPatient {
                provider_id,
                patient_id,
            } => {
                let mut matching: Vec<NoteDraft> = inner
                    .drafts
                    .values()
                    .filter(|d| d.provider_id == *provider_id && d.patient_id == *patient_id)
                    .cloned()
                    .collect();
                matching.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
                matching.truncate(1);
                matching
            }
            DraftSelector::AllForProvider { provider_id } => inner
                .drafts
                .values()
                .filter(|d| d.provider_id == *provider_id)
                .cloned()
                .collect(),
        };

        drafts.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(drafts)
    }

    async fn delete_drafts_for_note(&self, note_id: NoteId) -> Result<u64> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.drafts.len();
        inner.drafts.retain(|_, d| d.note_id != Some(note_id));
        Ok((before - inner.drafts.len()) as u64)
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn fetch_setting(&self, key: &str) -> Result<Option<ClinicalSetting>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .settings
            .iter()
            .find(|s| s.key == key)
            .cloned())
    }

    async fn fetch_all_settings(&self) -> Result<Vec<ClinicalSetting>> {
        let mut rows = self.inner.lock().unwrap().settings.clone();
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(rows)
    }
}

/// Convenience ids used across the test files
pub fn provider(id: i64) -> ProviderId {
    ProviderId::new(id).unwrap()
}

pub fn patient(id: i64) -> PatientId {
    PatientId::new(id).unwrap()
}
