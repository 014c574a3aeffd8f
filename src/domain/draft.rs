//! Note draft domain model
//!
//! A draft is the disposable autosave shadow of a note under composition.
//! Its identity is composite: drafts for an existing note key on the note,
//! drafts started from an appointment key on the appointment, and free
//! drafts key on note type plus service date. At most one live draft exists
//! per resolved identity; the store enforces this with keyed upserts.

use super::ids::{AppointmentId, DraftId, NoteId, PatientId, ProviderId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A saved autosave draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDraft {
    pub id: DraftId,
    /// Set only when the draft edits an existing note
    pub note_id: Option<NoteId>,
    pub provider_id: ProviderId,
    pub patient_id: PatientId,
    pub appointment_id: Option<AppointmentId>,
    pub note_type: String,
    pub service_date: NaiveDate,
    /// Opaque serialized form state
    pub content: serde_json::Value,
    pub saved_at: DateTime<Utc>,
}

/// Resolved draft identity
///
/// The three forms are mutually exclusive and resolved in priority order:
/// note, then appointment, then the unattached type+date composite.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DraftKey {
    /// Draft editing an existing note
    ForNote {
        provider_id: ProviderId,
        patient_id: PatientId,
        note_id: NoteId,
    },
    /// Draft started from a calendar appointment, no note yet
    ForAppointment {
        provider_id: ProviderId,
        patient_id: PatientId,
        appointment_id: AppointmentId,
    },
    /// Free-standing draft, keyed by note type and service date
    Unattached {
        provider_id: ProviderId,
        patient_id: PatientId,
        note_type: String,
        service_date: NaiveDate,
    },
}

impl DraftKey {
    /// Resolves the identity for a draft save
    ///
    /// # Errors
    ///
    /// Returns an error if both a note id and an appointment id are supplied;
    /// a draft belongs to exactly one anchor.
    pub fn resolve(
        provider_id: ProviderId,
        patient_id: PatientId,
        note_id: Option<NoteId>,
        appointment_id: Option<AppointmentId>,
        note_type: &str,
        service_date: NaiveDate,
    ) -> Result<Self, String> {
        match (note_id, appointment_id) {
            (Some(_), Some(_)) => {
                Err("draft cannot reference both a note and an appointment".to_string())
            }
            (Some(note_id), None) => Ok(DraftKey::ForNote {
                provider_id,
                patient_id,
                note_id,
            }),
            (None, Some(appointment_id)) => Ok(DraftKey::ForAppointment {
                provider_id,
                patient_id,
                appointment_id,
            }),
            (None, None) => Ok(DraftKey::Unattached {
                provider_id,
                patient_id,
                note_type: note_type.to_string(),
                service_date,
            }),
        }
    }

    pub fn provider_id(&self) -> ProviderId {
        match self {
            DraftKey::ForNote { provider_id, .. }
            | DraftKey::ForAppointment { provider_id, .. }
            | DraftKey::Unattached { provider_id, .. } => *provider_id,
        }
    }

    pub fn patient_id(&self) -> PatientId {
        match self {
            DraftKey::ForNote { patient_id, .. }
            | DraftKey::ForAppointment { patient_id, .. }
            | DraftKey::Unattached { patient_id, .. } => *patient_id,
        }
    }

    /// The note this draft edits, if any
    pub fn note_id(&self) -> Option<NoteId> {
        match self {
            DraftKey::ForNote { note_id, .. } => Some(*note_id),
            _ => None,
        }
    }
}

/// Mutable attributes written on every autosave
#[derive(Debug, Clone)]
pub struct DraftPayload {
    pub note_type: String,
    pub service_date: NaiveDate,
    pub content: serde_json::Value,
    pub saved_at: DateTime<Utc>,
}

/// Read-side draft lookup
///
/// Mirrors the recovery flows: a specific note or appointment yields at most
/// one draft; a patient yields the most recent; no anchor yields everything
/// the provider has in flight, newest first.
#[derive(Debug, Clone)]
pub enum DraftSelector {
    ForNote {
        provider_id: ProviderId,
        note_id: NoteId,
    },
    ForAppointment {
        provider_id: ProviderId,
        appointment_id: AppointmentId,
    },
    LatestForPatient {
        provider_id: ProviderId,
        patient_id: PatientId,
    },
    AllForProvider { provider_id: ProviderId },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ProviderId {
        ProviderId::new(3).unwrap()
    }

    fn patient() -> PatientId {
        PatientId::new(12).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_resolve_prefers_note() {
        let key = DraftKey::resolve(
            provider(),
            patient(),
            Some(NoteId::new(9).unwrap()),
            None,
            "progress_note",
            date(),
        )
        .unwrap();
        assert!(matches!(key, DraftKey::ForNote { .. }));
        assert_eq!(key.note_id(), Some(NoteId::new(9).unwrap()));
    }

    #[test]
    fn test_resolve_appointment_without_note() {
        let key = DraftKey::resolve(
            provider(),
            patient(),
            None,
            Some(AppointmentId::new(40).unwrap()),
            "progress_note",
            date(),
        )
        .unwrap();
        assert!(matches!(key, DraftKey::ForAppointment { .. }));
        assert_eq!(key.note_id(), None);
    }

    #[test]
    fn test_resolve_unattached_composite() {
        let key =
            DraftKey::resolve(provider(), patient(), None, None, "intake_note", date()).unwrap();
        match key {
            DraftKey::Unattached {
                ref note_type,
                service_date,
                ..
            } => {
                assert_eq!(note_type, "intake_note");
                assert_eq!(service_date, date());
            }
            other => panic!("expected unattached key, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_rejects_dual_anchor() {
        let result = DraftKey::resolve(
            provider(),
            patient(),
            Some(NoteId::new(9).unwrap()),
            Some(AppointmentId::new(40).unwrap()),
            "progress_note",
            date(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_keys_partition_by_patient() {
        let other_patient = PatientId::new(13).unwrap();
        let a =
            DraftKey::resolve(provider(), patient(), None, None, "progress_note", date()).unwrap();
        let b = DraftKey::resolve(
            provider(),
            other_patient,
            None,
            None,
            "progress_note",
            date(),
        )
        .unwrap();
        assert_ne!(a, b);
    }
}
