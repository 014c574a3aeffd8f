//! Clinical note domain model
//!
//! The note is the signed record of truth for one patient encounter. Once a
//! note is locked it is never mutated in place; corrections happen through
//! addendum notes chained to the locked parent.

use super::ids::{AppointmentId, NoteId, PatientId, ProviderId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a clinical note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    /// Mutable work in progress
    Draft,
    /// Signed and locked; terminal for mutation
    Signed,
}

impl NoteStatus {
    /// Stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Draft => "draft",
            NoteStatus::Signed => "signed",
        }
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(NoteStatus::Draft),
            "signed" => Ok(NoteStatus::Signed),
            other => Err(format!("unknown note status '{other}'")),
        }
    }
}

/// Outcome of the external supervisor-review workflow
///
/// Only meaningful while `supervisor_review_required` is set on the note.
/// The review workflow itself is external; the lifecycle manager reads the
/// final status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupervisorReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl SupervisorReviewStatus {
    /// Stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            SupervisorReviewStatus::Pending => "pending",
            SupervisorReviewStatus::Approved => "approved",
            SupervisorReviewStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for SupervisorReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SupervisorReviewStatus::Pending),
            "approved" => Ok(SupervisorReviewStatus::Approved),
            "rejected" => Ok(SupervisorReviewStatus::Rejected),
            other => Err(format!("unknown supervisor review status '{other}'")),
        }
    }
}

/// Clinical content carried by a note
///
/// Free-text narrative fields plus the structured JSON selections captured by
/// the documentation templates. `plan` doubles as the primary content field
/// for addendum notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteContent {
    /// Session length in minutes
    pub service_duration: Option<i32>,
    pub service_location: Option<String>,
    pub behavior_problem: Option<String>,
    pub intervention: Option<String>,
    pub response: Option<String>,
    pub plan: Option<String>,
    pub risk_assessment: Option<String>,
    pub risk_present: bool,
    /// Treatment goals addressed in the session (structured JSON)
    pub goals_addressed: Option<serde_json::Value>,
    /// Interventions selected from the template (structured JSON)
    pub interventions_selected: Option<serde_json::Value>,
    /// Client presentation checkboxes (structured JSON)
    pub client_presentation: Option<serde_json::Value>,
    /// Diagnosis codes attached to the encounter (structured JSON)
    pub diagnosis_codes: Option<serde_json::Value>,
    pub presenting_concerns: Option<String>,
    pub clinical_observations: Option<String>,
    pub mental_status_exam: Option<String>,
}

/// A clinical encounter note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub id: NoteId,
    /// Globally unique external identifier, assigned once at creation
    pub uuid: Uuid,
    pub patient_id: PatientId,
    pub provider_id: ProviderId,
    pub appointment_id: Option<AppointmentId>,
    pub note_type: String,
    pub template_type: String,
    pub service_date: NaiveDate,
    pub content: NoteContent,
    pub status: NoteStatus,
    pub is_locked: bool,
    pub signed_at: Option<DateTime<Utc>>,
    pub signed_by: Option<ProviderId>,
    /// Opaque electronic-signature payload captured at signing
    pub signature_data: Option<String>,
    pub locked_at: Option<DateTime<Utc>>,
    pub supervisor_review_required: bool,
    pub supervisor_review_status: Option<SupervisorReviewStatus>,
    pub supervisor_signed_at: Option<DateTime<Utc>>,
    pub supervisor_signed_by: Option<ProviderId>,
    pub supervisor_comments: Option<String>,
    /// Parent link for addendum notes; the parent is always locked
    pub parent_note_id: Option<NoteId>,
    pub is_addendum: bool,
    /// Non-null exactly when `is_addendum` is set
    pub addendum_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClinicalNote {
    /// True while the supervisor gate blocks signing: review is required and
    /// the external workflow has not recorded an approval
    pub fn supervisor_approval_pending(&self) -> bool {
        self.supervisor_review_required
            && self.supervisor_review_status != Some(SupervisorReviewStatus::Approved)
    }
}

/// A patient note projected for the read side, with related-party display
/// names resolved
#[derive(Debug, Clone, Serialize)]
pub struct PatientNote {
    #[serde(flatten)]
    pub note: ClinicalNote,
    pub provider_name: Option<String>,
    pub signed_by_name: Option<String>,
    pub supervisor_name: Option<String>,
}

/// Filter for the patient-notes projection
#[derive(Debug, Clone)]
pub struct NoteFilter {
    pub patient_id: PatientId,
    pub note_type: Option<String>,
    pub status: Option<NoteStatus>,
    pub service_date_from: Option<NaiveDate>,
    pub service_date_to: Option<NaiveDate>,
}

/// Generated identifiers for a freshly inserted note
#[derive(Debug, Clone, Copy)]
pub struct NoteHandle {
    pub id: NoteId,
    pub uuid: Uuid,
}

/// Signature metadata applied by the conditional lock transition
#[derive(Debug, Clone)]
pub struct SignatureStamp {
    pub signed_by: ProviderId,
    pub signature_data: Option<String>,
    pub signed_at: DateTime<Utc>,
}

/// Attributes for a note to be created
///
/// Notes always enter the store as unlocked drafts; status and lock state are
/// not part of the creation attributes.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub uuid: Uuid,
    pub patient_id: PatientId,
    pub provider_id: ProviderId,
    pub appointment_id: Option<AppointmentId>,
    pub note_type: String,
    pub template_type: String,
    pub service_date: NaiveDate,
    pub content: NoteContent,
    pub supervisor_review_required: bool,
    pub parent_note_id: Option<NoteId>,
    pub is_addendum: bool,
    pub addendum_reason: Option<String>,
}

impl NewNote {
    /// Creates a new builder for constructing note attributes
    pub fn builder() -> NewNoteBuilder {
        NewNoteBuilder::default()
    }
}

/// Builder for [`NewNote`]
#[derive(Debug, Default)]
pub struct NewNoteBuilder {
    uuid: Option<Uuid>,
    patient_id: Option<PatientId>,
    provider_id: Option<ProviderId>,
    appointment_id: Option<AppointmentId>,
    note_type: Option<String>,
    template_type: Option<String>,
    service_date: Option<NaiveDate>,
    content: NoteContent,
    supervisor_review_required: bool,
    parent_note_id: Option<NoteId>,
    is_addendum: bool,
    addendum_reason: Option<String>,
}

impl NewNoteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    pub fn patient_id(mut self, patient_id: PatientId) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    pub fn provider_id(mut self, provider_id: ProviderId) -> Self {
        self.provider_id = Some(provider_id);
        self
    }

    pub fn appointment_id(mut self, appointment_id: AppointmentId) -> Self {
        self.appointment_id = Some(appointment_id);
        self
    }

    pub fn note_type(mut self, note_type: impl Into<String>) -> Self {
        self.note_type = Some(note_type.into());
        self
    }

    pub fn template_type(mut self, template_type: impl Into<String>) -> Self {
        self.template_type = Some(template_type.into());
        self
    }

    pub fn service_date(mut self, service_date: NaiveDate) -> Self {
        self.service_date = Some(service_date);
        self
    }

    pub fn content(mut self, content: NoteContent) -> Self {
        self.content = content;
        self
    }

    pub fn supervisor_review_required(mut self, required: bool) -> Self {
        self.supervisor_review_required = required;
        self
    }

    /// Marks the note as an addendum chained to `parent_note_id`
    pub fn addendum_of(mut self, parent_note_id: NoteId, reason: impl Into<String>) -> Self {
        self.parent_note_id = Some(parent_note_id);
        self.is_addendum = true;
        self.addendum_reason = Some(reason.into());
        self
    }

    /// Builds the attributes
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing or the note type is
    /// blank.
    pub fn build(self) -> Result<NewNote, String> {
        let note_type = self.note_type.ok_or("note_type is required")?;
        if note_type.trim().is_empty() {
            return Err("note_type cannot be blank".to_string());
        }

        Ok(NewNote {
            uuid: self.uuid.ok_or("uuid is required")?,
            patient_id: self.patient_id.ok_or("patient_id is required")?,
            provider_id: self.provider_id.ok_or("provider_id is required")?,
            appointment_id: self.appointment_id,
            note_type,
            template_type: self
                .template_type
                .unwrap_or_else(|| "standard".to_string()),
            service_date: self.service_date.ok_or("service_date is required")?,
            content: self.content,
            supervisor_review_required: self.supervisor_review_required,
            parent_note_id: self.parent_note_id,
            is_addendum: self.is_addendum,
            addendum_reason: self.addendum_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_builder() -> NewNoteBuilder {
        NewNote::builder()
            .uuid(Uuid::new_v4())
            .patient_id(PatientId::new(12).unwrap())
            .provider_id(ProviderId::new(3).unwrap())
            .note_type("progress_note")
            .service_date(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!("draft".parse::<NoteStatus>().unwrap(), NoteStatus::Draft);
        assert_eq!("signed".parse::<NoteStatus>().unwrap(), NoteStatus::Signed);
        assert!("locked".parse::<NoteStatus>().is_err());
        assert_eq!(NoteStatus::Signed.as_str(), "signed");
    }

    #[test]
    fn test_supervisor_status_parse() {
        assert_eq!(
            "approved".parse::<SupervisorReviewStatus>().unwrap(),
            SupervisorReviewStatus::Approved
        );
        assert!("maybe".parse::<SupervisorReviewStatus>().is_err());
    }

    #[test]
    fn test_new_note_builder() {
        let note = base_builder().build().unwrap();
        assert_eq!(note.note_type, "progress_note");
        assert_eq!(note.template_type, "standard");
        assert!(!note.is_addendum);
        assert!(note.parent_note_id.is_none());
    }

    #[test]
    fn test_new_note_builder_missing_field() {
        let result = NewNote::builder().note_type("progress_note").build();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("uuid is required"));
    }

    #[test]
    fn test_new_note_builder_blank_type() {
        let result = base_builder().note_type("   ").build();
        assert!(result.unwrap_err().contains("blank"));
    }

    #[test]
    fn test_addendum_builder() {
        let parent = NoteId::new(77).unwrap();
        let note = base_builder()
            .template_type("addendum")
            .addendum_of(parent, "clarify plan")
            .build()
            .unwrap();
        assert!(note.is_addendum);
        assert_eq!(note.parent_note_id, Some(parent));
        assert_eq!(note.addendum_reason.as_deref(), Some("clarify plan"));
        assert_eq!(note.template_type, "addendum");
    }

    #[test]
    fn test_supervisor_approval_pending() {
        let note = ClinicalNote {
            id: NoteId::new(1).unwrap(),
            uuid: Uuid::new_v4(),
            patient_id: PatientId::new(2).unwrap(),
            provider_id: ProviderId::new(3).unwrap(),
            appointment_id: None,
            note_type: "progress_note".to_string(),
            template_type: "standard".to_string(),
            service_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            content: NoteContent::default(),
            status: NoteStatus::Draft,
            is_locked: false,
            signed_at: None,
            signed_by: None,
            signature_data: None,
            locked_at: None,
            supervisor_review_required: true,
            supervisor_review_status: Some(SupervisorReviewStatus::Pending),
            supervisor_signed_at: None,
            supervisor_signed_by: None,
            supervisor_comments: None,
            parent_note_id: None,
            is_addendum: false,
            addendum_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(note.supervisor_approval_pending());

        let approved = ClinicalNote {
            supervisor_review_status: Some(SupervisorReviewStatus::Approved),
            ..note.clone()
        };
        assert!(!approved.supervisor_approval_pending());

        let not_required = ClinicalNote {
            supervisor_review_required: false,
            supervisor_review_status: None,
            ..note
        };
        assert!(!not_required.supervisor_approval_pending());
    }
}
