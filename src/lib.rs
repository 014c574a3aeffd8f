//! # Scribe - Clinical Note Lifecycle Service
//!
//! Scribe manages the creation, draft persistence, signing, locking, and
//! post-signature amendment of clinical encounter notes within a
//! behavioral-health record system.
//!
//! ## Overview
//!
//! The core of the service is the note lifecycle and amendment protocol:
//!
//! - **Draft reconciliation** - repeated autosave calls converge on a single
//!   draft row per composite identity, including under concurrent saves from
//!   multiple tabs or devices
//! - **Signing** - an irreversible draft → signed + locked transition,
//!   guarded by a conditional update and an optional supervisor-approval gate
//! - **Addenda** - corrections to locked notes happen through new notes
//!   chained to the locked parent, never by mutation
//!
//! Authentication, HTTP transport, and the user/facility directories are
//! external collaborators; Scribe consumes an authenticated caller identity
//! and owns the record store.
//!
//! ## Architecture
//!
//! - [`cli`] - operational command-line tooling
//! - [`core`] - business logic (drafts, lifecycle, settings, queries)
//! - [`adapters`] - storage traits and the PostgreSQL implementation
//! - [`domain`] - entities, typed identifiers, error taxonomy
//! - [`config`] - configuration management
//! - [`logging`] - structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scribe::adapters::postgresql::{PostgresAdapter, PostgresClient};
//! use scribe::config::load_config;
//! use scribe::core::lifecycle::{CreateNoteRequest, NoteLifecycle};
//! use scribe::core::settings::SettingsGate;
//! use scribe::domain::{Caller, NoteContent, PatientId, ProviderId};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("scribe.toml")?;
//!     let client = Arc::new(PostgresClient::new(config.database.clone()).await?);
//!     let store = Arc::new(PostgresAdapter::new_with_arc(client));
//!
//!     let settings = Arc::new(SettingsGate::new(store.clone()));
//!     let lifecycle = NoteLifecycle::new(
//!         store.clone(),
//!         store.clone(),
//!         settings,
//!         config.clinical.max_addendum_chain_depth,
//!     );
//!
//!     let caller = Caller::new(ProviderId::new(42)?);
//!     let created = lifecycle
//!         .create(
//!             &caller,
//!             CreateNoteRequest {
//!                 patient_id: PatientId::new(7)?,
//!                 appointment_id: None,
//!                 note_type: "progress_note".to_string(),
//!                 template_type: None,
//!                 service_date: chrono::Utc::now().date_naive(),
//!                 content: NoteContent::default(),
//!                 supervisor_review_required: false,
//!             },
//!         )
//!         .await?;
//!
//!     println!("created note {} ({})", created.note_id, created.uuid);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`] with the
//! [`domain::ScribeError`] taxonomy. State-dependent failures are precise:
//! re-signing a locked note is a `Conflict`, a pending supervisor review is
//! a `Precondition`, and administratively disabled addenda are a `Policy`
//! error.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
