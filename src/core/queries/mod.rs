//! Read-side projections

pub mod assembler;

pub use assembler::{PatientNotesQuery, PatientNotesRequest};
