//! Note state transitions

pub mod manager;

pub use manager::{CreateNoteRequest, CreatedNote, NoteLifecycle};
