//! Draft autosave and recovery

pub mod reconciler;

pub use reconciler::{DraftQuery, DraftReconciler, SaveDraftRequest, SavedDraft};
