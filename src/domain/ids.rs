//! Domain identifier types with validation
//!
//! Newtype wrappers for the integer surrogate keys used by the record store.
//! Each type prevents mixing identifiers of different entities and rejects
//! non-positive values at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! surrogate_id {
    ($(#[$doc:meta])* $name:ident, $label:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier, rejecting non-positive keys
            pub fn new(id: i64) -> Result<Self, String> {
                if id <= 0 {
                    return Err(format!("{} must be positive, got {}", $label, id));
                }
                Ok(Self(id))
            }

            /// Returns the raw surrogate key
            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let id: i64 = s
                    .trim()
                    .parse()
                    .map_err(|_| format!("{} must be an integer, got '{}'", $label, s))?;
                Self::new(id)
            }
        }
    };
}

surrogate_id!(
    /// Clinical note identifier
    NoteId,
    "note id"
);

surrogate_id!(
    /// Note draft identifier
    DraftId,
    "draft id"
);

surrogate_id!(
    /// Patient identifier (external patient directory key)
    PatientId,
    "patient id"
);

surrogate_id!(
    /// Provider identifier, resolved from the authenticated caller
    ProviderId,
    "provider id"
);

surrogate_id!(
    /// Appointment identifier (external calendar subsystem key)
    AppointmentId,
    "appointment id"
);
