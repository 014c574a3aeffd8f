//! Authenticated caller context
//!
//! Session validation is external; the core consumes an already-validated
//! caller carrying a stable provider identity. The provider id is never
//! taken from client-supplied request fields.

use super::ids::ProviderId;

/// Identity-bearing authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    provider_id: ProviderId,
}

impl Caller {
    /// Wraps a provider identity resolved by the session layer
    pub fn new(provider_id: ProviderId) -> Self {
        Self { provider_id }
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_carries_provider() {
        let caller = Caller::new(ProviderId::new(14).unwrap());
        assert_eq!(caller.provider_id().get(), 14);
    }
}
