//! Household pairing boundary.
//!
//! Pairing is modeled as a trait so the engine never depends on a concrete
//! backend. The bundled [`LocalPairing`] generates codes locally and accepts
//! any well-formed code; a networked implementation would own real code
//! validation behind the same trait.

use rand::Rng;
use thiserror::Error;

/// A freshly created family with its invite code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingInvite {
    pub family_id: String,
    pub code: String,
}

#[derive(Debug, Error)]
pub enum PairingError {
    #[error("pairing code must be exactly 6 digits")]
    MalformedCode,
}

/// Creates and joins families.
pub trait PairingService {
    fn create_family(&self) -> PairingInvite;

    /// Validates `code` and returns the family id it maps to.
    fn join_family(&self, code: &str) -> Result<String, PairingError>;
}

/// Local stub: six random digits, family id derived from the code.
#[derive(Debug, Default)]
pub struct LocalPairing;

impl LocalPairing {
    pub fn new() -> Self {
        Self
    }
}

impl PairingService for LocalPairing {
    fn create_family(&self) -> PairingInvite {
        let code = rand::thread_rng().gen_range(100_000..1_000_000).to_string();
        PairingInvite {
            family_id: format!("fam_{code}"),
            code,
        }
    }

    fn join_family(&self, code: &str) -> Result<String, PairingError> {
        let code = code.trim();
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(PairingError::MalformedCode);
        }
        Ok(format!("fam_{code}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_invite_has_six_digit_code() {
        let invite = LocalPairing::new().create_family();
        assert_eq!(invite.code.len(), 6);
        assert!(invite.code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(invite.family_id, format!("fam_{}", invite.code));
    }

    #[test]
    fn join_accepts_well_formed_codes_only() {
        let pairing = LocalPairing::new();
        assert_eq!(pairing.join_family(" 123456 ").unwrap(), "fam_123456");
        assert!(pairing.join_family("12345").is_err());
        assert!(pairing.join_family("12345a").is_err());
        assert!(pairing.join_family("1234567").is_err());
    }
}
