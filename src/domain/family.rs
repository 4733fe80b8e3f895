use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Pairing state for the household. All fields stay null until a pairing
/// handshake completes, and unpairing resets the whole struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FamilyConfig {
    pub family_id: Option<String>,
    pub paired_user_id: Option<UserId>,
    pub pairing_code: Option<String>,
}

impl FamilyConfig {
    pub fn is_paired(&self) -> bool {
        self.family_id.is_some()
    }

    pub fn paired(family_id: impl Into<String>, code: impl Into<String>, local: UserId) -> Self {
        Self {
            family_id: Some(family_id.into()),
            paired_user_id: Some(local.counterpart()),
            pairing_code: Some(code.into()),
        }
    }
}
