use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two fixed household identities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserId {
    Husband,
    Wife,
}

impl UserId {
    /// The other member of the pair.
    pub fn counterpart(&self) -> UserId {
        match self {
            UserId::Husband => UserId::Wife,
            UserId::Wife => UserId::Husband,
        }
    }

    pub fn parse(input: &str) -> Option<UserId> {
        match input.trim().to_lowercase().as_str() {
            "husband" => Some(UserId::Husband),
            "wife" => Some(UserId::Wife),
            _ => None,
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Husband => write!(f, "husband"),
            UserId::Wife => write!(f, "wife"),
        }
    }
}

/// Display details for one household member. Session-scoped, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub avatar: String,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: avatar.into(),
        }
    }
}

/// Both household profiles, indexable by [`UserId`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfilePair {
    pub husband: UserProfile,
    pub wife: UserProfile,
}

impl ProfilePair {
    pub fn get(&self, id: UserId) -> &UserProfile {
        match id {
            UserId::Husband => &self.husband,
            UserId::Wife => &self.wife,
        }
    }

    pub fn get_mut(&mut self, id: UserId) -> &mut UserProfile {
        match id {
            UserId::Husband => &mut self.husband,
            UserId::Wife => &mut self.wife,
        }
    }
}

impl Default for ProfilePair {
    fn default() -> Self {
        Self {
            husband: UserProfile::new(
                "Husband",
                "https://api.dicebear.com/7.x/avataaars/svg?seed=husband",
            ),
            wife: UserProfile::new(
                "Wife",
                "https://api.dicebear.com/7.x/avataaars/svg?seed=wife",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counterpart_is_symmetric() {
        assert_eq!(UserId::Husband.counterpart(), UserId::Wife);
        assert_eq!(UserId::Wife.counterpart(), UserId::Husband);
    }

    #[test]
    fn parse_accepts_case_variants() {
        assert_eq!(UserId::parse(" Wife "), Some(UserId::Wife));
        assert_eq!(UserId::parse("HUSBAND"), Some(UserId::Husband));
        assert_eq!(UserId::parse("partner"), None);
    }

    #[test]
    fn pair_indexing_targets_the_right_slot() {
        let mut pair = ProfilePair::default();
        pair.get_mut(UserId::Wife).name = "Mei".into();
        assert_eq!(pair.get(UserId::Wife).name, "Mei");
        assert_eq!(pair.get(UserId::Husband).name, "Husband");
    }
}
