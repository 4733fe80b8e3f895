use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable};
use crate::domain::user::UserId;

/// Funding lifecycle of a wish. Transitions only move forward:
/// Pending -> Ongoing -> Completed, and Completed is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WishStatus {
    Pending,
    Ongoing,
    Completed,
}

impl std::fmt::Display for WishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WishStatus::Pending => write!(f, "pending"),
            WishStatus::Ongoing => write!(f, "ongoing"),
            WishStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A wishlist entry funded from saved income.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wish {
    pub id: Uuid,
    pub title: String,
    pub target_amount: f64,
    pub current_saved_amount: f64,
    pub status: WishStatus,
    pub user_id: UserId,
    pub image_url: String,
    #[serde(default)]
    pub is_pinned: bool,
}

impl Wish {
    pub fn new(
        title: impl Into<String>,
        target_amount: f64,
        user_id: UserId,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            target_amount,
            current_saved_amount: 0.0,
            status: WishStatus::Pending,
            user_id,
            image_url: image_url.into(),
            is_pinned: false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == WishStatus::Completed
    }

    pub fn progress_percent(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.current_saved_amount / self.target_amount * 100.0).min(100.0)
    }
}

impl Identifiable for Wish {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Wish {
    fn display_label(&self) -> String {
        format!("{} [{}]", self.title, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_wish_starts_pending_and_unfunded() {
        let wish = Wish::new("Camera", 9000.0, UserId::Wife, "");
        assert_eq!(wish.status, WishStatus::Pending);
        assert_eq!(wish.current_saved_amount, 0.0);
        assert!(!wish.is_pinned);
    }

    #[test]
    fn progress_is_clamped_at_one_hundred() {
        let mut wish = Wish::new("Trip", 1000.0, UserId::Husband, "");
        wish.current_saved_amount = 2500.0;
        assert_eq!(wish.progress_percent(), 100.0);
    }

    #[test]
    fn deserialize_without_pin_field_defaults_to_unpinned() {
        let json = r#"{
            "id": "8c4df308-0f2a-4b44-bd20-77b1372c4a5a",
            "title": "Lens",
            "target_amount": 4200.0,
            "current_saved_amount": 0.0,
            "status": "pending",
            "user_id": "wife",
            "image_url": ""
        }"#;
        let wish: Wish = serde_json::from_str(json).unwrap();
        assert!(!wish.is_pinned);
    }
}
