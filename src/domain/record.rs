use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable};
use crate::domain::user::UserId;

/// A single income event. Records are immutable once created; corrections
/// happen by deleting and re-adding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeRecord {
    pub id: Uuid,
    pub amount: f64,
    pub source: String,
    pub category: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: UserId,
}

impl IncomeRecord {
    pub fn new(
        amount: f64,
        source: impl Into<String>,
        category: impl Into<String>,
        user_id: UserId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            source: source.into(),
            category: category.into(),
            timestamp: Utc::now(),
            user_id,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

impl Identifiable for IncomeRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for IncomeRecord {
    fn display_label(&self) -> String {
        format!("{} ({}) +{:.0}", self.source, self.category, self.amount)
    }
}
