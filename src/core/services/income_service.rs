//! Business logic helpers for income records.

use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::common::position_of;
use crate::domain::record::IncomeRecord;
use crate::domain::user::UserId;

/// Provides validated construction and removal of income records.
pub struct IncomeService;

impl IncomeService {
    /// Builds a new immutable record from already-extracted fields.
    ///
    /// Blank categories fall back to "other" so records always group somewhere.
    pub fn create(
        amount: f64,
        source: &str,
        category: &str,
        user_id: UserId,
    ) -> ServiceResult<IncomeRecord> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ServiceError::Validation(format!(
                "income amount must be positive, got {amount}"
            )));
        }
        let source = source.trim();
        if source.is_empty() {
            return Err(ServiceError::Validation(
                "income source must not be blank".into(),
            ));
        }
        let category = category.trim();
        let category = if category.is_empty() { "other" } else { category };
        Ok(IncomeRecord::new(amount, source, category, user_id))
    }

    /// Removes the record identified by `id`, returning the removed instance.
    pub fn remove(records: &mut Vec<IncomeRecord>, id: Uuid) -> ServiceResult<IncomeRecord> {
        let idx = position_of(records, id)
            .ok_or_else(|| ServiceError::Validation(format!("no income record with id {id}")))?;
        Ok(records.remove(idx))
    }
}
