//! Business logic helpers for the shared wishlist.

use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::common::position_of;
use crate::domain::user::UserId;
use crate::domain::wish::{Wish, WishStatus};

/// Provides validated operations over wish collections.
pub struct WishlistService;

impl WishlistService {
    /// Builds a new wish. Titles must be non-blank and targets positive.
    pub fn create(
        title: &str,
        target_amount: f64,
        user_id: UserId,
        image_url: &str,
    ) -> ServiceResult<Wish> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ServiceError::Validation("wish title must not be blank".into()));
        }
        if !target_amount.is_finite() || target_amount <= 0.0 {
            return Err(ServiceError::Validation(format!(
                "wish target must be a positive amount, got {target_amount}"
            )));
        }
        Ok(Wish::new(title, target_amount, user_id, image_url))
    }

    /// Display order: pinned wishes first, then the rest.
    ///
    /// A stable two-bucket partition, not a sort. Relative order inside each
    /// bucket is the underlying list order, so applying it twice is a no-op.
    pub fn order(wishes: &[Wish]) -> Vec<Wish> {
        let mut ordered: Vec<Wish> = wishes.iter().filter(|w| w.is_pinned).cloned().collect();
        ordered.extend(wishes.iter().filter(|w| !w.is_pinned).cloned());
        ordered
    }

    /// Moves the wish `moved_id` to `to_index` in the underlying list.
    ///
    /// `to_index` past the end is clamped to appending. Manual order only
    /// shows up within a pin bucket once [`Self::order`] is applied.
    pub fn reorder(wishes: &[Wish], moved_id: Uuid, to_index: usize) -> ServiceResult<Vec<Wish>> {
        let mut reordered = wishes.to_vec();
        let from = position_of(&reordered, moved_id).ok_or_else(|| {
            ServiceError::Validation(format!("no wish with id {moved_id}"))
        })?;
        let wish = reordered.remove(from);
        let to_index = to_index.min(reordered.len());
        reordered.insert(to_index, wish);
        Ok(reordered)
    }

    /// Funds a wish with `amount`, clamping savings at the target.
    ///
    /// Completed wishes refuse further funding and are returned unchanged via
    /// the error path. Status moves to Completed exactly when the new savings
    /// reach the target, otherwise to Ongoing.
    pub fn inject(wish: &Wish, amount: f64) -> ServiceResult<Wish> {
        if wish.is_completed() {
            return Err(ServiceError::InvalidState(format!(
                "wish '{}' is already completed",
                wish.title
            )));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ServiceError::Validation(format!(
                "funding amount must be positive, got {amount}"
            )));
        }
        let mut funded = wish.clone();
        funded.current_saved_amount =
            (funded.current_saved_amount + amount).min(funded.target_amount);
        funded.status = if funded.current_saved_amount >= funded.target_amount {
            WishStatus::Completed
        } else {
            WishStatus::Ongoing
        };
        Ok(funded)
    }

    /// Detaches the wish `id`, returning it together with the remaining list.
    ///
    /// The detached value keeps all fields intact so a later restore is a
    /// plain re-insertion, savings and status included.
    pub fn remove(wishes: &[Wish], id: Uuid) -> ServiceResult<(Wish, Vec<Wish>)> {
        let mut remaining = wishes.to_vec();
        let idx = position_of(&remaining, id)
            .ok_or_else(|| ServiceError::Validation(format!("no wish with id {id}")))?;
        let removed = remaining.remove(idx);
        Ok((removed, remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wish(title: &str, target: f64) -> Wish {
        Wish::new(title, target, UserId::Wife, "")
    }

    #[test]
    fn create_rejects_blank_title_and_bad_target() {
        assert!(WishlistService::create("  ", 100.0, UserId::Wife, "").is_err());
        assert!(WishlistService::create("Camera", 0.0, UserId::Wife, "").is_err());
        assert!(WishlistService::create("Camera", f64::INFINITY, UserId::Wife, "").is_err());
    }

    #[test]
    fn order_puts_pinned_first_and_is_idempotent() {
        let unpinned = wish("first", 100.0);
        let mut pinned = wish("second", 100.0);
        pinned.is_pinned = true;
        let wishes = vec![unpinned.clone(), pinned.clone()];

        let once = WishlistService::order(&wishes);
        assert_eq!(once[0].id, pinned.id);
        assert_eq!(once[1].id, unpinned.id);
        let twice = WishlistService::order(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn reorder_clamps_index_and_rejects_unknown_id() {
        let a = wish("a", 10.0);
        let b = wish("b", 10.0);
        let list = vec![a.clone(), b.clone()];

        let moved = WishlistService::reorder(&list, a.id, 99).unwrap();
        assert_eq!(moved.last().unwrap().id, a.id);

        assert!(WishlistService::reorder(&list, Uuid::new_v4(), 0).is_err());
    }

    #[test]
    fn inject_clamps_at_target_and_completes() {
        let mut target = wish("Laptop", 25_000.0);
        target.current_saved_amount = 8_500.0;
        target.status = WishStatus::Ongoing;

        let funded = WishlistService::inject(&target, 20_000.0).unwrap();
        assert_eq!(funded.current_saved_amount, 25_000.0);
        assert_eq!(funded.status, WishStatus::Completed);
    }

    #[test]
    fn inject_moves_pending_to_ongoing() {
        let pending = wish("Chair", 9_000.0);
        let funded = WishlistService::inject(&pending, 500.0).unwrap();
        assert_eq!(funded.current_saved_amount, 500.0);
        assert_eq!(funded.status, WishStatus::Ongoing);
    }

    #[test]
    fn inject_refuses_completed_wish() {
        let mut done = wish("Desk", 1_000.0);
        done.current_saved_amount = 1_000.0;
        done.status = WishStatus::Completed;
        let err = WishlistService::inject(&done, 10.0).expect_err("completed wish must refuse");
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[test]
    fn remove_detaches_with_fields_intact() {
        let mut funded = wish("Bike", 3_000.0);
        funded.current_saved_amount = 1_200.0;
        funded.status = WishStatus::Ongoing;
        let list = vec![funded.clone(), wish("Other", 500.0)];

        let (removed, remaining) = WishlistService::remove(&list, funded.id).unwrap();
        assert_eq!(removed, funded);
        assert_eq!(remaining.len(), 1);
    }
}
