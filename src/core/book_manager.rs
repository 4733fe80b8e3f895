//! State container over the four persisted collections.
//!
//! Every mutation validates through a pure service, commits in memory, then
//! persists only the touched key. A rejected operation performs no mutation
//! and no write.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::core::services::{
    IncomeService, MonthGroup, ServiceError, ServiceResult, SummaryService, WishlistService,
};
use crate::domain::common::{position_of, Displayable};
use crate::domain::{FamilyConfig, IncomeRecord, ProfilePair, UserId, Wish};
use crate::parser::IncomeParser;
use crate::storage::StorageBackend;

pub const DEFAULT_YEARLY_GOAL: f64 = 200_000.0;
pub const CELEBRATION_THRESHOLD: f64 = 1_000.0;

const UNDO_GRACE: Duration = Duration::from_secs(5);

const DEFAULT_WISH_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1501785888041-af3ef285b470?w=800",
    "https://images.unsplash.com/photo-1464822759023-fed622ff2c3b?w=800",
];

/// Result of committing an income record.
#[derive(Debug, Clone)]
pub struct IncomeOutcome {
    pub record: IncomeRecord,
    /// Set when the amount crosses the celebration threshold, so the caller
    /// can congratulate the owning profile.
    pub celebrate: bool,
}

struct PendingRestore {
    wish: Wish,
    expires_at: Instant,
}

/// Owns the household book: income records, wishes, the yearly goal and the
/// family pairing state, plus the session-scoped profile pair.
pub struct BookManager {
    storage: Box<dyn StorageBackend>,
    records: Vec<IncomeRecord>,
    wishes: Vec<Wish>,
    yearly_goal: f64,
    family: FamilyConfig,
    profiles: ProfilePair,
    undo_grace: Duration,
    pending_restore: Option<PendingRestore>,
}

impl BookManager {
    /// Loads all four keys, falling back to defaults for absent ones.
    pub fn load(storage: Box<dyn StorageBackend>) -> ServiceResult<Self> {
        let records = storage.load_records()?.unwrap_or_default();
        let wishes = storage.load_wishes()?.unwrap_or_default();
        let yearly_goal = storage.load_goal()?.unwrap_or(DEFAULT_YEARLY_GOAL);
        let family = storage.load_family()?.unwrap_or_default();
        tracing::info!(
            records = records.len(),
            wishes = wishes.len(),
            yearly_goal,
            "book loaded"
        );
        Ok(Self {
            storage,
            records,
            wishes,
            yearly_goal,
            family,
            profiles: ProfilePair::default(),
            undo_grace: UNDO_GRACE,
            pending_restore: None,
        })
    }

    /// Overrides the undo grace window. Used by tests to force expiry.
    pub fn with_undo_grace(mut self, grace: Duration) -> Self {
        self.undo_grace = grace;
        self
    }

    pub fn records(&self) -> &[IncomeRecord] {
        &self.records
    }

    pub fn wishes(&self) -> &[Wish] {
        &self.wishes
    }

    /// Wishes in display order, pinned first.
    pub fn ordered_wishes(&self) -> Vec<Wish> {
        WishlistService::order(&self.wishes)
    }

    pub fn yearly_goal(&self) -> f64 {
        self.yearly_goal
    }

    pub fn family(&self) -> &FamilyConfig {
        &self.family
    }

    pub fn profiles(&self) -> &ProfilePair {
        &self.profiles
    }

    pub fn total_income(&self) -> f64 {
        SummaryService::total(&self.records)
    }

    pub fn goal_progress(&self) -> ServiceResult<f64> {
        SummaryService::goal_progress(self.total_income(), self.yearly_goal)
    }

    pub fn history(&self) -> Vec<MonthGroup> {
        SummaryService::group_by_month_then_day(&self.records)
    }

    /// Runs free text through the parsing collaborator and records the result.
    ///
    /// `Ok(None)` mirrors the parser's low-confidence outcome: nothing was
    /// added and nothing was written, so the caller can keep the input.
    pub fn record_income_text(
        &mut self,
        parser: &dyn IncomeParser,
        text: &str,
        user_id: UserId,
    ) -> ServiceResult<Option<IncomeOutcome>> {
        let Some(parsed) = parser.parse(text)? else {
            tracing::debug!("income text not confidently parsed");
            return Ok(None);
        };
        let outcome =
            self.record_income(parsed.amount, &parsed.source, &parsed.category, user_id)?;
        Ok(Some(outcome))
    }

    pub fn record_income(
        &mut self,
        amount: f64,
        source: &str,
        category: &str,
        user_id: UserId,
    ) -> ServiceResult<IncomeOutcome> {
        let record = IncomeService::create(amount, source, category, user_id)?;
        self.records.push(record.clone());
        self.persist_records()?;
        let celebrate = record.amount >= CELEBRATION_THRESHOLD;
        tracing::info!(amount = record.amount, user = %record.user_id, "income recorded");
        Ok(IncomeOutcome { record, celebrate })
    }

    pub fn delete_record(&mut self, id: Uuid) -> ServiceResult<IncomeRecord> {
        let removed = IncomeService::remove(&mut self.records, id)?;
        self.persist_records()?;
        tracing::info!(record = %removed.display_label(), "income record deleted");
        Ok(removed)
    }

    pub fn set_yearly_goal(&mut self, goal: f64) -> ServiceResult<()> {
        if !goal.is_finite() || goal <= 0.0 {
            return Err(ServiceError::Validation(format!(
                "yearly goal must be a positive amount, got {goal}"
            )));
        }
        self.yearly_goal = goal;
        self.persist_goal()
    }

    /// Adds a wish. A blank `image_url` picks one of the stock images.
    pub fn add_wish(
        &mut self,
        title: &str,
        target_amount: f64,
        user_id: UserId,
        image_url: Option<&str>,
    ) -> ServiceResult<Wish> {
        let image = match image_url.map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => default_image_url(),
        };
        let wish = WishlistService::create(title, target_amount, user_id, &image)?;
        self.wishes.push(wish.clone());
        self.persist_wishes()?;
        Ok(wish)
    }

    pub fn fund_wish(&mut self, id: Uuid, amount: f64) -> ServiceResult<Wish> {
        let idx = self.wish_index(id)?;
        let funded = WishlistService::inject(&self.wishes[idx], amount)?;
        self.wishes[idx] = funded.clone();
        self.persist_wishes()?;
        tracing::info!(wish = %funded.title, saved = funded.current_saved_amount, "wish funded");
        Ok(funded)
    }

    pub fn set_pinned(&mut self, id: Uuid, pinned: bool) -> ServiceResult<Wish> {
        let idx = self.wish_index(id)?;
        self.wishes[idx].is_pinned = pinned;
        let updated = self.wishes[idx].clone();
        self.persist_wishes()?;
        Ok(updated)
    }

    /// Moves a wish within the underlying list. Display order still puts
    /// pinned wishes first.
    pub fn move_wish(&mut self, id: Uuid, to_index: usize) -> ServiceResult<()> {
        self.wishes = WishlistService::reorder(&self.wishes, id, to_index)?;
        self.persist_wishes()
    }

    /// Deletes a wish and arms the undo slot for the grace window.
    ///
    /// Only one pending restore exists at a time; a newer delete replaces it.
    pub fn remove_wish(&mut self, id: Uuid) -> ServiceResult<Wish> {
        let (removed, remaining) = WishlistService::remove(&self.wishes, id)?;
        self.wishes = remaining;
        self.persist_wishes()?;
        self.pending_restore = Some(PendingRestore {
            wish: removed.clone(),
            expires_at: Instant::now() + self.undo_grace,
        });
        tracing::info!(wish = %removed.display_label(), "wish deleted, undo armed");
        Ok(removed)
    }

    /// Restores the last deleted wish with all fields intact.
    pub fn undo_remove(&mut self) -> ServiceResult<Wish> {
        let pending = self.pending_restore.take().ok_or_else(|| {
            ServiceError::InvalidState("no recently deleted wish to restore".into())
        })?;
        if Instant::now() > pending.expires_at {
            return Err(ServiceError::InvalidState(
                "the restore window has expired".into(),
            ));
        }
        self.wishes.push(pending.wish.clone());
        self.persist_wishes()?;
        Ok(pending.wish)
    }

    pub fn undo_available(&self) -> bool {
        self.pending_restore
            .as_ref()
            .is_some_and(|pending| Instant::now() <= pending.expires_at)
    }

    pub fn apply_pairing(
        &mut self,
        family_id: &str,
        code: &str,
        local: UserId,
    ) -> ServiceResult<()> {
        self.family = FamilyConfig::paired(family_id, code, local);
        self.persist_family()?;
        tracing::info!(family = family_id, "household paired");
        Ok(())
    }

    pub fn unpair(&mut self) -> ServiceResult<()> {
        self.family = FamilyConfig::default();
        self.persist_family()
    }

    /// Profiles are session-scoped, so these edits never touch storage.
    pub fn rename_profile(&mut self, id: UserId, name: &str) -> ServiceResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation(
                "profile name must not be blank".into(),
            ));
        }
        self.profiles.get_mut(id).name = name.to_string();
        Ok(())
    }

    pub fn set_avatar(&mut self, id: UserId, url: &str) -> ServiceResult<()> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ServiceError::Validation(
                "avatar url must not be blank".into(),
            ));
        }
        self.profiles.get_mut(id).avatar = url.to_string();
        Ok(())
    }

    fn wish_index(&self, id: Uuid) -> ServiceResult<usize> {
        position_of(&self.wishes, id)
            .ok_or_else(|| ServiceError::Validation(format!("no wish with id {id}")))
    }

    fn persist_records(&self) -> ServiceResult<()> {
        self.storage.save_records(&self.records)?;
        Ok(())
    }

    fn persist_wishes(&self) -> ServiceResult<()> {
        self.storage.save_wishes(&self.wishes)?;
        Ok(())
    }

    fn persist_goal(&self) -> ServiceResult<()> {
        self.storage.save_goal(self.yearly_goal)?;
        Ok(())
    }

    fn persist_family(&self) -> ServiceResult<()> {
        self.storage.save_family(&self.family)?;
        Ok(())
    }
}

fn default_image_url() -> String {
    DEFAULT_WISH_IMAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(DEFAULT_WISH_IMAGES[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParsedIncome, ScriptedOutcome, ScriptedParser};
    use crate::storage::JsonStore;
    use tempfile::TempDir;

    fn manager_with_temp_dir() -> (BookManager, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonStore::new(Some(temp.path().to_path_buf())).expect("json store");
        let manager = BookManager::load(Box::new(store)).expect("load book");
        (manager, temp)
    }

    #[test]
    fn fresh_book_applies_defaults() {
        let (manager, _guard) = manager_with_temp_dir();
        assert!(manager.records().is_empty());
        assert!(manager.wishes().is_empty());
        assert_eq!(manager.yearly_goal(), DEFAULT_YEARLY_GOAL);
        assert!(!manager.family().is_paired());
    }

    #[test]
    fn large_income_flags_celebration() {
        let (mut manager, _guard) = manager_with_temp_dir();
        let big = manager
            .record_income(1_000.0, "salary", "work", UserId::Husband)
            .unwrap();
        assert!(big.celebrate);
        let small = manager
            .record_income(999.0, "tips", "other", UserId::Husband)
            .unwrap();
        assert!(!small.celebrate);
    }

    #[test]
    fn unparsed_text_adds_nothing_and_writes_nothing() {
        let (mut manager, guard) = manager_with_temp_dir();
        let parser = ScriptedParser::new([ScriptedOutcome::Unparsed]);
        let outcome = manager
            .record_income_text(&parser, "mystery text", UserId::Wife)
            .unwrap();
        assert!(outcome.is_none());
        assert!(manager.records().is_empty());
        assert!(!guard.path().join("income_records.json").exists());
    }

    #[test]
    fn parsed_text_lands_as_record() {
        let (mut manager, _guard) = manager_with_temp_dir();
        let parser = ScriptedParser::new([ScriptedOutcome::Parsed(ParsedIncome {
            amount: 3_000.0,
            source: "freelance gig".into(),
            category: "side income".into(),
        })]);
        let outcome = manager
            .record_income_text(&parser, "got 3k from freelance", UserId::Wife)
            .unwrap()
            .expect("record added");
        assert_eq!(outcome.record.amount, 3_000.0);
        assert_eq!(manager.records().len(), 1);
    }

    #[test]
    fn undo_restores_within_grace_window() {
        let (mut manager, _guard) = manager_with_temp_dir();
        let wish = manager
            .add_wish("Camera", 9_000.0, UserId::Wife, None)
            .unwrap();
        manager.fund_wish(wish.id, 500.0).unwrap();
        let removed = manager.remove_wish(wish.id).unwrap();
        assert!(manager.undo_available());

        let restored = manager.undo_remove().unwrap();
        assert_eq!(restored, removed);
        assert_eq!(manager.wishes().len(), 1);
        assert_eq!(manager.wishes()[0].current_saved_amount, 500.0);
    }

    #[test]
    fn undo_refused_after_expiry() {
        let (manager, _guard) = manager_with_temp_dir();
        let mut manager = manager.with_undo_grace(Duration::ZERO);
        let wish = manager
            .add_wish("Desk", 2_000.0, UserId::Husband, None)
            .unwrap();
        manager.remove_wish(wish.id).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        let err = manager.undo_remove().expect_err("restore must expire");
        assert!(matches!(err, ServiceError::InvalidState(_)));
        assert!(manager.wishes().is_empty());
    }

    #[test]
    fn second_delete_replaces_undo_slot() {
        let (mut manager, _guard) = manager_with_temp_dir();
        let first = manager
            .add_wish("First", 1_000.0, UserId::Wife, None)
            .unwrap();
        let second = manager
            .add_wish("Second", 1_000.0, UserId::Wife, None)
            .unwrap();
        manager.remove_wish(first.id).unwrap();
        manager.remove_wish(second.id).unwrap();

        let restored = manager.undo_remove().unwrap();
        assert_eq!(restored.id, second.id);
        // The first deletion can no longer be undone.
        assert!(manager.undo_remove().is_err());
    }

    #[test]
    fn rejected_goal_leaves_state_untouched() {
        let (mut manager, guard) = manager_with_temp_dir();
        assert!(manager.set_yearly_goal(0.0).is_err());
        assert_eq!(manager.yearly_goal(), DEFAULT_YEARLY_GOAL);
        assert!(!guard.path().join("yearly_goal.json").exists());
    }
}
