pub mod json_store;
pub mod paths;

pub use json_store::JsonStore;

use crate::domain::{FamilyConfig, IncomeRecord, Wish};
use crate::errors::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Abstraction over persistence backends.
///
/// The four logical keys load and save independently; there is no cross-key
/// transaction. `Ok(None)` on load means the key was never written and the
/// caller applies its default.
pub trait StorageBackend: Send + Sync {
    fn load_records(&self) -> Result<Option<Vec<IncomeRecord>>>;
    fn save_records(&self, records: &[IncomeRecord]) -> Result<()>;

    fn load_wishes(&self) -> Result<Option<Vec<Wish>>>;
    fn save_wishes(&self, wishes: &[Wish]) -> Result<()>;

    fn load_goal(&self) -> Result<Option<f64>>;
    fn save_goal(&self, goal: f64) -> Result<()>;

    fn load_family(&self) -> Result<Option<FamilyConfig>>;
    fn save_family(&self, family: &FamilyConfig) -> Result<()>;
}
