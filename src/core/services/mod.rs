pub mod income_service;
pub mod summary_service;
pub mod wishlist_service;

pub use income_service::IncomeService;
pub use summary_service::{DayGroup, MonthGroup, SummaryService};
pub use wishlist_service::WishlistService;

use crate::errors::StoreError;
use crate::parser::ParseError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidState(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
