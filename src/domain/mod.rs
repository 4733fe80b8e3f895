pub mod common;
pub mod family;
pub mod record;
pub mod user;
pub mod wish;

pub use common::{position_of, Displayable, Identifiable};
pub use family::FamilyConfig;
pub use record::IncomeRecord;
pub use user::{ProfilePair, UserId, UserProfile};
pub use wish::{Wish, WishStatus};
