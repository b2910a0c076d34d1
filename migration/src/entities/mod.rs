pub mod search_history;
pub mod user;

pub use search_history::Entity as SearchHistoryEntity;
pub use user::Entity as UserEntity;
