//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities mirror the tables shared with the Drops Cloud web application.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account_service;
pub mod account_stock;
pub mod announcement;
pub mod drop;
pub mod unlocked_drop;
pub mod user;
pub mod user_stats;

// Re-export specific types to avoid conflicts
pub use account_service::{
    Column as AccountServiceColumn, Entity as AccountService, Model as AccountServiceModel,
};
pub use account_stock::{
    Column as AccountStockColumn, Entity as AccountStock, Model as AccountStockModel,
};
pub use announcement::{
    Column as AnnouncementColumn, Entity as Announcement, Model as AnnouncementModel,
};
pub use drop::{Column as DropColumn, Entity as Drop, Model as DropModel};
pub use unlocked_drop::{
    Column as UnlockedDropColumn, Entity as UnlockedDrop, Model as UnlockedDropModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use user_stats::{Column as UserStatsColumn, Entity as UserStats, Model as UserStatsModel};
