//! Framework-agnostic business logic.
//!
//! Every function here takes a `SeaORM` connection and returns plain models or
//! small result structs; nothing depends on Discord types.

/// Site announcements
pub mod announcements;
/// Daily coin bonus
pub mod daily;
/// Drop listings and search
pub mod drops;
/// User rankings
pub mod leaderboard;
/// Account generator services and stock
pub mod services;
/// Account lookup and VIP status
pub mod users;
