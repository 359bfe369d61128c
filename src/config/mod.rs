/// Database configuration and connection management
pub mod database;

/// Application settings from config.toml and environment variables
pub mod settings;

pub use settings::Settings;
