pub mod constants;
pub mod settings;

pub use settings::{
    ApplicationSettings, AuthSettings, EmailClientSettings, PostgresSettings, RedisSettings,
    Settings, TokenSettings,
};
