pub mod config;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod messages;
pub mod normalize;
pub mod query;
pub mod recurrence;
pub mod todo;
pub mod view;
