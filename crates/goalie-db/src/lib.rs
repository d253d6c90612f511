//! SQLite persistence for goals and their generated tasks.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
