pub mod app;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod favorites;
pub mod seed;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod users;
