pub mod app;
pub mod config;
pub mod connections;
pub mod error;
pub mod jobs;
pub mod latency;
pub mod messages;
pub mod models;
pub mod optimistic;
pub mod posts;
pub mod session;
pub mod state;
pub mod store;
pub mod users;
pub mod views;
