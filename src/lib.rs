pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod local;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
