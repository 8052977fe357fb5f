pub mod app;
pub mod backend;
pub mod collections;
pub mod dashboard;
pub mod error;
pub mod helpers;
pub mod models;
pub mod run_tool;
pub mod session;
pub mod token_store;
pub mod views;
