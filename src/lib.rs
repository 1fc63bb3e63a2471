pub mod api;
pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod contacts;
pub mod error;
pub mod store;
pub mod ui;
pub mod validation;
