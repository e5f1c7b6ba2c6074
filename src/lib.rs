pub mod api;
pub mod app;
pub mod assignments;
pub mod config;
pub mod error;
pub mod forms;
pub mod lists;
pub mod logging;
pub mod models;
pub mod quiz;
pub mod render;
pub mod session;
pub mod shell;
pub mod view;
