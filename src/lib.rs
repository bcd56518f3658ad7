pub mod api;
pub mod app;
pub mod auth;
pub mod calculations;
pub mod config;
pub mod errors;
pub mod exercise_log;
pub mod handlers;
pub mod models;
pub mod sections;
pub mod state;
pub mod storage;
pub mod survey;
pub mod ui;
pub mod validation;
pub mod wizard;

pub use app::router;
pub use config::PortalConfig;
pub use state::AppState;
