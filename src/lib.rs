//! Client and terminal dashboard for the MyStat student portal API.

pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod models;
pub mod parser;
pub mod ui;

pub use api::{ApiError, ApiResult, Credentials, Endpoints, MyStatClient, Token};
pub use dashboard::Dashboard;
pub use parser::parse_pagination_meta;
