mod auth;
mod client;
mod error;

pub use auth::{AuthContext, Credentials, Token};
pub use client::{Endpoints, MyStatClient, DEFAULT_AUTH_URL, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult};
