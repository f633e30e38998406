// REST API surface (OAuth2-authenticated JSON under `/api/v1/`).

mod client;
pub mod types;

pub use client::{DEFAULT_API_URL, ScpClient};
