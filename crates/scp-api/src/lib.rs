//! Async client library for the Server Control Panel.
//!
//! Two API surfaces are covered:
//!
//! - **REST** ([`ScpClient`]) -- JSON under `/api/v1/`, authenticated with
//!   short-lived bearer tokens minted from an OAuth2 refresh token by
//!   [`TokenSource`].
//! - **SOAP** ([`SoapClient`]) -- the legacy `WSEndUser` web service, with
//!   login name and password carried in every envelope.
//!
//! Both share [`TransportConfig`] for timeouts and the user agent, and
//! report failures through the single [`Error`] type.

pub mod auth;
pub mod error;
pub mod rest;
pub mod soap;
pub mod transport;

pub use auth::{DEFAULT_CLIENT_ID, DEFAULT_TOKEN_URL, TokenSource};
pub use error::Error;
pub use rest::{DEFAULT_API_URL, ScpClient};
pub use soap::{DEFAULT_SOAP_URL, SoapClient};
pub use transport::TransportConfig;
