// Legacy SOAP surface (`WSEndUser`, credentials in every envelope).

mod client;
pub mod types;

pub use client::{DEFAULT_SOAP_URL, SOAP_NAMESPACE, SoapClient};
