//! Client library for the chatdeck HTTP API.

pub mod error;
pub mod http;

pub use error::ClientError;
pub use http::HttpClient;
