//! HTTP adapters for the chat backend.

pub mod api_client;

pub use api_client::ApiClient;
