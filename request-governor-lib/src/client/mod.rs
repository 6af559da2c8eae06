//! Governed-call plumbing for the dashboard's REST backend: a pooled JSON
//! client that reports failures as [`Failure`](crate::failure::Failure)
//! values, and helpers for the backend's `{data: ...}` envelope.

mod api;
mod envelope;
mod pool;

pub use api::ApiClient;
pub use envelope::{
    error_message_from_body, extract_response_data, is_auth_status, is_not_found_status,
};
pub use pool::{build_http_client, HttpClient};
