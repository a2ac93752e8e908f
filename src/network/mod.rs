//! HTTP networking module
//!
//! Provides the HTTP client used for search API calls and image downloads.

mod client;
mod user_agent;

pub use client::HttpClient;
pub use user_agent::{accept_image, accept_json, user_agent};
