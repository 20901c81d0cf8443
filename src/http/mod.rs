//! HTTP client module with single-hop redirect handling.

mod client;

pub use client::{HttpClient, MAX_REDIRECT_HOPS};
