//! HTTP networking module
//!
//! Provides the HTTP client that carries provider requests.

mod client;

pub use client::HttpClient;
