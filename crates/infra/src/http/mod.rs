//! Transport wrapper around reqwest

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
