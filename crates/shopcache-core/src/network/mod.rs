//! Network transport for upstream fetches.

mod client;

pub use client::{HttpClient, HttpResponse, Transport};
