//! HTTP side of the app: request building and the blocking API client.

mod client;
mod request;

pub use client::{HttpClient, RecommendationSource};
pub use request::RecommendationRequest;
