//! Core library surface for the Tunefinder TUI: a terminal client that asks a
//! recommendation API for songs by title or by mood.
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

pub use api::{HttpClient, RecommendationRequest, RecommendationSource};
pub use config::{load_config, AppConfig};
pub use error::RecommendError;
pub use models::{Mood, Song, Tab};
pub use ui::{run_app, App};
