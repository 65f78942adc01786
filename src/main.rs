//! Binary entry point: set up logging and configuration, point the HTTP client
//! at the configured API, and drive the Ratatui event loop until the user
//! exits.
use std::sync::Arc;

use tunefinder::{load_config, logging, run_app, App, HttpClient};

fn main() -> anyhow::Result<()> {
    let log_path = logging::initialize_logging()?;
    let config = load_config();
    tracing::info!(log = %log_path.display(), "starting tunefinder");

    let client = HttpClient::new(config.api_base_url.clone());
    tracing::info!(api = client.base_url(), "using recommendation API");

    let mut app = App::new(config, Arc::new(client));
    let result = run_app(&mut app);
    if let Err(err) = &result {
        tracing::error!("exiting with error: {err:#}");
    }
    result
}
