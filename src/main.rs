use dotenv::dotenv;
use tracing::{info, warn};

use chantier_backend::app::app::App;
use chantier_backend::util::logger::Logger;

#[tokio::main]
async fn main() {
    // Keep the guards alive for the lifetime of the process so the
    // background log writers keep flushing
    let _logger = Logger::new().expect("Failed to initialize logging");

    info!("Starting Chantier Backend");

    // Load environment variables from .env file
    match dotenv() {
        Ok(_) => info!("Loaded .env file"),
        Err(e) => warn!("No .env file loaded: {} (using system env vars)", e),
    }

    let app = App::new().await;
    app.start().await;
}
