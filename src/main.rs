// src/main.rs
// Entry point: reads configuration, builds the shared simulation view and serves the lab over HTTP.
mod chart; // Chart rendering (plotters -> PNG data URL)
mod client; // Outbound client for the simulation service
mod config; // Flags and environment
mod error; // Error types
mod model; // Request/response/chart types
mod series; // Derived angle-over-time series
#[cfg(test)]
mod testing; // Shared test helpers
mod ui; // Pages and handlers
mod view; // Simulation page state

use actix_files::Files;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use client::HttpSimulationService;
use config::Config;
use tracing::info;
use view::SimulationView;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    let service = HttpSimulationService::new(&config.sim_service_url);
    info!(endpoint = service.endpoint(), "simulation service configured");

    // One view for the whole process, shared by every worker.
    let view = web::Data::new(SimulationView::new(service));
    let static_dir = config.static_dir.clone();

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(view.clone())
            .configure(ui::routes::<HttpSimulationService>)
            .service(Files::new("/static", static_dir.clone()))
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    let server = server.bind((config.host.as_str(), config.port))?;
    info!(
        "pendulum lab listening on http://{}:{}",
        config.host, config.port
    );
    server.run().await
}
