use anyhow::Context;
use nfe_uploader::app::NfeApp;
use nfe_uploader::config::AppConfig;
use nfe_uploader::notify::ToastBus;
use nfe_uploader::remote::build_http_client;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nfe_uploader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing::info!(ingest = %config.endpoints.ingest_url, "Starting NF-e Uploader");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let http = build_http_client(&config.endpoints).context("Failed to build HTTP client")?;
    let bus = ToastBus::new(config.notifications.capacity, config.notifications.ttl());
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([640.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "NF-e Uploader",
        options,
        Box::new(move |cc| Box::new(NfeApp::new(cc, config, handle, http, bus))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))?;

    tracing::info!("Shutting down");
    Ok(())
}
