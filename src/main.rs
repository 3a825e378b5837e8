use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use anyhow::Result;
use clap::Parser;
use tracing::info;

use milk_quality::api::configure_routes;
use milk_quality::grade_prediction::onnx_classifier::OnnxClassifier;
use milk_quality::grade_prediction::prediction_engine::PredictionEngine;
use milk_quality::utils::{load_config, log_filter};

/// Milk quality grading service
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long, env = "MILK_QUALITY_CONFIG", default_value = "config.yaml")]
    config: PathBuf,

    /// Address to bind, overrides `bind_address`
    #[arg(long)]
    bind: Option<String>,

    /// ONNX model file, overrides `model_path`
    #[arg(long)]
    model: Option<String>,

    /// Scaler JSON file, overrides `scaler_path`
    #[arg(long)]
    scaler: Option<String>,

    /// Number of HTTP workers, overrides `num_workers`
    #[arg(long)]
    workers: Option<usize>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    // RUST_LOG wins, info otherwise
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();

    info!("Starting milk-quality v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut config = load_config(&args.config);
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(model) = args.model {
        config.model_path = model;
    }
    if args.scaler.is_some() {
        config.scaler_path = args.scaler;
    }
    if let Some(workers) = args.workers {
        config.num_workers = workers;
    }
    info!("Configuration: {:?}", config);

    // The model is loaded once and shared read-only by every worker
    let classifier = OnnxClassifier::load(&config.model_path, config.scaler_path.as_deref())?;
    let engine = web::Data::new(PredictionEngine::new(Arc::new(classifier)));

    let app_engine = engine.clone();
    info!("Server listening on {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(app_engine.clone())
            .configure(configure_routes)
    })
    .workers(config.num_workers.max(1))
    .bind(&config.bind_address)?
    .run()
    .await?;

    engine.metrics().log_summary();
    Ok(())
}
