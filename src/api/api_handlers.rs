use std::collections::HashMap;

use actix_web::{HttpResponse, Responder, web};
use serde_json::Value;
use tracing::error;

use crate::api::api_objects::{GradesResponse, HealthResponse, SchemaResponse};
use crate::grade_prediction::input_validator::RawSample;
use crate::grade_prediction::prediction_engine::PredictionEngine;
use crate::grade_prediction::response_formatter::PredictionResponse;

async fn evaluate_blocking(
    engine: web::Data<PredictionEngine>,
    sample: RawSample,
) -> PredictionResponse {
    // Inference is synchronous, keep it off the actix event loop
    let engine = engine.into_inner();
    match tokio::task::spawn_blocking(move || engine.evaluate(&sample)).await {
        Ok(response) => response,
        Err(e) => {
            error!("Prediction task did not complete: {}", e);
            PredictionResponse::failure("prediction could not be completed")
        }
    }
}

pub async fn handle_predict(
    sample: web::Json<RawSample>,
    engine: web::Data<PredictionEngine>,
) -> impl Responder {
    let response = evaluate_blocking(engine, sample.into_inner()).await;
    HttpResponse::Ok().json(response)
}

pub async fn handle_predict_form(
    form: web::Form<HashMap<String, String>>,
    engine: web::Data<PredictionEngine>,
) -> impl Responder {
    let sample: RawSample = form
        .into_inner()
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();
    let response = evaluate_blocking(engine, sample).await;
    HttpResponse::Ok().json(response)
}

pub async fn handle_health(engine: web::Data<PredictionEngine>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::new(engine.is_halted()))
}

pub async fn handle_schema() -> impl Responder {
    HttpResponse::Ok().json(SchemaResponse::default())
}

pub async fn handle_grades() -> impl Responder {
    HttpResponse::Ok().json(GradesResponse::default())
}

pub async fn handle_metrics(engine: web::Data<PredictionEngine>) -> impl Responder {
    HttpResponse::Ok().json(engine.metrics().snapshot())
}
