pub mod api_handlers;
pub mod api_objects;

use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};

use crate::grade_prediction::response_formatter::PredictionResponse;
use api_handlers::{
    handle_grades, handle_health, handle_metrics, handle_predict, handle_predict_form,
    handle_schema,
};

/// Body that could not be read as a field mapping still gets the failure
/// envelope with a 200, like any other rejected sample.
fn malformed_body(err: impl std::fmt::Display) -> actix_web::Error {
    let message = format!("request body is not a field mapping: {}", err);
    let response = HttpResponse::Ok().json(PredictionResponse::failure(message.clone()));
    InternalError::from_response(message, response).into()
}

/// Routes of the prediction service. The `PredictionEngine` must be
/// registered as app data by the caller.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| malformed_body(err)))
        .app_data(web::FormConfig::default().error_handler(|err, _req| malformed_body(err)))
        .route("/predict", web::post().to(handle_predict))
        .route("/predict/form", web::post().to(handle_predict_form))
        .route("/health", web::get().to(handle_health))
        .route("/schema", web::get().to(handle_schema))
        .route("/grades", web::get().to(handle_grades))
        .route("/metrics", web::get().to(handle_metrics));
}
