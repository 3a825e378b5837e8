pub mod api;
pub mod error;
pub mod grade_prediction;
pub mod prediction_metrics;
pub mod utils;
