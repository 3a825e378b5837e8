pub mod classifier;
pub mod features_schema;
pub mod grade_mapping;
pub mod input_validator;
pub mod onnx_classifier;
pub mod prediction_engine;
pub mod response_formatter;
pub mod standard_scaler;
