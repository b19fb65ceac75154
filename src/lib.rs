//! Accident severity prediction service.
//!
//! Turns the eleven form selections describing a road-traffic accident into
//! the encoded, ordered row a trained classifier expects, and maps the
//! predicted class back to a severity label.

pub mod artifacts;
pub mod config;
pub mod encoders;
pub mod error;
pub mod features;
pub mod fields;
pub mod model;
pub mod pipeline;
pub mod record;
pub mod severity;
pub mod web;

pub use artifacts::Artifacts;
pub use config::AppConfig;
pub use pipeline::{Prediction, Predictor};
pub use record::{AccidentRecord, RawValue};
pub use severity::Severity;
