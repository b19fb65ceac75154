//! One-shot prediction: form selections → record → encoded row → class →
//! severity label. Nothing carries over between calls.

use crate::artifacts::Artifacts;
use crate::error::PredictError;
use crate::features::{encode_record, EncodedRow};
use crate::record::AccidentRecord;
use crate::severity::Severity;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub class: i64,
    pub severity: Severity,
}

pub struct Predictor {
    artifacts: Arc<Artifacts>,
    log_rows: bool,
}

impl Predictor {
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self {
            artifacts,
            log_rows: false,
        }
    }

    /// Log each encoded row at info before the model sees it.
    pub fn with_row_logging(mut self, on: bool) -> Self {
        self.log_rows = on;
        self
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// Encode the record and put its columns in training order.
    pub fn prepare(&self, record: &AccidentRecord) -> Result<EncodedRow, PredictError> {
        let encoded = encode_record(record, self.artifacts.encoders())?;
        Ok(self.artifacts.feature_order().arrange(encoded)?)
    }

    pub fn predict(&self, record: &AccidentRecord) -> Result<Prediction, PredictError> {
        let row = self.prepare(record)?;
        if self.log_rows {
            let sample: Vec<String> = row.iter().map(|(c, v)| format!("{}={}", c, v)).collect();
            info!("row in_dim={} [{}]", row.len(), sample.join(", "));
        } else {
            debug!(in_dim = row.len(), "row prepared");
        }

        let class = self.artifacts.classifier().predict(&row)?;
        let severity = Severity::from_class(class);
        info!(class, severity = %severity, "prediction");
        Ok(Prediction { class, severity })
    }

    /// Full path from raw display selections keyed by column name.
    pub fn predict_selections(
        &self,
        selections: &HashMap<String, String>,
    ) -> Result<Prediction, PredictError> {
        let record = AccidentRecord::from_map(selections)?;
        self.predict(&record)
    }
}
