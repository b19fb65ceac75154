use thiserror::Error;

/// A form submission that falls outside the closed option lists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing selection for {column}")]
    MissingField { column: &'static str },
    #[error("{value:?} is not an option for {column}")]
    InvalidOption { column: &'static str, value: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("unseen category {value} for column {column}")]
    UnseenCategory { column: String, value: String },
}

/// Assembled columns disagree with the trained feature order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("feature order names column {0} but the record has no such column")]
    MissingColumn(String),
    #[error("record column {0} is not part of the feature order")]
    ExtraColumn(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("column {column} holds non-numeric value {value:?}; the model needs numbers")]
    NonNumericFeature { column: String, value: String },
    #[error("row has {got} features, model expects {expected}")]
    InputWidth { got: usize, expected: usize },
    #[error("unexpected model output size: {0:?}")]
    OutputShape(Vec<i64>),
    #[error("class index {index} outside configured classes (len {len})")]
    ClassIndex { index: usize, len: usize },
    #[error(transparent)]
    Torch(#[from] tch::TchError),
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to load TorchScript {path}")]
    Model {
        path: String,
        #[source]
        source: tch::TchError,
    },
    #[error("artifacts disagree: {0}")]
    Inconsistent(String),
}

/// Everything that can end a single prediction request.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("prediction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PredictError {
    /// True when the caller sent something the form would never offer.
    pub fn is_bad_input(&self) -> bool {
        matches!(self, PredictError::Record(_))
    }
}
