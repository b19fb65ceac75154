use crate::config::AppConfig;
use crate::encoders::EncoderSet;
use crate::error::ArtifactError;
use crate::features::FeatureOrder;
use crate::fields::{categorical_columns, Conversion, FIELDS};
use crate::model::{Classifier, TorchClassifier};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Model, encoders and feature order, loaded once and never mutated.
pub struct Artifacts {
    classifier: Arc<dyn Classifier>,
    encoders: EncoderSet,
    feature_order: FeatureOrder,
}

impl Artifacts {
    /// Bundle the three artifacts, rejecting any combination that could
    /// only fail later at request time.
    pub fn new(
        classifier: Arc<dyn Classifier>,
        encoders: EncoderSet,
        feature_order: FeatureOrder,
    ) -> Result<Self, ArtifactError> {
        let form_columns: HashSet<&str> = FIELDS.iter().map(|f| f.column).collect();
        let mut seen = HashSet::new();
        for name in feature_order.names() {
            if !seen.insert(name.as_str()) {
                return Err(ArtifactError::Inconsistent(format!(
                    "feature order lists {} twice",
                    name
                )));
            }
            if !form_columns.contains(name.as_str()) {
                return Err(ArtifactError::Inconsistent(format!(
                    "feature order names {} which the form does not collect",
                    name
                )));
            }
        }
        if let Some(missing) = form_columns.iter().find(|c| !seen.contains(*c)) {
            return Err(ArtifactError::Inconsistent(format!(
                "form column {} is absent from the feature order",
                missing
            )));
        }

        for stray in encoders.columns().filter(|c| !feature_order.contains(c)) {
            warn!(column = stray, "encoder has no column in the feature order; ignored");
        }
        if let Some(bare) = categorical_columns().find(|c| !encoders.contains(c)) {
            return Err(ArtifactError::Inconsistent(format!(
                "categorical column {} has no encoder",
                bare
            )));
        }

        for f in FIELDS.iter().filter(|f| f.conversion == Conversion::Count) {
            if !encoders.contains(f.column) {
                warn!(
                    column = f.column,
                    "count column has no encoder; raw strings go to the model"
                );
            }
        }

        Ok(Self {
            classifier,
            encoders,
            feature_order,
        })
    }

    /// Load all three artifacts from the configured paths.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let encoders = EncoderSet::load(&config.encoders_path)
            .with_context(|| "failed to load encoders")?;
        let feature_order = FeatureOrder::load(&config.feature_order_path)
            .with_context(|| "failed to load feature order")?;
        info!(
            encoders = encoders.len(),
            features = feature_order.len(),
            "loaded encoders and feature order"
        );

        let classifier = TorchClassifier::load(
            &config.model_path,
            feature_order.len(),
            config.classes.clone(),
        )
        .with_context(|| format!("failed to load model at {}", config.model_path))?;

        let artifacts = Self::new(Arc::new(classifier), encoders, feature_order)?;
        for (column, option) in artifacts.unseen_options() {
            warn!(column, option, "form option unknown to its encoder; selecting it will fail");
        }
        Ok(artifacts)
    }

    /// Form options an encoder was never fitted on. Any entry here means a
    /// request selecting that option fails with an unseen-category error.
    pub fn unseen_options(&self) -> Vec<(&'static str, &'static str)> {
        let mut out = Vec::new();
        for f in FIELDS.iter() {
            let Some(enc) = self.encoders.get(f.column) else {
                continue;
            };
            for option in f.options {
                let known = f.convert(option).map(|v| enc.knows(&v)).unwrap_or(false);
                if !known {
                    out.push((f.column, *option));
                }
            }
        }
        out
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    pub fn feature_order(&self) -> &FeatureOrder {
        &self.feature_order
    }
}
