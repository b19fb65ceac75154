use crate::error::{ArtifactError, ModelError};
use crate::features::EncodedRow;
use crate::record::RawValue;
use parking_lot::Mutex;
use tch::{kind::Kind, CModule, Device, Tensor};

/// The trained estimator, whatever algorithm sits behind it.
pub trait Classifier: Send + Sync {
    /// Predict one integer class for a single row in feature order.
    fn predict(&self, row: &EncodedRow) -> Result<i64, ModelError>;
}

/// TorchScript export of the severity classifier.
///
/// The module takes a float tensor `[1, N]` and returns either per-class
/// scores `[1, C]` (argmax is looked up in `classes`) or the class label
/// itself as `[1]` / `[1, 1]`.
pub struct TorchClassifier {
    model: Mutex<CModule>,
    device: Device,
    in_dim: usize,
    classes: Vec<i64>,
}

impl TorchClassifier {
    pub fn load(path: &str, in_dim: usize, classes: Vec<i64>) -> Result<Self, ArtifactError> {
        let device = Device::Cpu;
        let model_err = |source| ArtifactError::Model {
            path: path.to_string(),
            source,
        };

        let model = CModule::load_on_device(path, device).map_err(model_err)?;

        // Probe output shape with a dummy forward.
        let dummy = Tensor::zeros([1, in_dim as i64], (Kind::Float, device));
        let out = {
            let _guard = tch::no_grad_guard();
            model.forward_ts(&[dummy]).map_err(model_err)?
        };
        let sz = out.size();
        if !output_shape_ok(&sz, classes.len()) {
            return Err(ArtifactError::Inconsistent(format!(
                "model output size {:?} does not fit {} classes",
                sz,
                classes.len()
            )));
        }
        tracing::info!(path, in_dim, output = ?sz, "TorchScript classifier loaded");

        Ok(Self {
            model: Mutex::new(model),
            device,
            in_dim,
            classes,
        })
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }
}

impl Classifier for TorchClassifier {
    fn predict(&self, row: &EncodedRow) -> Result<i64, ModelError> {
        let x = feature_vector(row)?;
        if x.len() != self.in_dim {
            return Err(ModelError::InputWidth {
                got: x.len(),
                expected: self.in_dim,
            });
        }

        let input = Tensor::f_from_slice(x.as_slice())?
            .f_reshape([1, self.in_dim as i64])?
            .to_device(self.device);

        let out = {
            let _guard = tch::no_grad_guard();
            self.model.lock().forward_ts(&[input])?
        };
        class_from_output(&out, &self.classes)
    }
}

/// Numeric view of a row. Integer codes pass through; text must parse as a
/// number (a raw count like "2" does, an open bucket like "5+" does not).
pub fn feature_vector(row: &EncodedRow) -> Result<Vec<f32>, ModelError> {
    row.iter()
        .map(|(column, value)| match value {
            RawValue::Int(v) => Ok(*v as f32),
            RawValue::Text(s) => s.trim().parse::<f32>().map_err(|_| ModelError::NonNumericFeature {
                column: column.to_string(),
                value: s.clone(),
            }),
        })
        .collect()
}

fn output_shape_ok(sz: &[i64], n_classes: usize) -> bool {
    match sz {
        [1] | [1, 1] => true,
        [1, c] => *c as usize == n_classes,
        _ => false,
    }
}

pub fn class_from_output(out: &Tensor, classes: &[i64]) -> Result<i64, ModelError> {
    let sz = out.size();
    match sz.as_slice() {
        [1] => Ok(out.f_double_value(&[0])?.round() as i64),
        [1, 1] => Ok(out.f_double_value(&[0, 0])?.round() as i64),
        [1, c] if *c as usize == classes.len() => {
            let index = out.f_argmax(1, false)?.f_int64_value(&[0])? as usize;
            classes.get(index).copied().ok_or(ModelError::ClassIndex {
                index,
                len: classes.len(),
            })
        }
        _ => Err(ModelError::OutputShape(sz.clone())),
    }
}
