//! Model serialization and persistence
//!
//! Trained models are stored as pretty-printed JSON holding everything the
//! predictor needs: the kernel and its parameters, the support set, the
//! optional weight vector and the bias.

use crate::api::SVM;
use crate::core::{Result, SVMError, SvmConfig};
use crate::kernel::Kernel;
use crate::model::{DecisionFunction, FitSummary, ModelParts, SupportSet, TrainedSVM};
use log::debug;
use ndarray::{Array1, Array2};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

/// Serializable representation of a trained SVM model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableModel<K> {
    /// Kernel identifier, checked against the kernel on load
    pub kernel_type: String,
    /// Kernel with its parameters
    pub kernel: K,
    /// Support vectors, one per entry
    pub support_vectors: Vec<Vec<f64>>,
    /// Indices of the support vectors in the training set
    pub support_indices: Vec<usize>,
    /// Multipliers of the support vectors
    pub support_alpha: Vec<f64>,
    /// Labels of the support vectors
    pub support_labels: Vec<f64>,
    /// Multipliers of all training samples
    pub dual_coefficients: Vec<f64>,
    /// Weight vector, present only for the linear kernel
    pub weights: Option<Vec<f64>>,
    /// Bias term
    pub bias: f64,
    /// Feature dimension expected at prediction time
    pub n_features: usize,
    /// Outcome of the solve that produced the model
    pub fit: FitSummary,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Number of support vectors
    pub n_support_vectors: usize,
    /// Training parameters used
    pub training_params: SvmConfig,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl<K: Kernel + Clone + Serialize + DeserializeOwned> SerializableModel<K> {
    /// Create a serializable model from a trained model and the configuration it was trained with
    pub fn from_trained_model(model: &TrainedSVM<K>, config: &SvmConfig) -> Self {
        let support = model.support_set();
        Self {
            kernel_type: model.kernel().name().to_string(),
            kernel: model.kernel().clone(),
            support_vectors: support.vectors.rows().into_iter().map(|r| r.to_vec()).collect(),
            support_indices: support.indices.clone(),
            support_alpha: support.alpha.to_vec(),
            support_labels: support.labels.to_vec(),
            dual_coefficients: model.dual_coefficients().to_vec(),
            weights: model.weights().map(|w| w.to_vec()),
            bias: model.bias(),
            n_features: model.n_features(),
            fit: model.summary().clone(),
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                n_support_vectors: model.n_support_vectors(),
                training_params: config.clone(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Snapshot of a fitted estimator
    pub fn from_estimator(svm: &SVM<K>) -> Result<Self> {
        Ok(Self::from_trained_model(svm.model()?, svm.config()))
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        debug!("Saved {} model to {}", self.kernel_type, path.as_ref().display());
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(model)
    }

    /// Rebuild the trained model; predictions match the model that was saved
    pub fn to_trained_model(&self) -> Result<TrainedSVM<K>> {
        if self.kernel_type != self.kernel.name() {
            return Err(SVMError::SerializationError(format!(
                "model was saved with the {} kernel, not {}",
                self.kernel_type,
                self.kernel.name()
            )));
        }

        let n_support = self.support_vectors.len();
        for (field, len) in [
            ("support indices", self.support_indices.len()),
            ("support multipliers", self.support_alpha.len()),
            ("support labels", self.support_labels.len()),
        ] {
            if len != n_support {
                return Err(SVMError::SerializationError(format!(
                    "{} has {} entries for {} support vectors",
                    field, len, n_support
                )));
            }
        }
        if n_support == 0 {
            return Err(SVMError::SerializationError(
                "model has no support vectors".to_string(),
            ));
        }
        if let Some(weights) = &self.weights {
            if weights.len() != self.n_features {
                return Err(SVMError::SerializationError(format!(
                    "weight vector has {} entries for {} features",
                    weights.len(),
                    self.n_features
                )));
            }
        }

        if let Some((row, vector)) = self
            .support_vectors
            .iter()
            .enumerate()
            .find(|(_, vector)| vector.len() != self.n_features)
        {
            return Err(SVMError::SerializationError(format!(
                "support vector {} has {} entries for {} features",
                row,
                vector.len(),
                self.n_features
            )));
        }

        let flat: Vec<f64> = self.support_vectors.iter().flatten().copied().collect();
        let vectors = Array2::from_shape_vec((n_support, self.n_features), flat)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;

        let decision = match &self.weights {
            Some(weights) => DecisionFunction::Linear {
                weights: Array1::from(weights.clone()),
            },
            None => DecisionFunction::KernelExpansion,
        };
        let parts = ModelParts {
            support: SupportSet {
                indices: self.support_indices.clone(),
                vectors,
                alpha: Array1::from(self.support_alpha.clone()),
                labels: Array1::from(self.support_labels.clone()),
            },
            decision,
            bias: self.bias,
        };

        Ok(TrainedSVM::from_parts(
            Arc::new(self.kernel.clone()),
            parts,
            Array1::from(self.dual_coefficients.clone()),
            self.n_features,
            self.fit.clone(),
        ))
    }

    /// Human-readable description of the model
    pub fn summary(&self) -> String {
        let params = &self.metadata.training_params;
        format!(
            "=== SVM Model Summary ===\n\
             Kernel Type: {}\n\
             Features: {}\n\
             Support Vectors: {}\n\
             Bias: {:.6}\n\
             Solver: {:?} after {} iterations\n\
             Library Version: {}\n\
             Created: {}\n\
             Training Parameters:\n  \
             C: {}\n  \
             Epsilon: {}\n  \
             Max Iterations: {}\n  \
             Support Threshold: {}",
            self.kernel_type,
            self.n_features,
            self.metadata.n_support_vectors,
            self.bias,
            self.fit.status,
            self.fit.iterations,
            self.metadata.library_version,
            self.metadata.created_at,
            params.c,
            params.epsilon,
            params.max_iterations,
            params.support_threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{GaussianKernel, LinearKernel};
    use ndarray::array;
    use tempfile::NamedTempFile;

    fn data() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [2.0, 1.0],
            [1.0, 2.5],
            [0.5, 0.4],
            [-2.0, -1.0],
            [-0.6, -0.2],
            [-1.0, -2.0]
        ];
        let y = array![1.0, 1.0, 1.0, -1.0, -1.0, -1.0];
        (x, y)
    }

    #[test]
    fn test_linear_model_round_trip() -> Result<()> {
        let (x, y) = data();
        let mut svm = SVM::new().with_c(5.0);
        svm.fit(x.view(), y.view())?;
        let serializable = SerializableModel::from_estimator(&svm)?;

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        serializable.save_to_file(temp_file.path())?;
        let loaded = SerializableModel::<LinearKernel>::load_from_file(temp_file.path())?;

        assert_eq!(loaded.kernel_type, "linear");
        assert!(loaded.weights.is_some());
        assert_eq!(loaded.metadata.training_params.c, 5.0);
        assert_eq!(loaded.support_vectors.len(), serializable.support_vectors.len());

        let restored = loaded.to_trained_model()?;
        let probe = array![[0.0, 0.0], [3.0, -1.0], [-0.2, 0.1]];
        assert_eq!(
            restored.decision_function(probe.view())?,
            svm.decision_function(probe.view())?
        );
        Ok(())
    }

    #[test]
    fn test_gaussian_model_round_trip() -> Result<()> {
        let (x, y) = data();
        let mut svm = SVM::with_kernel(GaussianKernel::new(0.8));
        svm.fit(x.view(), y.view())?;
        let serializable = SerializableModel::from_estimator(&svm)?;

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        serializable.save_to_file(temp_file.path())?;
        let loaded = SerializableModel::<GaussianKernel>::load_from_file(temp_file.path())?;
        assert_eq!(loaded.kernel.sigma(), 0.8);
        assert!(loaded.weights.is_none());

        assert_eq!(loaded.support_vectors, serializable.support_vectors);
        assert_eq!(loaded.support_alpha, serializable.support_alpha);
        assert_eq!(loaded.bias, serializable.bias);

        let restored = loaded.to_trained_model()?;
        assert_eq!(restored.predict(x.view())?, svm.predict(x.view())?);
        assert_eq!(restored.support_vector_indices(), svm.model()?.support_vector_indices());
        Ok(())
    }

    #[test]
    fn test_gaussian_decision_values_survive_json_exactly() -> Result<()> {
        // Irregular coordinates give multipliers with full 17-digit mantissas
        let x = array![
            [0.137, 1.913],
            [1.071, 0.293],
            [0.6180339887, 0.7071067811],
            [1.4142135623, 1.7320508075],
            [-0.319, -1.487],
            [-1.1283791671, -0.211],
            [-0.5772156649, -0.9189385332],
            [-2.7182818284, -0.3678794411]
        ];
        let y = array![1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0];
        let mut svm = SVM::with_kernel(GaussianKernel::new(0.7)).with_c(3.0);
        svm.fit(x.view(), y.view())?;
        let serializable = SerializableModel::from_estimator(&svm)?;

        let json = serde_json::to_string_pretty(&serializable)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        let parsed: SerializableModel<GaussianKernel> = serde_json::from_str(&json)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        assert_eq!(parsed, serializable);

        let probe = array![
            [0.25, 0.125],
            [-0.3333333333, 0.6666666667],
            [1.2345678901, -0.9876543219]
        ];
        let restored = parsed.to_trained_model()?;
        assert_eq!(
            restored.decision_function(x.view())?,
            svm.decision_function(x.view())?
        );
        assert_eq!(
            restored.decision_function(probe.view())?,
            svm.decision_function(probe.view())?
        );
        Ok(())
    }

    #[test]
    fn test_invalid_sigma_in_file_is_rejected() -> Result<()> {
        let (x, y) = data();
        let mut svm = SVM::with_kernel(GaussianKernel::new(0.8));
        svm.fit(x.view(), y.view())?;
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        SerializableModel::from_estimator(&svm)?.save_to_file(temp_file.path())?;

        let contents = std::fs::read_to_string(temp_file.path())?;
        let tampered = contents.replacen("\"sigma\": 0.8", "\"sigma\": 0.0", 1);
        assert_ne!(tampered, contents);
        std::fs::write(temp_file.path(), tampered)?;

        assert!(matches!(
            SerializableModel::<GaussianKernel>::load_from_file(temp_file.path()),
            Err(SVMError::SerializationError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_ragged_support_vectors_are_rejected() -> Result<()> {
        let (x, y) = data();
        let mut svm = SVM::with_kernel(GaussianKernel::new(0.8));
        svm.fit(x.view(), y.view())?;
        let mut ragged = SerializableModel::from_estimator(&svm)?;
        assert!(ragged.support_vectors.len() >= 2);

        // Same element count overall, but the first row borrows from the second
        let moved = ragged.support_vectors[1].remove(0);
        ragged.support_vectors[0].push(moved);

        assert!(matches!(
            ragged.to_trained_model(),
            Err(SVMError::SerializationError(message)) if message.contains("support vector 0")
        ));
        Ok(())
    }

    #[test]
    fn test_unfitted_estimator_cannot_be_saved() {
        let svm = SVM::new();
        assert!(matches!(
            SerializableModel::from_estimator(&svm),
            Err(SVMError::ModelNotTrained)
        ));
    }

    #[test]
    fn test_inconsistent_model_is_rejected() -> Result<()> {
        let (x, y) = data();
        let mut svm = SVM::new();
        svm.fit(x.view(), y.view())?;
        let serializable = SerializableModel::from_estimator(&svm)?;

        let mut missing_labels = serializable.clone();
        missing_labels.support_labels.pop();
        assert!(matches!(
            missing_labels.to_trained_model(),
            Err(SVMError::SerializationError(_))
        ));

        let mut wrong_kernel = serializable.clone();
        wrong_kernel.kernel_type = "rbf".to_string();
        assert!(wrong_kernel.to_trained_model().is_err());

        let mut wrong_width = serializable;
        wrong_width.n_features = 3;
        assert!(wrong_width.to_trained_model().is_err());
        Ok(())
    }

    #[test]
    fn test_load_errors() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        std::fs::write(temp_file.path(), "{ not json").expect("Failed to write");
        assert!(matches!(
            SerializableModel::<LinearKernel>::load_from_file(temp_file.path()),
            Err(SVMError::SerializationError(_))
        ));
        assert!(matches!(
            SerializableModel::<LinearKernel>::load_from_file("/nonexistent/model.json"),
            Err(SVMError::IoError(_))
        ));
    }

    #[test]
    fn test_summary() -> Result<()> {
        let (x, y) = data();
        let mut svm = SVM::new();
        svm.fit(x.view(), y.view())?;
        let summary = SerializableModel::from_estimator(&svm)?.summary();
        assert!(summary.starts_with("=== SVM Model Summary ===\n"));
        assert!(summary.contains("\nKernel Type: linear\n"));
        assert!(summary.contains("\nFeatures: 2\n"));
        assert!(summary.contains("\nTraining Parameters:\n  C: 1\n  Epsilon: 0.000001\n"));
        assert!(summary.ends_with("  Support Threshold: 0.00000001"));
        Ok(())
    }
}
