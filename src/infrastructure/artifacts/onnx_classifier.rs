use crate::domain::errors::{ArtifactKind, ChurnError};
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FeatureVector};
use crate::domain::ports::ChurnClassifier;
use crate::domain::prediction::{ChurnLabel, PredictionResult};
use ort::session::Session;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

const BACKEND: &str = "ONNX Runtime";

/// Classifier exported to ONNX (e.g. XGBoost through onnxmltools, ZipMap disabled).
///
/// The model must expose an int64 label output and a float probability output of
/// shape `[1, 2]`; both are read as-is.
pub struct OnnxClassifier {
    session: Mutex<Session>,
}

impl OnnxClassifier {
    pub fn load(model_path: &Path) -> Result<Self, ChurnError> {
        if !model_path.exists() {
            return Err(ChurnError::artifact_load(
                ArtifactKind::Classifier,
                model_path,
                "file not found",
            ));
        }

        let mut builder = Session::builder().map_err(|e| {
            ChurnError::artifact_load(
                ArtifactKind::Classifier,
                model_path,
                format!("failed to create ONNX session builder: {}", e),
            )
        })?;
        let session = builder
            .commit_from_file(model_path)
            .map_err(|e| ChurnError::artifact_load(ArtifactKind::Classifier, model_path, e))?;

        info!("Successfully loaded ONNX model from {:?}", model_path);
        Ok(Self {
            session: Mutex::new(session),
        })
    }

    fn features_to_inputs(features: &FeatureVector) -> Vec<f32> {
        features.as_slice().iter().map(|v| *v as f32).collect()
    }
}

impl ChurnClassifier for OnnxClassifier {
    fn predict(&self, scaled: &FeatureVector) -> Result<PredictionResult, ChurnError> {
        let shape = vec![1, FEATURE_COUNT];
        let input_value =
            ort::value::Value::from_array((shape.as_slice(), Self::features_to_inputs(scaled)))
                .map_err(|e| ChurnError::inference(BACKEND, format!("input creation failed: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ChurnError::inference(BACKEND, format!("mutex lock failed: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(|e| ChurnError::inference(BACKEND, e))?;

        let mut label = None;
        let mut probability = None;
        for (_, value) in outputs.iter() {
            if let Ok((_, data)) = value.try_extract_tensor::<i64>() {
                label = data.first().copied();
            } else if let Ok((_, data)) = value.try_extract_tensor::<f32>() {
                // [p(retained), p(churn)]
                probability = data.get(1).map(|p| *p as f64);
            }
        }

        let class = label.ok_or_else(|| ChurnError::inference(BACKEND, "no int64 label output"))?;
        let label = ChurnLabel::from_class(class)
            .ok_or_else(|| ChurnError::inference(BACKEND, format!("unexpected class {}", class)))?;
        let probability = probability.ok_or_else(|| {
            ChurnError::inference(
                BACKEND,
                "no [1, 2] float probability output (export with ZipMap disabled)",
            )
        })?;

        Ok(PredictionResult::new(label, probability))
    }

    fn name(&self) -> &str {
        "ONNX Runtime Classifier"
    }
}
