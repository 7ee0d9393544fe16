use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use serde::Deserialize;
use tract_onnx::prelude::*;

use crate::error::PredictError;
use crate::models::{FeatureInfo, ModelInfo, PredictionResult};
use crate::page::display_name;

pub const FEATURES_FILE: &str = "features.json";
pub const ONNX_MODEL_FILE: &str = "aqi_model.onnx";
pub const LINEAR_MODEL_FILE: &str = "aqi_model.json";

/// A trained regressor: one feature vector in, one scalar out.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &[f64]) -> anyhow::Result<f64>;

    /// Short name of the persisted format, reported by `/api/model-info`.
    fn format(&self) -> &'static str;
}

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX regression graph (e.g. exported with sklearn-onnx) run through tract.
pub struct OnnxRegressor {
    model: OnnxPlan,
    input_len: usize,
}

impl OnnxRegressor {
    pub fn load<P: AsRef<Path>>(model_path: P, input_len: usize) -> TractResult<Self> {
        let model = tract_onnx::onnx()
            .model_for_path(model_path)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, input_len)),
            )?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self { model, input_len })
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, features: &[f64]) -> anyhow::Result<f64> {
        if features.len() != self.input_len {
            bail!(
                "expected {} features, got {}",
                self.input_len,
                features.len()
            );
        }

        let input: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input_tensor = Tensor::from_shape(&[1, self.input_len], input.as_slice())?;
        let outputs = self.model.run(tvec!(input_tensor.into()))?;

        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no output"))?
            .cast_to::<f32>()?;
        let value = *output
            .to_array_view::<f32>()?
            .iter()
            .next()
            .ok_or_else(|| anyhow!("model output is empty"))?;

        Ok(value as f64)
    }

    fn format(&self) -> &'static str {
        "onnx"
    }
}

/// Plain linear regression stored as JSON coefficients.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LinearRegressor {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegressor {
    pub fn load<P: AsRef<Path>>(model_path: P) -> anyhow::Result<Self> {
        let path = model_path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading linear model {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing linear model {}", path.display()))
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &[f64]) -> anyhow::Result<f64> {
        if features.len() != self.coefficients.len() {
            bail!(
                "expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            );
        }

        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>())
    }

    fn format(&self) -> &'static str {
        "linear"
    }
}

/// Model plus its ordered feature list, loaded once and shared read-only.
pub struct ModelInference {
    model: Box<dyn Regressor>,
    features: Vec<String>,
}

impl ModelInference {
    /// Loads `features.json` and the model from `model_dir`.
    ///
    /// `aqi_model.onnx` is preferred; `aqi_model.json` is used when no ONNX
    /// graph is present. Any missing or malformed artifact is an error.
    pub fn load<P: AsRef<Path>>(model_dir: P) -> anyhow::Result<Self> {
        let dir = model_dir.as_ref();
        if !dir.is_dir() {
            bail!("model directory {} does not exist", dir.display());
        }

        let features = load_features(&dir.join(FEATURES_FILE))?;

        let onnx_path = dir.join(ONNX_MODEL_FILE);
        let linear_path = dir.join(LINEAR_MODEL_FILE);
        let model: Box<dyn Regressor> = if onnx_path.is_file() {
            let model = OnnxRegressor::load(&onnx_path, features.len())
                .with_context(|| format!("loading ONNX model {}", onnx_path.display()))?;
            Box::new(model)
        } else if linear_path.is_file() {
            let model = LinearRegressor::load(&linear_path)?;
            if model.coefficients.len() != features.len() {
                bail!(
                    "{} has {} coefficients but {} lists {} features",
                    linear_path.display(),
                    model.coefficients.len(),
                    FEATURES_FILE,
                    features.len()
                );
            }
            Box::new(model)
        } else {
            bail!(
                "no model found in {} (expected {} or {})",
                dir.display(),
                ONNX_MODEL_FILE,
                LINEAR_MODEL_FILE
            );
        };

        Ok(Self::from_parts(model, features))
    }

    pub fn from_parts(model: Box<dyn Regressor>, features: Vec<String>) -> Self {
        Self { model, features }
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Builds the model input from form fields, in feature-list order.
    pub fn feature_vector(&self, form: &HashMap<String, String>) -> Result<Vec<f64>, PredictError> {
        self.features
            .iter()
            .map(|feature| {
                let raw = form
                    .get(feature)
                    .ok_or_else(|| PredictError::MissingField(feature.clone()))?;
                let value = raw.trim().parse::<f64>().map_err(|_| PredictError::Parse {
                    field: feature.clone(),
                    value: raw.clone(),
                })?;
                if !value.is_finite() {
                    return Err(PredictError::NonFinite {
                        field: feature.clone(),
                        value: raw.clone(),
                    });
                }
                Ok(value)
            })
            .collect()
    }

    pub fn predict(&self, form: &HashMap<String, String>) -> Result<PredictionResult, PredictError> {
        let input = self.feature_vector(form)?;

        let raw = self
            .model
            .predict(&input)
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        if !raw.is_finite() {
            return Err(PredictError::Inference(format!("model returned {}", raw)));
        }

        Ok(PredictionResult::from_raw(raw))
    }

    pub fn get_model_info(&self) -> ModelInfo {
        ModelInfo {
            format: self.model.format(),
            feature_count: self.features.len(),
            features: self
                .features
                .iter()
                .map(|name| FeatureInfo {
                    name: name.clone(),
                    display_name: display_name(name).to_string(),
                })
                .collect(),
        }
    }
}

fn load_features(path: &Path) -> anyhow::Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading feature list {}", path.display()))?;
    let features: Vec<String> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing feature list {}", path.display()))?;
    if features.is_empty() {
        bail!("feature list {} is empty", path.display());
    }
    Ok(features)
}
