use crate::error::Result;
use crate::model::Model;
use crate::types::{PredictionInput, PredictionLabel, PredictionResult};

/// Column order of the single-row feature table handed to the classifier.
pub const FEATURE_ORDER: [&str; 3] = ["temperature", "humidity", "wind_speed"];

pub fn feature_row(input: &PredictionInput) -> [f64; 3] {
    [input.temperature, input.humidity as f64, input.wind_speed]
}

/// Strictly above one half; exactly 0.5 is a failure.
pub fn label_for(probability: f64) -> PredictionLabel {
    if probability > 0.5 {
        PredictionLabel::Succeed
    } else {
        PredictionLabel::Fail
    }
}

pub fn predict(model: &Model, input: &PredictionInput) -> Result<PredictionResult> {
    let [_, probability] = model.predict_proba(&feature_row(input))?;
    Ok(PredictionResult {
        probability,
        label: label_for(probability),
    })
}
