//! Pretrained launch-success classifier.
//!
//! The artifact is a JSON export carrying its own feature list and class
//! order next to the estimator parameters, so a schema drift between
//! training and serving is caught at load time.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{DashboardError, Result};

#[derive(Deserialize, Debug, Clone)]
struct ArtifactJson {
    feature_names: Vec<String>,
    classes: Vec<serde_json::Value>,
    estimator: Estimator,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Estimator {
    RandomForest { trees: Vec<Tree> },
    Logistic { coefficients: Vec<f64>, intercept: f64 },
}

/// scikit-learn's flattened tree layout. `children_left[i] == -1` marks a leaf.
#[derive(Deserialize, Debug, Clone)]
struct Tree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    /// Per node class counts (or fractions), `[negative, positive]`.
    value: Vec<Vec<f64>>,
}

const LEAF: i64 = -1;

impl Tree {
    fn validate(&self, idx: usize, n_features: usize) -> Result<()> {
        let n = self.children_left.len();
        let bad = |why: String| DashboardError::SchemaMismatch(format!("tree {idx}: {why}"));

        if n == 0 {
            return Err(bad("no nodes".into()));
        }
        if [self.children_right.len(), self.feature.len(), self.threshold.len(), self.value.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(bad("node arrays differ in length".into()));
        }

        for node in 0..n {
            let (l, r) = (self.children_left[node], self.children_right[node]);
            if l == LEAF {
                let v = &self.value[node];
                if v.len() != 2 || v.iter().any(|x| !x.is_finite() || *x < 0.0) || v.iter().sum::<f64>() <= 0.0 {
                    return Err(bad(format!("leaf {node} has invalid class values {v:?}")));
                }
                continue;
            }
            // Children always follow their parent, which also rules out cycles.
            for child in [l, r] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(bad(format!("node {node} points to invalid child {child}")));
                }
            }
            let f = self.feature[node];
            if f < 0 || f as usize >= n_features {
                return Err(bad(format!("node {node} splits on unknown feature {f}")));
            }
        }
        Ok(())
    }

    fn positive_proba(&self, x: &[f64]) -> f64 {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let f = self.feature[node] as usize;
            node = if x[f] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        let v = &self.value[node];
        v[1] / (v[0] + v[1])
    }
}

pub struct Model {
    feature_names: Vec<String>,
    estimator: Estimator,
}

impl Model {
    /// Loads the artifact and checks it against the feature order the caller
    /// will use for inference.
    pub fn load(path: impl AsRef<Path>, expected_features: &[&str]) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|e| DashboardError::io(path.display().to_string(), e))?;
        Self::from_json(&txt, expected_features)
    }

    pub fn from_json(txt: &str, expected_features: &[&str]) -> Result<Self> {
        let artifact: ArtifactJson = serde_json::from_str(txt)?;

        if artifact.feature_names.iter().map(String::as_str).ne(expected_features.iter().copied()) {
            return Err(DashboardError::SchemaMismatch(format!(
                "model features {:?} != expected {:?}",
                artifact.feature_names, expected_features
            )));
        }
        check_classes(&artifact.classes)?;

        let n_features = artifact.feature_names.len();
        match &artifact.estimator {
            Estimator::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(DashboardError::SchemaMismatch("random forest has no trees".into()));
                }
                for (i, t) in trees.iter().enumerate() {
                    t.validate(i, n_features)?;
                }
            }
            Estimator::Logistic { coefficients, .. } => {
                if coefficients.len() != n_features {
                    return Err(DashboardError::SchemaMismatch(format!(
                        "logistic model has {} coefficients, expected {n_features}",
                        coefficients.len()
                    )));
                }
            }
        }

        Ok(Self {
            feature_names: artifact.feature_names,
            estimator: artifact.estimator,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn kind(&self) -> &'static str {
        match self.estimator {
            Estimator::RandomForest { .. } => "random_forest",
            Estimator::Logistic { .. } => "logistic",
        }
    }

    /// Returns `[p(fail), p(success)]` for a single row.
    pub fn predict_proba(&self, x: &[f64]) -> Result<[f64; 2]> {
        if x.len() != self.feature_names.len() {
            return Err(DashboardError::SchemaMismatch(format!(
                "feature length mismatch: got {}, expected {}",
                x.len(),
                self.feature_names.len()
            )));
        }

        let p = match &self.estimator {
            Estimator::RandomForest { trees } => {
                trees.iter().map(|t| t.positive_proba(x)).sum::<f64>() / trees.len() as f64
            }
            Estimator::Logistic { coefficients, intercept } => {
                let z = coefficients.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + intercept;
                1.0 / (1.0 + (-z).exp())
            }
        };

        if !p.is_finite() {
            return Err(DashboardError::Inference(format!("non-finite probability for input {x:?}")));
        }
        let p = p.clamp(0.0, 1.0);
        Ok([1.0 - p, p])
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("kind", &self.kind())
            .field("feature_names", &self.feature_names)
            .finish_non_exhaustive()
    }
}

/// The positive ("success") class has to be second, as `predict_proba` reads index 1.
fn check_classes(classes: &[serde_json::Value]) -> Result<()> {
    use serde_json::Value;

    let is_positive = |v: &Value| match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => matches!(s.to_ascii_lowercase().as_str(), "success" | "true" | "1"),
        _ => false,
    };

    if classes.len() != 2 || is_positive(&classes[0]) || !is_positive(&classes[1]) {
        return Err(DashboardError::SchemaMismatch(format!(
            "expected two classes with success second, got {classes:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURES: [&str; 3] = ["temperature", "humidity", "wind_speed"];

    fn stump(threshold: f64, left: [f64; 2], right: [f64; 2]) -> String {
        format!(
            r#"{{"children_left":[1,-1,-1],"children_right":[2,-1,-1],"feature":[2,-2,-2],
                "threshold":[{threshold},-2.0,-2.0],"value":[[0,0],[{},{}],[{},{}]]}}"#,
            left[0], left[1], right[0], right[1]
        )
    }

    #[test]
    fn forest_averages_leaf_probabilities() {
        let json = format!(
            r#"{{"feature_names":["temperature","humidity","wind_speed"],"classes":[0,1],
                "estimator":{{"kind":"random_forest","trees":[{},{}]}}}}"#,
            stump(10.0, [1.0, 3.0], [3.0, 1.0]),
            stump(20.0, [0.0, 2.0], [2.0, 0.0]),
        );
        let m = Model::from_json(&json, &FEATURES).unwrap();
        // wind 5 -> left in both: (0.75 + 1.0) / 2
        let p = m.predict_proba(&[25.0, 50.0, 5.0]).unwrap();
        assert!((p[1] - 0.875).abs() < 1e-12);
        // wind 15 -> right, then left
        let p = m.predict_proba(&[25.0, 50.0, 15.0]).unwrap();
        assert!((p[1] - 0.625).abs() < 1e-12);
    }

    #[test]
    fn rejects_backward_child_pointers() {
        let json = r#"{"feature_names":["temperature","humidity","wind_speed"],"classes":[false,true],
            "estimator":{"kind":"random_forest","trees":[{"children_left":[0],"children_right":[0],
            "feature":[0],"threshold":[1.0],"value":[[1,1]]}]}}"#;
        let err = Model::from_json(json, &FEATURES).unwrap_err();
        assert!(matches!(err, DashboardError::SchemaMismatch(_)));
    }

    #[test]
    fn logistic_is_sigmoid_of_margin() {
        let json = r#"{"feature_names":["temperature","humidity","wind_speed"],"classes":["failure","success"],
            "estimator":{"kind":"logistic","coefficients":[0.0,0.0,0.0],"intercept":0.0}}"#;
        let m = Model::from_json(json, &FEATURES).unwrap();
        assert_eq!(m.predict_proba(&[1.0, 2.0, 3.0]).unwrap(), [0.5, 0.5]);
        assert_eq!(m.kind(), "logistic");
    }
}
