use serde::Deserialize;
use std::{env, fs, path::PathBuf};

use crate::error::{DashboardError, Result};
use crate::map::MapView;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    pub bind_addr: String,
    pub map: MapView,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("enriched_spacex_launches.csv"),
            model_path: PathBuf::from("models/launch_success.json"),
            bind_addr: "0.0.0.0:8080".to_string(),
            map: MapView::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &str) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| DashboardError::io(path, e))?;
        serde_json::from_str(&data).map_err(|e| DashboardError::Config(format!("invalid config {path}: {e}")))
    }

    /// `DASHBOARD_CONFIG` file if set, then `DATA_PATH`, `MODEL_PATH`,
    /// `BIND_ADDR` and `PORT` overrides.
    pub fn from_env() -> Result<Self> {
        let mut cfg = match env::var("DASHBOARD_CONFIG") {
            Ok(path) => Self::load(&path)?,
            Err(_) => Self::default(),
        };
        cfg.apply_overrides(|key| env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(p) = var("DATA_PATH") {
            self.data_path = PathBuf::from(p);
        }
        if let Some(p) = var("MODEL_PATH") {
            self.model_path = PathBuf::from(p);
        }
        if let Some(addr) = var("BIND_ADDR") {
            self.bind_addr = addr;
        } else if let Some(port) = var("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| DashboardError::Config(format!("PORT `{port}` is not a valid port")))?;
            self.bind_addr = format!("0.0.0.0:{port}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: DashboardConfig = serde_json::from_str(r#"{"bind_addr":"127.0.0.1:9000"}"#).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert_eq!(cfg.map, MapView::default());
        assert_eq!(cfg.data_path, PathBuf::from("enriched_spacex_launches.csv"));
    }

    #[test]
    fn port_override_and_bad_port() {
        let mut cfg = DashboardConfig::default();
        cfg.apply_overrides(|k| (k == "PORT").then(|| "9100".to_string())).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:9100");

        let err = cfg.apply_overrides(|k| (k == "PORT").then(|| "ninety".to_string()));
        assert!(err.is_err());
    }
}
