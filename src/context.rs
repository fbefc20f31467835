//! Everything loaded at startup and shared read-only by all handlers.

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::map::{build_markers, MapView};
use crate::model::Model;
use crate::predict::{self, FEATURE_ORDER};
use crate::table::LaunchTable;
use crate::types::{LaunchRecord, Marker, PredictionInput, PredictionResult};

#[derive(Debug)]
pub struct DashboardContext {
    table: LaunchTable,
    model: Model,
    /// The table never changes and the map ignores the filter, so markers are built once.
    markers: Vec<Marker>,
    map_view: MapView,
}

impl DashboardContext {
    pub fn new(table: LaunchTable, model: Model, map_view: MapView) -> Self {
        let markers = build_markers(&table);
        tracing::debug!(
            "map keeps {} of {} launches",
            markers.len(),
            table.len()
        );
        Self {
            table,
            model,
            markers,
            map_view,
        }
    }

    /// Loads the launch table and the classifier; any failure is fatal.
    pub fn load(cfg: &DashboardConfig) -> Result<Self> {
        let table = LaunchTable::load(&cfg.data_path)?;
        tracing::info!(
            "loaded {} launches from {} ({} years, {} sites)",
            table.len(),
            cfg.data_path.display(),
            table.years().len(),
            table.sites().len()
        );

        let model = Model::load(&cfg.model_path, &FEATURE_ORDER)?;
        tracing::info!("loaded {} model; feat_list: {:?}", model.kind(), model.feature_names());

        // Warmup so a broken artifact fails here rather than on first submit.
        let warm = predict::predict(&model, &PredictionInput::default())?;
        tracing::info!("warmup ok: p(success)={:.4} at default inputs", warm.probability);

        Ok(Self::new(table, model, cfg.map))
    }

    pub fn table(&self) -> &LaunchTable {
        &self.table
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn map_view(&self) -> MapView {
        self.map_view
    }

    pub fn filter(&self, year: i32, site: &str) -> Vec<&LaunchRecord> {
        self.table.filter(year, site)
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn predict(&self, input: &PredictionInput) -> Result<PredictionResult> {
        predict::predict(&self.model, input)
    }
}
