use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::context::DashboardContext;
use crate::map::MapView;
use crate::types::{LaunchRow, Marker, PredictionInput, PredictionLabel};

const INDEX_HTML: &str = include_str!("../static/index.html");

type ApiError = (StatusCode, Json<Value>);

// ---------- Request/Response types ----------

#[derive(Deserialize, Debug)]
pub struct LaunchQuery {
    pub year: i32,
    pub site: String,
}

#[derive(Serialize, Debug)]
pub struct SliderRange<T> {
    pub min: T,
    pub max: T,
    pub default: T,
}

#[derive(Serialize, Debug)]
pub struct OptionsOut {
    pub years: Vec<i32>,
    pub sites: Vec<String>,
    pub temperature: SliderRange<f64>,
    pub humidity: SliderRange<i64>,
    pub wind_speed: SliderRange<f64>,
}

#[derive(Serialize, Debug)]
pub struct LaunchesOut {
    pub year: i32,
    pub site: String,
    pub total: usize,
    pub rows: Vec<LaunchRow>,
}

#[derive(Serialize, Debug)]
pub struct MarkersOut {
    #[serde(flatten)]
    pub view: MapView,
    pub markers: Vec<Marker>,
}

#[derive(Serialize, Debug)]
pub struct PredictOut {
    pub probability: f64,
    pub percent: String,
    pub label: String,
    pub succeed: bool,
}

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<DashboardContext>,
}

// ---------- Handlers ----------

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn options(State(state): State<AppState>) -> Json<OptionsOut> {
    let table = state.ctx.table();
    let defaults = PredictionInput::default();
    let (t_min, t_max) = PredictionInput::TEMPERATURE_RANGE;
    let (h_min, h_max) = PredictionInput::HUMIDITY_RANGE;
    let (w_min, w_max) = PredictionInput::WIND_SPEED_RANGE;

    Json(OptionsOut {
        years: table.years(),
        sites: table.sites().into_iter().map(str::to_owned).collect(),
        temperature: SliderRange { min: t_min, max: t_max, default: defaults.temperature },
        humidity: SliderRange { min: h_min, max: h_max, default: defaults.humidity },
        wind_speed: SliderRange { min: w_min, max: w_max, default: defaults.wind_speed },
    })
}

pub async fn launches(State(state): State<AppState>, Query(q): Query<LaunchQuery>) -> Json<LaunchesOut> {
    let rows: Vec<LaunchRow> = state.ctx.filter(q.year, &q.site).into_iter().map(LaunchRow::from).collect();
    tracing::debug!("filter year={} site={} -> {} rows", q.year, q.site, rows.len());

    Json(LaunchesOut {
        year: q.year,
        site: q.site,
        total: rows.len(),
        rows,
    })
}

pub async fn markers(State(state): State<AppState>) -> Json<MarkersOut> {
    Json(MarkersOut {
        view: state.ctx.map_view(),
        markers: state.ctx.markers().to_vec(),
    })
}

pub async fn predict(
    State(state): State<AppState>,
    Json(input): Json<PredictionInput>,
) -> Result<Json<PredictOut>, ApiError> {
    let res = state.ctx.predict(&input).map_err(|e| {
        tracing::warn!("prediction failed for {:?}: {}", input, e);
        let status = if e.is_recoverable() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": e.to_string() })))
    })?;

    tracing::debug!("predict {:?} -> p={:.4}", input, res.probability);
    Ok(Json(PredictOut {
        probability: res.probability,
        percent: res.percent(),
        label: res.label.to_string(),
        succeed: res.label == PredictionLabel::Succeed,
    }))
}

pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "launches": state.ctx.table().len(),
        "markers": state.ctx.markers().len(),
        "model": state.ctx.model().kind(),
    }))
}

pub fn router(ctx: Arc<DashboardContext>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/options", get(options))
        .route("/api/launches", get(launches))
        .route("/api/markers", get(markers))
        .route("/api/predict", post(predict))
        .route("/healthz", get(healthz))
        .with_state(AppState { ctx })
}
