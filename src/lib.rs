//! Launch history dashboard: year/site filtering over a launch table, a
//! map of launch outcomes, and a weather what-if predictor backed by a
//! pretrained classifier. Served as a single page by [`server::router`].

pub mod config;
pub mod context;
pub mod error;
pub mod map;
pub mod model;
pub mod predict;
pub mod server;
pub mod table;
pub mod types;

pub use context::DashboardContext;
pub use error::{DashboardError, Result};
