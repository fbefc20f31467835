//! Map marker construction.
//!
//! Markers always come from the whole table, never from the year/site
//! selection, so the map shows every historical launch that has a site,
//! an outcome and coordinates.

use askama_escape::{escape, Html};
use serde::{Deserialize, Serialize};

use crate::table::LaunchTable;
use crate::types::{Marker, MarkerOutcome};

pub const MARKER_RADIUS: u32 = 6;

/// Initial map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: [28.5, -80.6],
            zoom: 3,
        }
    }
}

/// One marker per record that has a launchpad, an outcome and coordinates,
/// in table order.
pub fn build_markers(table: &LaunchTable) -> Vec<Marker> {
    table
        .records()
        .iter()
        .filter_map(|r| {
            let pad = r.launchpad.as_deref()?;
            let success = r.success?;
            let loc = r.location?;

            let (color, outcome, text) = if success {
                ("green", MarkerOutcome::Success, "Success")
            } else {
                ("red", MarkerOutcome::Failure, "Failure")
            };

            Some(Marker {
                lat: loc.lat,
                lon: loc.lon,
                color,
                fill_color: color,
                radius: MARKER_RADIUS,
                popup: format!("{}<br>{}<br>{}", escape(pad, Html), escape(&r.date_utc, Html), text),
                outcome,
            })
        })
        .collect()
}
